use crate::db::connection::Database;
use crate::db::traits::KeyValueStore;
use crate::db::MetadataRepository;
use crate::error::Result;
use async_trait::async_trait;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Sync with remote (e.g. Turso replication). No-op for local-only databases.
    pub async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}

#[async_trait]
impl KeyValueStore for LibSqlBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.db.connect()?;
        MetadataRepository::get(&conn, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.db.connect()?;
        MetadataRepository::set(&conn, key, value).await
    }
}
