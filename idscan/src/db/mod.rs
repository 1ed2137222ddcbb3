pub mod backends;
mod connection;
mod metadata;
pub(crate) mod schema;
pub mod traits;

pub use backends::libsql::LibSqlBackend;
pub use backends::memory::InMemoryBackend;
pub use connection::Database;
pub use metadata::MetadataRepository;
pub use traits::*;
