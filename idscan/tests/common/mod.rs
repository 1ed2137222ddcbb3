// Shared doubles for scanner integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;

use idscan::db::{InMemoryBackend, KeyValueStore};
use idscan::ocr::{ImagePayload, OfflineOcr, OnlineOcr};
use idscan::usage::UsageTracker;
use idscan::{Result, ScanError, Scanner};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Ordered record of backend start/finish events across one test.
pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub enum Behavior {
    Text(&'static str),
    NoText,
    Transport,
}

pub struct MockOnline {
    behavior: Behavior,
    delay: Duration,
    calls: AtomicUsize,
    credentials: Mutex<Vec<Option<String>>>,
    log: EventLog,
}

impl MockOnline {
    pub fn new(behavior: Behavior, log: EventLog) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            credentials: Mutex::new(Vec::new()),
            log,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn credentials(&self) -> Vec<Option<String>> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl OnlineOcr for MockOnline {
    async fn recognize(&self, _image: &ImagePayload, credential: Option<&str>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .unwrap()
            .push(credential.map(str::to_string));
        self.log.lock().unwrap().push("online:start");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.lock().unwrap().push("online:end");

        match self.behavior {
            Behavior::Text(text) => Ok(text.to_string()),
            Behavior::NoText => Err(ScanError::NoTextDetected),
            Behavior::Transport => Err(ScanError::Ocr("connection reset".to_string())),
        }
    }
}

pub struct MockOffline {
    behavior: Behavior,
    calls: AtomicUsize,
    log: EventLog,
}

impl MockOffline {
    pub fn new(behavior: Behavior, log: EventLog) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            log,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OfflineOcr for MockOffline {
    async fn recognize(&self, _image: &ImagePayload) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("offline:start");

        match self.behavior {
            Behavior::Text(text) => Ok(text.to_string()),
            Behavior::NoText => Ok(String::new()),
            Behavior::Transport => Err(ScanError::OcrUnavailable(
                "Tesseract not available".to_string(),
            )),
        }
    }
}

/// Scanner wired to mocks plus handles for inspecting them afterwards.
pub struct Harness {
    pub scanner: Scanner,
    pub online: Arc<MockOnline>,
    pub offline: Arc<MockOffline>,
    pub store: Arc<InMemoryBackend>,
    pub log: EventLog,
}

impl Harness {
    pub fn new(online: Behavior, offline: Behavior) -> Self {
        let log = event_log();
        let online = Arc::new(MockOnline::new(online, log.clone()));
        let offline = Arc::new(MockOffline::new(offline, log.clone()));
        Self::with_parts(online, offline, log)
    }

    pub fn with_parts(online: Arc<MockOnline>, offline: Arc<MockOffline>, log: EventLog) -> Self {
        init_test_logger();
        let store = Arc::new(InMemoryBackend::new());
        let tracker = Arc::new(UsageTracker::new(store.clone()));
        let scanner = Scanner::new(online.clone(), offline.clone(), tracker);
        Self {
            scanner,
            online,
            offline,
            store,
            log,
        }
    }

    /// Set the stored usage for the current month.
    pub async fn seed_usage(&self, count: u64) {
        // Establish the current period first so the seed is not reset away.
        self.scanner.usage().current_usage().await.unwrap();
        self.store
            .set(idscan::usage::USAGE_KEY, &count.to_string())
            .await
            .unwrap();
    }

    pub async fn usage(&self) -> u64 {
        self.scanner.usage().current_usage().await.unwrap()
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }
}

pub fn image() -> ImagePayload {
    ImagePayload::from_bytes(vec![0x89, 0x50, 0x4E, 0x47])
}
