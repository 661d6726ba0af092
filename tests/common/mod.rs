//! Shared test utilities and fake sources/storage.

#![allow(dead_code, unused_imports)]

pub mod mock_mealdb;

use async_trait::async_trait;
use mealdeck::catalog::Meal;
use mealdeck::config::SourceConfig;
use mealdeck::fetch::MealSource;
use mealdeck::storage::{KeyValueStore, MemoryStore, StorageError};
use mealdeck::store::{MealStore, StoreOptions};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

/// A remote meal with a description and thumbnail derived from its title.
pub fn meal(id: &str, title: &str) -> Meal {
    Meal::remote(
        id,
        title,
        format!("How to make {}", title),
        format!("https://img.example/{}.jpg", id),
    )
}

pub fn ids(meals: &[Meal]) -> Vec<String> {
    meals.iter().map(|m| m.id.clone()).collect()
}

/// Poll `cond` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

// -- Sources ------------------------------------------------------------------

/// Returns scripted results in order, then empty results forever.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Vec<Meal>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Vec<Meal>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MealSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_all(&self) -> Vec<Meal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses.lock().pop_front().unwrap_or_default()
    }
}

/// Blocks every fetch until `release` is called once per fetch.
pub struct GatedSource {
    gate: Notify,
    meals: Vec<Meal>,
}

impl GatedSource {
    pub fn new(meals: Vec<Meal>) -> Self {
        Self {
            gate: Notify::new(),
            meals,
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl MealSource for GatedSource {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn fetch_all(&self) -> Vec<Meal> {
        self.gate.notified().await;
        self.meals.clone()
    }
}

// -- Storage ------------------------------------------------------------------

/// In-memory storage that counts writes and can be told to fail them.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: PathBuf::from(key),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

/// Open a store with default options.
pub fn open_store(source: Arc<dyn MealSource>, storage: Arc<dyn KeyValueStore>) -> MealStore {
    MealStore::open(source, storage, StoreOptions::default()).expect("Failed to open store")
}

/// Parse whatever the store persisted under the default namespace.
pub fn persisted(storage: &dyn KeyValueStore) -> serde_json::Value {
    let bytes = storage
        .get("meal-storage")
        .expect("Failed to read slot")
        .expect("Nothing persisted");
    serde_json::from_slice(&bytes).expect("Persisted slot is not JSON")
}

// -- Config -------------------------------------------------------------------

/// Source settings pointed at a mock server, with fast retries.
pub fn source_config(base_url: &str, partitions: &[&str]) -> SourceConfig {
    SourceConfig {
        base_url: base_url.to_string(),
        partitions: partitions.iter().map(|p| p.to_string()).collect(),
        timeout_seconds: 2,
        connect_timeout_seconds: 1,
        max_retries: 2,
        retry_backoff_base_ms: 1,
        ..SourceConfig::default()
    }
}

/// Create a temporary config whose storage lives in the same temp dir.
///
/// The source points at a closed local port so nothing reaches the network.
pub fn temp_config(base_url: Option<&str>) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    let data_dir = temp_dir.path().join("data");

    let content = format!(
        r#"[source]
base_url = "{}"
partitions = ["a", "b"]
timeout_seconds = 2
connect_timeout_seconds = 1
max_retries = 0

[storage]
dir = "{}"

[view]
page_size = 8
"#,
        base_url.unwrap_or("http://127.0.0.1:9/api/json/v1/1/search.php"),
        data_dir.display()
    );

    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

pub fn data_dir(temp_dir: &Path) -> PathBuf {
    temp_dir.join("data")
}
