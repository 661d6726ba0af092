use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_PAGE_SIZE;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

/// Remote meal source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Search endpoint (e.g., "https://www.themealdb.com/api/json/v1/1/search.php").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Query parameter carrying the partition key (default: "f").
    #[serde(default = "default_partition_param")]
    pub partition_param: String,
    /// Partition keys queried in order (default: "a" through "z").
    #[serde(default = "default_partitions")]
    pub partitions: Vec<String>,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Max retry attempts for transient errors (default: 2).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff in milliseconds for retry (default: 200).
    #[serde(default = "default_retry_backoff_base_ms")]
    pub retry_backoff_base_ms: u64,
    /// Partition requests in flight at once (default: 6).
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: u32,
}

/// Local persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the slot files. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Slot name the catalog is stored under (default: "meal-storage").
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

/// List view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Meals per page (default: 8).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1/search.php".to_string()
}

fn default_partition_param() -> String {
    "f".to_string()
}

fn default_partitions() -> Vec<String> {
    ('a'..='z').map(|c| c.to_string()).collect()
}

fn default_timeout() -> u32 {
    10
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_base_ms() -> u64 {
    200
}

fn default_max_concurrent_requests() -> u32 {
    6
}

fn default_namespace() -> String {
    "meal-storage".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            partition_param: default_partition_param(),
            partitions: default_partitions(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_base_ms: default_retry_backoff_base_ms(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            namespace: default_namespace(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl StorageConfig {
    /// Configured directory, or `<data_dir>/mealdeck`.
    ///
    /// Falls back to the current directory if the platform has no data dir.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("mealdeck")
        })
    }
}
