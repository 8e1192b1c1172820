//! Resift - search results page with recent searches
//!
//! A small results page composed of a search box, a hit list, and a
//! "recent searches" widget whose entries persist across runs.
//!
//! # Features
//!
//! - **Persistent recent searches**: newest-first, deduplicated query lists
//!   kept per storage key in a durable key/value store
//! - **Widget lifecycle**: connector/renderer widgets driven through
//!   `init` / `render` / `dispose` by a composition host
//! - **Debounced recording**: a query is remembered only once it has been
//!   stable for the record delay
//! - **Terminal UI**: interactive results page built on ratatui
//!
//! # Example
//!
//! ```no_run
//! use resift::{FileStorage, RecentSearches};
//!
//! fn main() -> resift::Result<()> {
//!     let store = RecentSearches::new(FileStorage::shared("storage.json"));
//!
//!     store.upsert("R", "shoes")?;
//!     store.upsert("R", "hat")?;
//!     store.upsert("R", "shoes")?;
//!     assert_eq!(store.get("R")?, vec!["shoes", "hat"]);
//!
//!     store.remove("R", "hat")?;
//!     assert_eq!(store.get("R")?, vec!["shoes"]);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod host;
pub mod logging;
pub mod page;
pub mod recent;
pub mod search_box;
pub mod storage;
pub mod tui;
pub mod widgets;

// Re-export main types
pub use catalog::{Catalog, SearchBackend, SearchResults};
pub use error::{ResiftError, Result};
pub use host::{SearchHost, SearchSession, SessionEvent};
pub use page::{Container, Page};
pub use recent::RecentSearches;
pub use search_box::{RecentSearchRecorder, SearchBoxState};
pub use storage::{FileStorage, MemoryStorage, SharedStorage, StorageArea};
pub use widgets::{
    merge_render_state, GlobalRenderState, LifecycleContext, SearchHelper, Widget,
    WidgetRenderState,
};

use logging::LogLevel;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Storage key the results page keeps its recent searches under
pub const DEFAULT_STORAGE_KEY: &str = "ALGOLIA_RECENT_SEARCHES";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file backing the durable store
    pub storage_path: PathBuf,
    /// Storage key of the recent searches list
    pub storage_key: String,
    /// Keep everything in memory; nothing survives the process
    pub ephemeral: bool,
    /// How long a query must stay unchanged before it is remembered
    pub record_delay_ms: u64,
    /// Hits shown per search
    pub hits_per_page: usize,
    /// Recent searches rows shown in the panel
    pub max_visible_recent: usize,
    /// Optional JSON array of records to search instead of the sample
    pub catalog_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: data_dir().join("storage.json"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            ephemeral: false,
            record_delay_ms: search_box::DEFAULT_RECORD_DELAY.as_millis() as u64,
            hits_per_page: 8,
            max_visible_recent: 10,
            catalog_path: None,
            log_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default config file if it exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("resift"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(ResiftError::InvalidConfig(
                "storage_key must not be empty".to_string(),
            ));
        }
        if self.hits_per_page == 0 {
            return Err(ResiftError::InvalidConfig(
                "hits_per_page must be at least 1".to_string(),
            ));
        }
        self.log_level
            .parse::<LogLevel>()
            .map_err(ResiftError::InvalidConfig)?;
        Ok(())
    }

    pub fn record_delay(&self) -> Duration {
        Duration::from_millis(self.record_delay_ms)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or(LogLevel::Info)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(logging::default_log_path)
    }

    /// Open the configured storage backend
    pub fn open_storage(&self) -> SharedStorage {
        if self.ephemeral {
            MemoryStorage::shared()
        } else {
            FileStorage::shared(&self.storage_path)
        }
    }

    /// Open the configured search backend
    pub fn open_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path, self.hits_per_page),
            None => Ok(Catalog::sample(self.hits_per_page)),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("resift"))
        .unwrap_or_else(|| PathBuf::from("."))
}
