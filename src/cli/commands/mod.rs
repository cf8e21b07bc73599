//! Command implementations.

pub mod doctor;
pub mod list;
pub mod maintenance;
pub mod show;
pub mod version;

use notion_issues_lib::{KvCache, MemoryCache};

use crate::client::NotionClient;
use crate::config::Settings;
use crate::error::Result;
use crate::format::OutputContext;
use crate::storage::SqliteCache;

/// Everything a remote command needs, resolved once per run.
#[derive(Debug)]
pub struct Runtime {
    pub settings: Settings,
    pub output: OutputContext,
    /// Use a throwaway in-memory cache instead of the cache file.
    pub no_cache: bool,
}

impl Runtime {
    /// # Errors
    ///
    /// Returns `MissingToken` or `Http` if the client cannot be built.
    pub fn client(&self) -> Result<NotionClient> {
        NotionClient::from_settings(&self.settings)
    }

    #[must_use]
    pub fn cache(&self) -> Box<dyn KvCache> {
        if self.no_cache {
            Box::new(MemoryCache::new())
        } else {
            Box::new(SqliteCache::new(&self.settings.cache_path))
        }
    }
}
