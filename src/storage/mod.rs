//! Storage backends behind one async trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{ConfigError, StorageError};
use crate::resource::{QueryResult, Record, Resource};

pub mod mysql;

/// A storage adapter executes the four generic operations for any resource
/// named at request time. Implementations translate their backend's faults
/// into [`StorageError`], so callers never see driver errors.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create(
        &self,
        resource: &Resource,
        record: &Record,
    ) -> Result<QueryResult, StorageError>;

    /// Reads rows matching `filter` (all rows when `None`), at most `limit`
    /// of them starting at `offset`.
    async fn read(
        &self,
        resource: &Resource,
        filter: Option<&Record>,
        offset: i64,
        limit: i64,
    ) -> Result<QueryResult, StorageError>;

    async fn update(
        &self,
        resource: &Resource,
        record: &Record,
    ) -> Result<QueryResult, StorageError>;

    async fn delete(
        &self,
        resource: &Resource,
        record: &Record,
    ) -> Result<QueryResult, StorageError>;
}

/// Builds the backend named by the configuration. An unknown kind fails
/// here, at startup, instead of at request time.
pub fn connect(config: &Config) -> Result<Arc<dyn Storage>, ConfigError> {
    match config.backend.as_str() {
        "MYSQL" => Ok(Arc::new(mysql::MySqlStorage::connect(
            &config.connection_string,
        )?)),
        other => Err(ConfigError::UnsupportedBackend(other.to_string())),
    }
}
