//! MySQL adapter: statements come from the builder, values bind as
//! parameters, and driver errors collapse into the storage taxonomy.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlDatabaseError, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};

use crate::error::{ConfigError, StorageError};
use crate::resource::{QueryResult, Record, Records, Resource};
use crate::sql::builder::{self, QueryBuf};
use crate::sql::params::BindValue;
use crate::storage::Storage;

/// Table does not exist.
const ER_NO_SUCH_TABLE: u16 = 1146;
/// A column with no default value was omitted.
const ER_NO_DEFAULT_FOR_FIELD: u16 = 1364;
/// A non-nullable column received NULL.
const ER_BAD_NULL_ERROR: u16 = 1048;

pub struct MySqlStorage {
    pool: MySqlPool,
}

impl MySqlStorage {
    /// Validates the URL and creates a lazy pool. Connections are opened on
    /// first use, so an unreachable server fails per request, not here.
    pub fn connect(url: &str) -> Result<Self, ConfigError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect_lazy(url)
            .map_err(ConfigError::ConnectionString)?;
        Ok(MySqlStorage { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        MySqlStorage { pool }
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, StorageError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let mut query = sqlx::query(&q.sql);
        for param in &q.params {
            query = query.bind(BindValue::from_json(param)?);
        }
        let done = query.execute(&self.pool).await.map_err(normalize_error)?;
        Ok(done.rows_affected())
    }

    async fn fetch(&self, q: &QueryBuf) -> Result<Records, StorageError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "fetch");
        let mut query = sqlx::query(&q.sql);
        for param in &q.params {
            query = query.bind(BindValue::from_json(param)?);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(normalize_error)?;
        Ok(rows.iter().map(row_to_record).collect())
    }
}

#[async_trait]
impl Storage for MySqlStorage {
    async fn create(
        &self,
        resource: &Resource,
        record: &Record,
    ) -> Result<QueryResult, StorageError> {
        let q = builder::insert(resource, record)?;
        let affected = self.execute(&q).await?;
        Ok(QueryResult::created(affected))
    }

    async fn read(
        &self,
        resource: &Resource,
        filter: Option<&Record>,
        offset: i64,
        limit: i64,
    ) -> Result<QueryResult, StorageError> {
        let q = builder::select(resource, filter, offset, limit)?;
        let rows = self.fetch(&q).await?;
        Ok(QueryResult::with_data(rows))
    }

    async fn update(
        &self,
        resource: &Resource,
        record: &Record,
    ) -> Result<QueryResult, StorageError> {
        let q = builder::update(resource, record)?;
        let affected = self.execute(&q).await?;
        Ok(QueryResult::updated(affected))
    }

    async fn delete(
        &self,
        resource: &Resource,
        record: &Record,
    ) -> Result<QueryResult, StorageError> {
        let q = builder::delete(resource, record)?;
        let affected = self.execute(&q).await?;
        Ok(QueryResult::deleted(affected))
    }
}

/// Collapses a driver error into the storage taxonomy, logging the original
/// before it is replaced by a caller-safe message.
fn normalize_error(err: sqlx::Error) -> StorageError {
    let number = mysql_error_number(&err);
    tracing::warn!(error = %err, number = ?number, "mysql error");
    storage_error_for(number, err)
}

fn mysql_error_number(err: &sqlx::Error) -> Option<u16> {
    match err {
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(|mysql| mysql.number()),
        _ => None,
    }
}

/// A missing table reads as a missing resource; a violated NOT NULL or
/// missing-default column reads as an incomplete record; everything else is
/// reported opaquely.
fn storage_error_for(number: Option<u16>, err: sqlx::Error) -> StorageError {
    match number {
        Some(ER_NO_SUCH_TABLE) => StorageError::not_found_from(err),
        Some(ER_NO_DEFAULT_FOR_FIELD) | Some(ER_BAD_NULL_ERROR) => {
            StorageError::backend("resource does not include all required values", Some(err))
        }
        _ => StorageError::backend("unknown error", Some(err)),
    }
}

/// One row becomes a JSON object keyed by column name.
fn row_to_record(row: &MySqlRow) -> Record {
    let mut record = Record::new();
    for column in row.columns() {
        record.insert(
            column.name().to_string(),
            cell_to_value(row, column.ordinal()),
        );
    }
    record
}

/// Probes a cell against the types the builder can produce, widest numeric
/// first. Temporal values render as their server text form. A cell that
/// matches nothing typed is read as raw text, and NULL wins over all.
fn cell_to_value(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
        return v.map(|f| Value::from(f64::from(f))).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return v
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return v
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveTime>, _>(idx) {
        return v
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Value>, _>(idx) {
        return v.unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v
            .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned()))
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get_unchecked::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    Value::Null
}
