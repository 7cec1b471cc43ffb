//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for request-time
//! resources. Identifiers are validated and interpolated; values are always
//! bound.

use crate::error::StorageError;
use crate::resource::{Record, Resource, ID_FIELD};
use crate::sql::ident::{is_safe_identifier, quoted};
use serde_json::Value;

/// One statement plus its bind arguments, in placeholder order.
#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) {
        self.params.push(v);
    }
}

/// Quoted table name, or NotFound when the identifier could not appear
/// safely in identifier position. The identifier cannot be a bound
/// parameter, so this check replaces binding for every operation.
fn table_name(resource: &Resource) -> Result<String, StorageError> {
    if !is_safe_identifier(&resource.identifier) {
        return Err(StorageError::not_found());
    }
    Ok(quoted(&resource.identifier))
}

/// Record field names land in identifier position too (INSERT columns,
/// UPDATE SET, filter keys in WHERE), so they pass the same allow-list.
fn column_name(name: &str) -> Result<String, StorageError> {
    if !is_safe_identifier(name) {
        return Err(StorageError::validation(format!(
            "invalid field name '{}'",
            name
        )));
    }
    Ok(quoted(name))
}

/// INSERT INTO t (cols) VALUES (placeholders); one column per record field,
/// all values bound. Rejects an empty record before it reaches the backend.
pub fn insert(resource: &Resource, record: &Record) -> Result<QueryBuf, StorageError> {
    let table = table_name(resource)?;
    if record.is_empty() {
        return Err(StorageError::validation(
            "record contains no fields to insert",
        ));
    }
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(record.len());
    let mut placeholders = Vec::with_capacity(record.len());
    for (name, value) in record {
        cols.push(column_name(name)?);
        placeholders.push("?");
        q.push_param(value.clone());
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

/// SELECT * with optional exact-match filter and bound offset/limit.
/// `None` or an empty filter means no WHERE clause. Offset is clamped to
/// >= 0 and limit to >= 1; both bind as parameters, never interpolated.
pub fn select(
    resource: &Resource,
    filter: Option<&Record>,
    offset: i64,
    limit: i64,
) -> Result<QueryBuf, StorageError> {
    let table = table_name(resource)?;
    let mut q = QueryBuf::new();
    let mut sql = format!("SELECT * FROM {}", table);
    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        let mut parts = Vec::with_capacity(filter.len());
        for (name, value) in filter {
            parts.push(format!("{} = ?", column_name(name)?));
            q.push_param(value.clone());
        }
        sql.push_str(" WHERE ");
        sql.push_str(&parts.join(" AND "));
    }
    sql.push_str(" LIMIT ?, ?");
    q.push_param(Value::from(offset.max(0)));
    q.push_param(Value::from(limit.max(1)));
    q.sql = sql;
    Ok(q)
}

/// UPDATE t SET f = ? ... WHERE id = ?. The id field is excluded from the
/// SET list and bound last for the WHERE clause. Rejects a record with no id
/// or with nothing left to set once id is excluded.
pub fn update(resource: &Resource, record: &Record) -> Result<QueryBuf, StorageError> {
    let table = table_name(resource)?;
    let id = record
        .get(ID_FIELD)
        .ok_or_else(|| StorageError::validation("record must include an 'id' field"))?;
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (name, value) in record {
        if name.as_str() == ID_FIELD {
            continue;
        }
        sets.push(format!("{} = ?", column_name(name)?));
        q.push_param(value.clone());
    }
    if sets.is_empty() {
        return Err(StorageError::validation(
            "record contains no fields to update",
        ));
    }
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table,
        sets.join(", "),
        quoted(ID_FIELD)
    );
    q.push_param(id.clone());
    Ok(q)
}

/// DELETE FROM t WHERE id = ?. Rejects a record with no id.
pub fn delete(resource: &Resource, record: &Record) -> Result<QueryBuf, StorageError> {
    let table = table_name(resource)?;
    let id = record
        .get(ID_FIELD)
        .ok_or_else(|| StorageError::validation("record must include an 'id' field"))?;
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {} WHERE {} = ?", table, quoted(ID_FIELD));
    q.push_param(id.clone());
    Ok(q)
}
