//! Shared data vocabulary: resources, records, and operation results.

use serde_json::Value;

/// Field treated as the primary-key filter for update and delete. It is
/// excluded from UPDATE's SET list and bound into the WHERE clause instead.
pub const ID_FIELD: &str = "id";

/// Names a table addressed generically at request time.
///
/// The identifier ends up in identifier position of generated SQL, where the
/// driver cannot bind it as a parameter, so it is validated against an
/// allow-list before any statement is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub identifier: String,
}

impl Resource {
    pub fn new(identifier: impl Into<String>) -> Self {
        Resource {
            identifier: identifier.into(),
        }
    }
}

/// One row as a generic field-name to value mapping. Values are restricted to
/// the JSON scalar subset (null, boolean, number, string) at the bind
/// boundary; insertion order is irrelevant.
pub type Record = serde_json::Map<String, Value>;

/// Rows in the backend's natural result order. Not stable across calls
/// without an explicit order clause; callers must not assume otherwise.
pub type Records = Vec<Record>;

/// Outcome of one storage operation. Reads fill `data`; each write fills its
/// own counter with the backend-reported affected-row count. Unused fields
/// keep their zero value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    pub data: Records,
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
}

impl QueryResult {
    pub fn with_data(data: Records) -> Self {
        QueryResult {
            data,
            ..Default::default()
        }
    }

    pub fn created(count: u64) -> Self {
        QueryResult {
            created: count,
            ..Default::default()
        }
    }

    pub fn updated(count: u64) -> Self {
        QueryResult {
            updated: count,
            ..Default::default()
        }
    }

    pub fn deleted(count: u64) -> Self {
        QueryResult {
            deleted: count,
            ..Default::default()
        }
    }
}
