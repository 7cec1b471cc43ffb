//! Veneer: exposes relational tables as generic HTTP resources.

pub mod config;
pub mod error;
pub mod handlers;
pub mod resource;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod storage;

pub use config::{Config, Permission, PermissionTable, GLOBAL_SCOPE};
pub use error::{ConfigError, StorageError};
pub use resource::{QueryResult, Record, Records, Resource, ID_FIELD};
pub use response::{Envelope, Link};
pub use routes::{app, common_routes, resource_routes};
pub use state::AppState;
pub use storage::{connect, Storage};
