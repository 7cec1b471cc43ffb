//! Safe SQL construction: identifiers pass an allow-list, values bind as
//! parameters.

pub mod builder;
pub mod ident;
pub mod params;

pub use builder::QueryBuf;
pub use ident::is_safe_identifier;
pub use params::BindValue;
