pub mod config;
pub mod crud;
pub mod decode;
pub mod dialect;
pub mod error;
pub mod introspect;
pub mod orm;
pub mod record;
pub mod schema;
pub mod sql;

// Re-export them for easier access from the crate root
pub use config::*;
pub use decode::*;
pub use dialect::*;
pub use error::*;
pub use introspect::*;
pub use orm::*;
pub use record::*;
pub use schema::*;
pub use sql::*;
