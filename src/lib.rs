//! flatorm derives table schemas and parameterized CRUD SQL from flat,
//! column-annotated structs and runs them through sqlx.
//!
//! ```ignore
//! use flatorm::{Orm, OrmConfig, Record};
//!
//! #[derive(Debug, Default, Record)]
//! pub struct Book {
//!     #[column = "id"]
//!     pub id: i64,
//!     #[column = "author"]
//!     pub author: String,
//! }
//!
//! let orm = Orm::connect(OrmConfig::new("sqlite::memory:")).await?;
//! orm.create_table(&Book::default()).await?;
//! orm.insert_one(&Book { id: 0, author: "Ada".into() }).await?;
//! let ada: Option<Book> = orm.find_one(&Book { author: "Ada".into(), ..Default::default() }).await?;
//! ```

pub mod libs;

pub use flatorm_derive::Record;
pub use libs::*;
