//! Creates a `books` table, fills it and runs every operation once.
//!
//! ```sh
//! DATABASE_URL=sqlite::memory: FLATORM_MAX_CONNECTIONS=1 RUST_LOG=flatorm=debug \
//!     cargo run --example books
//! ```

use flatorm::{Orm, OrmConfig, Record};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Record)]
pub struct Book {
    #[column = "id"]
    pub id: i64,
    #[column = "author"]
    pub author: String,
    #[column = "title"]
    pub title: String,
    #[column = "genre"]
    pub genre: String,
}

#[tokio::main]
async fn main() -> flatorm::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = OrmConfig::from_env()
        .unwrap_or_else(|_| OrmConfig::new("sqlite::memory:").with_max_connections(1));
    let orm = Orm::connect(config).await?;

    orm.create_table(&Book::default()).await?;
    orm.insert_many(&[
        Book {
            author: "Ada".into(),
            title: "Notes on the Engine".into(),
            genre: "Computing".into(),
            ..Default::default()
        },
        Book {
            author: "Grace".into(),
            title: "Compilers".into(),
            genre: "Computing".into(),
            ..Default::default()
        },
    ])
    .await?;

    let ada: Option<Book> = orm
        .find_one(&Book {
            author: "Ada".into(),
            ..Default::default()
        })
        .await?;
    println!("{:?}", ada);

    let computing = Book {
        genre: "Computing".into(),
        ..Default::default()
    };
    let all: Vec<Book> = orm.find_many(&computing).await?;
    println!("All computing books: {:?}", all);

    orm.update_many(
        &Book {
            author: "Grace".into(),
            ..Default::default()
        },
        &Book {
            title: "Compilers, 2nd ed.".into(),
            ..Default::default()
        },
    )
    .await?;
    let first_page: Vec<Book> = orm.find_many_limit_skip(&computing, 1, 1).await?;
    println!("Second book: {:?}", first_page);

    orm.delete_many(&Book {
        author: "Ada".into(),
        ..Default::default()
    })
    .await?;
    orm.delete_all_rows(&Book::default()).await?;

    Ok(())
}
