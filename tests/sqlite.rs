//! End-to-end against an in-memory SQLite database.

use flatorm::{Dialect, Executor, JsonRecord, Orm, OrmConfig, Record};
use serde_json::json;

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Book {
    #[column = "id"]
    pub id: i64,
    #[column = "author"]
    pub author: String,
    #[column = "date_published"]
    pub date_published: String,
    #[column = "title"]
    pub title: String,
    #[column = "genre"]
    pub genre: String,
    #[column = "pages"]
    pub pages: Option<i32>,
    #[column = "rating"]
    pub rating: Option<f64>,
}

fn book(author: &str, date: &str, title: &str, genre: &str) -> Book {
    Book {
        author: author.into(),
        date_published: date.into(),
        title: title.into(),
        genre: genre.into(),
        ..Default::default()
    }
}

fn by_author(author: &str) -> Book {
    Book {
        author: author.into(),
        ..Default::default()
    }
}

fn by_genre(genre: &str) -> Book {
    Book {
        genre: genre.into(),
        ..Default::default()
    }
}

/// A single connection keeps every query on the same in-memory database.
async fn setup() -> Orm {
    let orm = Orm::connect(OrmConfig::new("sqlite::memory:").with_max_connections(1))
        .await
        .unwrap();
    assert_eq!(orm.dialect(), Dialect::Sqlite);

    orm.create_table(&Book::default()).await.unwrap();
    let books = vec![
        book("Alin Devon", "2056-34-34", "Python Tutorial", "Programming"),
        book("Cornel Marcon", "2020-05-23", "SQL Tutorial", "SQL"),
        book("Razvan Rapden", "2020-23-04", "Java Tutorial", "Programming"),
    ];
    let inserted = orm.insert_many(&books).await.unwrap();
    assert_eq!(inserted, 3);
    orm
}

#[tokio::test]
async fn create_table_is_idempotent() {
    let orm = setup().await;
    orm.create_table(&Book::default()).await.unwrap();
    let all: Vec<Book> = orm.find_many(&Book::default()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn find_many_and_paginate() {
    let orm = setup().await;

    let programming: Vec<Book> = orm.find_many(&by_genre("Programming")).await.unwrap();
    assert_eq!(programming.len(), 2);
    assert!(programming.iter().all(|b| b.genre == "Programming"));

    let page: Vec<Book> = orm
        .find_many_limit_skip(&by_genre("Programming"), 1, 1)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Java Tutorial");
}

#[tokio::test]
async fn insert_one_and_find_one() {
    let orm = setup().await;
    let mut new_book = book("Alin Dev", "UTC ISO format date", "SQL Tutorial", "IT");
    new_book.pages = Some(320);
    new_book.rating = Some(4.5);
    orm.insert_one(&new_book).await.unwrap();

    let found: Option<Book> = orm.find_one(&by_author("Alin Dev")).await.unwrap();
    let found = found.unwrap();
    assert_eq!(found.id, 4);
    assert_eq!(found.author, "Alin Dev");
    assert_eq!(found.pages, Some(320));
    assert_eq!(found.rating, Some(4.5));

    let by_id: Option<Book> = orm
        .find_one(&Book {
            id: 4,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_id.unwrap().title, "SQL Tutorial");
}

#[tokio::test]
async fn absent_optional_numbers_are_null() {
    let orm = setup().await;
    let first: Option<Book> = orm.find_one(&by_author("Alin Devon")).await.unwrap();
    let first = first.unwrap();
    assert_eq!(first.pages, None);
    assert_eq!(first.rating, None);
}

#[tokio::test]
async fn json_nulls_insert_as_sql_null() {
    let orm = setup().await;
    let row = JsonRecord::new(
        "Book",
        json!({
            "author": "Json Null",
            "date_published": "2021-01-01",
            "title": "Untyped",
            "genre": "Misc",
            "pages": null,
            "rating": null,
        }),
    );
    assert_eq!(orm.insert_one(&row).await.unwrap(), 1);

    let found: Option<Book> = orm.find_one(&by_author("Json Null")).await.unwrap();
    let found = found.unwrap();
    assert_eq!(found.title, "Untyped");
    assert_eq!(found.pages, None);
    assert_eq!(found.rating, None);
}

#[tokio::test]
async fn update_many_changes_matching_rows() {
    let orm = setup().await;
    let updated = orm
        .update_many(&by_author("Cornel Marcon"), &by_author("Cornel M."))
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let old: Vec<Book> = orm.find_many(&by_author("Cornel Marcon")).await.unwrap();
    assert!(old.is_empty());
    let renamed: Option<Book> = orm.find_one(&by_author("Cornel M.")).await.unwrap();
    assert_eq!(renamed.unwrap().title, "SQL Tutorial");
}

#[tokio::test]
async fn delete_many_and_delete_all_rows() {
    let orm = setup().await;
    let deleted = orm.delete_many(&by_genre("Programming")).await.unwrap();
    assert_eq!(deleted, 2);

    // An all-absent filter deletes nothing.
    let deleted = orm.delete_many(&Book::default()).await.unwrap();
    assert_eq!(deleted, 0);
    let left: Vec<Book> = orm.find_many(&Book::default()).await.unwrap();
    assert_eq!(left.len(), 1);

    orm.delete_all_rows(&Book::default()).await.unwrap();
    let left: Vec<Book> = orm.find_many(&Book::default()).await.unwrap();
    assert!(left.is_empty());
}

#[tokio::test]
async fn unsupported_url_is_rejected() {
    let err = Orm::connect(OrmConfig::new("mssql://localhost/db"))
        .await
        .unwrap_err();
    assert!(matches!(err, flatorm::Error::UnsupportedDialect(_)));
}
