//! PostgreSQL integration tests for the relational `Storage` implementation.
//!
//! Test Pattern:
//! - Requires a reachable PostgreSQL; tests skip unless DATABASE_URL is set
//!   (a `.env` file is honored)
//! - Every test uses fresh catalog and user identifiers for isolation
//! - `ensure_schema` runs first in each test and must be idempotent

use chrono::Utc;
use readwise_db::test_fixtures::{extract_with_highlights, unique_asin, unique_user_id};
use readwise_db::{Book, Database, Error, PoolConfig, Storage};

/// Connect to the database named by DATABASE_URL, or None to skip.
async fn test_database() -> Option<Database> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = PoolConfig {
        max_connections: 4,
        ..Default::default()
    };
    let db = Database::connect(&url, &config)
        .await
        .expect("Failed to connect to DATABASE_URL");
    db.ensure_schema().await.expect("Failed to ensure schema");
    Some(db)
}

macro_rules! require_db {
    () => {
        match test_database().await {
            Some(db) => db,
            None => {
                eprintln!("Skipping: DATABASE_URL not set");
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let db = require_db!();
    db.ensure_schema().await.expect("second ensure_schema failed");
}

#[tokio::test]
async fn test_ingest_then_get_book() {
    let db = require_db!();
    let user = unique_user_id();
    let extract = extract_with_highlights(&unique_asin(), 4);
    let book = Book::from_extract(&extract, &user, Utc::now());

    let written = db.ingest_extract(&book, &extract, &user).await.unwrap();
    assert_eq!(written, 4);

    let stored = db.get_book(&user).await.unwrap();
    assert_eq!(stored.asin, extract.asin);
    assert_eq!(stored.user_id, user);
    assert_eq!(stored.highlights.len(), 4);
    for (i, h) in stored.highlights.iter().enumerate() {
        assert_eq!(h.text, extract.highlights[i].text);
        assert_eq!(h.note.as_deref().unwrap_or(""), extract.highlights[i].note);
        assert_eq!(h.location, extract.highlights[i].location.value);
        assert_eq!(h.book_id, stored.id);
        assert_eq!(h.position, i as i32);
    }
}

#[tokio::test]
async fn test_duplicate_asin_is_conflict_and_rolls_back() {
    let db = require_db!();
    let asin = unique_asin();
    let first_user = unique_user_id();
    let second_user = unique_user_id();
    let extract = extract_with_highlights(&asin, 2);

    db.ingest_extract(
        &Book::from_extract(&extract, &first_user, Utc::now()),
        &extract,
        &first_user,
    )
    .await
    .unwrap();

    let err = db
        .ingest_extract(
            &Book::from_extract(&extract, &second_user, Utc::now()),
            &extract,
            &second_user,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);

    // Original owner and rows untouched
    let stored = db.get_book(&first_user).await.unwrap();
    assert_eq!(stored.highlights.len(), 2);
    assert!(matches!(
        db.get_book(&second_user).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_get_book_not_found() {
    let db = require_db!();
    let err = db.get_book(&unique_user_id()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_stepwise_create_then_save() {
    let db = require_db!();
    let user = unique_user_id();
    let extract = extract_with_highlights(&unique_asin(), 3);

    db.create_book(&Book::from_extract(&extract, &user, Utc::now()))
        .await
        .unwrap();
    let written = db.save_highlights(&extract, &user).await.unwrap();
    assert_eq!(written, 3);

    let stored = db.get_book(&user).await.unwrap();
    assert_eq!(stored.highlights.len(), 3);
}

#[tokio::test]
async fn test_save_highlights_without_book_fails() {
    let db = require_db!();
    let extract = extract_with_highlights(&unique_asin(), 1);
    let err = db
        .save_highlights(&extract, &unique_user_id())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Database(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_concurrent_uploads_of_same_asin_one_wins() {
    let db = require_db!();
    let asin = unique_asin();
    let (first_user, second_user) = (unique_user_id(), unique_user_id());
    let first = extract_with_highlights(&asin, 2);
    let second = extract_with_highlights(&asin, 5);
    let first_book = Book::from_extract(&first, &first_user, Utc::now());
    let second_book = Book::from_extract(&second, &second_user, Utc::now());

    let (a, b) = tokio::join!(
        db.ingest_extract(&first_book, &first, &first_user),
        db.ingest_extract(&second_book, &second, &second_user),
    );

    let (winner, loser, expected) = match (&a, &b) {
        (Ok(2), Err(Error::Conflict(_))) => (&first_user, &second_user, 2),
        (Err(Error::Conflict(_)), Ok(5)) => (&second_user, &first_user, 5),
        other => panic!("Expected exactly one success and one conflict, got {:?}", other),
    };

    let stored = db.get_book(winner).await.unwrap();
    assert_eq!(stored.highlights.len(), expected);
    assert!(stored.highlights.iter().all(|h| &h.user_id == winner));
    assert!(matches!(db.get_book(loser).await, Err(Error::NotFound(_))));
}
