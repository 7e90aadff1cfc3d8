use forumkit::config::Config;
use forumkit::db::{sqlite_url_for, Database};
use forumkit::error::ForumError;
use forumkit::storage::Storage;
use forumkit::ForumKit;

async fn open(dir: &tempfile::TempDir) -> Database {
    let url = sqlite_url_for(&dir.path().join("cache.db"));
    let db = Database::connect(Some(&url)).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

#[tokio::test]
async fn put_then_get_until_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    db.put_cache("embed|https://giphy.com/a", "{\"x\":1}", 100).await.unwrap();
    assert_eq!(db.get_cache("embed|https://giphy.com/a", 99).await.unwrap().as_deref(), Some("{\"x\":1}"));
    assert_eq!(db.get_cache("embed|https://giphy.com/a", 100).await.unwrap(), None);

    db.put_cache("embed|https://giphy.com/a", "{\"x\":2}", 200).await.unwrap();
    assert_eq!(db.get_cache("embed|https://giphy.com/a", 150).await.unwrap().as_deref(), Some("{\"x\":2}"));
}

#[tokio::test]
async fn prefix_clear_is_literal() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    db.put_cache("embed|https://imgur.com/a_b", "1", i64::MAX).await.unwrap();
    db.put_cache("embed|https://imgur.com/aXb", "2", i64::MAX).await.unwrap();
    db.put_cache("other|key", "3", i64::MAX).await.unwrap();

    assert_eq!(db.clear_cache_prefix(Some("embed|https://imgur.com/a_")).await.unwrap(), 1);
    assert_eq!(db.clear_cache_prefix(Some("embed|")).await.unwrap(), 1);
    assert_eq!(db.clear_cache_prefix(None).await.unwrap(), 1);
}

#[tokio::test]
async fn purge_drops_only_expired_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    db.put_cache("old", "1", 10).await.unwrap();
    db.put_cache("new", "2", 1_000).await.unwrap();

    assert_eq!(db.purge_expired(500).await.unwrap(), 1);
    assert_eq!(db.get_cache("new", 500).await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn reopening_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = open(&dir).await;
        db.put_cache("embed|k", "v", i64::MAX).await.unwrap();
        db.pool().close().await;
    }
    let db = open(&dir).await;
    assert_eq!(db.get_cache("embed|k", 0).await.unwrap().as_deref(), Some("v"));
}

async fn row_count(db: &Database) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM embed_cache")
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn connect_migrates_and_purges_expired_rows() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url_for(&dir.path().join("kit.db"));
    {
        let db = Database::connect(Some(&url)).await.unwrap();
        db.run_migrations().await.unwrap();
        db.put_cache("embed|https://giphy.com/old", "{}", 1).await.unwrap();
        db.put_cache("embed|https://giphy.com/new", "{}", i64::MAX).await.unwrap();
        assert_eq!(row_count(&db).await, 2);
        db.pool().close().await;
    }

    let config = Config { database_url: Some(url.clone()), ..Config::default() };
    let kit = ForumKit::connect(&config, true).await.unwrap();

    let db = Database::connect(Some(&url)).await.unwrap();
    assert_eq!(row_count(&db).await, 1);
    assert_eq!(kit.clear_embed_cache(None).await.unwrap(), 1);
}

#[tokio::test]
async fn connect_without_migrations_leaves_schema_absent() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url_for(&dir.path().join("bare.db"));
    let config = Config { database_url: Some(url), ..Config::default() };

    let kit = ForumKit::connect(&config, false).await.unwrap();
    let err = kit.clear_embed_cache(None).await.unwrap_err();
    assert!(matches!(err, ForumError::Storage(_)));
}
