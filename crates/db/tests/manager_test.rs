use notifybot_core::collaborators::NotificationStore;
use notifybot_db::DatabaseManager;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_initialize_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notification.db");
    let manager = DatabaseManager::new(&path);

    assert!(manager.pool().is_none());
    assert!(!path.exists());

    manager.initialize().await.expect("Failed to initialize database");

    assert!(path.exists());
    assert!(manager.pool().is_some());
    manager.close().await;
}

#[tokio::test]
async fn test_initialize_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let manager = DatabaseManager::new(dir.path().join("notification.db"));

    manager.initialize().await.expect("First initialize failed");
    manager.initialize().await.expect("Second initialize failed");

    manager.close().await;
}

#[tokio::test]
async fn test_initialize_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let manager = DatabaseManager::new(dir.path().join("missing").join("notification.db"));

    let result = manager.initialize().await;

    assert!(result.is_err());
    assert!(manager.pool().is_none());
}

#[tokio::test]
async fn test_database_uses_write_ahead_log() {
    let dir = tempfile::tempdir().unwrap();
    let manager = DatabaseManager::new(dir.path().join("notification.db"));
    manager.initialize().await.expect("Failed to initialize database");

    let pool = manager.pool().expect("Pool should exist after initialize");
    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(pool)
        .await
        .expect("Failed to read journal mode");

    assert_eq!(mode.to_lowercase(), "wal");
    manager.close().await;
}

#[tokio::test]
async fn test_usable_through_store_trait() {
    let dir = tempfile::tempdir().unwrap();
    let manager = DatabaseManager::new(dir.path().join("notification.db"));
    let store: &dyn NotificationStore = &manager;

    store.initialize().await.expect("Failed to initialize through trait");

    assert_eq!(manager.path(), dir.path().join("notification.db"));
    manager.close().await;
}
