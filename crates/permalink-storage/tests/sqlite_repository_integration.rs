use permalink_core::PermalinkId;
use permalink_storage::{ReadRepository, Repository, SqliteRepository, StorageError};

async fn repo() -> SqliteRepository {
    SqliteRepository::in_memory().await.expect("open sqlite")
}

#[tokio::test]
async fn insert_and_get_round_trip() {
    let repo = repo().await;

    let id = repo.insert("http://host/app?a=1&b=2").await.unwrap();
    let entry = repo.get(id).await.unwrap().unwrap();

    assert_eq!(entry.id, id);
    assert_eq!(entry.url, "http://host/app?a=1&b=2");
}

#[tokio::test]
async fn ids_are_assigned_by_autoincrement() {
    let repo = repo().await;

    let first = repo.insert("http://host/one").await.unwrap();
    let second = repo.insert("http://host/two").await.unwrap();

    assert_eq!(first, PermalinkId::new(1));
    assert_eq!(second, PermalinkId::new(2));
}

#[tokio::test]
async fn insert_conflicts_when_url_already_exists() {
    let repo = repo().await;

    repo.insert("http://host/app").await.unwrap();
    let err = repo.insert("http://host/app").await.unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn find_by_url_matches_bytes_exactly() {
    let repo = repo().await;
    let id = repo.insert("http://host/app?Platform=IU").await.unwrap();

    assert_eq!(
        repo.find_by_url("http://host/app?Platform=IU").await.unwrap(),
        Some(id)
    );
    assert_eq!(
        repo.find_by_url("http://host/app?platform=iu").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn urls_differing_in_case_get_their_own_rows() {
    let repo = repo().await;

    let upper = repo.insert("http://host/app?x=A").await.unwrap();
    let lower = repo.insert("http://host/app?x=a").await.unwrap();

    assert_ne!(upper, lower);
}

#[tokio::test]
async fn get_unknown_id_returns_none() {
    let repo = repo().await;

    assert!(repo.get(PermalinkId::new(999)).await.unwrap().is_none());
    assert!(repo.get(PermalinkId::new(u64::MAX)).await.unwrap().is_none());
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let repo = repo().await;
    repo.insert("http://host/keep").await.unwrap();

    repo.ensure_schema().await.unwrap();

    assert!(repo.find_by_url("http://host/keep").await.unwrap().is_some());
}

#[tokio::test]
async fn closed_pool_reports_unavailable() {
    let repo = repo().await;
    repo.pool().close().await;

    let err = repo.insert("http://host/app").await.unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
}
