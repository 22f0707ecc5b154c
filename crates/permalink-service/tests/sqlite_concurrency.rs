use std::sync::Arc;

use permalink_service::{PermalinkService, PermalinkStore};
use permalink_storage::SqliteRepository;
use tempfile::TempDir;
use tokio::sync::Barrier;

async fn file_backed_service(dir: &TempDir) -> PermalinkService<SqliteRepository> {
    let url = format!("sqlite://{}", dir.path().join("permalinks.db").display());
    let repo = SqliteRepository::connect(&url).await.expect("open sqlite");
    repo.ensure_schema().await.expect("create schema");
    PermalinkService::new(repo)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_get_or_create_keeps_one_row() {
    const CALLERS: usize = 16;
    let dir = TempDir::new().unwrap();
    let service = file_backed_service(&dir).await;
    let start = Arc::new(Barrier::new(CALLERS));
    let mut handles = Vec::new();

    for _ in 0..CALLERS {
        let service = service.clone();
        let start = Arc::clone(&start);
        handles.push(tokio::spawn(async move {
            start.wait().await;
            service.get_or_create("http://host/app?a=1&b=2").await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM permalinks")
        .fetch_one(service.repository().pool())
        .await
        .unwrap();

    assert_eq!(rows, 1);
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(
        service.resolve(ids[0]).await.unwrap(),
        "http://host/app?a=1&b=2"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_callers_with_distinct_urls_get_distinct_ids() {
    const CALLERS: usize = 16;
    let dir = TempDir::new().unwrap();
    let service = file_backed_service(&dir).await;
    let start = Arc::new(Barrier::new(CALLERS));
    let mut handles = Vec::new();

    for n in 0..CALLERS {
        let service = service.clone();
        let start = Arc::clone(&start);
        handles.push(tokio::spawn(async move {
            start.wait().await;
            let url = format!("http://host/app?n={n}");
            let id = service.get_or_create(&url).await.unwrap();
            (id, url)
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let (id, url) = handle.await.unwrap();
        assert_eq!(service.resolve(id).await.unwrap(), url);
        ids.push(id);
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), CALLERS);
}
