//! Full sessions against a mock sync endpoint and an on-disk cache

use nebula_engine::nebula_storage::{CacheKey, FileCache, LocalCache, read_state};
use nebula_engine::{LoadSource, Session, open};
use nebula_types::{AppState, PendingAction};
use tempfile::tempdir;
use wiremock::MockServer;

use crate::common::{
    PASSWORD, mount_document, mount_status, posted_documents, sample_state, settings,
};

#[tokio::test]
async fn loads_remote_document_and_syncs_confirmed_edit() {
    let server = MockServer::start().await;
    let cache_dir = tempdir().unwrap();
    mount_document(&server, &sample_state()).await;
    mount_status(&server, "POST", 200).await;

    let Session {
        mut dashboard,
        source,
    } = open(&settings(Some(&server), cache_dir.path())).await.unwrap();
    assert_eq!(source, LoadSource::Remote);
    assert_eq!(dashboard.state(), &sample_state());

    dashboard.request(PendingAction::DeleteLink {
        category_id: "c1".into(),
        link_id: "l2".into(),
    });
    dashboard.confirm(PASSWORD).unwrap();

    let (state, report) = dashboard.shutdown().await;
    let report = report.unwrap();
    assert!(report.remote_ok() && report.cache_ok());

    let posted = posted_documents(&server).await;
    assert_eq!(posted.len(), 1);
    let ids: Vec<_> = posted[0]["categories"][0]["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["l1", "l3"]);
    assert_eq!(posted[0]["logoText"], "My Nav");

    let cached = read_state(&FileCache::new(cache_dir.path())).unwrap();
    assert_eq!(cached, *state);
}

#[tokio::test]
async fn never_written_remote_starts_from_defaults() {
    let server = MockServer::start().await;
    let cache_dir = tempdir().unwrap();
    mount_status(&server, "GET", 404).await;

    let session = open(&settings(Some(&server), cache_dir.path())).await.unwrap();
    assert_eq!(session.source, LoadSource::Defaults);
    assert_eq!(session.dashboard.state(), &AppState::default());

    let (_, report) = session.dashboard.shutdown().await;
    assert!(report.is_none(), "initial state must not be written back");
    assert!(posted_documents(&server).await.is_empty());
}

#[tokio::test]
async fn unreachable_remote_falls_back_to_cache_and_keeps_editing() {
    let server = MockServer::start().await;
    let cache_dir = tempdir().unwrap();
    mount_status(&server, "GET", 500).await;
    mount_status(&server, "POST", 503).await;

    let cache = FileCache::new(cache_dir.path());
    cache.set(CacheKey::LogoText, "Cached logo").unwrap();

    let Session {
        mut dashboard,
        source,
    } = open(&settings(Some(&server), cache_dir.path())).await.unwrap();
    assert_eq!(source, LoadSource::LocalCache);
    assert_eq!(dashboard.state().logo_text, "Cached logo");
    assert_eq!(dashboard.state().categories, AppState::default().categories);

    assert!(dashboard.set_background_image(Some("https://img.example/new.jpg".into())));
    let (_, report) = dashboard.shutdown().await;
    let report = report.unwrap();
    assert!(!report.remote_ok());
    assert!(report.cache_ok());

    assert_eq!(
        cache.get(CacheKey::Background).unwrap().as_deref(),
        Some("https://img.example/new.jpg")
    );
}

#[tokio::test]
async fn local_only_mode_round_trips_through_cache() {
    let cache_dir = tempdir().unwrap();

    let Session {
        mut dashboard,
        source,
    } = open(&settings(None, cache_dir.path())).await.unwrap();
    assert_eq!(source, LoadSource::Defaults);
    assert!(dashboard.reorder(&"dev".into(), 0, 1));
    let (first, _) = dashboard.shutdown().await;

    let reopened = open(&settings(None, cache_dir.path())).await.unwrap();
    assert_eq!(reopened.source, LoadSource::LocalCache);
    assert_eq!(reopened.dashboard.state(), &*first);
    reopened.dashboard.shutdown().await;
}

#[tokio::test]
async fn reset_clears_cached_appearance() {
    let server = MockServer::start().await;
    let cache_dir = tempdir().unwrap();
    mount_document(&server, &sample_state()).await;
    mount_status(&server, "POST", 200).await;

    let cache = FileCache::new(cache_dir.path());
    cache.set(CacheKey::Background, "https://img.example/bg.jpg").unwrap();

    let Session { mut dashboard, .. } =
        open(&settings(Some(&server), cache_dir.path())).await.unwrap();
    dashboard.request(PendingAction::Reset);
    dashboard.confirm(PASSWORD).unwrap();
    dashboard.shutdown().await;

    assert_eq!(cache.get(CacheKey::Background).unwrap(), None);
    let posted = posted_documents(&server).await;
    let last: AppState = serde_json::from_value(posted.last().unwrap().clone()).unwrap();
    assert_eq!(last, AppState::default());
}

#[tokio::test]
async fn rejected_confirmation_never_reaches_storage() {
    let server = MockServer::start().await;
    let cache_dir = tempdir().unwrap();
    mount_document(&server, &sample_state()).await;
    mount_status(&server, "POST", 200).await;

    let Session { mut dashboard, .. } =
        open(&settings(Some(&server), cache_dir.path())).await.unwrap();
    dashboard.request(PendingAction::DeleteCategory {
        category_id: "c1".into(),
    });
    assert!(dashboard.confirm("wrong").is_err());
    dashboard.cancel();

    let (state, report) = dashboard.shutdown().await;
    assert!(report.is_none());
    assert_eq!(*state, sample_state());
    assert!(posted_documents(&server).await.is_empty());
}
