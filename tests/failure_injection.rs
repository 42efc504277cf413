//! Failure injection: unreachable or rejecting config API.

use route_sync::reconcile::ReconcileError;
use route_sync::remote::RemoteError;
use route_sync::routes::{LockedPaths, RouteStatus, RouteStore};

mod common;

use common::{admin_entry, catch_all_entry, MockProxy};

#[tokio::test]
async fn test_reload_isolates_rejected_route() {
    let mock = MockProxy::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut reconciler = common::reconciler(&mock, dir.path());

    for name in ["a", "b", "c", "d", "e"] {
        reconciler.apply(&format!("/{}", name), &format!("{}:1", name)).await.unwrap();
    }

    mock.reject_dial(Some("c:1"));
    let report = reconciler.reload().await.unwrap();

    assert_eq!(report.applied, 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].index, 2);
    assert_eq!(report.failed[0].path, "/c");

    for route in reconciler.routes() {
        if route.path == "/c" {
            assert_eq!(route.status, RouteStatus::Failed);
            assert!(route.error.as_deref().unwrap_or_default().contains("status 400"));
        } else {
            assert_eq!(route.status, RouteStatus::Active, "{}", route.path);
            assert!(route.error.is_none());
        }
    }
    assert_eq!(mock.business_paths(), vec!["/e*", "/d*", "/b*", "/a*"]);
    assert_eq!(mock.locked_entries(), vec![admin_entry(), catch_all_entry()]);

    // The failed route stays inert on later writes, and a reload once the proxy
    // accepts it again brings it back.
    reconciler.apply("/f", "f:1").await.unwrap();
    assert_eq!(mock.business_paths(), vec!["/f*", "/e*", "/d*", "/b*", "/a*"]);

    mock.reject_dial(None);
    let report = reconciler.reload().await.unwrap();
    assert!(report.failed.is_empty());
    assert!(reconciler.routes().iter().all(|r| r.status == RouteStatus::Active));
    assert_eq!(mock.business_paths(), vec!["/f*", "/e*", "/d*", "/c*", "/b*", "/a*"]);
}

#[tokio::test]
async fn test_rejected_apply_keeps_failed_route() {
    let mock = MockProxy::start().await;
    mock.reject_dial(Some("bad:1"));
    let dir = tempfile::tempdir().unwrap();
    let mut reconciler = common::reconciler(&mock, dir.path());

    let err = reconciler.apply("/bad", "bad:1").await.unwrap_err();
    match err {
        ReconcileError::Remote(RemoteError::Rejected { status, detail }) => {
            assert_eq!(status, 400);
            assert!(detail.contains("bad:1"));
        }
        other => panic!("unexpected error: {}", other),
    }

    let route = &reconciler.routes()[0];
    assert_eq!(route.status, RouteStatus::Failed);
    assert!(route.error.is_some());
    assert!(mock.business_paths().is_empty());

    // Still removable.
    reconciler.remove(0).await.unwrap();
    assert!(reconciler.routes().is_empty());
}

#[tokio::test]
async fn test_unreachable_remote_marks_route_failed_and_persists() {
    let mock = MockProxy::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::sync_config(&mock, dir.path());
    config.remote.config_url = common::closed_url().await;
    let mut reconciler = route_sync::lifecycle::startup::build_reconciler(&config).unwrap();

    let err = reconciler.apply("/a", "a:1").await.unwrap_err();
    assert!(matches!(err, ReconcileError::Remote(RemoteError::Unavailable(_))));

    let persisted = RouteStore::load(&dir.path().join("routes.json"), &LockedPaths::default()).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted.routes()[0].status, RouteStatus::Failed);
    assert!(persisted.routes()[0].error.is_some());

    // Remove fails without touching the store.
    let err = reconciler.remove(0).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Remote(RemoteError::Unavailable(_))));
    assert_eq!(reconciler.routes().len(), 1);

    // Reload cannot clear the remote and reports it.
    let err = reconciler.reload().await.unwrap_err();
    assert!(matches!(err, ReconcileError::Remote(RemoteError::Unavailable(_))));
    assert_eq!(mock.put_count(), 0);
}

#[tokio::test]
async fn test_outage_during_reload_keeps_live_routes_desired() {
    let mock = MockProxy::start().await;
    let dir = tempfile::tempdir().unwrap();
    {
        let mut reconciler = common::reconciler(&mock, dir.path());
        reconciler.apply("/a", "a:1").await.unwrap();
        reconciler.apply("/b", "b:1").await.unwrap();
    }
    assert_eq!(mock.business_paths(), vec!["/b*", "/a*"]);

    // Restart while the config API is down.
    let mut config = common::sync_config(&mock, dir.path());
    config.remote.config_url = common::closed_url().await;
    let mut offline = route_sync::lifecycle::startup::build_reconciler(&config).unwrap();
    assert!(offline.reload().await.is_err());
    assert!(offline.routes().iter().all(|r| r.error.is_none()));
    assert_eq!(mock.business_paths(), vec!["/b*", "/a*"]);
    drop(offline);

    // Config API back: the next mutation keeps every desired route live.
    let mut reconciler = common::reconciler(&mock, dir.path());
    reconciler.apply("/c", "c:1").await.unwrap();
    assert_eq!(mock.business_paths(), vec!["/c*", "/b*", "/a*"]);
    assert!(reconciler.routes().iter().all(|r| r.status == RouteStatus::Active));
}

#[tokio::test]
async fn test_malformed_config_is_a_protocol_error() {
    let mock = MockProxy::start_with(serde_json::json!({ "apps": { "http": { "servers": "nope" } } })).await;
    let dir = tempfile::tempdir().unwrap();
    let mut reconciler = common::reconciler(&mock, dir.path());

    let err = reconciler.apply("/a", "a:1").await.unwrap_err();
    assert!(matches!(err, ReconcileError::Remote(RemoteError::Protocol(_))));
    assert_eq!(reconciler.routes()[0].status, RouteStatus::Failed);
}
