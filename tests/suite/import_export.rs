//! Export from one session, import into another

use nebula_core::{ImportError, parse_import};
use nebula_engine::{Session, open};
use tempfile::tempdir;

use crate::common::{sample_state, settings};

#[tokio::test]
async fn exported_file_imports_into_a_fresh_dashboard() {
    let source_dir = tempdir().unwrap();
    let target_dir = tempdir().unwrap();

    let Session {
        dashboard: mut source,
        ..
    } = open(&settings(None, source_dir.path())).await.unwrap();
    assert!(source.import(
        parse_import(&serde_json::to_string(&sample_state().categories).unwrap()).unwrap(),
        |_| true
    ));
    let exported = source.export().unwrap();
    source.shutdown().await;

    let Session {
        dashboard: mut target,
        ..
    } = open(&settings(None, target_dir.path())).await.unwrap();
    let plan = parse_import(&exported).unwrap();
    assert_eq!(plan.count(), 2);
    assert!(target.import(plan, |prompt| prompt.contains("2 categories")));
    assert_eq!(target.state().categories, sample_state().categories);
    assert_eq!(target.version(), 1);
    target.shutdown().await;
}

#[tokio::test]
async fn malformed_import_leaves_model_untouched() {
    let dir = tempdir().unwrap();
    let Session { dashboard, .. } = open(&settings(None, dir.path())).await.unwrap();
    let before = dashboard.snapshot();

    assert!(matches!(parse_import("\"not an array\""), Err(ImportError::Format(_))));
    assert!(matches!(parse_import(r#"[{"notId": 1}]"#), Err(ImportError::Structure(_))));
    assert_eq!(parse_import("[]").unwrap().count(), 0);

    assert_eq!(dashboard.state(), &*before);
    assert_eq!(dashboard.version(), 0);
    dashboard.shutdown().await;
}
