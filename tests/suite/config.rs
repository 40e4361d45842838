//! Config file to running session

use std::fs;

use nebula_config::{NebulaConfig, Settings};
use nebula_engine::{LoadSource, open};
use tempfile::tempdir;

#[test]
fn missing_config_file_means_defaults() {
    let dir = tempdir().unwrap();
    assert!(NebulaConfig::load_from(&dir.path().join("absent.toml")).unwrap().is_none());
}

#[tokio::test]
async fn config_without_remote_runs_local_only() {
    let dir = tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            "[security]\npassword = \"${{NEBULA_TEST_SECRET}}\"\n\n[sync]\ndebounce_ms = 10\n\n[cache]\ndir = \"{}\"\n",
            cache_dir.display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let config = NebulaConfig::load_from(&path).unwrap().unwrap();
    let settings = Settings::resolve_with(Some(&config), |name| {
        (name == "NEBULA_TEST_SECRET").then(|| "s3cret".to_string())
    });
    assert!(settings.remote_url.is_none());
    assert!(settings.secret.as_ref().is_some_and(|s| s.matches("s3cret")));
    assert_eq!(settings.cache_dir, cache_dir);

    let mut session = open(&settings).await.unwrap();
    assert_eq!(session.source, LoadSource::Defaults);
    assert!(session.dashboard.set_logo_text("From config"));
    let (_, report) = session.dashboard.shutdown().await;
    assert!(report.unwrap().cache_ok());
    assert_eq!(
        fs::read_to_string(cache_dir.join("nebula_logo_text")).unwrap(),
        "From config"
    );
}
