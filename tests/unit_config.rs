use std::fs;

use taskdeck::config::{Config, CONFIG_FILE};
use taskdeck::task::Priority;

#[test]
fn config_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from_dir(dir.path());

    assert_eq!(config.api.base_url, "http://localhost:8000/api");
    assert_eq!(config.ui.default_priority, Priority::Medium);
}

#[test]
fn config_overrides_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join(CONFIG_FILE);
    let toml = r#"
[api]
base_url = "https://tasks.internal.example/api"

[ui]
default_priority = "low"
"#;

    fs::write(&config_path, toml)?;

    let config = Config::load_from_dir(dir.path());

    assert_eq!(config.api.base_url, "https://tasks.internal.example/api");
    assert_eq!(config.ui.default_priority, Priority::Low);

    Ok(())
}

#[test]
fn malformed_config_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join(CONFIG_FILE), "api = not toml at all")?;

    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.api.base_url, "http://localhost:8000/api");

    Ok(())
}

#[test]
fn explicit_url_beats_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join(CONFIG_FILE),
        "[api]\nbase_url = \"http://from-file:8000/api\"\n",
    )?;

    let config = Config::load_from_dir(dir.path());
    assert_eq!(
        config.resolve_base_url(Some("http://from-flag:9000/api/")),
        "http://from-flag:9000/api"
    );
    assert_eq!(config.resolve_base_url(None), "http://from-file:8000/api");

    Ok(())
}
