use std::fs;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use gpad_suppliers::config::{Config, ConfigLoader, Overrides, Settings, DEFAULT_BASE_URL};
use gpad_suppliers::error::GpadError;

#[test]
fn resolve_partial_config() {
    let config: Config = serde_json::from_str(
        r#"{ "base_url": "http://localhost:8080/gpad/", "timeout_secs": 5 }"#,
    )
    .unwrap();
    let settings = ConfigLoader::resolve_config(config);
    assert_eq!(settings.base_url, "http://localhost:8080/gpad");
    assert_eq!(settings.timeout_secs, 5);
    assert_eq!(settings.output, Settings::default().output);
}

#[test]
fn defaults_point_at_nhs_digital() {
    let settings = Settings::default();
    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.tmp_dir, Utf8PathBuf::from("tmp"));
    assert!(!settings.keep_tmp);
}

#[test]
fn overrides_win() {
    let settings = ConfigLoader::apply_overrides(
        Settings::default(),
        Overrides {
            output: Some(Utf8PathBuf::from("out/suppliers.csv")),
            tmp_dir: None,
            check_header: true,
            keep_tmp: false,
        },
    );
    assert_eq!(settings.output, Utf8PathBuf::from("out/suppliers.csv"));
    assert_eq!(settings.tmp_dir, Utf8PathBuf::from("tmp"));
    assert!(settings.check_header);
}

#[test]
fn explicit_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("gpad.json")).unwrap();
    fs::write(&path, r#"{ "output": "custom.csv", "keep_tmp": true }"#).unwrap();

    let settings = ConfigLoader::resolve(Some(path.as_path())).unwrap();
    assert_eq!(settings.output, Utf8PathBuf::from("custom.csv"));
    assert!(settings.keep_tmp);
}

#[test]
fn missing_explicit_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("absent.json")).unwrap();
    assert_matches!(
        ConfigLoader::resolve(Some(path.as_path())),
        Err(GpadError::ConfigRead(_))
    );
}

#[test]
fn malformed_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("gpad.json")).unwrap();
    fs::write(&path, "{ not json").unwrap();
    assert_matches!(
        ConfigLoader::resolve(Some(path.as_path())),
        Err(GpadError::ConfigParse(_))
    );
}
