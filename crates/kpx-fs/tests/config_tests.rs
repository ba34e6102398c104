use kpx_fs::{ConfigStore, Error, NormalizedPath};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct TestConfig {
    name: String,
    count: i32,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("kpx.toml");
    fs::write(&file_path, "name = \"test\"\ncount = 42\n").unwrap();

    let config: TestConfig = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(config.name, "test");
    assert_eq!(config.count, 42);
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("kpx.json");
    fs::write(&file_path, r#"{"name": "test", "count": 42}"#).unwrap();

    let config: TestConfig = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(config, TestConfig { name: "test".into(), count: 42 });
}

#[test]
fn test_load_unsupported_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("kpx.ini");
    fs::write(&file_path, "name=test").unwrap();

    let result: kpx_fs::Result<TestConfig> = ConfigStore::new().load(&NormalizedPath::new(&file_path));
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn test_load_invalid_toml_reports_path() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("kpx.toml");
    fs::write(&file_path, "name = ").unwrap();

    let result: kpx_fs::Result<TestConfig> = ConfigStore::new().load(&NormalizedPath::new(&file_path));
    match result {
        Err(Error::ConfigParse { format, path, .. }) => {
            assert_eq!(format, "TOML");
            assert_eq!(path, file_path);
        }
        other => panic!("expected ConfigParse, got {:?}", other),
    }
}
