use std::fs;
use std::sync::{Mutex, MutexGuard};

use clap::Parser;
use figment::providers::{Env, Serialized};
use figment::Figment;
use tempfile::tempdir;
use twinfind::cli::{Cli, OutputFormat};
use twinfind::config::{Config, ENV_PREFIX};
use twinfind::scanner::DigestAlgorithm;

/// Held by every test that reads or writes `TWINFIND_*` variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn test_config_load_defaults() {
    // Built without the Env layer so other tests' variables cannot interfere.
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config.min_size, 1);
    assert_eq!(config.progress_interval_ms, 200);
    assert!(config.exclude.is_empty());
}

#[test]
fn test_config_load_from_env() {
    let _guard = env_lock();
    std::env::set_var("TWINFIND_MIN_SIZE", "2048");
    std::env::set_var("TWINFIND_DIGEST", "sha256");

    let extracted = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract::<Config>();

    std::env::remove_var("TWINFIND_MIN_SIZE");
    std::env::remove_var("TWINFIND_DIGEST");
    let config = extracted.unwrap();

    assert_eq!(config.min_size, 2048);
    assert_eq!(config.digest, DigestAlgorithm::Sha256);
}

#[test]
fn test_config_file_then_cli() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
min_size = 100
exclude = ["node_modules"]
progress_interval_ms = 50
output = "json"
"#,
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "twinfind",
        "--config",
        path.to_str().unwrap(),
        "--min-size",
        "1.5k",
        "-e",
        "target",
        "--output",
        "csv",
        ".",
    ])
    .unwrap();
    let config = Config::load(&cli).unwrap();

    assert_eq!(config.min_size, 1500);
    assert_eq!(
        config.exclude,
        vec!["node_modules".to_string(), "target".to_string()]
    );
    assert_eq!(config.progress_interval_ms, 50);
    assert_eq!(config.output, OutputFormat::Csv);
    assert_eq!(config.digest, DigestAlgorithm::Blake3);
}

#[test]
fn test_malformed_config_file_is_error() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "min_size = \"lots\"\n").unwrap();

    let cli = Cli::try_parse_from(["twinfind", "--config", path.to_str().unwrap(), "."]).unwrap();

    assert!(Config::load(&cli).is_err());
}
