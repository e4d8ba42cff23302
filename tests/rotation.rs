//! Loggers writing to daily-rotated files.

use std::fs::{self, File};
use std::time::{Duration, SystemTime};

use rslog::config::{parse_config, ConfigError, FileConfig};
use rslog::{get_writer, LogConfig, LogError, Logger, Severity};
use tempfile::TempDir;

fn age(path: &std::path::Path, days: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60))
        .unwrap();
}

#[test]
fn test_records_reach_the_dated_file() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("service.log");

    let writer = get_writer(&base, 7).unwrap();
    let dated = writer.current_path().unwrap().to_path_buf();
    let logger = Logger::builder()
        .level(Severity::Debug)
        .rotating_file(writer)
        .build();
    logger.debug(&[&"first"]);
    logger.error(&[&"second"]);
    // Dropping the logger flushes the background writer.
    drop(logger);

    let content = fs::read_to_string(&dated).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\tfirst"));
    assert!(lines[1].contains("\tERROR\t"));
}

#[cfg(unix)]
#[test]
fn test_base_name_links_to_current_file() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("service.log");
    let writer = get_writer(&base, 7).unwrap();

    let pointee = fs::read_link(&base).unwrap();
    assert_eq!(Some(pointee.as_os_str()), writer.current_path().and_then(|p| p.file_name()));
    assert!(pointee.to_str().unwrap().starts_with("service.log.2"));
}

#[test]
fn test_expired_files_pruned_on_open() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("service.log.20200101");
    let recent = dir.path().join("service.log.20200102");
    let unrelated = dir.path().join("other.log.20200101");
    for path in [&old, &recent, &unrelated] {
        fs::write(path, "x\n").unwrap();
    }
    age(&old, 30);
    age(&recent, 2);
    age(&unrelated, 30);

    let _writer = get_writer(dir.path().join("service.log"), 7).unwrap();

    assert!(!old.exists());
    assert!(recent.exists());
    assert!(unrelated.exists());
}

#[test]
fn test_zero_max_days_keeps_old_files() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("service.log.20200101");
    fs::write(&old, "x\n").unwrap();
    age(&old, 400);

    let _writer = get_writer(dir.path().join("service.log"), 0).unwrap();

    assert!(old.exists());
}

#[cfg(unix)]
#[test]
fn test_logger_from_toml() {
    let dir = TempDir::new().unwrap();
    let toml = format!(
        r#"
level = "warn"
name = "jobs"
stdout = false

[file]
filename = "{}"
max_days = 3
"#,
        dir.path().join("jobs.log").display()
    );
    let config = parse_config(&toml).unwrap();
    assert_eq!(config.file.as_ref().map(|f| f.max_days), Some(3));

    let logger = Logger::from_config(&config).unwrap();
    logger.info(&[&"skipped"]);
    logger.warn(&[&"written"]);
    drop(logger);

    // The base name links to whichever dated file took the records.
    let content = fs::read_to_string(dir.path().join("jobs.log")).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("\tWARN\tjobs\t"));
}

#[test]
fn test_unwritable_location_is_an_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let config = LogConfig {
        file: Some(FileConfig {
            filename: blocker.join("app.log"),
            ..FileConfig::default()
        }),
        ..LogConfig::default()
    };
    assert!(Logger::from_config(&config).is_err());
}

#[test]
fn test_zone_pattern_rejected_by_config() {
    let err = parse_config("[file]\nfilename = \"app.log\"\npattern = \".%Y%m%d%Z\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "{err}");
}

#[test]
fn test_zone_pattern_is_an_error_not_a_panic() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig {
        file: Some(FileConfig {
            filename: dir.path().join("app.log"),
            pattern: ".%Y%m%d%z".into(),
            ..FileConfig::default()
        }),
        ..LogConfig::default()
    };
    let err = Logger::from_config(&config).unwrap_err();
    assert!(matches!(err, LogError::InvalidPattern { .. }), "{err}");
}
