use std::{fs, path::Path};

use rolling_log_sink::{LoggerConfig, LoggingContext, Severity};

/// `<23文字の時刻> [INFO] a.o: xyz\n`はちょうど40バイトになる
const ENTRY_LEN: usize = 40;

fn config(dir: &Path, max_bytes: u64, num_rotations: u32) -> LoggerConfig {
    LoggerConfig::new("a")
        .with_directory(dir)
        .with_minimum_severity(Severity::Info)
        .with_max_bytes_per_file(max_bytes)
        .with_num_rotations(num_rotations)
}

fn backups(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.starts_with("a.log."))
        .collect();
    names.sort();
    names
}

#[test]
fn test_five_entries_with_two_rotations() {
    let dir = tempfile::tempdir().unwrap();
    let context = LoggingContext::new();
    let root = context
        .get_or_create_root_logger(&config(dir.path(), 100, 2))
        .unwrap();

    for _ in 0..5 {
        root.log_at(Severity::Info, "o", "xyz");
    }

    let current = fs::read_to_string(dir.path().join("a.log")).unwrap();
    assert_eq!(ENTRY_LEN, current.len());
    assert!(current.ends_with(" [INFO] a.o: xyz\n"));
    assert_eq!(vec!["a.log.1", "a.log.2"], backups(dir.path()));
    assert_eq!(
        2 * ENTRY_LEN as u64,
        fs::metadata(dir.path().join("a.log.1")).unwrap().len()
    );
}

#[test]
fn test_entries_below_max_bytes_stay_in_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let context = LoggingContext::new();
    let root = context
        .get_or_create_root_logger(&config(dir.path(), 2000, 5))
        .unwrap();

    for n in 0..10 {
        root.log_at(Severity::Info, "main", format!("message {}", n));
    }

    let current = fs::read_to_string(dir.path().join("a.log")).unwrap();
    let messages: Vec<&str> = current
        .lines()
        .map(|line| line.rsplit(": ").next().unwrap())
        .collect();
    let expected: Vec<String> = (0..10).map(|n| format!("message {}", n)).collect();
    assert_eq!(expected, messages);
    assert!(backups(dir.path()).is_empty());
}

#[test]
fn test_backup_count_never_exceeds_limit() {
    let dir = tempfile::tempdir().unwrap();
    let context = LoggingContext::new();
    let root = context
        .get_or_create_root_logger(&config(dir.path(), 100, 3))
        .unwrap();

    for n in 0..200 {
        root.log_at(Severity::Info, "o", format!("{:03}", n));
        assert!(backups(dir.path()).len() <= 3);
    }

    // 最後のローテーションで`.1`に移動したのは 196 と 197
    let newest = fs::read_to_string(dir.path().join("a.log.1")).unwrap();
    assert!(newest.contains("a.o: 196\n"));
    assert!(newest.ends_with("a.o: 197\n"));
    let current = fs::read_to_string(dir.path().join("a.log")).unwrap();
    assert!(current.ends_with("a.o: 199\n"));
}

#[test]
fn test_custom_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let context = LoggingContext::new();
    let root = context
        .get_or_create_root_logger(&config(dir.path(), 2000, 5).with_file_name("custom"))
        .unwrap();

    root.info("hello");

    assert!(dir.path().join("custom.log").is_file());
    assert!(!dir.path().join("a.log").exists());
}
