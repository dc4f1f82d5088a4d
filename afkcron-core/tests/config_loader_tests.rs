use afkcron_core::{ComebackAction, ConfigLoader, Error};
use std::path::Path;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("afkcron");

    let config = "\
/usr/bin/updatedb::termkill:2h:oneshot
/usr/local/bin/backup:--full /home:stop:45m:
/usr/bin/make:-j4 world:prio:1d:
";
    std::fs::write(&config_path, config).unwrap();

    let mut loader = ConfigLoader::new();
    let count = loader.load_file(&config_path).await.unwrap();
    assert_eq!(count, 3);

    let entries = loader.entries();
    assert_eq!(entries[0].path, "/usr/bin/updatedb");
    assert_eq!(entries[0].comeback, ComebackAction::terminate_then_kill());
    assert_eq!(entries[0].idle_threshold_secs, 7200);
    assert!(entries[0].single_shot);

    assert_eq!(entries[1].arguments, "--full /home");
    assert_eq!(entries[1].comeback, ComebackAction::suspend());
    assert_eq!(entries[1].idle_threshold_secs, 2700);
    assert!(!entries[1].single_shot);

    assert_eq!(entries[2].idle_threshold_secs, 86400);
}

#[tokio::test]
async fn test_repeated_loads_accumulate() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first");
    let second = temp_dir.path().join("second");
    std::fs::write(&first, "/bin/a::kill:10:\n").unwrap();
    std::fs::write(&second, "/bin/b::term:20:\n/bin/c::stay:30:\n").unwrap();

    let mut loader = ConfigLoader::new();
    loader.load_file(&first).await.unwrap();
    loader.load_file(&second).await.unwrap();

    let paths: Vec<_> = loader.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/bin/a", "/bin/b", "/bin/c"]);
    assert!(loader.entries()[2].comeback.is_stay());
}

#[test]
fn test_malformed_line_admits_nothing() {
    let mut loader = ConfigLoader::new();
    let content = "/bin/good::kill:10:\n/bin/short::kill:10\n";

    let err = loader.load_str(Path::new("cfg"), content).unwrap_err();
    match err {
        Error::ConfigLine { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
    assert!(loader.is_empty());
}

#[test]
fn test_zero_duration_admits_nothing() {
    let mut loader = ConfigLoader::new();
    let result = loader.load_str(Path::new("cfg"), "/bin/a::kill:10:\n/bin/b::kill:0:\n");
    assert!(result.is_err());
    assert_eq!(loader.len(), 0);
}

#[test]
fn test_empty_comeback_admits_nothing() {
    let mut loader = ConfigLoader::new();
    let content = "/bin/a::kill:10:\n/bin/b:--fast::10:\n/bin/c::nap:10:\n";

    let err = loader.load_str(Path::new("cfg"), content).unwrap_err();
    match err {
        Error::ConfigLine { line, reason, .. } => {
            assert_eq!(line, 2);
            assert!(reason.contains("comeback"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(loader.is_empty());
}

#[test]
fn test_unknown_comeback_is_stay() {
    let mut loader = ConfigLoader::new();
    loader
        .load_str(Path::new("cfg"), "/bin/c::nap:10:\n")
        .unwrap();
    assert!(loader.entries()[0].comeback.is_stay());
}

#[test]
fn test_failed_load_keeps_earlier_files() {
    let mut loader = ConfigLoader::new();
    loader
        .load_str(Path::new("one"), "/bin/a::kill:10:\n")
        .unwrap();
    assert!(
        loader
            .load_str(Path::new("two"), "/bin/b::kill:abc:\n")
            .is_err()
    );
    assert_eq!(loader.len(), 1);
}

#[test]
fn test_blank_and_comment_lines_skipped() {
    let mut loader = ConfigLoader::new();
    let content = "# idle jobs\n\n   \n/bin/a::kill:10:\r\n  # indented comment\n";
    assert_eq!(loader.load_str(Path::new("cfg"), content).unwrap(), 1);
    assert!(!loader.entries()[0].single_shot);
}

#[test]
fn test_empty_path_rejected() {
    let mut loader = ConfigLoader::new();
    assert!(loader.load_str(Path::new("cfg"), ":-v:kill:10:\n").is_err());
}

#[tokio::test]
async fn test_missing_file_is_error() {
    let mut loader = ConfigLoader::new();
    let result = loader
        .load_file(Path::new("/nonexistent/afkcron.conf"))
        .await;
    assert!(matches!(result, Err(Error::Config(_))));
}
