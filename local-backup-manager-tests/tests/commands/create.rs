//! Tests for creating backups
//!
//! Creating a backup collects a source folder and writes it to a timestamped archive.

use local_backup_manager::utils::archive::write_archive;
use local_backup_manager::utils::collector::CollectedFileSet;
use std::fs;
use test_utils::{
    archive_entry_names, list_archives, read_archive_entry, sample_instant, sample_instants,
    BackupError, ConfigBuilder, RecordingReporter, ReportEvent, ResultAssertions, TestContext,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_create_writes_all_files() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    ctx.create_source_folder("world");
    let (manager, _reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();

    let report = manager
        .create_backup_at("world", &codec, &[], sample_instant())
        .assert_ok();

    assert_eq!(report.entries_written, 5);
    assert_eq!(
        report.archive_path,
        ctx.backup_folder("world").join("Backup-2024-03-15--12-30-00.zip")
    );

    let names = archive_entry_names(&report.archive_path).unwrap();
    assert_eq!(
        names,
        vec![
            "world/level.dat",
            "world/logs/latest.log",
            "world/region/r.0.0.mca",
            "world/region/r.0.1.mca",
            "world/session.lock",
        ]
    );
    assert_eq!(
        read_archive_entry(&report.archive_path, "world/level.dat").unwrap(),
        "level data"
    );
}

#[test]
fn test_exclusion_anchored_per_directory() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    let source = ctx.create_subdir("server/tree");
    fs::write(source.join("a.txt"), "a").unwrap();
    fs::write(source.join("b.log"), "b").unwrap();
    fs::create_dir_all(source.join("sub")).unwrap();
    fs::write(source.join("sub/c.log"), "c").unwrap();

    let (manager, reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();

    let report = manager
        .create_backup_at("tree", &codec, &strings(&["*.log"]), sample_instant())
        .assert_ok();

    // `*.log` does not cross directory separators
    assert_eq!(
        archive_entry_names(&report.archive_path).unwrap(),
        vec!["tree/a.txt", "tree/sub/c.log"]
    );
    assert_eq!(report.blacklisted, 1);
    assert!(reporter.get_events().contains(&ReportEvent::BlacklistedFiles {
        pattern: "*.log".to_string(),
        count: 1,
    }));
}

#[test]
fn test_double_star_excludes_nested_files() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    ctx.create_source_folder("world");
    let (manager, _reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();

    let report = manager
        .create_backup_at("world", &codec, &strings(&["**/*.mca", "*.lock"]), sample_instant())
        .assert_ok();

    assert_eq!(
        archive_entry_names(&report.archive_path).unwrap(),
        vec!["world/level.dat", "world/logs/latest.log"]
    );
    assert_eq!(report.blacklisted, 3);
}

#[test]
fn test_base_folder_archived_as_root() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    ctx.create_file("server/server.properties", "motd=hello");
    ctx.create_source_folder("world");
    let (manager, _reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();

    let report = manager
        .create_backup_at(".", &codec, &[], sample_instant())
        .assert_ok();

    assert!(report.archive_path.starts_with(ctx.backup_folder(".")));
    assert!(ctx.backup_folder(".").ends_with("root"));

    let names = archive_entry_names(&report.archive_path).unwrap();
    assert!(names.contains(&"root/server.properties".to_string()));
    assert!(names.contains(&"root/world/level.dat".to_string()));
    assert!(names.iter().all(|n| n.starts_with("root/")));
}

#[test]
fn test_previous_backups_never_included() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    ctx.create_file("server/server.properties", "motd=hello");
    let (manager, reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();
    let instants = sample_instants(2);

    let first = manager
        .create_backup_at(".", &codec, &[], instants[0])
        .assert_ok();
    assert_eq!(first.files_in_backup_folder, 0);

    let second = manager
        .create_backup_at(".", &codec, &[], instants[1])
        .assert_ok();

    // The storage folder lives inside the base folder; the first archive is skipped
    assert_eq!(second.files_in_backup_folder, 1);
    assert_eq!(
        archive_entry_names(&second.archive_path).unwrap(),
        vec!["root/server.properties"]
    );
    assert!(reporter
        .get_events()
        .contains(&ReportEvent::FilesInBackupFolder { count: 1 }));
}

#[test]
fn test_unreadable_file_is_skipped_and_reported() {
    let ctx = TestContext::new();
    let source = ctx.create_subdir("world");
    fs::write(source.join("a.dat"), "a").unwrap();
    fs::write(source.join("c.dat"), "c").unwrap();
    let archive_path = ctx.temp_dir().join("out.zip");

    // `b.dat` disappeared between collection and archiving
    let file_set = CollectedFileSet {
        relative_paths: vec!["a.dat".into(), "b.dat".into(), "c.dat".into()],
        ..Default::default()
    };
    let reporter = RecordingReporter::new();

    let summary = write_archive(&source, "world", &archive_path, &file_set, 6, &reporter).unwrap();

    assert_eq!(summary.entries_written, 2);
    assert_eq!(summary.skipped, vec!["b.dat"]);
    assert_eq!(
        archive_entry_names(&archive_path).unwrap(),
        vec!["world/a.dat", "world/c.dat"]
    );
    assert_eq!(reporter.skipped_files(), vec!["b.dat"]);
}

#[test]
fn test_unreadable_lock_file_is_not_reported() {
    let ctx = TestContext::new();
    let source = ctx.create_subdir("world");
    fs::write(source.join("level.dat"), "level").unwrap();
    let archive_path = ctx.temp_dir().join("out.zip");

    let file_set = CollectedFileSet {
        relative_paths: vec!["level.dat".into(), "session.lock".into()],
        ..Default::default()
    };
    let reporter = RecordingReporter::new();

    let summary = write_archive(&source, "world", &archive_path, &file_set, 0, &reporter).unwrap();

    assert_eq!(summary.entries_written, 1);
    assert_eq!(summary.skipped, vec!["session.lock"]);
    assert!(reporter.skipped_files().is_empty());
}

#[test]
fn test_missing_source_folder() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    let (manager, _reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();

    let result = manager.create_backup("world", &codec, &[]);
    assert!(matches!(result, Err(BackupError::InvalidLocation { .. })));
}

#[test]
fn test_invalid_pattern_propagates() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    ctx.create_source_folder("world");
    let (manager, _reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();

    let result = manager.create_backup("world", &codec, &strings(&["region/[a-"]));
    assert!(matches!(result, Err(BackupError::InvalidPattern { .. })));
    assert!(!ctx.backup_folder("world").exists());
}

#[test]
fn test_parent_segments_stay_in_storage_root() {
    let ctx = TestContext::from_builder(ConfigBuilder::minimal());
    ctx.create_source_folder("world");
    ctx.create_subdir("server/nested");
    let (manager, _reporter) = ctx.manager();
    let codec = manager.codec("Backup-%Y-%m-%d--%H-%M-%S.zip").assert_ok();

    let report = manager
        .create_backup_at("nested/../world", &codec, &[], sample_instant())
        .assert_ok();

    let storage = manager.storage_root();
    assert!(report.archive_path.starts_with(&storage));
    assert_eq!(
        list_archives(&storage.join("nested/world")).unwrap(),
        vec!["Backup-2024-03-15--12-30-00.zip"]
    );
}
