//! Unit tests for location path safety

use local_backup_manager::utils::paths::{
    archive_top_level_name, backup_subfolder, escape_location, find_glob_folders,
    validate_location,
};
use rstest::rstest;
use test_utils::{BackupError, TestContext};

#[rstest]
#[case("world", "world")]
#[case("../world", "world")]
#[case("../../etc", "etc")]
#[case("....//world", "world")]
#[case("a/../b", "a/b")]
#[case("..", "")]
#[case("a/..", "a")]
#[case("..\\secret", "secret")]
fn test_escape_location(#[case] input: &str, #[case] expected: &str) {
    let escaped = escape_location(input);
    assert_eq!(escaped, expected);
    assert!(!escaped.contains("../"));
}

#[rstest]
#[case(".", "root")]
#[case("./", "root")]
#[case("world", "world")]
#[case("./world", "world")]
#[case("world/", "world")]
#[case("../world", "world")]
#[case("worlds/nether", "worlds/nether")]
#[case("..", "root")]
#[case("/tmp/outside", "tmp/outside")]
#[case("/", "root")]
fn test_backup_subfolder(#[case] location: &str, #[case] expected: &str) {
    assert_eq!(backup_subfolder(location), expected);
}

#[rstest]
#[case(".", "root")]
#[case("world", "world")]
#[case("worlds/nether", "nether")]
fn test_archive_top_level_name(#[case] location: &str, #[case] expected: &str) {
    assert_eq!(archive_top_level_name(location), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("/etc")]
#[case("/")]
fn test_invalid_locations(#[case] location: &str) {
    let result = validate_location(location);
    assert!(matches!(result, Err(BackupError::InvalidLocation { .. })));
}

#[rstest]
#[case(".")]
#[case("world")]
#[case("../world")]
fn test_valid_locations(#[case] location: &str) {
    assert!(validate_location(location).is_ok());
}

#[test]
fn test_find_glob_folders_only_directories() {
    let ctx = TestContext::new();
    ctx.create_subdir("world");
    ctx.create_subdir("world_nether");
    ctx.create_subdir("world_the_end/region");
    ctx.create_file("world_notes.txt", "not a folder");

    let storage = ctx.temp_dir().join("backups");
    let folders = find_glob_folders("world*", ctx.temp_dir(), &storage).unwrap();
    let names: Vec<_> = folders
        .iter()
        .map(|f| f.strip_prefix(ctx.temp_dir()).unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["world", "world_nether", "world_the_end"]);
}

#[test]
fn test_glob_never_selects_storage_folder() {
    let ctx = TestContext::new();
    ctx.create_subdir("world");
    ctx.create_subdir("backups/world");
    let storage = ctx.temp_dir().join("backups");

    let folders = find_glob_folders("*", ctx.temp_dir(), &storage).unwrap();

    assert_eq!(folders, vec![ctx.temp_dir().join("world")]);
}
