use markdupe::actions::{
    persist, read_source, rewrite, sanitize_file_name, AutoSelect, OutputPaths, PersistConfig,
    PersistError, SelectionPolicy,
};
use markdupe::duplicates::{DuplicateFinder, EntryKind};
use markdupe::tree::{leaf_ids, parse_tree, RootName};
use std::fs;
use tempfile::tempdir;

use super::fixtures::{bookmark, document, folder, write_json};

#[test]
fn test_sanitize_matches_output_names() {
    let config = PersistConfig::default().with_output_dir("out");
    let paths = OutputPaths::derive(
        std::path::Path::new("/home/me/My Profile/Bookmarks"),
        true,
        EntryKind::Bookmarks,
        &config,
    );

    let sanitized = sanitize_file_name("/home/me/My Profile/Bookmarks");
    assert_eq!(sanitized, "___home___me___My_Profile___Bookmarks");
    assert_eq!(paths.clean_name, format!("{sanitized}_clean"));
    assert_eq!(paths.backup_name, format!("{sanitized}_original"));
    assert!(!paths.clean_name.contains('/'));
}

#[test]
fn test_full_pipeline_through_library() {
    let dir = tempdir().unwrap();
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![
                bookmark("2", "http://a.com"),
                bookmark("3", "https://a.com"),
                bookmark("4", "http://a.com"),
            ],
        )),
    );

    let tree = parse_tree(&read_source(&input).unwrap()).unwrap();
    let (groups, _) = DuplicateFinder::with_defaults().find(&tree).unwrap();
    let remove = AutoSelect.select(&groups).unwrap();
    let outcome = rewrite(&tree, &remove, &[RootName::BookmarkBar]);
    assert_eq!(outcome.removed_count(), 2);

    let config = PersistConfig::default().with_output_dir(dir.path().join("out"));
    let paths = OutputPaths::derive(&input, true, EntryKind::Bookmarks, &config);
    persist(&input, &paths, &outcome.tree, &config).unwrap();

    let written = parse_tree(&fs::read(&paths.clean).unwrap()).unwrap();
    assert_eq!(leaf_ids(&written.roots.bookmark_bar), ["2"]);
    assert_eq!(fs::read(&paths.backup).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn test_persist_refuses_to_overwrite_input_with_backup() {
    let dir = tempdir().unwrap();
    let input = write_json(
        dir.path(),
        "Bookmarks_original",
        &document(folder("1", "Bar", vec![])),
    );
    let tree = parse_tree(&fs::read(&input).unwrap()).unwrap();

    let config = PersistConfig::default().with_write_in_place(true);
    let paths = OutputPaths::derive(&input, true, EntryKind::Bookmarks, &config);
    assert_eq!(paths.backup, input);

    let err = persist(&input, &paths, &tree, &config).unwrap_err();
    assert!(matches!(err, PersistError::BackupOverwritesInput(_)));
}

#[test]
fn test_read_source_reports_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("Bookmarks");

    let err = read_source(&missing).unwrap_err();
    assert_eq!(err.path(), Some(missing.as_path()));
}
