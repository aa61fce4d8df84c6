use super::fixtures::{bookmark, document, folder, run, write_json};
use markdupe::duplicates::{DuplicateFinder, FinderConfig, SortKey};
use markdupe::error::ExitCode;
use markdupe::tree::{parse_tree, RootName};
use std::fs;
use tempfile::tempdir;

fn parse(doc: &serde_json::Value) -> markdupe::tree::Tree {
    parse_tree(&serde_json::to_vec(doc).unwrap()).unwrap()
}

#[test]
fn test_scan_reports_without_writing() {
    let dir = tempdir().unwrap();
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "https://a.com")],
        )),
    );
    let before = fs::read(&input).unwrap();

    for format in ["text", "json", "csv"] {
        let code = run(dir.path(), &["scan", input.to_str().unwrap(), "--output", format]).unwrap();
        assert_eq!(code, ExitCode::Success);
    }

    assert_eq!(fs::read(&input).unwrap(), before);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_scan_no_duplicates() {
    let dir = tempdir().unwrap();
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder("1", "Bar", vec![bookmark("2", "http://a.com")])),
    );

    let code = run(dir.path(), &["scan", input.to_str().unwrap(), "--output", "json"]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_scan_empty_bookmark_bar() {
    let dir = tempdir().unwrap();
    let input = write_json(dir.path(), "Bookmarks", &document(folder("1", "Bar", vec![])));

    let code = run(dir.path(), &["scan", input.to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_finder_groups_per_folder() {
    let tree = parse(&document(folder(
        "1",
        "Bar",
        vec![
            bookmark("2", "http://a.com"),
            folder("10", "Sub", vec![bookmark("11", "https://a.com")]),
            bookmark("3", "http://b.com"),
            bookmark("4", "https://b.com"),
            bookmark("5", "http://a.com"),
        ],
    )));

    let (groups, stats) = DuplicateFinder::with_defaults().find(&tree).unwrap();

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|group| group.folder_id == "1"));
    assert_eq!(stats.folders_scanned, 2);
    assert_eq!(stats.leaves_scanned, 5);
    assert_eq!(stats.duplicate_entries, 2);

    let survivors: Vec<&str> = groups
        .iter()
        .filter_map(|group| group.survivor())
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(survivors, ["2", "3"]);
}

#[test]
fn test_finder_other_roots() {
    let tree = parse(&document(folder("1", "Bar", vec![])));

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_roots(vec![RootName::Other, RootName::Synced]),
    );
    let (groups, _) = finder.find(&tree).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].folder_id, "900");

    let finder = DuplicateFinder::new(FinderConfig::default().with_roots(vec![RootName::Trash]));
    assert!(finder.find(&tree).is_err());
}

#[test]
fn test_finder_sort_by_id_is_numeric() {
    let tree = parse(&document(folder(
        "1",
        "Bar",
        vec![bookmark("100", "http://a.com"), bookmark("20", "http://a.com")],
    )));

    let finder = DuplicateFinder::new(FinderConfig::default().with_sort_by(SortKey::Id));
    let (groups, _) = finder.find(&tree).unwrap();
    assert_eq!(groups[0].survivor().unwrap().id, "20");
}
