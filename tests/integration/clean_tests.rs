use super::fixtures::{
    bookmark, bookmark_added, child_ids, clean_and_backup, document, folder, note, read_json, run,
    write_json,
};
use markdupe::error::ExitCode;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_clean_removes_scheme_duplicates() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bookmarks bar",
            vec![
                bookmark("2", "http://a.com"),
                bookmark("3", "https://a.com"),
                bookmark("4", "http://b.com"),
            ],
        )),
    );
    let original = fs::read(&input).unwrap();

    let code = run(
        dir.path(),
        &["clean", input.to_str().unwrap(), "--output-dir", out.to_str().unwrap()],
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);

    let (clean, backup) = clean_and_backup(&input, &out);
    let cleaned = read_json(&clean);
    assert_eq!(child_ids(&cleaned["roots"]["bookmark_bar"]), ["2", "4"]);
    assert_eq!(fs::read(&backup).unwrap(), original);
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn test_clean_no_duplicates_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "http://b.com")],
        )),
    );

    let code = run(
        dir.path(),
        &["clean", input.to_str().unwrap(), "--output-dir", out.to_str().unwrap()],
    )
    .unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(!out.exists());
}

#[test]
fn test_clean_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "http://a.com")],
        )),
    );

    let code = run(
        dir.path(),
        &[
            "clean",
            input.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
            "--dry-run",
        ],
    )
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(!out.exists());
}

#[test]
fn test_clean_in_place() {
    let dir = tempdir().unwrap();
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "HTTPS://a.com")],
        )),
    );
    let original = fs::read(&input).unwrap();

    let code = run(dir.path(), &["clean", input.to_str().unwrap(), "--in-place"]).unwrap();
    assert_eq!(code, ExitCode::Success);

    assert_eq!(fs::read(dir.path().join("Bookmarks_original")).unwrap(), original);
    let cleaned = read_json(&input);
    assert_eq!(child_ids(&cleaned["roots"]["bookmark_bar"]), ["2"]);
}

#[test]
fn test_clean_only_touches_selected_roots() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "http://a.com")],
        )),
    );
    let (clean, _) = clean_and_backup(&input, &out);

    run(
        dir.path(),
        &["clean", input.to_str().unwrap(), "--output-dir", out.to_str().unwrap()],
    )
    .unwrap();
    let cleaned = read_json(&clean);
    assert_eq!(child_ids(&cleaned["roots"]["other"]), ["901", "902"]);

    run(
        dir.path(),
        &[
            "clean",
            input.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
            "--root",
            "bookmark_bar",
            "--root",
            "other",
        ],
    )
    .unwrap();
    let cleaned = read_json(&clean);
    assert_eq!(child_ids(&cleaned["roots"]["bookmark_bar"]), ["2"]);
    assert_eq!(child_ids(&cleaned["roots"]["other"]), ["901"]);
}

#[test]
fn test_clean_nested_folders_are_independent() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![
                bookmark("2", "http://a.com"),
                folder(
                    "10",
                    "Work",
                    vec![
                        bookmark("11", "http://a.com"),
                        bookmark("12", "https://a.com"),
                        folder("20", "Deep", vec![bookmark("21", "http://a.com")]),
                    ],
                ),
            ],
        )),
    );

    let code = run(
        dir.path(),
        &["clean", input.to_str().unwrap(), "--output-dir", out.to_str().unwrap()],
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);

    let (clean, _) = clean_and_backup(&input, &out);
    let bar = &read_json(&clean)["roots"]["bookmark_bar"];
    assert_eq!(child_ids(bar), ["2", "10"]);
    assert_eq!(child_ids(&bar["children"][1]), ["11", "20"]);
    assert_eq!(child_ids(&bar["children"][1]["children"][1]), ["21"]);
}

#[test]
fn test_clean_preserves_metadata() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let mut doc = document(folder(
        "1",
        "Bar",
        vec![bookmark("2", "http://a.com"), bookmark("3", "http://a.com")],
    ));
    doc["roots"]["bookmark_bar"]["children"][0]["meta_info"] = json!({ "last_visited": "1" });
    doc["roots"]["bookmark_bar"]["guid"] = json!("00000000-0000-4000-a000-000000000001");
    doc["roots"]["bookmark_bar"]["date_modified"] = json!("13253932800000000");
    let input = write_json(dir.path(), "Bookmarks", &doc);

    run(
        dir.path(),
        &["clean", input.to_str().unwrap(), "--output-dir", out.to_str().unwrap()],
    )
    .unwrap();

    let (clean, _) = clean_and_backup(&input, &out);
    let cleaned = read_json(&clean);
    assert_eq!(cleaned["checksum"], doc["checksum"]);
    assert_eq!(cleaned["version"], 1);
    assert_eq!(cleaned["roots"]["sync_transaction_version"], "42");
    assert_eq!(cleaned["roots"]["synced"], doc["roots"]["synced"]);
    assert_eq!(cleaned["roots"]["bookmark_bar"]["guid"], doc["roots"]["bookmark_bar"]["guid"]);
    assert_eq!(
        cleaned["roots"]["bookmark_bar"]["children"][0]["meta_info"]["last_visited"],
        "1"
    );
}

#[test]
fn test_clean_sort_by_date_added_keeps_oldest() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![
                bookmark_added("2", "http://a.com", "13300000000000000"),
                bookmark_added("3", "http://a.com", "13200000000000000"),
            ],
        )),
    );

    run(
        dir.path(),
        &[
            "clean",
            input.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
            "--sort-by",
            "date_added",
        ],
    )
    .unwrap();

    let (clean, _) = clean_and_backup(&input, &out);
    assert_eq!(child_ids(&read_json(&clean)["roots"]["bookmark_bar"]), ["3"]);
}

#[test]
fn test_clean_notes() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Notes",
        &document(folder(
            "1",
            "Notes",
            vec![
                note("2", "buy milk"),
                note("3", "buy milk"),
                note("4", "Buy milk"),
            ],
        )),
    );

    let code = run(
        dir.path(),
        &[
            "clean",
            input.to_str().unwrap(),
            "--kind",
            "notes",
            "--output-dir",
            out.to_str().unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);

    let (clean, _) = clean_and_backup(&input, &out);
    assert_eq!(child_ids(&read_json(&clean)["roots"]["bookmark_bar"]), ["2", "4"]);
}

#[test]
fn test_clean_multiple_inputs_share_output_dir() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let first_dir = dir.path().join("first");
    let second_dir = dir.path().join("second");
    fs::create_dir_all(&first_dir).unwrap();
    fs::create_dir_all(&second_dir).unwrap();

    let doc = document(folder(
        "1",
        "Bar",
        vec![bookmark("2", "http://a.com"), bookmark("3", "http://a.com")],
    ));
    let first = write_json(&first_dir, "Bookmarks", &doc);
    let second = write_json(&second_dir, "Bookmarks", &doc);

    let code = run(
        dir.path(),
        &[
            "clean",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);

    for input in [&first, &second] {
        let (clean, backup) = clean_and_backup(input, &out);
        assert!(clean.exists());
        assert!(backup.exists());
    }
    assert_eq!(fs::read_dir(&out).unwrap().count(), 4);
}

#[test]
fn test_clean_partial_success() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let good = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "http://a.com")],
        )),
    );
    let broken = dir.path().join("Broken");
    fs::write(&broken, b"{ not json").unwrap();

    let code = run(
        dir.path(),
        &[
            "clean",
            good.to_str().unwrap(),
            broken.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
        ],
    )
    .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(clean_and_backup(&good, &out).0.exists());
}

#[test]
fn test_clean_pretty_output() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "http://a.com")],
        )),
    );

    run(
        dir.path(),
        &[
            "clean",
            input.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
            "--pretty",
        ],
    )
    .unwrap();

    let (clean, _) = clean_and_backup(&input, &out);
    let written = fs::read_to_string(clean).unwrap();
    assert!(written.lines().count() > 1);
}
