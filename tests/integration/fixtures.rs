//! Shared builders for bookmark documents and CLI runs.

use clap::Parser;
use markdupe::cli::Cli;
use markdupe::error::ExitCode;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub fn bookmark(id: &str, url: &str) -> Value {
    json!({ "id": id, "type": "url", "name": format!("entry {id}"), "url": url })
}

pub fn bookmark_added(id: &str, url: &str, date_added: &str) -> Value {
    json!({ "id": id, "type": "url", "name": format!("entry {id}"), "url": url, "date_added": date_added })
}

pub fn note(id: &str, content: &str) -> Value {
    json!({ "id": id, "type": "note", "content": content })
}

pub fn folder(id: &str, name: &str, children: Vec<Value>) -> Value {
    json!({ "id": id, "type": "folder", "name": name, "children": children })
}

/// A document with the given bookmark bar and an `other` root holding one
/// duplicate pair of its own.
pub fn document(bookmark_bar: Value) -> Value {
    json!({
        "checksum": "0123456789abcdef",
        "version": 1,
        "roots": {
            "bookmark_bar": bookmark_bar,
            "other": folder("900", "Other bookmarks", vec![
                bookmark("901", "http://other.com"),
                bookmark("902", "https://other.com"),
            ]),
            "synced": folder("950", "Mobile bookmarks", vec![]),
            "sync_transaction_version": "42"
        }
    })
}

pub fn write_json(dir: &Path, name: &str, doc: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(doc).unwrap()).unwrap();
    path
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

/// Ids of the direct children of a JSON folder.
pub fn child_ids(folder: &Value) -> Vec<String> {
    folder["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child["id"].as_str().unwrap().to_string())
        .collect()
}

/// Run the application with a config path that does not exist, so the
/// user's own configuration never leaks into a test.
pub fn run(config_dir: &Path, args: &[&str]) -> anyhow::Result<ExitCode> {
    let config = config_dir.join("no-config.toml");
    let mut argv = vec![
        "markdupe".to_string(),
        "-q".to_string(),
        "--config".to_string(),
        config.to_string_lossy().into_owned(),
    ];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    markdupe::run_app(Cli::try_parse_from(argv).unwrap())
}

/// Paths written by `clean` for an explicit input into `out`.
pub fn clean_and_backup(input: &Path, out: &Path) -> (PathBuf, PathBuf) {
    let sanitized = markdupe::actions::sanitize_file_name(&input.to_string_lossy());
    (
        out.join(format!("{sanitized}_clean")),
        out.join(format!("{sanitized}_original")),
    )
}
