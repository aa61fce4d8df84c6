use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use markdupe::config::Config;
use markdupe::duplicates::{EntryKind, SortKey};
use markdupe::tree::RootName;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
    assert!(config.process_bookmarks);
    assert!(!config.process_notes);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
paths = ["/profiles/a/Bookmarks", "/profiles/b/Bookmarks"]
output_dir = "cleaned"
sort_by = "date_added"
roots = ["bookmark_bar", "other"]
process_notes = true
kind = "notes"
pretty = true
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from(Some(config_path.as_path())).unwrap();

    assert_eq!(config.paths.len(), 2);
    assert_eq!(config.output_dir, PathBuf::from("cleaned"));
    assert_eq!(config.sort_by, SortKey::DateAdded);
    assert_eq!(config.roots, vec![RootName::BookmarkBar, RootName::Other]);
    assert_eq!(config.kind, Some(EntryKind::Notes));
    assert!(config.pretty);
    assert!(config.process_bookmarks);
    assert!(!config.use_trash);
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();
    let config = Config::load_from(Some(temp_dir.path().join("absent.toml").as_path())).unwrap();
    assert_eq!(config.roots, vec![RootName::BookmarkBar]);
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "invalid = toml").unwrap();

    assert!(Config::load_from(Some(config_path.as_path())).is_err());
}

#[test]
fn test_config_invalid_value() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "roots = [\"mobile\"]").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let result: Result<Config, _> = figment.extract();
    assert!(result.is_err());
}

#[test]
fn test_config_save_toml() {
    let mut config = Config::default();
    config.sort_by = SortKey::DateAdded;
    config.roots = vec![RootName::Other];

    let content = toml::to_string_pretty(&config).unwrap();
    assert!(content.contains("sort_by = \"date_added\""));
    assert!(content.contains("roots = [\"other\"]"));
    assert!(content.contains("output_dir = \".\""));
}

#[test]
fn test_config_file_used_by_run() {
    use super::fixtures::{bookmark, document, folder, write_json};
    use clap::Parser;
    use markdupe::cli::Cli;
    use markdupe::error::ExitCode;

    let dir = tempdir().unwrap();
    let out = dir.path().join("from-config");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "http://a.com")],
        )),
    );

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "paths = [{:?}]\noutput_dir = {:?}\n",
            input.to_string_lossy(),
            out.to_string_lossy()
        ),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "markdupe",
        "-q",
        "--config",
        config_path.to_str().unwrap(),
        "clean",
    ])
    .unwrap();
    assert_eq!(markdupe::run_app(cli).unwrap(), ExitCode::Success);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn test_empty_roots_in_config_still_clean_bookmark_bar() {
    use super::fixtures::{bookmark, child_ids, clean_and_backup, document, folder, read_json, write_json};
    use clap::Parser;
    use markdupe::cli::Cli;
    use markdupe::error::ExitCode;

    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let input = write_json(
        dir.path(),
        "Bookmarks",
        &document(folder(
            "1",
            "Bar",
            vec![bookmark("2", "http://a.com"), bookmark("3", "https://a.com")],
        )),
    );

    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "roots = []\n").unwrap();

    let cli = Cli::try_parse_from([
        "markdupe",
        "-q",
        "--config",
        config_path.to_str().unwrap(),
        "clean",
        input.to_str().unwrap(),
        "--output-dir",
        out.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(markdupe::run_app(cli).unwrap(), ExitCode::Success);

    let (clean, _) = clean_and_backup(&input, &out);
    let cleaned = read_json(&clean);
    assert_eq!(child_ids(&cleaned["roots"]["bookmark_bar"]), ["2"]);
    assert_eq!(child_ids(&cleaned["roots"]["other"]), ["901", "902"]);
}
