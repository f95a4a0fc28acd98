use std::fs;
use std::path::Path;

use stencil::error::Error;
use stencil::fileset::FileSet;
use stencil::mapper::PathMapper;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, relative).unwrap();
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for file in [
        "index.md",
        "guide/intro.md",
        "guide/advanced/tuning.md",
        "guide/notes.txt",
        "drafts/wip.md",
        ".git/config",
        "guide/.DS_Store",
        "backup.md~",
    ] {
        touch(temp_dir.path(), file);
    }
    temp_dir
}

#[test]
fn test_empty_includes_select_everything_but_default_excludes() {
    let temp_dir = fixture();
    let files = FileSet::new(temp_dir.path()).included_files().unwrap();

    assert_eq!(
        files,
        vec![
            "drafts/wip.md",
            "guide/advanced/tuning.md",
            "guide/intro.md",
            "guide/notes.txt",
            "index.md",
        ]
    );
}

#[test]
fn test_default_excludes_can_be_disabled() {
    let temp_dir = fixture();
    let mut file_set = FileSet::new(temp_dir.path());
    file_set.use_default_excludes = false;

    let files = file_set.included_files().unwrap();
    assert!(files.contains(&".git/config".to_string()));
    assert!(files.contains(&"guide/.DS_Store".to_string()));
    assert!(files.contains(&"backup.md~".to_string()));
}

#[test]
fn test_single_star_stays_in_one_directory() {
    let temp_dir = fixture();
    let files = FileSet::new(temp_dir.path()).include("*.md").included_files().unwrap();
    assert_eq!(files, vec!["index.md"]);

    let files = FileSet::new(temp_dir.path()).include("**/*.md").included_files().unwrap();
    assert_eq!(
        files,
        vec!["drafts/wip.md", "guide/advanced/tuning.md", "guide/intro.md", "index.md"]
    );
}

#[test]
fn test_trailing_slash_excludes_directory() {
    let temp_dir = fixture();
    let files = FileSet::new(temp_dir.path())
        .include("**/*.md")
        .exclude("drafts/")
        .exclude("guide/advanced/")
        .included_files()
        .unwrap();
    assert_eq!(files, vec!["guide/intro.md", "index.md"]);
}

#[test]
fn test_glob_mapper_renames_outputs() {
    let temp_dir = fixture();
    let mapping = FileSet::new(temp_dir.path())
        .include("guide/**")
        .with_mapper(PathMapper::Glob { from: "*.md".to_string(), to: "*.html".to_string() })
        .map_included_files()
        .unwrap();

    let pairs: Vec<(&str, &str)> =
        mapping.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            ("guide/advanced/tuning.md", "guide/advanced/tuning.html"),
            ("guide/intro.md", "guide/intro.html"),
        ]
    );
}

#[test]
fn test_identity_mapping_by_default() {
    let temp_dir = fixture();
    let mapping = FileSet::new(temp_dir.path()).include("*.md").map_included_files().unwrap();
    assert_eq!(mapping.get("index.md").map(String::as_str), Some("index.md"));
    assert_eq!(mapping.len(), 1);
}

#[test]
fn test_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let result = FileSet::new(temp_dir.path().join("missing")).included_files();
    assert!(matches!(result, Err(Error::FileSetMatchingError { .. })));
}

#[test]
fn test_invalid_pattern() {
    let temp_dir = fixture();
    let result = FileSet::new(temp_dir.path()).include("[unclosed").included_files();
    assert!(matches!(result, Err(Error::FileSetMatchingError { .. })));
}

#[test]
fn test_invalid_mapper() {
    let temp_dir = fixture();
    let result = FileSet::new(temp_dir.path())
        .with_mapper(PathMapper::Regexp { from: "(".to_string(), to: "x".to_string() })
        .map_included_files();
    assert!(matches!(result, Err(Error::FileSetMatchingError { .. })));
}

#[cfg(unix)]
#[test]
fn test_symlinked_files_need_follow_symlinks() {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "real.txt");
    touch(temp_dir.path(), "in/plain.txt");
    symlink(temp_dir.path().join("real.txt"), temp_dir.path().join("in/link.txt")).unwrap();

    let mut file_set = FileSet::new(temp_dir.path().join("in"));
    assert_eq!(file_set.included_files().unwrap(), vec!["plain.txt"]);

    file_set.follow_symlinks = true;
    assert_eq!(file_set.included_files().unwrap(), vec!["link.txt", "plain.txt"]);
}
