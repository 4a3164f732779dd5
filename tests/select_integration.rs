//! File selection against a real temporary directory tree.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use sigstamp::error::SigstampError;
use sigstamp::select::select;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"stub").unwrap();
}

fn selected_names(target: &Path, pattern: &str) -> Vec<String> {
    let mut names: Vec<String> = select(target, Some(pattern))
        .unwrap()
        .iter()
        .map(|t| t.file_name().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn recursive_alternatives_match_files_only() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "installer.exe");
    touch(tmp.path(), "readme.md");
    fs::create_dir_all(tmp.path().join("bin/plugins")).unwrap();
    touch(&tmp.path().join("bin"), "helper.Exe");
    touch(&tmp.path().join("bin/plugins"), "codec.DLL");
    // Directory entry whose name matches must never be selected
    fs::create_dir(tmp.path().join("decoy.dll")).unwrap();

    assert_eq!(
        selected_names(tmp.path(), "*.exe,*.dll"),
        vec!["codec.DLL", "helper.Exe", "installer.exe"]
    );
}

#[test]
fn question_mark_wildcard() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "app1.exe");
    touch(tmp.path(), "app2.exe");
    touch(tmp.path(), "app10.exe");

    assert_eq!(
        selected_names(tmp.path(), "app?.exe"),
        vec!["app1.exe", "app2.exe"]
    );
}

#[test]
fn single_file_mode_returns_exactly_that_file() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "standalone.exe");
    let file = tmp.path().join("standalone.exe");

    let targets = select(&file, None).unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].path, file);
    assert!(targets[0].absolute.is_absolute());
}

#[test]
fn directory_without_wildcard_pattern_is_rejected() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "app.exe");

    let err = select(tmp.path(), Some("app.exe")).unwrap_err();
    assert!(matches!(err, SigstampError::InvalidPattern(_)));

    let err = select(tmp.path(), None).unwrap_err();
    assert!(matches!(err, SigstampError::InvalidPattern(_)));
}

#[test]
fn missing_target_is_reported() {
    let err = select(Path::new("/definitely/not/here"), Some("*.exe")).unwrap_err();
    assert!(matches!(err, SigstampError::TargetNotFound(_)));
}
