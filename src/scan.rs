//! Input enumeration.

use crate::config::OUTPUT_EXTENSION;
use crate::error::{BatchError, NoInputReason, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// List the files in `dir` (non-recursive) whose extension matches `extension`.
///
/// The match ignores ASCII case. Results are sorted by path. A missing folder,
/// a path that is not a folder, or an empty result is reported as
/// [`BatchError::NoInput`].
pub fn find_drawings(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(no_input(dir, NoInputReason::Missing));
    }
    if !dir.is_dir() {
        return Err(no_input(dir, NoInputReason::NotADirectory));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if !path.is_file() {
            continue;
        }

        if has_extension(&path, extension) {
            files.push(path);
        } else {
            debug!("Skipping {}", path.display());
        }
    }

    if files.is_empty() {
        return Err(no_input(dir, NoInputReason::Empty));
    }

    files.sort();
    Ok(files)
}

/// PDF path written next to the drawing: same folder and stem.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

fn no_input(dir: &Path, reason: NoInputReason) -> BatchError {
    BatchError::NoInput {
        dir: dir.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"AC1032").unwrap();
        path
    }

    #[test]
    fn test_finds_only_matching_files_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let b = touch(temp.path(), "b.dwg");
        let a = touch(temp.path(), "a.dwg");
        let upper = touch(temp.path(), "C.DWG");
        touch(temp.path(), "notes.txt");
        touch(temp.path(), "a.pdf");
        touch(temp.path(), "dwg");

        let files = find_drawings(temp.path(), "dwg").unwrap();

        let mut expected = vec![a, b, upper];
        expected.sort();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_is_not_recursive() {
        let temp = tempfile::tempdir().unwrap();
        let sub = temp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "nested.dwg");
        fs::create_dir(temp.path().join("folder.dwg")).unwrap();
        let top = touch(temp.path(), "top.dwg");

        let files = find_drawings(temp.path(), "dwg").unwrap();
        assert_eq!(files, vec![top]);
    }

    #[cfg(unix)]
    #[test]
    fn test_follows_symlinks_to_files_only() {
        let temp = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        let target = touch(store.path(), "shared.dwg");
        fs::create_dir(store.path().join("sheets.dwg")).unwrap();

        let linked = temp.path().join("linked.dwg");
        std::os::unix::fs::symlink(&target, &linked).unwrap();
        std::os::unix::fs::symlink(store.path().join("sheets.dwg"), temp.path().join("dir.dwg"))
            .unwrap();
        std::os::unix::fs::symlink(store.path().join("gone.dwg"), temp.path().join("dangling.dwg"))
            .unwrap();

        let files = find_drawings(temp.path(), "dwg").unwrap();
        assert_eq!(files, vec![linked]);
    }

    #[test]
    fn test_missing_folder() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope");
        let err = find_drawings(&missing, "dwg").unwrap_err();
        assert!(matches!(
            err,
            BatchError::NoInput {
                reason: NoInputReason::Missing,
                ..
            }
        ));
    }

    #[test]
    fn test_path_is_a_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = touch(temp.path(), "a.dwg");
        let err = find_drawings(&file, "dwg").unwrap_err();
        assert!(matches!(
            err,
            BatchError::NoInput {
                reason: NoInputReason::NotADirectory,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_folder() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "readme.md");
        let err = find_drawings(temp.path(), "dwg").unwrap_err();
        assert!(matches!(
            err,
            BatchError::NoInput {
                reason: NoInputReason::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_output_path_swaps_extension() {
        assert_eq!(
            output_path(Path::new("plots/Level 2.Rev-A.dwg")),
            PathBuf::from("plots/Level 2.Rev-A.pdf")
        );
        assert_eq!(
            output_path(Path::new("plots/SITE.DWG")),
            PathBuf::from("plots/SITE.pdf")
        );
    }
}
