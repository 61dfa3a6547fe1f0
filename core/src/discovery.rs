use crate::observer::{RunEvent, RunObserver};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of DICOM files, compared case-insensitively
pub const DICOM_EXTENSION: &str = ".dcm";

/// Recursively collects every DICOM file below `root`
///
/// A file matches when its name ends with `.dcm`, ignoring case. Symlinks
/// to files are included under their link path; symlinked directories are
/// not descended into. Entries that cannot be read are reported to the
/// observer and skipped. The result is sorted so repeated runs over the
/// same tree visit files in the same order.
///
/// A missing root yields an empty list; the caller decides what that means.
pub fn discover_dicom_files(root: &Path, observer: &mut dyn RunObserver) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                observer.on_event(RunEvent::WalkError {
                    message: format!("Scan error: {}", err),
                });
                continue;
            }
        };

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && is_dicom_name(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files
}

/// Checks whether a path's file name ends with the DICOM extension
fn is_dicom_name(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_lowercase()
                .ends_with(DICOM_EXTENSION)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::RecordingObserver;
    use crate::observer::NullObserver;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn test_recursive_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("patient1").join("study1");
        fs::create_dir_all(&nested).unwrap();

        File::create(temp_dir.path().join("top.dcm")).unwrap();
        File::create(nested.join("IMG0001.DCM")).unwrap();
        File::create(nested.join("img0002.Dcm")).unwrap();
        File::create(nested.join("notes.txt")).unwrap();
        File::create(nested.join("dcm")).unwrap();
        fs::create_dir(temp_dir.path().join("folder.dcm")).unwrap();

        let files = discover_dicom_files(temp_dir.path(), &mut NullObserver);

        assert_eq!(files.len(), 3);
        assert!(files.contains(&temp_dir.path().join("top.dcm")));
        assert!(files.contains(&nested.join("IMG0001.DCM")));
        assert!(files.contains(&nested.join("img0002.Dcm")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_included() {
        let temp_dir = TempDir::new().unwrap();
        let outside = temp_dir.path().join("outside");
        let root = temp_dir.path().join("root");
        fs::create_dir_all(outside.join("series")).unwrap();
        fs::create_dir(&root).unwrap();

        File::create(outside.join("real.dcm")).unwrap();
        File::create(outside.join("series").join("nested.dcm")).unwrap();
        std::os::unix::fs::symlink(outside.join("real.dcm"), root.join("link.dcm")).unwrap();
        std::os::unix::fs::symlink(outside.join("series"), root.join("series")).unwrap();
        std::os::unix::fs::symlink(outside.join("gone.dcm"), root.join("dangling.dcm")).unwrap();

        let files = discover_dicom_files(&root, &mut NullObserver);

        assert_eq!(files, vec![root.join("link.dcm")]);
    }

    #[test]
    fn test_stable_order() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["c.dcm", "a.dcm", "b.dcm"] {
            File::create(temp_dir.path().join(name)).unwrap();
        }

        let first = discover_dicom_files(temp_dir.path(), &mut NullObserver);
        let second = discover_dicom_files(temp_dir.path(), &mut NullObserver);

        assert_eq!(first, second);
        assert_eq!(first[0], temp_dir.path().join("a.dcm"));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("readme.md")).unwrap();

        assert!(discover_dicom_files(temp_dir.path(), &mut NullObserver).is_empty());
    }

    #[test]
    fn test_missing_root_reports_walk_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut observer = RecordingObserver::default();

        let files = discover_dicom_files(&temp_dir.path().join("absent"), &mut observer);

        assert!(files.is_empty());
        assert_eq!(observer.count("walk-error"), 1);
    }
}
