//! File and directory helpers

use commonutil_core::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// Final component of `path`
///
/// Paths without one (`/`, `..`) fail with `FileNotFound`.
pub fn file_name(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::file_not_found(path))
}

/// Absolute filesystem path of a `file://` URL
pub fn absolute_path(url: &str) -> Result<PathBuf> {
    let parsed = Url::parse(url).map_err(|e| Error::invalid_url(url, e.to_string()))?;
    if parsed.scheme() != "file" {
        return Err(Error::invalid_url(
            url,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    parsed
        .to_file_path()
        .map_err(|()| Error::invalid_url(url, "URL does not name a local path"))
}

/// True when `path` names an existing regular file
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Extension of the file name in `name`, including the leading dot
///
/// ```
/// use commonutil_utils::file::file_extension;
///
/// assert_eq!(file_extension("/data/test.csv"), Some(".csv"));
/// assert_eq!(file_extension("archive.tar.gz"), Some(".gz"));
/// assert_eq!(file_extension("README"), None);
/// ```
pub fn file_extension(name: &str) -> Option<&str> {
    let file = Path::new(name).file_name().and_then(OsStr::to_str)?;
    file.rfind('.').map(|index| &file[index..])
}

/// Delete a file, or a directory and everything below it
pub fn force_delete(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::file_not_found(path)),
        Err(e) => return Err(Error::file_system(path, "inspect", e)),
    };

    if metadata.is_dir() {
        delete_directory(path)
    } else {
        remove_entry(path)
    }
}

/// Delete every child of `directory` but keep the directory itself
///
/// Every child is attempted; when several fail the last failure is returned.
pub fn clean_directory(directory: impl AsRef<Path>) -> Result<()> {
    let directory = directory.as_ref();
    if !directory.exists() {
        return Err(Error::file_not_found(directory));
    }
    if !directory.is_dir() {
        return Err(Error::not_a_directory(directory));
    }

    let entries =
        fs::read_dir(directory).map_err(|e| Error::file_system(directory, "list contents", e))?;

    let mut last_error = None;
    for entry in entries {
        let result = entry
            .map_err(|e| Error::file_system(directory, "list contents", e))
            .and_then(|entry| force_delete(entry.path()));
        if let Err(e) = result {
            warn!(directory = %directory.display(), error = %e, "failed to delete entry");
            last_error = Some(e);
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Delete `directory` recursively; a missing directory is not an error
///
/// A symlink is removed as a link and its target is left alone.
pub fn delete_directory(directory: impl AsRef<Path>) -> Result<()> {
    let directory = directory.as_ref();
    if fs::symlink_metadata(directory).is_err() {
        return Ok(());
    }

    if is_symlink(directory)? {
        return remove_entry(directory);
    }

    clean_directory(directory)?;
    fs::remove_dir(directory).map_err(|e| Error::file_system(directory, "delete directory", e))?;
    debug!(directory = %directory.display(), "deleted directory");
    Ok(())
}

/// True when `path` itself is a symbolic link, broken or not
pub fn is_symlink(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::symlink_metadata(path) {
        Ok(metadata) => Ok(metadata.file_type().is_symlink()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::file_system(path, "inspect", e)),
    }
}

fn remove_entry(path: &Path) -> Result<()> {
    // Directory symlinks on Windows need remove_dir
    fs::remove_file(path)
        .or_else(|e| fs::remove_dir(path).map_err(|_| e))
        .map_err(|e| Error::file_system(path, "delete", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populated_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("dummy.txt"), "dummy").unwrap();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("nested/a.txt"), "a").unwrap();
        fs::write(root.join("nested/deeper/b.txt"), "b").unwrap();
        temp_dir
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/data/test_data/dummy.txt").unwrap(), "dummy.txt");
        assert_eq!(file_name("relative.csv").unwrap(), "relative.csv");
        assert!(matches!(file_name("/"), Err(Error::FileNotFound { .. })));
        assert!(matches!(file_name(".."), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("/data/test.csv"), Some(".csv"));
        assert_eq!(file_extension("/data/test.xlsx"), Some(".xlsx"));
        assert_eq!(file_extension("/data.v2/README"), None);
        assert_eq!(file_extension(".hidden"), Some(".hidden"));
        assert_eq!(file_extension(""), None);
    }

    #[test]
    fn test_file_exists() {
        let temp_dir = populated_dir();
        assert!(file_exists(temp_dir.path().join("dummy.txt")));
        assert!(!file_exists(temp_dir.path().join("missing.txt")));
        assert!(!file_exists(temp_dir.path().join("nested")));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_path_from_url() {
        let temp_dir = populated_dir();
        let file = temp_dir.path().join("dummy.txt");
        let url = Url::from_file_path(&file).unwrap();

        assert_eq!(absolute_path(url.as_str()).unwrap(), file);
    }

    #[test]
    fn test_absolute_path_rejects_other_urls() {
        assert!(matches!(
            absolute_path("https://example.com/file.txt"),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(matches!(
            absolute_path("not a url"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_force_delete_file_and_directory() {
        let temp_dir = populated_dir();
        let root = temp_dir.path();

        force_delete(root.join("dummy.txt")).unwrap();
        assert!(!root.join("dummy.txt").exists());

        force_delete(root.join("nested")).unwrap();
        assert!(!root.join("nested").exists());

        assert!(matches!(
            force_delete(root.join("nested")),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_clean_directory_keeps_root() {
        let temp_dir = populated_dir();
        let root = temp_dir.path();

        clean_directory(root).unwrap();
        assert!(root.is_dir());
        assert_eq!(fs::read_dir(root).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_directory_rejects_bad_targets() {
        let temp_dir = populated_dir();
        let root = temp_dir.path();

        assert!(matches!(
            clean_directory(root.join("missing")),
            Err(Error::FileNotFound { .. })
        ));
        assert!(matches!(
            clean_directory(root.join("dummy.txt")),
            Err(Error::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_delete_missing_directory_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        delete_directory(temp_dir.path().join("never-created")).unwrap();
    }

    #[test]
    fn test_is_symlink_on_regular_file() {
        let temp_dir = populated_dir();
        assert!(!is_symlink(temp_dir.path().join("dummy.txt")).unwrap());
        assert!(!is_symlink(temp_dir.path().join("missing")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let temp_dir = populated_dir();
        let root = temp_dir.path();
        let link = root.join("link-to-nested");
        symlink(root.join("nested"), &link).unwrap();

        let broken = root.join("broken");
        symlink(root.join("does-not-exist"), &broken).unwrap();

        assert!(is_symlink(&link).unwrap());
        assert!(is_symlink(&broken).unwrap());

        delete_directory(&link).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(root.join("nested/a.txt").exists());
    }
}
