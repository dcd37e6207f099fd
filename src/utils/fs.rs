use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{RetagError, RetagResult};

/// Suffix appended to the target when a backup copy is kept
pub const BACKUP_SUFFIX: &str = ".backup";

/// Fail unless `path` is an existing regular file
pub fn ensure_file(path: &Path) -> RetagResult<()> {
    let metadata = fs::metadata(path).map_err(|e| RetagError::io_error(e, path))?;
    if !metadata.is_file() {
        return Err(RetagError::not_found(path));
    }
    Ok(())
}

/// Fail unless `path` can be opened for writing. Opens without truncating.
pub fn ensure_writable(path: &Path) -> RetagResult<()> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| RetagError::io_error(e, path))
}

/// Read a file's contents as UTF-8 text
pub fn read_text(path: &Path) -> RetagResult<String> {
    debug!("Reading file: {}", path.display());
    let bytes = fs::read(path).map_err(|e| RetagError::io_error(e, path))?;
    String::from_utf8(bytes).map_err(|_| RetagError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Overwrite `path` in place
pub fn write_text(path: &Path, content: &str) -> RetagResult<()> {
    debug!("Writing file in place: {}", path.display());
    fs::write(path, content).map_err(|e| RetagError::io_error(e, path))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Fail unless new entries can be created in `dir`.
/// Uses an unnamed temp file, so nothing is left behind.
pub fn ensure_dir_writable(dir: &Path) -> RetagResult<()> {
    tempfile::tempfile_in(dir)
        .map(|_| ())
        .map_err(|e| RetagError::io_error(e, dir))
}

/// Whether `path` can be replaced by a rename without changing what it is:
/// the directory of the resolved file must be writable, the file must have a
/// single link, and a new file there must get the same owner.
pub fn can_replace_atomically(path: &Path) -> bool {
    let real = match fs::canonicalize(path) {
        Ok(real) => real,
        Err(_) => return false,
    };
    let target_meta = match fs::metadata(&real) {
        Ok(meta) => meta,
        Err(_) => return false,
    };
    let probe_meta = match tempfile::tempfile_in(parent_dir(&real)).and_then(|f| f.metadata()) {
        Ok(meta) => meta,
        Err(_) => return false,
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if target_meta.nlink() > 1 {
            return false;
        }
        if target_meta.uid() != probe_meta.uid() || target_meta.gid() != probe_meta.gid() {
            return false;
        }
    }
    #[cfg(not(unix))]
    let _ = (target_meta, probe_meta);

    true
}

/// Write to a temp file beside the resolved `path`, then rename it over the
/// resolved file. Symlinks are followed, so the link itself survives.
/// The original stays intact if any step fails.
pub fn write_text_atomic(path: &Path, content: &str) -> RetagResult<()> {
    let real = fs::canonicalize(path).map_err(|e| RetagError::io_error(e, path))?;
    debug!("Writing file atomically: {}", real.display());
    let parent = parent_dir(&real);

    let permissions = fs::metadata(&real)
        .map_err(|e| RetagError::io_error(e, &real))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| RetagError::io_error(e, parent))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| RetagError::io_error(e, tmp.path()))?;
    fs::set_permissions(tmp.path(), permissions).map_err(|e| RetagError::io_error(e, tmp.path()))?;

    tmp.persist(&real)
        .map_err(|e| RetagError::io_error(e.error, &real))?;
    Ok(())
}

/// Path of the backup copy for `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Fail unless a backup of `path` can be created
pub fn ensure_backup_possible(path: &Path) -> RetagResult<()> {
    let backup = backup_path(path);
    ensure_dir_writable(parent_dir(&backup)).map_err(|_| RetagError::PermissionDenied { path: backup })
}

/// Copy `path` to its backup location, replacing any previous backup
pub fn backup_file(path: &Path) -> RetagResult<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|e| RetagError::io_error(e, &backup))?;
    debug!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_file_missing() {
        let dir = tempdir().unwrap();
        let err = ensure_file(&dir.path().join("missing.ts")).unwrap_err();
        assert!(matches!(err, RetagError::NotFound { .. }));
    }

    #[test]
    fn test_ensure_file_rejects_directory() {
        let dir = tempdir().unwrap();
        let err = ensure_file(dir.path()).unwrap_err();
        assert!(matches!(err, RetagError::NotFound { .. }));
    }

    #[test]
    fn test_ensure_writable_does_not_truncate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "content").unwrap();

        ensure_writable(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_read_text_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.ts");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_text(&path).unwrap_err();
        assert!(matches!(err, RetagError::Encoding { .. }));
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "old contents that are longer").unwrap();

        write_text_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_text_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "old contents").unwrap();

        write_text(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_backup_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("SolarFlare.ts");
        fs::write(&path, "original").unwrap();

        let backup = backup_file(&path).unwrap();
        assert_eq!(backup, dir.path().join("SolarFlare.ts.backup"));
        assert_eq!(fs::read_to_string(backup).unwrap(), "original");
    }

    #[test]
    fn test_plain_file_can_be_replaced_atomically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "x").unwrap();
        assert!(can_replace_atomically(&path));
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_linked_file_is_not_replaced_atomically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "x").unwrap();
        fs::hard_link(&path, dir.path().join("b.ts")).unwrap();

        assert!(!can_replace_atomically(&path));
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_follows_symlink() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("Real.ts");
        let link = dir.path().join("Link.ts");
        fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_text_atomic(&link, "new").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "new");
    }

    #[test]
    fn test_ensure_backup_possible_in_writable_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "x").unwrap();

        ensure_backup_possible(&path).unwrap();
        assert!(!backup_path(&path).exists());
    }
}
