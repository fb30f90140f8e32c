use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{FsError, FsResult};

/// Replace `target` with `data` so that readers see either the old or the new
/// content, never a partial write.
///
/// The data goes to a temporary file in the target's directory (rename is
/// only atomic within one filesystem), is synced to disk, and is then renamed
/// over the target. An existing target's permissions are carried over. On
/// failure the temporary file is removed and the target is left untouched.
pub fn atomic_replace(target: &Path, data: &[u8]) -> FsResult<()> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FsError::io(dir, e))?;
    tmp.write_all(data).map_err(|e| FsError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| FsError::io(tmp.path(), e))?;

    if let Ok(meta) = fs::metadata(target) {
        fs::set_permissions(tmp.path(), meta.permissions())
            .map_err(|e| FsError::io(tmp.path(), e))?;
    }

    tmp.persist(target).map_err(|e| FsError::Io {
        path: target.to_path_buf(),
        source: e.error,
    })?;
    debug!(path = %target.display(), len = data.len(), "atomic replace");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.bin");
        atomic_replace(&path, b"fresh").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"fresh");
    }

    #[test]
    fn replaces_longer_file_completely() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        fs::write(&path, b"a much longer original content").unwrap();
        atomic_replace(&path, b"short").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        atomic_replace(&path, b"one").unwrap();
        atomic_replace(&path, b"two").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("f.txt")]);
    }

    #[test]
    fn missing_directory_fails_without_creating_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("f.txt");
        let err = atomic_replace(&path, b"x").unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        atomic_replace(&path, b"#!/bin/sh\necho hi\n").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }
}
