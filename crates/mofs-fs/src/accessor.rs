use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mofs_types::{
    FileKind, FileStat, NoopObserver, Observer, OpTimer, PermissionMode, TwoTierPermissions,
};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::atomic::atomic_replace;
use crate::error::{FsError, FsResult};
use crate::range::{resolve_offset, ByteRange};

const COMPONENT: &str = "fs";

/// Reads and writes byte ranges of named files.
///
/// Every call is synchronous and runs to completion on the calling thread.
/// The accessor holds no state besides its observer.
pub struct FileAccessor {
    observer: Arc<dyn Observer>,
}

impl FileAccessor {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    /// Read `size` bytes starting at `offset`.
    ///
    /// A negative offset is resolved with [`resolve_offset`]. Without `size`
    /// the rest of the file is read. Fewer available bytes than requested is
    /// an [`FsError::IncompleteRead`].
    pub fn read(&self, path: &Path, offset: i64, size: Option<u64>) -> FsResult<Vec<u8>> {
        let timer = OpTimer::start(COMPONENT, "read", path.display().to_string());
        let result = read_range(path, offset, size);
        timer.finish(&*self.observer, &result, |d| Some(d.len() as u64));
        result
    }

    /// [`read`](Self::read) driven by a [`ByteRange`].
    pub fn read_range(&self, range: &ByteRange) -> FsResult<Vec<u8>> {
        self.read(&range.path, range.offset, range.size)
    }

    /// Write `data` at `offset`.
    ///
    /// A negative offset is resolved against the existing length (0 for a
    /// missing file). `offset == 0` with `truncate` replaces the file
    /// atomically; anything else writes in place and, with `truncate`, cuts
    /// the file right after the written bytes.
    pub fn write(&self, path: &Path, offset: i64, data: &[u8], truncate: bool) -> FsResult<()> {
        let timer = OpTimer::start(COMPONENT, "write", path.display().to_string());
        let result = existing_len(path)
            .and_then(|len| {
                resolve_offset(offset, len).ok_or_else(|| FsError::OffsetBeforeStart {
                    path: path.to_path_buf(),
                    offset,
                    len,
                })
            })
            .and_then(|resolved| {
                if resolved == 0 && truncate {
                    atomic_replace(path, data)
                } else {
                    write_in_place(path, resolved, data, truncate)
                }
            });
        timer.finish(&*self.observer, &result, |_| Some(data.len() as u64));
        result
    }

    /// Append `data` to the end of the file, creating it if missing.
    pub fn append(&self, path: &Path, data: &[u8]) -> FsResult<()> {
        let timer = OpTimer::start(COMPONENT, "append", path.display().to_string());
        let result = existing_len(path).and_then(|len| write_in_place(path, len, data, false));
        timer.finish(&*self.observer, &result, |_| Some(data.len() as u64));
        result
    }

    /// Delete a file or directory.
    ///
    /// With `recursive`, a directory's children are removed depth-first
    /// before the directory itself. A failing entry does not stop its
    /// siblings from being attempted; the call still fails afterwards.
    pub fn delete(&self, path: &Path, recursive: bool) -> FsResult<()> {
        let timer = OpTimer::start(COMPONENT, "delete", path.display().to_string());
        let result = if recursive {
            delete_tree(path)
        } else {
            delete_single(path)
        };
        timer.finish(&*self.observer, &result, |_| None);
        result
    }

    pub fn rename(&self, from: &Path, to: &Path) -> FsResult<()> {
        let timer = OpTimer::start(COMPONENT, "rename", from.display().to_string());
        let result = fs::rename(from, to).map_err(|source| FsError::RenameFailure {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        });
        timer.finish(&*self.observer, &result, |_| None);
        result
    }

    /// Create a directory and all missing parents. Existing directories are
    /// not an error.
    pub fn mkdir_all(&self, path: &Path) -> FsResult<()> {
        let timer = OpTimer::start(COMPONENT, "mkdir", path.display().to_string());
        let result = fs::create_dir_all(path).map_err(|source| FsError::MkdirFailure {
            path: path.to_path_buf(),
            source,
        });
        timer.finish(&*self.observer, &result, |_| None);
        result
    }

    /// Entry names of a directory, sorted.
    pub fn list(&self, path: &Path) -> FsResult<Vec<String>> {
        let timer = OpTimer::start(COMPONENT, "list", path.display().to_string());
        let result = list_dir(path);
        timer.finish(&*self.observer, &result, |_| None);
        result
    }

    /// Metadata of `path`, or `None` if nothing exists there.
    pub fn stat(&self, path: &Path) -> FsResult<Option<FileStat>> {
        let timer = OpTimer::start(COMPONENT, "stat", path.display().to_string());
        let result = stat_path(path);
        timer.finish(&*self.observer, &result, |_| None);
        result
    }

    /// Apply a 9-bit POSIX mode through the two-tier owner/other model.
    ///
    /// This mapping is lossy by nature: group bits fold into owner
    /// granularity (see [`PermissionMode::to_two_tier`]), so for example
    /// `0o750` lands as `0o700`. The permissions actually applied are
    /// returned.
    pub fn set_permissions(
        &self,
        path: &Path,
        mode: PermissionMode,
    ) -> FsResult<TwoTierPermissions> {
        let timer = OpTimer::start(COMPONENT, "chmod", path.display().to_string());
        let tiers = mode.to_two_tier();
        let result = apply_permissions(path, &tiers).map(|()| tiers);
        timer.finish(&*self.observer, &result, |_| None);
        result
    }
}

impl Default for FileAccessor {
    fn default() -> Self {
        Self::new(Arc::new(NoopObserver))
    }
}

impl std::fmt::Debug for FileAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAccessor").finish_non_exhaustive()
    }
}

fn existing_len(path: &Path) -> FsResult<u64> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(FsError::io(path, e)),
    }
}

fn read_range(path: &Path, offset: i64, size: Option<u64>) -> FsResult<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| FsError::io(path, e))?;
    let len = file.metadata().map_err(|e| FsError::io(path, e))?.len();
    let start = resolve_offset(offset, len).ok_or_else(|| FsError::OffsetBeforeStart {
        path: path.to_path_buf(),
        offset,
        len,
    })?;
    let requested = size.unwrap_or_else(|| len.saturating_sub(start));

    file.seek(SeekFrom::Start(start))
        .map_err(|e| FsError::io(path, e))?;
    let mut buf = Vec::with_capacity(requested.min(len) as usize);
    file.take(requested)
        .read_to_end(&mut buf)
        .map_err(|e| FsError::io(path, e))?;

    if (buf.len() as u64) < requested {
        return Err(FsError::IncompleteRead {
            path: path.to_path_buf(),
            offset: start,
            requested,
            available: buf.len() as u64,
        });
    }
    Ok(buf)
}

fn write_in_place(path: &Path, offset: u64, data: &[u8], truncate: bool) -> FsResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| FsError::io(path, e))?;
    file.seek(SeekFrom::Start(offset))
        .map_err(|e| FsError::io(path, e))?;
    file.write_all(data).map_err(|e| FsError::io(path, e))?;
    if truncate {
        file.set_len(offset + data.len() as u64)
            .map_err(|e| FsError::io(path, e))?;
    }
    debug!(path = %path.display(), offset, len = data.len(), truncate, "in-place write");
    Ok(())
}

fn remove_entry(path: &Path, is_dir: bool) -> std::io::Result<()> {
    if is_dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

fn delete_single(path: &Path) -> FsResult<()> {
    let is_dir = fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false);
    remove_entry(path, is_dir).map_err(|e| FsError::DeleteFailure {
        path: path.to_path_buf(),
        failed: 1,
        first: e.to_string(),
    })
}

fn delete_tree(path: &Path) -> FsResult<()> {
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for entry in WalkDir::new(path).contents_first(true) {
        match entry {
            Ok(entry) => {
                if let Err(e) = remove_entry(entry.path(), entry.file_type().is_dir()) {
                    failures.push((entry.path().to_path_buf(), e.to_string()));
                }
            }
            Err(e) => {
                let at = e.path().unwrap_or(path).to_path_buf();
                failures.push((at, e.to_string()));
            }
        }
    }

    match failures.first() {
        None => Ok(()),
        Some((at, reason)) => {
            warn!(path = %path.display(), failed = failures.len(), "recursive delete incomplete");
            Err(FsError::DeleteFailure {
                path: path.to_path_buf(),
                failed: failures.len(),
                first: format!("{}: {reason}", at.display()),
            })
        }
    }
}

fn list_dir(path: &Path) -> FsResult<Vec<String>> {
    let entries = fs::read_dir(path).map_err(|_| FsError::NotADirectory(path.to_path_buf()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FsError::io(path, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn stat_path(path: &Path) -> FsResult<Option<FileStat>> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(FsError::io(path, e)),
    };
    let modified = meta.modified().ok().map(DateTime::<Utc>::from);
    let stat = if meta.is_file() {
        FileStat {
            kind: FileKind::File,
            length: Some(meta.len()),
            modified,
        }
    } else if meta.is_dir() {
        FileStat {
            kind: FileKind::Directory,
            length: None,
            modified,
        }
    } else {
        return Ok(None);
    };
    Ok(Some(stat))
}

#[cfg(unix)]
fn apply_permissions(path: &Path, tiers: &TwoTierPermissions) -> FsResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let bits = tiers.to_mode().bits();
    fs::set_permissions(path, fs::Permissions::from_mode(bits)).map_err(|e| FsError::io(path, e))
}

#[cfg(not(unix))]
fn apply_permissions(path: &Path, tiers: &TwoTierPermissions) -> FsResult<()> {
    let mut perms = fs::metadata(path)
        .map_err(|e| FsError::io(path, e))?
        .permissions();
    perms.set_readonly(tiers.write == mofs_types::PermissionTier::Denied);
    fs::set_permissions(path, perms).map_err(|e| FsError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mofs_types::{Classify, ErrorKind, OpOutcome, PermissionTier, RecordingObserver};
    use proptest::prelude::*;

    fn accessor() -> FileAccessor {
        FileAccessor::default()
    }

    fn fixture(content: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    // -----------------------------------------------------------------------
    // read
    // -----------------------------------------------------------------------

    #[test]
    fn read_whole_file() {
        let (_dir, path) = fixture(b"hello world");
        assert_eq!(accessor().read(&path, 0, None).unwrap(), b"hello world");
    }

    #[test]
    fn read_range_in_middle() {
        let (_dir, path) = fixture(b"0123456789");
        assert_eq!(accessor().read(&path, 3, Some(4)).unwrap(), b"3456");
    }

    #[test]
    fn read_default_size_is_remaining_length() {
        let (_dir, path) = fixture(b"0123456789");
        assert_eq!(accessor().read(&path, 6, None).unwrap(), b"6789");
    }

    #[test]
    fn read_negative_offset_uses_plus_one_rule() {
        let (_dir, path) = fixture(b"0123456789");
        // -3 resolves to 10 - 3 + 1 = 8.
        assert_eq!(accessor().read(&path, -3, Some(2)).unwrap(), b"89");
    }

    #[test]
    fn read_minus_one_single_byte_is_incomplete() {
        let (_dir, path) = fixture(b"abc");
        let err = accessor().read(&path, -1, Some(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteRead);
        match err {
            FsError::IncompleteRead { offset, requested, available, .. } => {
                assert_eq!(offset, 3);
                assert_eq!(requested, 1);
                assert_eq!(available, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_past_end_is_incomplete() {
        let (_dir, path) = fixture(b"abc");
        let err = accessor().read(&path, 1, Some(5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteRead);
    }

    #[test]
    fn read_before_start_is_io_failure() {
        let (_dir, path) = fixture(b"abc");
        let err = accessor().read(&path, -10, Some(1)).unwrap_err();
        assert!(matches!(err, FsError::OffsetBeforeStart { .. }));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = accessor().read(&dir.path().join("nope"), 0, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn read_does_not_modify_source() {
        let (_dir, path) = fixture(b"keep me");
        accessor().read(&path, 2, Some(3)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"keep me");
    }

    // -----------------------------------------------------------------------
    // write / append
    // -----------------------------------------------------------------------

    #[test]
    fn write_truncate_at_zero_replaces_file() {
        let (_dir, path) = fixture(b"old content that is long");
        accessor().write(&path, 0, b"new", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn write_in_place_keeps_tail() {
        let (_dir, path) = fixture(b"0123456789");
        accessor().write(&path, 2, b"ab", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"01ab456789");
    }

    #[test]
    fn write_in_place_with_truncate_cuts_tail() {
        let (_dir, path) = fixture(b"0123456789");
        accessor().write(&path, 2, b"ab", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"01ab");
    }

    #[test]
    fn write_without_truncate_at_zero_overwrites_prefix() {
        let (_dir, path) = fixture(b"0123456789");
        accessor().write(&path, 0, b"xy", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"xy23456789");
    }

    #[test]
    fn write_negative_offset_against_existing_length() {
        let (_dir, path) = fixture(b"0123");
        // -1 resolves to 4: an append.
        accessor().write(&path, -1, b"45", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"012345");
    }

    #[test]
    fn write_minus_one_truncate_on_missing_file_is_atomic_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.txt");
        // Missing file has length 0, so -1 resolves to 0.
        accessor().write(&path, -1, b"made", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"made");
    }

    #[test]
    fn write_creates_missing_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.bin");
        accessor().write(&path, 3, b"z", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"\0\0\0z");
    }

    #[test]
    fn write_into_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("f.bin");
        let err = accessor().write(&path, 0, b"x", true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn append_twice_concatenates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let acc = accessor();
        acc.append(&path, b"first,").unwrap();
        acc.append(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"first,second");
    }

    // -----------------------------------------------------------------------
    // delete / rename / mkdir / list / stat
    // -----------------------------------------------------------------------

    #[test]
    fn delete_file() {
        let (_dir, path) = fixture(b"x");
        accessor().delete(&path, false).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn delete_missing_is_delete_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = accessor().delete(&dir.path().join("nope"), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeleteFailure);
    }

    #[test]
    fn delete_non_empty_dir_without_recursive_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("f"), b"x").unwrap();
        let err = accessor().delete(&sub, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeleteFailure);
        assert!(sub.join("f").exists());
    }

    #[test]
    fn delete_recursive_removes_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("top.txt"), b"1").unwrap();
        fs::write(root.join("a/mid.txt"), b"2").unwrap();
        fs::write(root.join("a/b/c/deep.txt"), b"3").unwrap();

        accessor().delete(&root, true).unwrap();
        assert!(!root.exists());
    }

    #[cfg(unix)]
    #[test]
    fn delete_recursive_continues_past_failures() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tree");
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("stuck.txt"), b"x").unwrap();
        fs::write(root.join("loose.txt"), b"y").unwrap();
        fs::create_dir(root.join("other")).unwrap();
        fs::write(root.join("other/also.txt"), b"z").unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();
        // Privileged users ignore directory permissions; nothing to observe.
        if fs::write(locked.join("probe"), b"").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
            return;
        }

        let err = accessor().delete(&root, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeleteFailure);
        // Everything removable was removed.
        assert!(!root.join("loose.txt").exists());
        assert!(!root.join("other").exists());
        assert!(locked.join("stuck.txt").exists());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
    }

    #[test]
    fn delete_recursive_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = accessor().delete(&dir.path().join("ghost"), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeleteFailure);
    }

    #[test]
    fn rename_moves_file() {
        let (dir, path) = fixture(b"move me");
        let to = dir.path().join("moved.bin");
        accessor().rename(&path, &to).unwrap();
        assert!(!path.exists());
        assert_eq!(fs::read(&to).unwrap(), b"move me");
    }

    #[test]
    fn rename_missing_is_rename_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = accessor()
            .rename(&dir.path().join("a"), &dir.path().join("b"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenameFailure);
    }

    #[test]
    fn mkdir_all_creates_parents_and_tolerates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("x/y/z");
        accessor().mkdir_all(&deep).unwrap();
        accessor().mkdir_all(&deep).unwrap();
        assert!(deep.is_dir());
    }

    #[test]
    fn mkdir_all_over_file_fails() {
        let (_dir, path) = fixture(b"x");
        let err = accessor().mkdir_all(&path.join("sub")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MkdirFailure);
    }

    #[test]
    fn list_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        assert_eq!(accessor().list(dir.path()).unwrap(), vec!["a.txt", "b.txt", "c"]);
    }

    #[test]
    fn list_of_file_is_not_a_directory() {
        let (_dir, path) = fixture(b"x");
        let err = accessor().list(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
    }

    #[test]
    fn stat_file_and_directory() {
        let (dir, path) = fixture(b"12345");
        let file = accessor().stat(&path).unwrap().unwrap();
        assert_eq!(file.kind, FileKind::File);
        assert_eq!(file.length, Some(5));
        assert!(file.modified.is_some());

        let d = accessor().stat(dir.path()).unwrap().unwrap();
        assert!(d.is_dir());
        assert_eq!(d.length, None);
    }

    #[test]
    fn stat_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(accessor().stat(&dir.path().join("nope")).unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn set_permissions_applies_two_tier_projection() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = fixture(b"x");
        let applied = accessor()
            .set_permissions(&path, PermissionMode::new(0o750).unwrap())
            .unwrap();
        assert_eq!(applied.read, PermissionTier::OwnerOnly);
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn set_permissions_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = accessor()
            .set_permissions(&dir.path().join("nope"), PermissionMode::new(0o644).unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // -----------------------------------------------------------------------
    // observer
    // -----------------------------------------------------------------------

    #[test]
    fn operations_are_reported_to_observer() {
        let obs = Arc::new(RecordingObserver::new());
        let acc = FileAccessor::new(obs.clone());
        let (_dir, path) = fixture(b"abc");

        acc.read(&path, 0, None).unwrap();
        let _ = acc.read(&path, -1, Some(1));

        let events = obs.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].op, "read");
        assert_eq!(events[0].bytes, Some(3));
        assert_eq!(events[1].outcome, OpOutcome::Failed(ErrorKind::IncompleteRead));
    }

    // -----------------------------------------------------------------------
    // properties
    // -----------------------------------------------------------------------

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn truncating_write_then_read_round_trips(
            initial in proptest::collection::vec(any::<u8>(), 0..256),
            data in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let (_dir, path) = fixture(&initial);
            let acc = accessor();
            acc.write(&path, 0, &data, true).unwrap();
            let back = acc.read(&path, 0, Some(data.len() as u64)).unwrap();
            prop_assert_eq!(back, data);
        }

        #[test]
        fn append_is_concatenation(
            a in proptest::collection::vec(any::<u8>(), 0..128),
            b in proptest::collection::vec(any::<u8>(), 0..128),
        ) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("f");
            let acc = accessor();
            acc.append(&path, &a).unwrap();
            acc.append(&path, &b).unwrap();
            let mut expected = a.clone();
            expected.extend_from_slice(&b);
            prop_assert_eq!(fs::read(&path).unwrap(), expected);
        }

        #[test]
        fn minus_one_read_of_non_empty_file_always_fails(
            content in proptest::collection::vec(any::<u8>(), 1..64),
        ) {
            let (_dir, path) = fixture(&content);
            let err = accessor().read(&path, -1, Some(1)).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::IncompleteRead);
        }
    }
}
