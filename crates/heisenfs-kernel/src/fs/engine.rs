//! The engine a bridge talks to.
//!
//! [`FilesystemEngine`] turns path-based requests into table lookups and
//! record observations. It owns the [`FileTable`] behind one lock: every
//! observing request takes the write lock (observation mutates state), and
//! only [`FilesystemEngine::peek`]-style inspection shares the read lock.

use std::sync::Arc;
use std::time::SystemTime;

use heisenfs_types::{DirEntry, FileAttr, FileId, FileKind, Timestamps};
use parking_lot::RwLock;
use tracing::{debug, info};

use super::error::{FsError, FsResult};
use super::ops::FsOps;
use super::record::{FileRecord, FileSnapshot};
use super::table::FileTable;
use crate::config::FsConfig;
use crate::identity::{Caller, IdentitySource, ProcessIdentity};

/// Permission bits reported for the root directory.
const ROOT_MODE: u32 = 0o755;

/// In-memory observer-effect filesystem.
pub struct FilesystemEngine {
    table: RwLock<FileTable>,
    config: FsConfig,
    identity: Arc<dyn IdentitySource>,
    /// Owner of the root directory, captured at construction.
    mount_owner: Caller,
    mounted_at: SystemTime,
}

impl std::fmt::Debug for FilesystemEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesystemEngine")
            .field("config", &self.config)
            .field("mount_owner", &self.mount_owner)
            .field("table", &"<locked>")
            .finish()
    }
}

impl Default for FilesystemEngine {
    fn default() -> Self {
        Self::new(FsConfig::default(), Arc::new(ProcessIdentity))
    }
}

impl FilesystemEngine {
    /// Create an empty filesystem with the given limits and identity source.
    pub fn new(config: FsConfig, identity: Arc<dyn IdentitySource>) -> Self {
        let mount_owner = identity.caller();
        info!(
            max_files = config.max_files,
            max_file_size = config.max_file_size,
            uid = mount_owner.uid,
            gid = mount_owner.gid,
            "heisenfs engine created"
        );
        Self {
            table: RwLock::new(FileTable::new(config.max_files)),
            config,
            identity,
            mount_owner,
            mounted_at: SystemTime::now(),
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Inspect a file without observing it.
    pub fn peek(&self, path: &str) -> FsResult<FileSnapshot> {
        let name = Self::file_name(path)?;
        self.table
            .read()
            .lookup(name)
            .map(FileRecord::snapshot)
            .ok_or_else(|| FsError::not_found(path))
    }

    /// Inspect every file without observing, in creation order.
    pub fn snapshots(&self) -> Vec<FileSnapshot> {
        self.table.read().iter().map(FileRecord::snapshot).collect()
    }

    /// Total anomalies recorded across all files.
    pub fn anomaly_count(&self) -> u64 {
        self.table
            .read()
            .iter()
            .map(|r| u64::from(r.anomalies()))
            .sum()
    }

    // ========================================================================
    // Path handling
    // ========================================================================

    fn is_root(path: &str) -> bool {
        path == "/"
    }

    /// Strip the leading `/`. Anything empty or nested cannot name a file.
    fn file_name(path: &str) -> FsResult<&str> {
        let name = path.strip_prefix('/').unwrap_or(path);
        if name.is_empty() || name.contains('/') {
            return Err(FsError::not_found(path));
        }
        Ok(name)
    }

    /// Like [`Self::file_name`], for names about to be created.
    fn new_file_name<'a>(&self, path: &'a str) -> FsResult<&'a str> {
        let name = path.strip_prefix('/').unwrap_or(path);
        if name.is_empty()
            || name.contains('/')
            || name == "."
            || name == ".."
            || name.chars().count() > self.config.max_name_len
        {
            return Err(FsError::invalid_name(name));
        }
        Ok(name)
    }

    /// Run `f` on the named record under the write lock.
    fn with_record<T>(
        &self,
        path: &str,
        f: impl FnOnce(&mut FileRecord) -> FsResult<T>,
    ) -> FsResult<T> {
        let name = Self::file_name(path)?;
        let mut table = self.table.write();
        let record = table
            .lookup_mut(name)
            .ok_or_else(|| FsError::not_found(path))?;
        f(record)
    }

    fn root_attr(&self, file_count: usize) -> FileAttr {
        FileAttr {
            kind: FileKind::Directory,
            mode: ROOT_MODE,
            nlink: u32::try_from(file_count)
                .unwrap_or(u32::MAX)
                .saturating_add(2),
            uid: self.mount_owner.uid,
            gid: self.mount_owner.gid,
            size: 0,
            times: Timestamps::at(self.mounted_at),
        }
    }
}

impl FsOps for FilesystemEngine {
    fn getattr(&self, path: &str) -> FsResult<FileAttr> {
        if Self::is_root(path) {
            return Ok(self.root_attr(self.len()));
        }
        self.with_record(path, |r| Ok(r.stat()))
    }

    fn readdir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        if !Self::is_root(path) {
            return Err(FsError::not_found(path));
        }
        let mut entries = vec![DirEntry::directory("."), DirEntry::directory("..")];
        entries.extend(self.list().into_iter().map(DirEntry::file));
        Ok(entries)
    }

    fn list(&self) -> Vec<String> {
        self.table.write().list_all()
    }

    fn read(&self, path: &str, offset: u64, size: usize) -> FsResult<Vec<u8>> {
        let data = self.with_record(path, |r| Ok(r.read(offset, size)))?;
        debug!(path, offset, requested = size, returned = data.len(), "read");
        Ok(data)
    }

    fn create(&self, path: &str, mode: u32) -> FsResult<FileId> {
        let name = self.new_file_name(path)?;
        let owner = self.identity.caller();
        let mut table = self.table.write();
        // Check before allocating so a doomed create observes nothing.
        if table.is_full() {
            return Err(FsError::CapacityExceeded {
                capacity: table.capacity(),
            });
        }
        if table.contains(name) {
            return Err(FsError::duplicate_name(name));
        }
        let record = FileRecord::create(name, mode, owner, self.config.max_file_size);
        let id = table.insert(record)?;
        debug!(path, %id, mode = %format_args!("{mode:o}"), "created");
        Ok(id)
    }

    fn open(&self, path: &str) -> FsResult<()> {
        self.with_record(path, |r| {
            r.open();
            Ok(())
        })
    }

    fn utimens(&self, path: &str, times: Timestamps) -> FsResult<()> {
        self.with_record(path, |r| {
            r.set_times(times);
            Ok(())
        })
    }

    fn write(&self, path: &str, offset: u64, data: &[u8]) -> FsResult<usize> {
        // The range is checked before the file is resolved.
        let capacity = self.config.max_file_size;
        let len = data.len() as u64;
        match offset.checked_add(len) {
            Some(end) if end <= capacity as u64 => {}
            _ => {
                return Err(FsError::OutOfRange {
                    offset,
                    len,
                    capacity,
                });
            }
        }
        let written = self.with_record(path, |r| r.write(offset, data))?;
        debug!(path, offset, written, "write");
        Ok(written)
    }

    fn truncate(&self, path: &str, size: u64) -> FsResult<()> {
        self.with_record(path, |r| r.truncate(size))
    }

    fn release(&self, path: &str) -> FsResult<()> {
        self.with_record(path, |r| {
            r.release();
            Ok(())
        })
    }

    fn mkdir(&self, _path: &str, _mode: u32) -> FsResult<()> {
        Err(FsError::NotSupported("mkdir"))
    }
}
