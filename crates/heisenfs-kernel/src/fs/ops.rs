//! The request interface a filesystem bridge dispatches into.
//!
//! All operations are path-based (flat root, so a path is `/name`) with
//! explicit offsets and sizes, one call per bridge callback. A bridge holds one
//! implementation per mount and forwards results and errors unchanged.

use heisenfs_types::{DirEntry, FileAttr, FileId, Timestamps};

use super::FsResult;

/// Core filesystem operations.
pub trait FsOps: Send + Sync {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Get attributes of a file, or of the root directory for `/`.
    fn getattr(&self, path: &str) -> FsResult<FileAttr>;

    /// Read directory entries: `.`, `..`, then every file in creation order.
    fn readdir(&self, path: &str) -> FsResult<Vec<DirEntry>>;

    /// File names in creation order.
    fn list(&self) -> Vec<String>;

    /// Read up to `size` bytes starting at `offset`.
    ///
    /// Returns fewer bytes (possibly none) at end of file.
    fn read(&self, path: &str, offset: u64, size: usize) -> FsResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Create a new file owned by the current caller.
    fn create(&self, path: &str, mode: u32) -> FsResult<FileId>;

    /// Open a file. Always succeeds for an existing file.
    fn open(&self, path: &str) -> FsResult<()>;

    /// Set access and modify times together.
    fn utimens(&self, path: &str, times: Timestamps) -> FsResult<()>;

    /// Write `data` at `offset`. Returns the number of bytes written.
    fn write(&self, path: &str, offset: u64, data: &[u8]) -> FsResult<usize>;

    /// Set the logical size of a file.
    fn truncate(&self, path: &str, size: u64) -> FsResult<()>;

    /// Release an open handle.
    fn release(&self, path: &str) -> FsResult<()>;

    /// Create a directory. The namespace is flat, so this always fails.
    fn mkdir(&self, path: &str, mode: u32) -> FsResult<()>;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists. Observes the file like any stat does.
    fn exists(&self, path: &str) -> bool {
        self.getattr(path).is_ok()
    }
}
