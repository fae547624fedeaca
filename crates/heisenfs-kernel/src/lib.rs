//! # heisenfs-kernel
//!
//! Storage engine for heisenfs, a filesystem where looking at a file changes
//! it. Each file remembers which operation last observed it; listing,
//! stat-ing, opening, reading, and writing all move it to a new observation
//! state, and sequences no ordinary shell command would produce are flagged
//! as anomalies.
//!
//! Mounting is somebody else's job: a bridge (FUSE or otherwise) holds one
//! [`FilesystemEngine`] per mount and dispatches each callback through
//! [`FsOps`].
//!
//! ```
//! use std::sync::Arc;
//! use heisenfs_kernel::{FilesystemEngine, FixedIdentity, FsConfig, FsOps};
//!
//! let fs = FilesystemEngine::new(FsConfig::default(), Arc::new(FixedIdentity::new(1000, 1000)));
//! fs.create("/hello", 0o644).unwrap();
//! fs.write("/hello", 0, b"hi").unwrap();
//! assert_eq!(fs.read("/hello", 0, 16).unwrap(), b"hi");
//! ```

pub mod config;
pub mod fs;
pub mod identity;

pub use config::{ConfigError, FsConfig};
pub use fs::{
    FileRecord, FileSnapshot, FileTable, FilesystemEngine, FsError, FsOps, FsResult, Transition,
    next_state,
};
pub use identity::{Caller, FixedIdentity, IdentitySource, ProcessIdentity};
pub use heisenfs_types::{
    DirEntry, FileAttr, FileId, FileKind, ObservationState, Operation, Timestamps,
};
