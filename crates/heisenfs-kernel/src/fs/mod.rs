//! The observer-effect filesystem core.
//!
//! Key components, leaves first:
//!
//! - [`observe`] - Pure state machine: `(state, operation) -> transition`
//! - [`FileRecord`] - One file: metadata, bounded buffer, observation state
//! - [`FileTable`] - Fixed-capacity flat namespace owning every record
//! - [`FilesystemEngine`] - Path-based façade implementing [`FsOps`]
//!
//! ## Design Decisions
//!
//! - **Flat namespace**: the root is the only directory; a path is `/name`.
//! - **Observation never refuses**: an undocumented transition is logged and
//!   counted as an anomaly, and the file moves on regardless.
//! - **No partial failures**: a request either applies fully or fails before
//!   touching any record.

mod engine;
mod error;
pub mod observe;
mod ops;
mod record;
mod table;

pub use engine::FilesystemEngine;
pub use error::{FsError, FsResult};
pub use observe::{Edge, Transition, next_state};
pub use ops::FsOps;
pub use record::{FileRecord, FileSnapshot};
pub use table::FileTable;
