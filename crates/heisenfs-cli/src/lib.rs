//! Trace replay for heisenfs.
//!
//! Drives a [`heisenfs_kernel::FilesystemEngine`] with the callback sequence
//! a kernel bridge would issue, one request per trace line, so observation
//! behavior can be explored without mounting anything.

pub mod scenario;
pub mod trace;

pub use scenario::Scenario;
pub use trace::{Reply, Request, Step, apply, parse_line, parse_trace, replay};
