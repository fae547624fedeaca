//! Shared types for heisenfs.
//!
//! A leaf crate with no internal dependencies: file identity, the attribute
//! shapes answered to the bridge layer, and the observation vocabulary
//! (states and operations) the kernel's state machine works over.
//!
//! # Key Types
//!
//! |----------------------|----------------------------------------------|
//! | Type                 | Purpose                                      |
//! |----------------------|----------------------------------------------|
//! | [`FileId`]           | Stable identity of a created file (UUIDv7)   |
//! | [`ObservationState`] | Last operation that observed a file          |
//! | [`Operation`]        | An observing operation                       |
//! | [`FileAttr`]         | Stat answer (mode, owner, size, times)       |
//! | [`DirEntry`]         | Readdir answer                               |
//! |----------------------|----------------------------------------------|

pub mod attr;
pub mod ids;
pub mod observation;

pub use attr::{DirEntry, FileAttr, FileKind, Timestamps};
pub use ids::FileId;
pub use observation::{ObservationState, Operation};
