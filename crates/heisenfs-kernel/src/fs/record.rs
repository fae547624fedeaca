//! A single file: identity, metadata, bounded contents, observation state.
//!
//! Every public mutator observes the record first (see [`super::observe`]).
//! The only exceptions are failures detected before anything changes: an
//! out-of-range write or truncate leaves the record exactly as it was,
//! observation state included.

use heisenfs_types::{FileAttr, FileId, FileKind, ObservationState, Operation, Timestamps};
use serde::Serialize;

use super::error::{FsError, FsResult};
use super::observe::{Transition, next_state};
use crate::identity::Caller;

/// One file in the table.
#[derive(Debug, Clone)]
pub struct FileRecord {
    id: FileId,
    name: String,
    mode: u32,
    uid: u32,
    gid: u32,
    times: Timestamps,
    /// Fixed-capacity buffer, zeroed at creation and never reallocated.
    data: Box<[u8]>,
    /// Logical length; `size <= data.len()`.
    size: usize,
    observation: ObservationState,
    anomalies: u32,
}

/// Non-observing view of a record, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSnapshot {
    pub id: FileId,
    pub name: String,
    pub state: ObservationState,
    pub anomalies: u32,
    pub attr: FileAttr,
}

impl FileRecord {
    /// Allocate a record and observe it with `Create`.
    pub fn create(name: impl Into<String>, mode: u32, owner: Caller, capacity: usize) -> Self {
        let mut record = Self {
            id: FileId::new(),
            name: name.into(),
            mode,
            uid: owner.uid,
            gid: owner.gid,
            times: Timestamps::now(),
            data: vec![0u8; capacity].into_boxed_slice(),
            size: 0,
            observation: ObservationState::New,
            anomalies: 0,
        };
        record.observe(Operation::Create);
        record
    }

    /// Apply one observation. Anomalies are counted and logged, never refused.
    pub(crate) fn observe(&mut self, op: Operation) -> Transition {
        let t = next_state(self.observation, op);
        if t.anomaly {
            self.anomalies = self.anomalies.saturating_add(1);
            tracing::warn!(
                name = %self.name,
                from = %t.from,
                op = %op,
                to = %t.to,
                "anomalous observation"
            );
        } else {
            tracing::debug!(name = %self.name, from = %t.from, to = %t.to, "observed");
        }
        self.observation = t.to;
        t
    }

    // ========================================================================
    // Observing operations
    // ========================================================================

    /// Observe with `StatQuery` and answer the file's attributes.
    pub fn stat(&mut self) -> FileAttr {
        self.observe(Operation::StatQuery);
        self.attr()
    }

    /// Observe with `SetTimes` and overwrite both timestamps.
    pub fn set_times(&mut self, times: Timestamps) {
        self.observe(Operation::SetTimes);
        self.times = times;
    }

    /// Observe with `Open`. There are no exclusive opens.
    pub fn open(&mut self) {
        self.observe(Operation::Open);
    }

    /// Copy `bytes` in at `offset`, extending the logical size if needed.
    ///
    /// Fails with `OutOfRange`, touching nothing, when the write would pass
    /// the buffer capacity.
    pub fn write(&mut self, offset: u64, bytes: &[u8]) -> FsResult<usize> {
        let range = self.checked_range(offset, bytes.len() as u64)?;
        self.observe(Operation::Write);
        let end = range.end;
        self.data[range].copy_from_slice(bytes);
        self.size = self.size.max(end);
        Ok(bytes.len())
    }

    /// Observe with `Read` and return up to `max_len` bytes from `offset`.
    ///
    /// Clamped to the logical size: reading at or past the end yields an
    /// empty buffer, not an error.
    pub fn read(&mut self, offset: u64, max_len: usize) -> Vec<u8> {
        self.observe(Operation::Read);
        let Ok(start) = usize::try_from(offset) else {
            return Vec::new();
        };
        if start >= self.size {
            return Vec::new();
        }
        let n = max_len.min(self.size - start);
        self.data[start..start + n].to_vec()
    }

    /// Observe with `Truncate` and set the logical size.
    ///
    /// Growing does not clear anything: bytes between the old and new size
    /// are whatever the buffer already held.
    pub fn truncate(&mut self, new_size: u64) -> FsResult<()> {
        let range = self.checked_range(0, new_size)?;
        self.observe(Operation::Truncate);
        self.size = range.end;
        Ok(())
    }

    /// Observe with `Release`. The record stays in the table.
    pub fn release(&mut self) {
        self.observe(Operation::Release);
    }

    /// Observe with `List`, as a directory listing does.
    pub fn list(&mut self) -> &str {
        self.observe(Operation::List);
        &self.name
    }

    // ========================================================================
    // Non-observing accessors
    // ========================================================================

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn observation(&self) -> ObservationState {
        self.observation
    }

    pub fn anomalies(&self) -> u32 {
        self.anomalies
    }

    /// Attributes without observing.
    pub fn attr(&self) -> FileAttr {
        FileAttr {
            kind: FileKind::File,
            mode: self.mode,
            nlink: 1,
            uid: self.uid,
            gid: self.gid,
            size: self.size as u64,
            times: self.times,
        }
    }

    pub fn snapshot(&self) -> FileSnapshot {
        FileSnapshot {
            id: self.id,
            name: self.name.clone(),
            state: self.observation,
            anomalies: self.anomalies,
            attr: self.attr(),
        }
    }

    /// `offset..offset+len` as a buffer range, if it fits the capacity.
    fn checked_range(&self, offset: u64, len: u64) -> FsResult<std::ops::Range<usize>> {
        let capacity = self.data.len();
        let out_of_range = || FsError::OutOfRange {
            offset,
            len,
            capacity,
        };
        let end = offset.checked_add(len).ok_or_else(out_of_range)?;
        if end > capacity as u64 {
            return Err(out_of_range());
        }
        // Both fit in usize since end <= capacity.
        Ok(offset as usize..end as usize)
    }
}
