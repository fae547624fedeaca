//! The flat, fixed-capacity file table.
//!
//! Records live in a contiguous arena in insertion order; a name index gives
//! O(1) lookup. Nothing is ever removed or renamed, so arena positions stay
//! valid for the table's lifetime.

use std::collections::HashMap;

use heisenfs_types::FileId;

use super::error::{FsError, FsResult};
use super::record::FileRecord;
use crate::config::DEFAULT_MAX_FILES;

/// Owns every [`FileRecord`] of one mount.
#[derive(Debug)]
pub struct FileTable {
    records: Vec<FileRecord>,
    index: HashMap<String, usize>,
    capacity: usize,
}

impl FileTable {
    /// Create an empty table holding at most `capacity` files.
    ///
    /// Only up to the default limit is reserved up front; past that the arena
    /// grows on demand.
    pub fn new(capacity: usize) -> Self {
        let reserve = capacity.min(DEFAULT_MAX_FILES);
        Self {
            records: Vec::with_capacity(reserve),
            index: HashMap::with_capacity(reserve),
            capacity,
        }
    }

    /// Append a record.
    ///
    /// Fails with `CapacityExceeded` when full and `DuplicateName` when the
    /// name is taken. A failed insert leaves the table untouched.
    pub fn insert(&mut self, record: FileRecord) -> FsResult<FileId> {
        if self.records.len() >= self.capacity {
            return Err(FsError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if self.index.contains_key(record.name()) {
            return Err(FsError::duplicate_name(record.name()));
        }
        let id = record.id();
        self.index.insert(record.name().to_string(), self.records.len());
        self.records.push(record);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<&FileRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut FileRecord> {
        self.index.get(name).map(|&i| &mut self.records[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in insertion order. Listing observes every record.
    pub fn list_all(&mut self) -> Vec<String> {
        self.records
            .iter_mut()
            .map(|r| r.list().to_string())
            .collect()
    }

    /// Records in insertion order, without observing them.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Caller;
    use heisenfs_types::ObservationState;

    fn rec(name: &str) -> FileRecord {
        FileRecord::create(name, 0o644, Caller::new(0, 0), 16)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = FileTable::new(4);
        let id = table.insert(rec("a")).unwrap();
        assert_eq!(table.lookup("a").unwrap().id(), id);
        assert!(table.lookup("b").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_huge_capacity_does_not_preallocate() {
        let mut table = FileTable::new(usize::MAX);
        assert_eq!(table.capacity(), usize::MAX);
        assert!(!table.is_full());
        table.insert(rec("a")).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut table = FileTable::new(4);
        table.insert(rec("a")).unwrap();
        table.insert(rec("A")).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut table = FileTable::new(4);
        let first = table.insert(rec("a")).unwrap();
        let err = table.insert(rec("a")).unwrap_err();
        assert_eq!(err, FsError::duplicate_name("a"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("a").unwrap().id(), first);
    }

    #[test]
    fn test_capacity_enforced() {
        let mut table = FileTable::new(2);
        table.insert(rec("a")).unwrap();
        table.insert(rec("b")).unwrap();
        assert!(table.is_full());

        let err = table.insert(rec("c")).unwrap_err();
        assert_eq!(err, FsError::CapacityExceeded { capacity: 2 });
        assert_eq!(table.len(), 2);
        assert!(!table.contains("c"));
    }

    #[test]
    fn test_capacity_checked_before_duplicate() {
        let mut table = FileTable::new(1);
        table.insert(rec("a")).unwrap();
        let err = table.insert(rec("a")).unwrap_err();
        assert!(matches!(err, FsError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_list_preserves_order_and_observes() {
        let mut table = FileTable::new(8);
        for name in ["zeta", "alpha", "mid"] {
            table.insert(rec(name)).unwrap();
        }
        assert_eq!(table.list_all(), vec!["zeta", "alpha", "mid"]);
        assert!(
            table
                .iter()
                .all(|r| r.observation() == ObservationState::Listed && r.anomalies() == 0)
        );
    }

    #[test]
    fn test_lookup_mut_mutates_in_place() {
        let mut table = FileTable::new(2);
        table.insert(rec("a")).unwrap();
        table.lookup_mut("a").unwrap().write(0, b"xy").unwrap();
        assert_eq!(table.lookup("a").unwrap().size(), 2);
    }
}
