//! Transposition table keyed by position fingerprint.
//!
//! Slots are `2^bits` bucket heads; each bucket is a singly linked chain of
//! records living in one arena. Removed records go to a free list and are
//! reused before the arena grows.

use tracing::{debug, warn};

use crate::record::{Record, RecordId};

/// Chains longer than this are reported once per new maximum.
const LONG_CHAIN: usize = 16;

/// Counters kept by the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Live records.
    pub positions: usize,
    /// Inserts that landed in an occupied slot since the last pack.
    pub collisions: u64,
    /// Lookups that found an existing record since the last pack.
    pub recoveries: u64,
    /// Longest chain seen.
    pub max_chain: usize,
}

#[derive(Debug)]
pub struct TranspositionTable {
    buckets: Vec<RecordId>,
    records: Vec<Record>,
    free: Vec<RecordId>,
    mask: u64,
    epoch: u32,
    stats: TableStats,
}

impl TranspositionTable {
    /// Table with `2^bits` slots.
    pub fn new(bits: u32) -> Self {
        let slots = 1usize << bits;
        Self {
            buckets: vec![RecordId::NONE; slots],
            records: Vec::new(),
            free: Vec::new(),
            mask: slots as u64 - 1,
            epoch: 0,
            stats: TableStats::default(),
        }
    }

    #[inline]
    pub fn slots(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Number of live records.
    #[inline]
    pub fn len(&self) -> usize {
        self.stats.positions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stats.positions == 0
    }

    #[inline]
    pub fn stats(&self) -> &TableStats {
        &self.stats
    }

    #[inline]
    fn slot(&self, fingerprint: u64) -> usize {
        (fingerprint & self.mask) as usize
    }

    /// Find the record for `fingerprint`, creating it when `create` is set.
    ///
    /// A found or created record is marked as touched for the current epoch.
    pub fn get(&mut self, fingerprint: u64, create: bool) -> Option<RecordId> {
        if create {
            Some(self.ensure(fingerprint))
        } else {
            self.lookup(fingerprint)
        }
    }

    /// Record for `fingerprint` if present.
    pub fn lookup(&mut self, fingerprint: u64) -> Option<RecordId> {
        let mut cur = self.buckets[self.slot(fingerprint)];
        while cur.is_some() {
            let record = &mut self.records[cur.0 as usize];
            if record.fingerprint() == fingerprint {
                record.touched = true;
                self.stats.recoveries += 1;
                return Some(cur);
            }
            cur = record.next;
        }
        None
    }

    /// Record for `fingerprint` without marking it or counting a recovery.
    pub fn probe(&self, fingerprint: u64) -> Option<&Record> {
        let mut cur = self.buckets[self.slot(fingerprint)];
        while cur.is_some() {
            let record = &self.records[cur.0 as usize];
            if record.fingerprint() == fingerprint {
                return Some(record);
            }
            cur = record.next;
        }
        None
    }

    /// Record for `fingerprint`, created at the tail of its chain if absent.
    pub fn ensure(&mut self, fingerprint: u64) -> RecordId {
        let slot = self.slot(fingerprint);
        let mut cur = self.buckets[slot];
        let mut last = RecordId::NONE;
        let mut chain = 1;

        while cur.is_some() {
            let record = &mut self.records[cur.0 as usize];
            if record.fingerprint() == fingerprint {
                record.touched = true;
                self.stats.recoveries += 1;
                return cur;
            }
            chain += 1;
            last = cur;
            cur = record.next;
        }

        let id = self.allocate(fingerprint);
        if last.is_none() {
            self.buckets[slot] = id;
        } else {
            self.records[last.0 as usize].next = id;
            self.stats.collisions += 1;
        }
        self.stats.positions += 1;

        if chain > self.stats.max_chain {
            self.stats.max_chain = chain;
            if chain > LONG_CHAIN {
                warn!(slot, chain, "long transposition chain");
            }
        }
        id
    }

    #[inline]
    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id.0 as usize]
    }

    /// Mutable access; marks the record as touched.
    #[inline]
    pub fn record_mut(&mut self, id: RecordId) -> &mut Record {
        let record = &mut self.records[id.0 as usize];
        record.touched = true;
        record
    }

    fn allocate(&mut self, fingerprint: u64) -> RecordId {
        let record = Record::new(fingerprint, self.epoch);
        match self.free.pop() {
            Some(id) => {
                self.records[id.0 as usize] = record;
                id
            }
            None => {
                let id = RecordId(self.records.len() as u32);
                self.records.push(record);
                id
            }
        }
    }

    /// Remove records untouched for at least `offset` epochs, then advance
    /// the epoch. Returns the number of removed records.
    ///
    /// Touched records get their epoch refreshed and the touched flag
    /// cleared. `offset == 0` empties the table.
    pub fn pack(&mut self, offset: u32) -> usize {
        let mut removed = 0;

        for slot in 0..self.buckets.len() {
            let mut prev = RecordId::NONE;
            let mut cur = self.buckets[slot];

            while cur.is_some() {
                let record = &mut self.records[cur.0 as usize];
                let next = record.next;

                let keep = if record.touched && offset > 0 {
                    record.touched = false;
                    record.last_touched_epoch = self.epoch;
                    true
                } else {
                    self.epoch.saturating_sub(record.last_touched_epoch) < offset
                };

                if keep {
                    prev = cur;
                } else {
                    if prev.is_none() {
                        self.buckets[slot] = next;
                    } else {
                        self.records[prev.0 as usize].next = next;
                    }
                    self.records[cur.0 as usize].next = RecordId::NONE;
                    self.free.push(cur);
                    removed += 1;
                }
                cur = next;
            }
        }

        debug!(
            epoch = self.epoch,
            removed,
            positions = self.stats.positions - removed,
            collisions = self.stats.collisions,
            recoveries = self.stats.recoveries,
            "packed transposition table"
        );

        self.stats.positions -= removed;
        self.stats.collisions = 0;
        self.stats.recoveries = 0;
        self.epoch += 1;
        removed
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(22)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Player;

    #[test]
    fn test_lookup_identity() {
        let mut table = TranspositionTable::new(4);
        let a = table.ensure(0xABCD);
        let b = table.ensure(0xABCD);
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
        assert_eq!(table.record(a).fingerprint(), 0xABCD);
    }

    #[test]
    fn test_get_with_and_without_create() {
        let mut table = TranspositionTable::new(4);
        assert_eq!(table.slots(), 16);
        assert_eq!(table.get(77, false), None);
        let id = table.get(77, true).unwrap();
        assert_eq!(table.get(77, false), Some(id));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_lookup_without_create() {
        let mut table = TranspositionTable::new(4);
        assert_eq!(table.lookup(42), None);
        assert!(table.is_empty());
        let id = table.ensure(42);
        assert_eq!(table.lookup(42), Some(id));
    }

    #[test]
    fn test_colliding_fingerprints_chain() {
        // 4 slots: 1, 5 and 9 share slot 1
        let mut table = TranspositionTable::new(2);
        let a = table.ensure(1);
        let b = table.ensure(5);
        let c = table.ensure(9);

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(table.lookup(5), Some(b));
        assert_eq!(table.lookup(9), Some(c));
        assert_eq!(table.stats().collisions, 2);
        assert_eq!(table.stats().max_chain, 3);
    }

    #[test]
    fn test_pack_removes_stale_records() {
        let mut table = TranspositionTable::new(3);
        let a = table.ensure(10);
        table.ensure(20);
        table.record_mut(a).update_stats(1.0, [1.0, 0.0]).unwrap();

        // both touched in epoch 0: kept
        assert_eq!(table.pack(2), 0);

        // epoch 1: only `a` is touched
        table.lookup(10);
        assert_eq!(table.pack(2), 0);

        // epoch 2: `b` last touched in epoch 0
        assert_eq!(table.pack(2), 1);
        assert_eq!(table.len(), 1);
        assert!(table.lookup(20).is_none());

        // `a` keeps its statistics
        let a = table.lookup(10).unwrap();
        assert_eq!(table.record(a).visits(), 1.0);
        assert!((table.record(a).mean(Player::One) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pack_keeps_chain_links() {
        let mut table = TranspositionTable::new(1);
        for fp in [2u64, 4, 6, 8] {
            table.ensure(fp);
        }
        table.pack(1);

        // touch only the head and the tail of the chain
        table.lookup(2);
        table.lookup(8);
        assert_eq!(table.pack(1), 2);

        assert!(table.lookup(2).is_some());
        assert!(table.lookup(8).is_some());
        assert!(table.lookup(4).is_none());
        assert!(table.lookup(6).is_none());
    }

    #[test]
    fn test_pack_zero_clears_table() {
        let mut table = TranspositionTable::new(3);
        for fp in 0..5u64 {
            table.ensure(fp);
        }
        assert_eq!(table.pack(0), 5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_freed_records_are_reused() {
        let mut table = TranspositionTable::new(3);
        let old = table.ensure(11);
        table.record_mut(old).set_solved(Player::One).unwrap();
        table.pack(0);

        let fresh = table.ensure(12);
        assert_eq!(fresh, old);
        assert!(!table.record(fresh).is_solved());
        assert_eq!(table.record(fresh).fingerprint(), 12);
    }

    #[test]
    fn test_epoch_advances() {
        let mut table = TranspositionTable::new(2);
        assert_eq!(table.epoch(), 0);
        table.pack(1);
        table.pack(1);
        assert_eq!(table.epoch(), 2);
    }
}
