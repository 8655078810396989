//! The Robin Hood table: bucket array, growth policy, and the add/find
//! algorithms with chain-skip bookkeeping.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Debug;

use crate::entry::EntryArena;
use crate::entry::EntryId;

/// Maximum consecutive probe steps attempted before a growth is forced.
///
/// A fixed small constant: the table prefers doubling over long scans, which
/// keeps the worst-case cost of a lookup at eight slot inspections. Raising
/// this (e.g. `min(capacity, 20)`) would grow less often at the price of a
/// worse lookup bound.
const PROBE_LIMIT: usize = 8;

/// Bucket-count exponent at which table creation logs a warning.
const CAPACITY_LOG2_WARN: u32 = 30;

#[inline(always)]
fn size_limit_for(capacity: usize) -> usize {
    // 90% occupancy before doubling. Floored at one so a degenerate one- or
    // two-slot table still admits an entry instead of growing forever.
    (((capacity as u128 * 9) / 10) as usize).max(1)
}

/// Equality and lookup policy for a [`RobinTable`].
///
/// The default treats matching `(hash, key length)` as key identity without
/// ever reading key bytes. That is a deliberate, documented trade-off: a
/// 64-bit digest collision at equal length silently merges two keys. Enable
/// [`verify_keys`](TableConfig::verify_keys) to have [`RobinTable::add`]
/// compare key bytes before taking the update path, and pair it with
/// [`RobinTable::find_key`] on the lookup side.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableConfig {
    verify_keys: bool,
}

impl TableConfig {
    /// Creates the default configuration (hash+length equality, no byte
    /// comparison).
    #[must_use]
    pub fn new() -> Self {
        TableConfig::default()
    }

    /// Sets whether `add` byte-compares keys before updating an existing
    /// entry in place.
    #[must_use]
    pub fn verify_keys(mut self, enabled: bool) -> Self {
        self.verify_keys = enabled;
        self
    }
}

/// The result of [`RobinTable::add`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddOutcome {
    /// The entry was placed into the table and now occupies one slot.
    Inserted,
    /// An entry equal to the incoming one was already present; its count was
    /// overwritten with the incoming entry's count. The incoming entry is
    /// not retained — callers should treat their temporary entry as
    /// discarded and use the returned id instead.
    Updated(EntryId),
}

/// An open-addressing hash table using Robin Hood displacement.
///
/// `RobinTable` stores no keys and no values: buckets hold [`EntryId`]
/// handles into a caller-owned [`EntryArena`], and equality is decided by
/// the entry's 64-bit hash plus its key length (see [`TableConfig`] for the
/// optional byte check). It supports exactly two operations on its contents,
/// insert-or-update and lookup — there is no deletion.
///
/// On collision the entry farther from its ideal bucket keeps the slot and
/// the "richer" occupant is displaced forward, which bounds the variance in
/// probe lengths. Each chain head additionally records where the first live
/// member of its chain sits, so lookups and inserts skip straight into the
/// chain instead of scanning from the ideal bucket.
///
/// The table doubles its capacity when occupancy reaches the size limit
/// (90% of capacity) or when a probe sequence exceeds the
/// [`probe_limit`](RobinTable::probe_limit) budget.
/// It never shrinks below its initial capacity.
///
/// # Example
///
/// ```rust
/// use robin_hash::EntryArena;
/// use robin_hash::RobinTable;
/// use robin_hash::fnv;
///
/// let text: [&[u8]; 4] = [b"to", b"be", b"or", b"to"];
///
/// let mut arena = EntryArena::new();
/// let mut table = RobinTable::with_capacity_log2(4);
///
/// for word in text {
///     let hash = fnv::hash(word);
///     match table.find(&arena, hash, word.len()) {
///         Some(id) => arena.get_mut(id).count += 1,
///         None => {
///             let id = arena.alloc(word, hash, 1);
///             table.add(&mut arena, id);
///         }
///     }
/// }
///
/// assert_eq!(table.len(), 3);
/// let id = table.find(&arena, fnv::hash(b"to"), 2).unwrap();
/// assert_eq!(arena.get(id).count, 2);
/// assert!(table.find(&arena, fnv::hash(b"not"), 3).is_none());
/// ```
pub struct RobinTable {
    buckets: Box<[Option<EntryId>]>,
    capacity_log2: u32,
    len: usize,
    size_limit: usize,
    config: TableConfig,
}

impl RobinTable {
    /// Creates a table with `2^capacity_log2` zeroed bucket slots and the
    /// default [`TableConfig`].
    ///
    /// Logs a warning (and proceeds) if the requested exponent is at or
    /// above the sanity bound of 30. Allocation failure is fatal, as a hash
    /// table cannot function without its backing storage.
    #[must_use]
    pub fn with_capacity_log2(capacity_log2: u32) -> Self {
        Self::with_config(capacity_log2, TableConfig::default())
    }

    /// Creates a table with `2^capacity_log2` bucket slots and the given
    /// configuration.
    #[must_use]
    pub fn with_config(capacity_log2: u32, config: TableConfig) -> Self {
        assert!(
            capacity_log2 < usize::BITS,
            "bucket count 2^{capacity_log2} does not fit in usize"
        );
        if capacity_log2 >= CAPACITY_LOG2_WARN {
            log::warn!("requested 2^{capacity_log2} buckets; the table is way too big");
        }

        let capacity = 1usize << capacity_log2;
        RobinTable {
            buckets: vec![None; capacity].into_boxed_slice(),
            capacity_log2,
            len: 0,
            size_limit: size_limit_for(capacity),
            config,
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count. Always a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Base-2 logarithm of the current bucket count.
    #[inline]
    pub fn capacity_log2(&self) -> u32 {
        self.capacity_log2
    }

    /// Occupancy at which the next `add` grows the table first.
    #[inline]
    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    /// The fixed probe budget for both inserts and lookups.
    #[inline]
    pub fn probe_limit(&self) -> usize {
        PROBE_LIMIT
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Inserts the entry behind `id` or updates the entry it duplicates.
    ///
    /// The entry must be fully populated by the caller: key reference, hash,
    /// and count. If an entry with equal identity is already present, its
    /// count is overwritten with the incoming entry's count and
    /// [`AddOutcome::Updated`] names the retained entry; the incoming entry
    /// stays in the arena but is referenced by nothing. Otherwise the entry
    /// is placed into exactly one slot, displacing richer occupants forward
    /// per the Robin Hood rule, and growing the table first whenever the
    /// size limit or the probe budget is hit.
    pub fn add(&mut self, arena: &mut EntryArena<'_>, id: EntryId) -> AddOutcome {
        if self.len >= self.size_limit {
            return self.grow(arena, id);
        }

        let mask = self.mask();
        let target = (arena.get(id).hash() as usize) & mask;
        arena.get_mut(id).target_index = target;

        // Seed probing at the recorded start of this target's chain rather
        // than scanning forward from the target bucket itself.
        let mut probe = match self.buckets[target] {
            Some(head) => arena.get(head).chain_offset,
            None => 0,
        };

        let mut incoming = id;
        let mut incoming_target = target;
        let mut idx = (target + probe) & mask;
        // True while `incoming` has not passed a live member of its own
        // chain. Placement then makes it the chain's first physical member,
        // and the head slot must record its probe distance as the offset.
        let mut new_chain_head = true;

        for _ in 0..PROBE_LIMIT {
            match self.buckets[idx] {
                None => {
                    self.buckets[idx] = Some(incoming);
                    self.len += 1;
                    let entry = arena.get_mut(incoming);
                    entry.probe_distance = probe;
                    // A previously empty slot heads an empty chain.
                    entry.chain_offset = 0;
                    if new_chain_head {
                        self.set_chain_offset(arena, incoming_target, probe);
                    }
                    return AddOutcome::Inserted;
                }
                Some(occupant) => {
                    let occupant_target = arena.get(occupant).target_index;
                    if occupant_target == incoming_target {
                        new_chain_head = false;
                    }

                    if arena.get(occupant).probe_distance < probe {
                        // Robin Hood rule: the occupant sits closer to its
                        // ideal bucket, so the incoming entry takes this
                        // slot and the occupant is carried forward.
                        //
                        // Displacement always hits the first physical member
                        // of the occupant's chain, so that chain's recorded
                        // start moves one slot on. The slot's own chain
                        // metadata transfers to the new occupant.
                        let transferred = if occupant_target == idx {
                            arena.get(occupant).chain_offset + 1
                        } else {
                            self.bump_chain_offset(arena, occupant_target, idx);
                            arena.get(occupant).chain_offset
                        };

                        self.buckets[idx] = Some(incoming);
                        let entry = arena.get_mut(incoming);
                        entry.probe_distance = probe;
                        entry.chain_offset = transferred;
                        if new_chain_head {
                            self.set_chain_offset(arena, incoming_target, probe);
                        }

                        incoming = occupant;
                        incoming_target = occupant_target;
                        probe = arena.get(occupant).probe_distance;
                        new_chain_head = true;
                    } else if self.keys_equal(arena, occupant, incoming) {
                        // Already present: take the new count and discard
                        // the caller's temporary entry.
                        arena.get_mut(occupant).count = arena.get(incoming).count;
                        return AddOutcome::Updated(occupant);
                    }
                }
            }

            probe += 1;
            idx = (idx + 1) & mask;
        }

        // Probe budget exhausted: rehash into a doubled table, carrying the
        // still-unplaced entry along. If a displacement happened on the way,
        // the original entry already holds a slot and the carried one is a
        // different entry.
        let outcome = self.grow(arena, incoming);
        if incoming == id { outcome } else { AddOutcome::Inserted }
    }

    /// Looks up an entry by hash and key length.
    ///
    /// Probing starts at the chain head's recorded offset and inspects at
    /// most [`probe_limit`](RobinTable::probe_limit) slots; an empty slot or
    /// a slot belonging to a different chain proves absence. `None` is a
    /// normal outcome, never an error.
    ///
    /// This is the trusting lookup: matching hash and length are treated as
    /// key identity. Use [`find_key`](RobinTable::find_key) to byte-compare.
    pub fn find(&self, arena: &EntryArena<'_>, hash: u64, key_len: usize) -> Option<EntryId> {
        self.lookup(arena, hash, key_len, None)
    }

    /// Looks up an entry by hash and full key bytes.
    ///
    /// Identical to [`find`](RobinTable::find) except the candidate's key is
    /// additionally compared byte for byte, so a digest collision at equal
    /// length cannot alias a different key.
    pub fn find_key(&self, arena: &EntryArena<'_>, hash: u64, key: &[u8]) -> Option<EntryId> {
        self.lookup(arena, hash, key.len(), Some(key))
    }

    fn lookup(
        &self,
        arena: &EntryArena<'_>,
        hash: u64,
        key_len: usize,
        key: Option<&[u8]>,
    ) -> Option<EntryId> {
        let mask = self.mask();
        let target = (hash as usize) & mask;
        let head = self.buckets[target]?;

        // Skip straight to the chain's first physical member.
        let mut idx = (target + arena.get(head).chain_offset) & mask;

        for _ in 0..PROBE_LIMIT {
            let id = self.buckets[idx]?;
            let entry = arena.get(id);
            if entry.target_index != target {
                // Left the contiguous run for this target. Correct only
                // because Robin Hood ordering keeps a chain's members in one
                // run starting at the recorded offset.
                return None;
            }
            if entry.hash() == hash
                && entry.key_len() == key_len
                && key.is_none_or(|bytes| entry.key() == bytes)
            {
                return Some(id);
            }
            idx = (idx + 1) & mask;
        }

        None
    }

    /// Doubles the table and re-inserts everything, the pending entry last.
    ///
    /// Each re-insert recomputes its target index against the new capacity
    /// through the ordinary `add` path, so growth may cascade; it terminates
    /// because every doubling halves the effective load factor.
    fn grow(&mut self, arena: &mut EntryArena<'_>, pending: EntryId) -> AddOutcome {
        self.capacity_log2 += 1;
        log::debug!(
            "growing to 2^{} buckets at {} entries",
            self.capacity_log2,
            self.len
        );

        let capacity = 1usize << self.capacity_log2;
        let old_buckets = core::mem::replace(
            &mut self.buckets,
            vec![None; capacity].into_boxed_slice(),
        );
        self.len = 0;
        self.size_limit <<= 1;

        // Old slots hold pairwise-distinct identities, so these re-inserts
        // never land on the update path.
        for id in old_buckets.iter().copied().flatten() {
            self.add(arena, id);
        }

        // The pending entry goes in last: if it duplicates an entry the old
        // table held, it must take the update path so its count wins.
        self.add(arena, pending)
    }

    fn keys_equal(&self, arena: &EntryArena<'_>, a: EntryId, b: EntryId) -> bool {
        let ea = arena.get(a);
        let eb = arena.get(b);
        ea.hash() == eb.hash()
            && ea.key_len() == eb.key_len()
            && (!self.config.verify_keys || ea.key() == eb.key())
    }

    #[inline]
    fn set_chain_offset(&self, arena: &mut EntryArena<'_>, chain: usize, offset: usize) {
        let head = self.buckets[chain].expect("chain head slot is occupied after placement");
        arena.get_mut(head).chain_offset = offset;
    }

    #[inline]
    fn bump_chain_offset(&self, arena: &mut EntryArena<'_>, chain: usize, displaced_slot: usize) {
        let head = self.buckets[chain].expect("a displaced entry's target bucket is occupied");
        debug_assert_eq!(
            (chain + arena.get(head).chain_offset) & self.mask(),
            displaced_slot,
            "displacement must hit the chain's first physical member"
        );
        arena.get_mut(head).chain_offset += 1;
    }

    /// Iterates over the ids currently held by occupied slots, in bucket
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.buckets.iter().copied().flatten()
    }
}

impl Debug for RobinTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;
        use alloc::vec::Vec;

        let slots: Vec<String> = self
            .buckets
            .iter()
            .map(|slot| match slot {
                Some(id) => format!("{id:?}"),
                None => ".".to_string(),
            })
            .collect();

        f.debug_struct("RobinTable")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("size_limit", &self.size_limit)
            .field("buckets", &slots)
            .finish()
    }
}

/// Probe-distance histogram over the table's occupied slots.
///
/// Bucket `i` counts entries currently sitting `i` slots from their ideal
/// bucket.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct ProbeHistogram {
    counts: alloc::vec::Vec<usize>,
}

#[cfg(feature = "stats")]
impl ProbeHistogram {
    /// Occupied-slot count per probe distance, from zero upward.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// The largest probe distance of any entry, or zero for an empty table.
    pub fn max_probe_distance(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Mean probe distance over all entries.
    pub fn mean_probe_distance(&self) -> f64 {
        let total: usize = self.counts.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: usize = self
            .counts
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();
        weighted as f64 / total as f64
    }

    /// Pretty-print the histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Probe Distance Histogram ===");
        let total: usize = self.counts.iter().sum();
        for (distance, count) in self.counts.iter().enumerate() {
            println!(
                "{distance:>3}: {count:>8} ({:.2}%)",
                if total == 0 {
                    0.0
                } else {
                    *count as f64 / total as f64 * 100.0
                }
            );
        }
        println!("mean: {:.3}", self.mean_probe_distance());
    }
}

/// Point-in-time statistics for table analysis.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table.
    pub len: usize,
    /// Total number of bucket slots allocated.
    pub capacity: usize,
    /// Occupancy threshold that triggers the next growth.
    pub size_limit: usize,
    /// Load factor (`len / capacity`).
    pub load_factor: f64,
    /// Largest probe distance of any entry.
    pub max_probe_distance: usize,
    /// Mean probe distance over all entries.
    pub mean_probe_distance: f64,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Robin Hood Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor, limit {})",
            self.len,
            self.capacity,
            self.load_factor * 100.0,
            self.size_limit
        );
        println!(
            "Probe distance: max {} mean {:.3}",
            self.max_probe_distance, self.mean_probe_distance
        );
    }
}

#[cfg(feature = "stats")]
impl RobinTable {
    /// Builds a probe-distance histogram from the current layout.
    pub fn probe_histogram(&self, arena: &EntryArena<'_>) -> ProbeHistogram {
        let mut counts = alloc::vec::Vec::new();
        for id in self.iter() {
            let distance = arena.get(id).probe_distance() & self.mask();
            if counts.len() <= distance {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }
        ProbeHistogram { counts }
    }

    /// Collects point-in-time statistics about the table.
    pub fn debug_stats(&self, arena: &EntryArena<'_>) -> DebugStats {
        let histogram = self.probe_histogram(arena);
        DebugStats {
            len: self.len,
            capacity: self.capacity(),
            size_limit: self.size_limit,
            load_factor: self.len as f64 / self.capacity() as f64,
            max_probe_distance: histogram.max_probe_distance(),
            mean_probe_distance: histogram.mean_probe_distance(),
        }
    }
}
