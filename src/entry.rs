//! Caller-owned entry records and the arena that stores them.
//!
//! The table never owns key bytes or entry storage. Callers allocate one
//! [`Entry`] per distinct key in an [`EntryArena`] and hand the table the
//! resulting [`EntryId`]; the table only reads and writes entry fields and
//! rearranges which bucket slot refers to which id. Entries outlive the
//! table, and key bytes outlive the arena (the `'k` lifetime).

use alloc::vec::Vec;

/// A stable handle to an [`Entry`] in an [`EntryArena`].
///
/// Ids are plain arena indices: the arena is append-only (the table supports
/// no deletion), so an id stays valid for the arena's whole lifetime.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EntryId(u32);

impl EntryId {
    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One distinct key's record: its identity (hash + length), its occurrence
/// count, and the table's probe bookkeeping.
///
/// The key reference is non-owning and valid only while the source buffer
/// lives; the table never copies or frees key bytes. [`Entry::count`] is the
/// only caller-mutable payload — everything else is maintained by the table.
#[derive(Debug)]
pub struct Entry<'k> {
    key: &'k [u8],
    hash: u64,

    /// Accumulated occurrence count. Callers typically preset this to their
    /// increment before [`add`](crate::RobinTable::add) and bump it in place
    /// on repeat sightings.
    pub count: u64,

    pub(crate) probe_distance: usize,
    pub(crate) target_index: usize,
    pub(crate) chain_offset: usize,
}

impl<'k> Entry<'k> {
    /// The key bytes this entry was allocated with.
    #[inline]
    pub fn key(&self) -> &'k [u8] {
        self.key
    }

    /// The key's byte length, used together with the hash for equality.
    #[inline]
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    /// The caller-computed 64-bit digest of the key.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Current displacement from the bucket this entry's hash maps to.
    ///
    /// Zero when the entry sits in its ideal bucket. Recomputed whenever the
    /// entry is (re)inserted, including across growth.
    #[inline]
    pub fn probe_distance(&self) -> usize {
        self.probe_distance
    }

    /// The entry's ideal bucket under the table's current capacity.
    #[inline]
    pub fn target_index(&self) -> usize {
        self.target_index
    }
}

/// Append-only storage for [`Entry`] records, owned by the caller.
///
/// This is the index-addressed stand-in for a caller-managed entry buffer:
/// the table's buckets store `Option<EntryId>` rather than pointers, so
/// growth is a plain reallocation of one contiguous bucket array.
///
/// # Examples
///
/// ```rust
/// use robin_hash::EntryArena;
/// use robin_hash::fnv;
///
/// let word = b"hello";
/// let mut arena = EntryArena::new();
/// let id = arena.alloc(word, fnv::hash(word), 1);
/// assert_eq!(arena.get(id).key(), b"hello");
/// assert_eq!(arena.get(id).count, 1);
/// ```
#[derive(Debug, Default)]
pub struct EntryArena<'k> {
    entries: Vec<Entry<'k>>,
}

impl<'k> EntryArena<'k> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        EntryArena {
            entries: Vec::new(),
        }
    }

    /// Creates an arena with room for `capacity` entries before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        EntryArena {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Allocates a new entry and returns its id.
    ///
    /// `hash` must be the digest of `key` under whatever hash the caller
    /// keys the table by (typically [`fnv::hash`](crate::fnv::hash));
    /// `count` is the initial occurrence count.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` entries.
    pub fn alloc(&mut self, key: &'k [u8], hash: u64, count: u64) -> EntryId {
        let index = u32::try_from(self.entries.len()).expect("entry arena overflowed u32 ids");
        self.entries.push(Entry {
            key,
            hash,
            count,
            probe_distance: 0,
            target_index: 0,
            chain_offset: 0,
        });
        EntryId(index)
    }

    /// Returns a shared reference to the entry behind `id`.
    #[inline]
    pub fn get(&self, id: EntryId) -> &Entry<'k> {
        &self.entries[id.index()]
    }

    /// Returns a mutable reference to the entry behind `id`.
    #[inline]
    pub fn get_mut(&mut self, id: EntryId) -> &mut Entry<'k> {
        &mut self.entries[id.index()]
    }

    /// Number of entries allocated so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries have been allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(id, entry)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Entry<'k>)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (EntryId(index as u32), entry))
    }
}
