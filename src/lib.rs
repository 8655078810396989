#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod entry;

pub mod fnv;

pub mod hash_table;

pub use entry::Entry;
pub use entry::EntryArena;
pub use entry::EntryId;
pub use hash_table::AddOutcome;
pub use hash_table::RobinTable;
pub use hash_table::TableConfig;
