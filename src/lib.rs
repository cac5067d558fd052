//! BART: a balanced, adaptive routing table.
//!
//! An in-memory longest-prefix-match structure over IPv4 and IPv6 prefixes.
//! Two fixed-width bitsets per trie node (one for the prefixes stored at
//! that stride, one for the child pointers) are popcount-compressed against
//! parallel value/child lists, trading a small constant factor in lookup
//! latency for roughly an order of magnitude less memory than a fixed-array
//! ART variant.
//!
//! The public surface is a single type, [`Table`], generic over the value
//! stored at each prefix. See [`Table::insert`], [`Table::contains`],
//! [`Table::lookup`] and [`Table::overlaps`].

pub mod af;
pub mod base_index;
pub mod bitset;
pub mod node;
pub mod table;
pub mod types;

pub use af::AddressFamily;
pub use table::Table;
pub use types::errors::InsertError;
