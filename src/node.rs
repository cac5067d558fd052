//! One trie level: a popcount-compressed complete binary tree of up to 511
//! prefix slots, plus a popcount-compressed array of up to 256 child
//! pointers.
//!
//! A `Node` has no notion of where it sits in the overall trie — it doesn't
//! know its own address or depth. [`crate::table::Table`] supplies that
//! context by always calling into a `Node` with the octet relative to
//! *that* node's stride.

use log::trace;

use crate::base_index::{self, lower_upper, octet_to_base, prefix_to_base};
use crate::bitset::Bitset;

/// One level of the trie. Owns its prefix values and its child nodes
/// exclusively: there is no sharing, no reference counting, and no path
/// compression — an intermediate node materializes on insert and is never
/// collapsed back out on remove.
#[derive(Debug)]
pub struct Node<V> {
    /// Complete binary tree of up to 511 prefix slots (bit 0 is never
    /// set — baseIndex 0 is invalid).
    prefixes: Bitset,
    /// `values[rank(prefixes, i) - 1]` is the value stored for baseIndex
    /// `i`, for every `i` with `prefixes.contains(i)`.
    values: Vec<V>,
    /// Which of the 256 possible child octets have a child node.
    children_bitset: Bitset,
    /// `children[rank(children_bitset, o) - 1]` is the child node for
    /// octet `o`, for every `o` with `children_bitset.contains(o)`.
    children: Vec<Node<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Node<V> {
    pub fn new() -> Self {
        Node {
            prefixes: Bitset::with_capacity(512),
            values: Vec::new(),
            children_bitset: Bitset::with_capacity(256),
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_prefixes() && !self.has_children()
    }

    pub fn has_prefixes(&self) -> bool {
        !self.prefixes.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children_bitset.is_empty()
    }

    /// Rank-based list index of baseIndex `i`, if a prefix is stored there.
    pub(crate) fn prefix_rank(&self, i: u16) -> Option<usize> {
        self.prefixes
            .contains(i as u32)
            .then(|| self.prefixes.rank(i as u32) as usize - 1)
    }

    /// Rank-based list index of child octet `o`, if a child exists there.
    pub(crate) fn child_rank(&self, o: u8) -> Option<usize> {
        self.children_bitset
            .contains(o as u32)
            .then(|| self.children_bitset.rank(o as u32) as usize - 1)
    }

    // ------- Prefix storage -------------------------------------------

    /// Store `v` at the prefix `(octet, len)`, overwriting any value
    /// already stored there.
    pub fn insert_prefix(&mut self, octet: u8, len: u8, v: V) {
        let i = prefix_to_base(octet, len);
        if let Some(pos) = self.prefix_rank(i) {
            self.values[pos] = v;
            return;
        }
        // The inserted position is computed *after* the bit is set, so the
        // rank-list correspondence holds the moment `set` returns.
        self.prefixes.set(i as u32);
        let pos = self.prefix_rank(i).expect("just set");
        self.values.insert(pos, v);
        trace!("inserted prefix at base index {i} (octet {octet}/{len})");
    }

    /// Remove the value stored at `(octet, len)`, if any. Returns whether a
    /// value was present.
    pub fn remove_prefix(&mut self, octet: u8, len: u8) -> bool {
        let i = prefix_to_base(octet, len);
        let Some(pos) = self.prefix_rank(i) else {
            return false;
        };
        // The removed position is computed *before* the bit is cleared.
        self.values.remove(pos);
        self.prefixes.clear(i as u32);
        trace!("removed prefix at base index {i} (octet {octet}/{len})");
        true
    }

    /// Upsert pattern: `add_fn` is invoked with `(octet, len)` when no value
    /// is stored there yet, `update_fn` with `(octet, len)` and the current
    /// value otherwise. Returns a clone of the value now stored.
    pub fn add_or_update_prefix<A, U>(
        &mut self,
        octet: u8,
        len: u8,
        add_fn: A,
        update_fn: U,
    ) -> V
    where
        V: Clone,
        A: FnOnce((u8, u8)) -> V,
        U: FnOnce((u8, u8), &V) -> V,
    {
        let i = prefix_to_base(octet, len);
        if let Some(pos) = self.prefix_rank(i) {
            let new_value = update_fn((octet, len), &self.values[pos]);
            self.values[pos] = new_value.clone();
            new_value
        } else {
            let new_value = add_fn((octet, len));
            self.prefixes.set(i as u32);
            let pos = self.prefix_rank(i).expect("just set");
            self.values.insert(pos, new_value.clone());
            new_value
        }
    }

    // ------- Longest prefix match ---------------------------------------

    /// Walk the prefix CBT from `i` toward the root of this stride,
    /// returning the first (and therefore longest) stored prefix that
    /// contains it. `O(log i)` bit tests, all against the same bitset
    /// word(s).
    pub fn lpm_by_index(&self, mut i: u16) -> Option<(u16, &V)> {
        while i != 0 {
            if let Some(pos) = self.prefix_rank(i) {
                return Some((i, &self.values[pos]));
            }
            i >>= 1;
        }
        None
    }

    /// Entry point for address lookup: start from the host-route row for
    /// `octet`.
    pub fn lpm_by_octet(&self, octet: u8) -> Option<(u16, &V)> {
        self.lpm_by_index(octet_to_base(octet))
    }

    /// Entry point for prefix-vs-prefix queries.
    pub fn lpm_by_prefix(&self, octet: u8, len: u8) -> Option<(u16, &V)> {
        self.lpm_by_index(prefix_to_base(octet, len))
    }

    /// `true` iff any prefix stored in this node overlaps the query prefix
    /// `(octet, len)` — either side covering the other, or an exact match.
    pub fn overlaps_prefix(&self, octet: u8, len: u8) -> bool {
        let i = prefix_to_base(octet, len);

        // 1. Query covered by a stored prefix (includes an exact match).
        if self.lpm_by_index(i).is_some() {
            return true;
        }

        let Some((lb, ub)) = lower_upper(i) else {
            return false;
        };

        // 2. Query covers a stored prefix: scan prefix slots below `i` in
        // the CBT (i.e. more specific than the query) for one whose
        // allotment lies entirely within the query's host-route range.
        let mut route_idx = i << 1;
        while route_idx <= base_index::LAST_HOST_INDEX {
            match self.prefixes.next_set(route_idx as u32) {
                Some(found) if found <= base_index::LAST_HOST_INDEX as u32 => {
                    if let Some((flb, fub)) = lower_upper(found as u16) {
                        if flb >= lb && fub <= ub {
                            return true;
                        }
                    }
                    route_idx = found as u16 + 1;
                }
                _ => break,
            }
        }

        // 3. Query covers a child: any child octet within the query's
        // host-route range means this node descends into territory the
        // query already covers.
        let mut child_octet = octet as u32;
        while child_octet <= 255 {
            match self.children_bitset.next_set(child_octet) {
                Some(found) if found <= 255 => {
                    let child_idx = found as u16 + base_index::FIRST_HOST_INDEX;
                    if child_idx >= lb && child_idx <= ub {
                        return true;
                    }
                    child_octet = found + 1;
                }
                _ => break,
            }
        }

        false
    }

    // ------- Child storage ------------------------------------------------

    /// Insert (or replace) the child node at octet `o`.
    pub fn insert_child(&mut self, o: u8, child: Node<V>) {
        if let Some(pos) = self.child_rank(o) {
            self.children[pos] = child;
            return;
        }
        self.children_bitset.set(o as u32);
        let pos = self.child_rank(o).expect("just set");
        self.children.insert(pos, child);
    }

    /// Remove the child node at octet `o`, if any.
    pub fn remove_child(&mut self, o: u8) -> bool {
        let Some(pos) = self.child_rank(o) else {
            return false;
        };
        self.children.remove(pos);
        self.children_bitset.clear(o as u32);
        true
    }

    pub fn try_get_child(&self, o: u8) -> Option<&Node<V>> {
        self.child_rank(o).map(|pos| &self.children[pos])
    }

    pub fn try_get_child_mut(&mut self, o: u8) -> Option<&mut Node<V>> {
        let pos = self.child_rank(o)?;
        Some(&mut self.children[pos])
    }

    /// Get the child at octet `o`, creating an empty one first if absent.
    pub(crate) fn get_or_insert_child(&mut self, o: u8) -> &mut Node<V> {
        if self.child_rank(o).is_none() {
            self.insert_child(o, Node::new());
        }
        self.try_get_child_mut(o).expect("just inserted")
    }

    // ------- Node-vs-node overlap -----------------------------------------

    /// `true` iff any prefix stored anywhere under `self` overlaps any
    /// prefix stored anywhere under `other`. Three phases, each bounded by
    /// the 256-wide stride; the recursion (phase 3) is bounded by the
    /// trie's maximum depth of 16, so this always terminates.
    pub fn overlaps(&self, other: &Node<V>) -> bool {
        let mut n_allot = Bitset::with_capacity(512);
        let mut o_allot = Bitset::with_capacity(512);

        // Phase 1: route vs route, zig-zagging one step per side.
        let mut n_it = self.prefixes.iter();
        let mut o_it = other.prefixes.iter();
        let mut n_cur = n_it.next();
        let mut o_cur = o_it.next();
        while n_cur.is_some() || o_cur.is_some() {
            if let Some(idx) = n_cur {
                if mark_allotment(idx as u16, &mut n_allot, &o_allot) {
                    trace!("overlap found in phase 1 (self side) at {idx}");
                    return true;
                }
                n_cur = n_it.next();
            }
            if let Some(idx) = o_cur {
                if mark_allotment(idx as u16, &mut o_allot, &n_allot) {
                    trace!("overlap found in phase 1 (other side) at {idx}");
                    return true;
                }
                o_cur = o_it.next();
            }
        }
        for k in base_index::FIRST_HOST_INDEX..=base_index::LAST_HOST_INDEX {
            if n_allot.contains(k as u32) && o_allot.contains(k as u32) {
                return true;
            }
        }

        // Phase 2: route vs child.
        let mut n_octets = Bitset::with_capacity(256);
        let mut o_octets = Bitset::with_capacity(256);
        let mut n_cit = self.children_bitset.iter();
        let mut o_cit = other.children_bitset.iter();
        let mut n_c = n_cit.next();
        let mut o_c = o_cit.next();
        while n_c.is_some() || o_c.is_some() {
            if let Some(o) = n_c {
                if o_allot.contains(o + base_index::FIRST_HOST_INDEX as u32) {
                    return true;
                }
                n_octets.set(o);
                n_c = n_cit.next();
            }
            if let Some(o) = o_c {
                if n_allot.contains(o + base_index::FIRST_HOST_INDEX as u32) {
                    return true;
                }
                o_octets.set(o);
                o_c = o_cit.next();
            }
        }

        // Phase 3: child vs child, recursing only where both sides
        // descended into the same octet.
        for o in n_octets.iter() {
            if o_octets.contains(o) {
                let nc = self
                    .try_get_child(o as u8)
                    .expect("octet set in n_octets implies a child exists");
                let oc = other
                    .try_get_child(o as u8)
                    .expect("octet set in o_octets implies a child exists");
                if nc.overlaps(oc) {
                    return true;
                }
            }
        }

        false
    }
}

/// Shared helper for Phase 1 of [`Node::overlaps`]: marks the host-route
/// allotment of prefix `idx` into `mine`, fast-exiting if `theirs` already
/// covers any of those host routes.
fn mark_allotment(idx: u16, mine: &mut Bitset, theirs: &Bitset) -> bool {
    let Some((lb, ub)) = lower_upper(idx) else {
        return false;
    };
    for k in lb..=ub {
        if theirs.contains(k as u32) {
            return true;
        }
        mine.set(k as u32);
    }
    false
}
