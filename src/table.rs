//! The outer driver: two root [`Node`]s (one per address family), address
//! octet-decomposition, and depth-backtracking longest-prefix-match across
//! nodes.

use std::net::IpAddr;

use log::trace;

use crate::af::AddressFamily;
use crate::node::Node;
use crate::types::errors::InsertError;

/// A balanced, adaptive routing table: an in-memory longest-prefix-match
/// structure over IPv4 and IPv6 prefixes, each associated with a value of
/// type `V`.
///
/// `Table` is a thin driver over two [`Node`] tries (one per family) — all
/// of the popcount-compression and LPM machinery lives in `Node`; this type
/// only decomposes addresses into 8-bit strides and walks the resulting
/// path.
#[derive(Debug)]
pub struct Table<V> {
    root_v4: Node<V>,
    root_v6: Node<V>,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Table {
            root_v4: Node::new(),
            root_v6: Node::new(),
        }
    }

    /// Store `value` at `prefix`, overwriting whatever was stored there
    /// before. The last insert of a given prefix wins, regardless of
    /// insertion order relative to other prefixes (I2, I3, I4).
    pub fn insert(
        &mut self,
        prefix: &inetnum::addr::Prefix,
        value: V,
    ) -> Result<(), InsertError> {
        let addr = prefix.addr();
        let len = prefix.len();

        if addr.is_v4_mapped() {
            return Err(InsertError::MappedAddressOnInsert);
        }
        if len > addr.bits() {
            return Err(InsertError::PrefixLengthOutOfRange);
        }

        let root = self.root_for_mut(&addr);

        if len == 0 {
            // The CBT "default route": baseIndex 1 in the root.
            root.insert_prefix(0, 0, value);
            trace!("inserted default route for {addr:?}");
            return Ok(());
        }

        let octets = addr.octets();
        let mut node = root;
        let mut remaining = len;
        for &octet in &octets {
            if remaining <= 8 {
                node.insert_prefix(octet, remaining, value);
                trace!("inserted {addr:?}/{len}");
                return Ok(());
            }
            node = node.get_or_insert_child(octet);
            remaining -= 8;
        }
        unreachable!(
            "prefix length {len} exceeds the address's own octet count"
        );
    }

    /// `true` iff some stored prefix covers `addr`.
    pub fn contains(&self, addr: IpAddr) -> bool {
        self.lookup(addr).is_some()
    }

    /// The value of the longest stored prefix covering `addr`, or `None`.
    ///
    /// IPv4-mapped IPv6 addresses are demapped to plain IPv4 before the
    /// lookup; see [`InsertError::MappedAddressOnInsert`] for why the
    /// corresponding insert does not do the same.
    pub fn lookup(&self, addr: IpAddr) -> Option<&V> {
        let addr = addr.demapped();
        let root = self.root_for(&addr);
        let octets = addr.octets();

        let mut stack: Vec<&Node<V>> = Vec::with_capacity(octets.len());
        let mut node = root;
        let mut depth = 0usize;

        // Descent phase: follow children for as long as they exist.
        while depth + 1 < octets.len() {
            match node.try_get_child(octets[depth]) {
                Some(child) => {
                    stack.push(node);
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }

        // Backtrack phase: LPM at each level from the deepest node reached
        // back up to the root, stopping at the first match.
        loop {
            let octet = octets[depth];
            if node.has_prefixes() {
                if let Some((_, v)) = node.lpm_by_octet(octet) {
                    return Some(v);
                }
            }
            if depth == 0 {
                break;
            }
            depth -= 1;
            node = stack.pop().expect("one stack entry per depth descended");
        }

        None
    }

    /// `true` iff some prefix in `self` overlaps some prefix in `other`.
    /// Symmetric (I9): checked independently per family, since a v4 prefix
    /// can never overlap a v6 one.
    pub fn overlaps(&self, other: &Table<V>) -> bool {
        self.root_v4.overlaps(&other.root_v4)
            || self.root_v6.overlaps(&other.root_v6)
    }

    fn root_for(&self, addr: &IpAddr) -> &Node<V> {
        match addr {
            IpAddr::V4(_) => &self.root_v4,
            IpAddr::V6(_) => &self.root_v6,
        }
    }

    fn root_for_mut(&mut self, addr: &IpAddr) -> &mut Node<V> {
        match addr {
            IpAddr::V4(_) => &mut self.root_v4,
            IpAddr::V6(_) => &mut self.root_v6,
        }
    }
}
