//! Pure baseIndex arithmetic: the mapping between an (octet, prefix length)
//! pair within one 8-bit stride and its position in the complete binary
//! tree of 512 prefix slots a [`crate::node::Node`] embeds in its prefix
//! bitset.
//!
//! Every function here is `O(1)`; the only precomputed state is the
//! 512-entry inverse lookup table, built once at compile time.

/// Stride length in bits (`S` in the design notes).
pub const STRIDE_LEN: u8 = 8;
/// First host-route baseIndex (`H0`).
pub const FIRST_HOST_INDEX: u16 = 256;
/// Last host-route baseIndex (`H1`).
pub const LAST_HOST_INDEX: u16 = 511;

/// `hostMask(len) = 0xFF >> len`: the bits of an octet left unconstrained
/// by a prefix of length `len` within this stride.
pub const fn host_mask(len: u8) -> u8 {
    if len >= 8 {
        0
    } else {
        0xFFu8 >> len
    }
}

/// `baseIndex(o, len) = (o >> (8 - len)) + (1 << len)`.
///
/// `len` must be `0..=8`; `o` is a full octet, only its top `len` bits are
/// significant.
pub const fn prefix_to_base(octet: u8, len: u8) -> u16 {
    let shift = 8 - len;
    let top_bits = if shift >= 8 { 0 } else { (octet >> shift) as u16 };
    top_bits + (1u16 << len)
}

/// `octetToBaseIndex(o) = o + 256`, the host-route row for `o`.
pub const fn octet_to_base(octet: u8) -> u16 {
    octet as u16 + FIRST_HOST_INDEX
}

/// The `(octet, len)` pair a baseIndex was derived from — the inverse of
/// [`prefix_to_base`]. `index` 0 is invalid and returns `None`; valid
/// indices are `1..=511`.
///
/// Backed by a 512-entry table built once at compile time (the "sole
/// allowed precomputation" the spec calls for).
pub const fn base_to_prefix(index: u16) -> Option<(u8, u8)> {
    if index == 0 || index > LAST_HOST_INDEX {
        return None;
    }
    Some(BASE_TO_PREFIX[index as usize])
}

/// The range of host-route baseIndexes (`256..=511`) covered by the prefix
/// identified by baseIndex `index`: `[octet_to_base(o), octet_to_base(o |
/// host_mask(len))]` where `(o, len) = base_to_prefix(index)`.
pub const fn lower_upper(index: u16) -> Option<(u16, u16)> {
    let Some((octet, len)) = base_to_prefix(index) else {
        return None;
    };
    let lower = octet_to_base(octet);
    let upper = octet_to_base(octet | host_mask(len));
    Some((lower, upper))
}

/// `o & ~hostMask(min(bits, 8))`: the octet with everything but its first
/// `bits` bits (capped at a full stride) zeroed out.
pub const fn first_octet_of_prefix(octet: u8, bits: u8) -> u8 {
    let len = if bits > 8 { 8 } else { bits };
    octet & !host_mask(len)
}

const TABLE_LEN: usize = LAST_HOST_INDEX as usize + 1;

const BASE_TO_PREFIX: [(u8, u8); TABLE_LEN] = build_table();

const fn build_table() -> [(u8, u8); TABLE_LEN] {
    let mut table = [(0u8, 0u8); TABLE_LEN];
    let mut len: u8 = 0;
    while len <= STRIDE_LEN {
        let count: u16 = 1 << len;
        let mut frac: u16 = 0;
        while frac < count {
            let idx = (frac + count) as usize;
            let shift = STRIDE_LEN - len;
            let octet = if shift >= 8 {
                0u8
            } else {
                (frac as u8) << shift
            };
            table[idx] = (octet, len);
            frac += 1;
        }
        len += 1;
    }
    table
}
