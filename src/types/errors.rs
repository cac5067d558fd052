use std::fmt;

/// Possible errors returned by [`crate::table::Table::insert`].
///
/// `lookup`/`contains`/`overlaps` never error: "not found" is an absent
/// value, not a `Result`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The caller passed no address.
    ///
    /// Unreachable through the safe `Table` API: `insert` takes
    /// `&inetnum::addr::Prefix`, which cannot be null. Kept for parity with
    /// the source taxonomy and for a future raw-bytes constructor.
    NullAddress,
    /// The address family is neither v4 nor v6.
    ///
    /// Unreachable through the safe `Table` API: `std::net::IpAddr` is
    /// always one or the other. Kept for the same reason as `NullAddress`.
    UnsupportedFamily,
    /// The prefix length is negative or exceeds the family's maximum (32
    /// for v4, 128 for v6).
    PrefixLengthOutOfRange,
    /// The caller tried to insert an IPv4-mapped IPv6 prefix. `lookup`
    /// silently demaps such addresses; `insert` rejects them so the same
    /// logical prefix can never be stored under both roots.
    MappedAddressOnInsert,
}

impl std::error::Error for InsertError {}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InsertError::NullAddress => {
                write!(f, "Error: no address was given.")
            }
            InsertError::UnsupportedFamily => {
                write!(f, "Error: address family is neither IPv4 nor IPv6.")
            }
            InsertError::PrefixLengthOutOfRange => {
                write!(
                    f,
                    "Error: prefix length is out of range for this \
                     address family."
                )
            }
            InsertError::MappedAddressOnInsert => {
                write!(
                    f,
                    "Error: cannot insert an IPv4-mapped IPv6 prefix; \
                     convert it to IPv4 first."
                )
            }
        }
    }
}
