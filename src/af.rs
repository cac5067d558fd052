use std::net::IpAddr;

//------------ AddressFamily (trait) ----------------------------------------
/// The address family of an IP address as a trait.
///
/// BART always decomposes an address into 8-bit strides, so unlike the
/// teacher crate this no longer needs nibble-granularity bit arithmetic over
/// a generic integer type: the only things that differ between IPv4 and
/// IPv6 are the bit width and the big-endian octet sequence. We implement
/// the trait directly on [`std::net::IpAddr`] rather than splitting it into
/// per-family marker types, since [`crate::table::Table`] holds one root per
/// family rather than being generic over family.
pub trait AddressFamily {
    /// Number of bits in the full address (32 for v4, 128 for v6).
    fn bits(&self) -> u8;

    /// Big-endian octets of this address, most significant stride first.
    fn octets(&self) -> Vec<u8>;

    /// `true` iff this is an IPv4-mapped IPv6 address (`::ffff:a.b.c.d`).
    fn is_v4_mapped(&self) -> bool;

    /// Demap an IPv4-mapped IPv6 address to plain IPv4; otherwise return
    /// `self` unchanged.
    fn demapped(&self) -> IpAddr;
}

impl AddressFamily for IpAddr {
    fn bits(&self) -> u8 {
        match self {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }

    fn octets(&self) -> Vec<u8> {
        match self {
            IpAddr::V4(a) => a.octets().to_vec(),
            IpAddr::V6(a) => a.octets().to_vec(),
        }
    }

    fn is_v4_mapped(&self) -> bool {
        match self {
            IpAddr::V4(_) => false,
            IpAddr::V6(a) => a.to_ipv4_mapped().is_some(),
        }
    }

    fn demapped(&self) -> IpAddr {
        match self {
            IpAddr::V4(_) => *self,
            IpAddr::V6(a) => match a.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => *self,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn v4_octets() {
        let a: IpAddr = Ipv4Addr::new(192, 168, 1, 2).into();
        assert_eq!(a.octets(), vec![192, 168, 1, 2]);
        assert_eq!(a.bits(), 32);
        assert!(!a.is_v4_mapped());
    }

    #[test]
    fn v6_octets() {
        let a: IpAddr = Ipv6Addr::new(0xff, 0xaaaa, 0, 0, 0, 0, 0, 1).into();
        assert_eq!(a.octets().len(), 16);
        assert_eq!(a.bits(), 128);
    }

    #[test]
    fn v4_mapped_is_detected_and_demapped() {
        let mapped: IpAddr = Ipv4Addr::new(10, 0, 0, 1).to_ipv6_mapped().into();
        assert!(mapped.is_v4_mapped());
        assert_eq!(mapped.demapped(), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));

        let plain: IpAddr = Ipv6Addr::new(0xff, 0, 0, 0, 0, 0, 0, 1).into();
        assert!(!plain.is_v4_mapped());
        assert_eq!(plain.demapped(), plain);
    }
}
