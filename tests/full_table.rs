mod common;

use std::net::IpAddr;
use std::str::FromStr;

use bart::Table;
use inetnum::addr::Prefix;

#[test]
fn scenario_1_ipv4_walkthrough() -> Result<(), Box<dyn std::error::Error>> {
    common::init();

    let mut t = Table::new();
    t.insert(&Prefix::from_str("192.168.0.1/32")?, 1)?;
    t.insert(&Prefix::from_str("192.168.0.2/32")?, 2)?;
    t.insert(&Prefix::from_str("192.168.0.0/26")?, 7)?;
    t.insert(&Prefix::from_str("10.0.0.0/27")?, 3)?;
    t.insert(&Prefix::from_str("192.168.1.1/32")?, 4)?;
    t.insert(&Prefix::from_str("192.170.0.0/16")?, 5)?;
    t.insert(&Prefix::from_str("192.180.0.1/32")?, 8)?;
    t.insert(&Prefix::from_str("192.180.0.0/21")?, 9)?;
    t.insert(&Prefix::from_str("0.0.0.0/0")?, 6)?;

    let addr = |s: &str| -> IpAddr { s.parse().unwrap() };

    assert_eq!(t.lookup(addr("192.168.0.1")), Some(&1));
    assert_eq!(t.lookup(addr("192.168.0.2")), Some(&2));
    assert_eq!(t.lookup(addr("192.168.0.3")), Some(&7));
    assert_eq!(t.lookup(addr("192.168.0.255")), Some(&6));
    assert_eq!(t.lookup(addr("192.168.1.1")), Some(&4));
    assert_eq!(t.lookup(addr("192.170.1.1")), Some(&5));
    assert_eq!(t.lookup(addr("192.180.0.1")), Some(&8));
    assert_eq!(t.lookup(addr("192.180.3.5")), Some(&9));
    assert_eq!(t.lookup(addr("10.0.0.5")), Some(&3));
    assert_eq!(t.lookup(addr("10.0.0.15")), Some(&3));
    Ok(())
}

#[test]
fn scenario_2_ipv6_walkthrough() -> Result<(), Box<dyn std::error::Error>> {
    common::init();

    let mut t = Table::new();
    t.insert(&Prefix::from_str("ff:aaaa::1/128")?, 1)?;
    t.insert(&Prefix::from_str("ff:aaaa::2/128")?, 2)?;
    t.insert(&Prefix::from_str("ff:aaaa::/125")?, 7)?;
    t.insert(&Prefix::from_str("ffff:bbbb::/120")?, 3)?;
    t.insert(&Prefix::from_str("ff:aaaa:aaaa::1/128")?, 4)?;
    t.insert(&Prefix::from_str("ff:aaaa:aaaa:bb00::/56")?, 5)?;
    t.insert(&Prefix::from_str("ff:cccc::1/128")?, 8)?;
    t.insert(&Prefix::from_str("ff:cccc::/37")?, 9)?;
    t.insert(&Prefix::from_str("::/0")?, 6)?;

    let addr = |s: &str| -> IpAddr { s.parse().unwrap() };

    assert_eq!(t.lookup(addr("ff:aaaa::1")), Some(&1));
    assert_eq!(t.lookup(addr("ff:aaaa::2")), Some(&2));
    assert_eq!(t.lookup(addr("ff:aaaa::3")), Some(&7));
    assert_eq!(t.lookup(addr("ff:aaaa::ff")), Some(&6));
    assert_eq!(t.lookup(addr("ff:aaaa:aaaa::1")), Some(&4));
    assert_eq!(t.lookup(addr("ff:aaaa:aaaa:bb01::1")), Some(&5));
    assert_eq!(t.lookup(addr("ff:cccc::1")), Some(&8));
    assert_eq!(t.lookup(addr("ff:cccc:5::1")), Some(&9));
    Ok(())
}

#[test]
fn scenario_5_overlaps_positive() -> Result<(), Box<dyn std::error::Error>> {
    common::init();

    let mut t1 = Table::new();
    for s in [
        "128.0.0.0/2",
        "99.173.128.0/17",
        "219.150.142.0/23",
        "164.148.190.250/31",
        "48.136.229.233/32",
    ] {
        t1.insert(&Prefix::from_str(s)?, ())?;
    }

    let mut t2 = Table::new();
    for s in [
        "217.32.0.0/11",
        "38.176.0.0/12",
        "106.16.0.0/13",
        "164.85.192.0/23",
        "225.71.164.112/31",
    ] {
        t2.insert(&Prefix::from_str(s)?, ())?;
    }

    // 128.0.0.0/2 covers 217.32.0.0/11, so the two tables overlap — and
    // symmetrically regardless of which side calls (I9).
    assert!(t1.overlaps(&t2));
    assert!(t2.overlaps(&t1));
    Ok(())
}

#[test]
fn overwrite_last_insert_wins_i4() -> Result<(), Box<dyn std::error::Error>> {
    common::init();

    let mut t = Table::new();
    let pfx = Prefix::from_str("10.20.0.0/16")?;
    t.insert(&pfx, "first")?;
    t.insert(&pfx, "second")?;
    assert_eq!(t.lookup("10.20.1.1".parse()?), Some(&"second"));
    Ok(())
}

#[test]
fn mapped_address_rejected_on_insert_but_demapped_on_lookup(
) -> Result<(), Box<dyn std::error::Error>> {
    common::init();

    let mut t = Table::new();
    t.insert(&Prefix::from_str("10.0.0.0/8")?, 1)?;

    let mapped_prefix = Prefix::from_str("::ffff:10.0.0.0/104")?;
    assert!(t.insert(&mapped_prefix, 99).is_err());

    let mapped_addr: IpAddr = "::ffff:10.1.2.3".parse()?;
    assert_eq!(t.lookup(mapped_addr), Some(&1));
    Ok(())
}
