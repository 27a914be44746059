//! The `NetworkBlock` value type.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::arithmetic::{self, RESERVED_ADDRESSES};
use crate::error::{Result, SubnetError};
use crate::utils::validation::InputError;

/// An IPv4 network: a network address plus a prefix length.
///
/// The address never has host bits set. Mask, broadcast, wildcard and host
/// range are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkBlock {
    network: u32,
    prefix: u8,
}

impl NetworkBlock {
    /// Build a block from a true network address. Host bits must be zero.
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self> {
        let mask = arithmetic::mask_from_prefix(prefix)?;
        let raw = u32::from(address);
        let network = arithmetic::network_address(raw, mask);
        if network != raw {
            return Err(SubnetError::HostBitsSet {
                address,
                prefix,
                network: network.into(),
            });
        }
        Ok(Self { network, prefix })
    }

    /// Block containing `address` at the given prefix; host bits are masked off.
    pub fn containing(address: Ipv4Addr, prefix: u8) -> Result<Self> {
        let mask = arithmetic::mask_from_prefix(prefix)?;
        Ok(Self {
            network: arithmetic::network_address(u32::from(address), mask),
            prefix,
        })
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network.into()
    }

    pub fn network_u32(&self) -> u32 {
        self.network
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.mask_u32().into()
    }

    pub fn mask_u32(&self) -> u32 {
        // prefix is validated on construction
        arithmetic::mask_from_prefix(self.prefix).unwrap_or(u32::MAX)
    }

    pub fn wildcard(&self) -> Ipv4Addr {
        arithmetic::wildcard(self.mask_u32()).into()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.broadcast_u32().into()
    }

    pub fn broadcast_u32(&self) -> u32 {
        arithmetic::broadcast_address(self.network, self.mask_u32())
    }

    /// Addresses in the block, network and broadcast included
    pub fn total_addresses(&self) -> u64 {
        u64::from(self.broadcast_u32() - self.network) + 1
    }

    /// Addresses available to hosts
    pub fn usable_hosts(&self) -> u64 {
        self.total_addresses().saturating_sub(RESERVED_ADDRESSES)
    }

    /// First usable host (network + 1)
    pub fn first_host(&self) -> Ipv4Addr {
        self.network.saturating_add(1).into()
    }

    /// Last usable host (broadcast - 1)
    pub fn last_host(&self) -> Ipv4Addr {
        self.broadcast_u32().saturating_sub(1).into()
    }

    /// True when `other` lies entirely inside this block
    pub fn contains(&self, other: &NetworkBlock) -> bool {
        other.prefix >= self.prefix
            && other.network >= self.network
            && other.broadcast_u32() <= self.broadcast_u32()
    }

    pub fn contains_addr(&self, address: Ipv4Addr) -> bool {
        let raw = u32::from(address);
        raw >= self.network && raw <= self.broadcast_u32()
    }

    /// True when the two address ranges share at least one address
    pub fn overlaps(&self, other: &NetworkBlock) -> bool {
        self.network <= other.broadcast_u32() && other.network <= self.broadcast_u32()
    }
}

impl fmt::Display for NetworkBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix)
    }
}

impl FromStr for NetworkBlock {
    type Err = InputError;

    /// Parses `a.b.c.d/p`, masking off host bits like a calculator input would.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        crate::utils::validation::parse_cidr(s)
    }
}

impl Serialize for NetworkBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NetworkBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(s: &str) -> NetworkBlock {
        s.parse().unwrap()
    }

    #[test]
    fn test_strict_construction() {
        let ok = NetworkBlock::new(Ipv4Addr::new(192, 168, 1, 0), 24).unwrap();
        assert_eq!(ok.to_string(), "192.168.1.0/24");

        let err = NetworkBlock::new(Ipv4Addr::new(192, 168, 1, 5), 24).unwrap_err();
        assert_eq!(
            err,
            SubnetError::HostBitsSet {
                address: Ipv4Addr::new(192, 168, 1, 5),
                prefix: 24,
                network: Ipv4Addr::new(192, 168, 1, 0),
            }
        );

        assert_eq!(
            NetworkBlock::new(Ipv4Addr::new(10, 0, 0, 0), 33),
            Err(SubnetError::InvalidPrefix(33))
        );
    }

    #[test]
    fn test_lenient_construction_masks_host_bits() {
        let b = NetworkBlock::containing(Ipv4Addr::new(192, 168, 0, 11), 24).unwrap();
        assert_eq!(b.network(), Ipv4Addr::new(192, 168, 0, 0));
    }

    #[test]
    fn test_derived_fields() {
        let b = block("192.168.1.64/27");
        assert_eq!(b.mask(), Ipv4Addr::new(255, 255, 255, 224));
        assert_eq!(b.wildcard(), Ipv4Addr::new(0, 0, 0, 31));
        assert_eq!(b.broadcast(), Ipv4Addr::new(192, 168, 1, 95));
        assert_eq!(b.first_host(), Ipv4Addr::new(192, 168, 1, 65));
        assert_eq!(b.last_host(), Ipv4Addr::new(192, 168, 1, 94));
        assert_eq!(b.total_addresses(), 32);
        assert_eq!(b.usable_hosts(), 30);
    }

    #[test]
    fn test_whole_address_space() {
        let b = block("0.0.0.0/0");
        assert_eq!(b.total_addresses(), 1u64 << 32);
        assert_eq!(b.broadcast(), Ipv4Addr::new(255, 255, 255, 255));

        let host = block("10.1.2.3/32");
        assert_eq!(host.total_addresses(), 1);
        assert_eq!(host.usable_hosts(), 0);
    }

    #[test]
    fn test_containment_and_overlap() {
        let base = block("192.168.1.0/24");
        assert!(base.contains(&block("192.168.1.128/25")));
        assert!(base.contains(&base));
        assert!(!base.contains(&block("192.168.0.0/23")));
        assert!(!base.contains(&block("192.168.2.0/26")));

        assert!(block("10.0.0.0/24").overlaps(&block("10.0.0.128/25")));
        assert!(!block("10.0.0.0/25").overlaps(&block("10.0.0.128/25")));
        assert!(base.contains_addr(Ipv4Addr::new(192, 168, 1, 255)));
        assert!(!base.contains_addr(Ipv4Addr::new(192, 168, 2, 0)));
    }

    #[test]
    fn test_serde_as_cidr_string() {
        let b = block("172.16.0.0/12");
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "\"172.16.0.0/12\"");
        let back: NetworkBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
        assert!(serde_json::from_str::<NetworkBlock>("\"172.16.0.0\"").is_err());
    }
}
