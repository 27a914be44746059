//! Fixed-length subnetting.
//!
//! Splits a base network into `count` equal subnets by borrowing
//! `ceil(log2(count))` host bits. This is the classic exercise that precedes
//! VLSM: every subnet gets the same prefix whatever its host needs.

use serde::Serialize;

use crate::error::{Result, SubnetError};
use crate::net::arithmetic::{self, MAX_PREFIX, RESERVED_ADDRESSES};
use crate::net::NetworkBlock;

/// Result of splitting a network into equal parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EqualSubnetting {
    pub base: NetworkBlock,
    pub requested: u32,
    /// Host bits borrowed as subnet bits
    pub bits_borrowed: u32,
    pub new_prefix: u8,
    pub hosts_per_subnet: u64,
    /// `2^bits_borrowed`, the subnets the new prefix makes available
    pub total_possible: u64,
    /// The first `requested` subnets in address order
    pub subnets: Vec<NetworkBlock>,
}

/// Divide `base` into `count` equally sized subnets.
///
/// # Examples
/// ```
/// use subnetplan::subnet::divide_equal;
///
/// let split = divide_equal("192.168.0.0/24".parse().unwrap(), 3).unwrap();
/// assert_eq!(split.new_prefix, 26);
/// assert_eq!(split.subnets.len(), 3);
/// assert_eq!(split.subnets[2].to_string(), "192.168.0.128/26");
/// ```
pub fn divide_equal(base: NetworkBlock, count: u32) -> Result<EqualSubnetting> {
    if count < 1 {
        return Err(SubnetError::InvalidSubnetCount);
    }

    let bits_borrowed = u64::from(count).next_power_of_two().trailing_zeros();
    let new_prefix = u32::from(base.prefix()) + bits_borrowed;
    if new_prefix > u32::from(MAX_PREFIX) {
        return Err(SubnetError::PrefixOverflow { count, new_prefix });
    }
    let new_prefix = new_prefix as u8;
    let size = arithmetic::block_size(new_prefix)?;

    let subnets = (0..u64::from(count))
        .map(|i| {
            // Stays inside base, so never exceeds u32
            let network = u64::from(base.network_u32()) + i * size;
            NetworkBlock::new((network as u32).into(), new_prefix)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Split {} into {} x /{} ({} bits borrowed)",
        base,
        count,
        new_prefix,
        bits_borrowed
    );

    Ok(EqualSubnetting {
        base,
        requested: count,
        bits_borrowed,
        new_prefix,
        hosts_per_subnet: size.saturating_sub(RESERVED_ADDRESSES),
        total_possible: 1u64 << bits_borrowed,
        subnets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(cidr: &str) -> NetworkBlock {
        cidr.parse().unwrap()
    }

    #[test]
    fn test_power_of_two_count() {
        let split = divide_equal(base("10.0.0.0/8"), 4).unwrap();
        assert_eq!(split.bits_borrowed, 2);
        assert_eq!(split.new_prefix, 10);
        assert_eq!(split.total_possible, 4);
        assert_eq!(split.hosts_per_subnet, (1 << 22) - 2);
        let names: Vec<String> = split.subnets.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["10.0.0.0/10", "10.64.0.0/10", "10.128.0.0/10", "10.192.0.0/10"]);
    }

    #[test]
    fn test_single_subnet_borrows_nothing() {
        let split = divide_equal(base("192.168.5.0/24"), 1).unwrap();
        assert_eq!(split.bits_borrowed, 0);
        assert_eq!(split.subnets, vec![base("192.168.5.0/24")]);
    }

    #[test]
    fn test_non_power_of_two_count() {
        let split = divide_equal(base("192.168.0.0/24"), 5).unwrap();
        assert_eq!(split.bits_borrowed, 3);
        assert_eq!(split.total_possible, 8);
        assert_eq!(split.subnets.len(), 5);
        assert_eq!(split.hosts_per_subnet, 30);
        assert!(split.subnets.iter().all(|s| split.base.contains(s)));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            divide_equal(base("192.168.0.0/24"), 0),
            Err(SubnetError::InvalidSubnetCount)
        );
        assert_eq!(
            divide_equal(base("192.168.0.0/30"), 8),
            Err(SubnetError::PrefixOverflow {
                count: 8,
                new_prefix: 33
            })
        );
    }
}
