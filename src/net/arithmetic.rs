//! Bit-level IPv4 arithmetic.
//!
//! Pure functions over 32-bit addresses and masks. Quantities that can reach
//! 2^32 (block sizes, a cursor rounded up past the last address) are carried
//! as `u64` so that running off the top of the address space is visible to
//! the caller instead of wrapping.

use crate::error::{Result, SubnetError};

/// Largest valid prefix length
pub const MAX_PREFIX: u8 = 32;

/// Addresses in every block that cannot be given to hosts (network + broadcast)
pub const RESERVED_ADDRESSES: u64 = 2;

/// Smallest `n` such that `2^n >= host_count + 2`.
///
/// A zero host count is rejected with [`SubnetError::ZeroHosts`]; callers
/// that know the request's position report it themselves.
///
/// # Examples
/// ```
/// use subnetplan::net::arithmetic::host_bits_needed;
///
/// assert_eq!(host_bits_needed(50), Ok(6));
/// assert_eq!(host_bits_needed(30), Ok(5));
/// assert_eq!(host_bits_needed(1), Ok(2));
/// assert!(host_bits_needed(0).is_err());
/// ```
pub fn host_bits_needed(host_count: u32) -> Result<u32> {
    if host_count < 1 {
        return Err(SubnetError::ZeroHosts);
    }
    let needed = u64::from(host_count) + RESERVED_ADDRESSES;
    Ok(needed.next_power_of_two().trailing_zeros())
}

/// Mask with the top `prefix` bits set.
///
/// # Examples
/// ```
/// use subnetplan::net::arithmetic::mask_from_prefix;
///
/// assert_eq!(mask_from_prefix(24), Ok(0xFFFF_FF00));
/// assert_eq!(mask_from_prefix(0), Ok(0));
/// assert!(mask_from_prefix(33).is_err());
/// ```
pub fn mask_from_prefix(prefix: u8) -> Result<u32> {
    if prefix > MAX_PREFIX {
        return Err(SubnetError::InvalidPrefix(prefix));
    }
    Ok(u32::MAX.checked_shl(u32::from(MAX_PREFIX - prefix)).unwrap_or(0))
}

/// Prefix length of a contiguous mask.
pub fn prefix_from_mask(mask: u32) -> Result<u8> {
    let prefix = mask.leading_ones();
    // A contiguous mask has no set bits after its leading run of ones
    if mask.checked_shl(prefix).unwrap_or(0) != 0 {
        return Err(SubnetError::InvalidMask(mask.into()));
    }
    Ok(prefix as u8)
}

pub fn network_address(ip: u32, mask: u32) -> u32 {
    ip & mask
}

pub fn broadcast_address(network: u32, mask: u32) -> u32 {
    network | !mask
}

pub fn wildcard(mask: u32) -> u32 {
    !mask
}

/// Total addresses in a block of the given prefix, network and broadcast included.
pub fn block_size(prefix: u8) -> Result<u64> {
    if prefix > MAX_PREFIX {
        return Err(SubnetError::InvalidPrefix(prefix));
    }
    Ok(1u64 << (MAX_PREFIX - prefix))
}

/// Round `address` up to the next multiple of `block_size`.
///
/// Already-aligned addresses come back unchanged. A zero block size is
/// treated as no alignment constraint.
pub fn align_to_block(address: u64, block_size: u64) -> u64 {
    if block_size == 0 {
        return address;
    }
    address.div_ceil(block_size) * block_size
}
