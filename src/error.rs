//! Error taxonomy for subnet arithmetic and VLSM allocation.
//!
//! Every variant is a user-correctable input condition. Nothing here is
//! fatal to the process; callers surface the error next to whatever
//! partial result they already hold.

use std::net::Ipv4Addr;

/// Errors produced by the network arithmetic and the allocators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    #[error("Request #{index} asks for {host_count} hosts (must be at least 1)")]
    InvalidRequest { index: usize, host_count: u32 },

    #[error("Host count must be at least 1")]
    ZeroHosts,

    #[error("No host requests supplied")]
    EmptyRequestSet,

    #[error("Invalid prefix length /{0} (must be 0-32)")]
    InvalidPrefix(u8),

    #[error(
        "{host_count} hosts need {host_bits} host bits, a block larger than the /{base_prefix} base network"
    )]
    BlockTooLarge {
        host_count: u32,
        host_bits: u32,
        base_prefix: u8,
    },

    #[error(
        "Not enough space for {host_count} hosts: need {needed} addresses but only {available} remain"
    )]
    InsufficientSpace {
        host_count: u32,
        needed: u64,
        available: u64,
    },

    #[error("{address}/{prefix} has host bits set (network address is {network})")]
    HostBitsSet {
        address: Ipv4Addr,
        prefix: u8,
        network: Ipv4Addr,
    },

    #[error("Subnet mask {0} is not contiguous")]
    InvalidMask(Ipv4Addr),

    #[error("Subnet count must be at least 1")]
    InvalidSubnetCount,

    #[error("Splitting into {count} subnets needs /{new_prefix}, which exceeds /32")]
    PrefixOverflow { count: u32, new_prefix: u32 },
}

pub type Result<T> = std::result::Result<T, SubnetError>;
