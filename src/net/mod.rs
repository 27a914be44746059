//! IPv4 network arithmetic.
//!
//! This module holds the allocation-policy-free building blocks: mask,
//! broadcast and block-size computation, block alignment, the
//! `NetworkBlock` value type and the detailed single-network derivation.

pub mod arithmetic;
pub mod block;
pub mod details;

// Re-export commonly used types
pub use arithmetic::{
    align_to_block, block_size, broadcast_address, host_bits_needed, mask_from_prefix,
    network_address, prefix_from_mask, wildcard,
};
pub use block::NetworkBlock;
pub use details::NetworkDetails;
