//! Step-by-step derivation of a single `address/prefix`.
//!
//! This mirrors the manual method taught for subnetting by hand: build the
//! mask, AND it with the address, find the "block jump" from the first mask
//! octet that is not 255, then OR in the wildcard to get the broadcast.

use std::net::Ipv4Addr;

use serde::Serialize;

use super::arithmetic;
use super::block::NetworkBlock;
use crate::error::Result;
use crate::utils::ip_utils::to_dotted_binary;

/// Everything the detailed calculation shows for one input address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkDetails {
    pub address: Ipv4Addr,
    pub prefix: u8,
    pub mask: Ipv4Addr,
    pub mask_binary: String,
    pub network: Ipv4Addr,
    pub wildcard: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    /// Index (0-3) of the first mask octet that is not 255, if any
    pub determining_octet: Option<usize>,
    /// Increment between consecutive networks in the determining octet
    pub block_jump: u32,
    pub usable_hosts: u64,
}

impl NetworkDetails {
    pub fn calculate(address: Ipv4Addr, prefix: u8) -> Result<Self> {
        let mask = arithmetic::mask_from_prefix(prefix)?;
        let block = NetworkBlock::containing(address, prefix)?;
        let mask_octets = mask.to_be_bytes();

        let determining_octet = mask_octets.iter().position(|&octet| octet != 255);
        let block_jump = match determining_octet {
            Some(i) => 256 - u32::from(mask_octets[i]),
            None => 1,
        };

        log::debug!(
            "Details for {}/{}: network {}, jump {} in octet {:?}",
            address,
            prefix,
            block.network(),
            block_jump,
            determining_octet
        );

        Ok(Self {
            address,
            prefix,
            mask: mask.into(),
            mask_binary: to_dotted_binary(mask),
            network: block.network(),
            wildcard: block.wildcard(),
            broadcast: block.broadcast(),
            determining_octet,
            block_jump,
            usable_hosts: block.usable_hosts(),
        })
    }
}
