//! Lab topology type definitions.
//!
//! A lab topology decorates allocated subnets with the routers, switches and
//! VLANs used to build them in a network simulator.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::SubnetError;
use crate::net::NetworkBlock;

/// Longest prefix the lab generator accepts; /31 and /32 leave no room for
/// a gateway plus a host.
pub const MAX_LAB_PREFIX: u8 = 30;

/// Ports on every access switch
pub const SWITCH_PORTS: u32 = 24;

/// Example hosts listed per subnet; the rest are only counted
pub const SAMPLE_HOSTS: usize = 3;

/// VLAN numbering step: subnet 1 is VLAN 10, subnet 2 is VLAN 20, ...
pub const VLAN_STEP: u32 = 10;

/// Device counts for a lab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyOptions {
    pub routers: u32,
    pub switches: u32,
}

/// Errors raised while decorating an allocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Number of {device} must be at least 1")]
    InvalidDeviceCount { device: &'static str },

    #[error("No subnets to build a topology from")]
    NoSubnets,

    #[error("Subnet {position} needs /{prefix}, beyond the practical /30 limit")]
    PrefixTooLong { position: usize, prefix: u8 },

    #[error("Switch {switch_id} has {uplinks} uplinks but only {ports} ports")]
    SwitchPortsExhausted {
        switch_id: u32,
        uplinks: u32,
        ports: u32,
    },

    #[error("{switch} would need {hosts} access ports but only {ports} are free")]
    AccessPortsExhausted {
        switch: String,
        hosts: u32,
        ports: u32,
    },

    #[error("Subnet {site} has hosts but no switch to connect them")]
    NoSwitchForHosts { site: usize },

    #[error("Subnet {site} asks for more addresses than IPv4 can hold")]
    SiteTooLarge { site: usize },

    #[error("Subnet allocation failed: {0}")]
    Allocation(SubnetError),
}

/// One subnet with the devices serving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetSite {
    pub id: usize,
    pub host_count: u32,
    pub block: NetworkBlock,
    pub router_id: u32,
    pub switch_id: u32,
    pub vlan_id: u32,
    pub gateway: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub sample_hosts: Vec<Ipv4Addr>,
    /// Hosts configured sequentially after the samples
    pub remaining_hosts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterInterface {
    pub name: String,
    pub subnet_id: usize,
    pub vlan_id: u32,
    pub address: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub switch_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterPlan {
    pub id: u32,
    pub interfaces: Vec<RouterInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchUplink {
    pub port: u32,
    pub vlan_id: u32,
    pub router_id: u32,
}

/// Contiguous block of access ports in one VLAN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessPorts {
    pub first: u32,
    pub last: u32,
    pub vlan_id: u32,
    pub subnet_id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchPlan {
    pub id: u32,
    /// (VLAN id, subnet id) pairs in the switch's VLAN database
    pub vlans: Vec<(u32, usize)>,
    pub uplinks: Vec<SwitchUplink>,
    pub access: Vec<AccessPorts>,
}

/// Serial link between neighbouring routers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterLink {
    pub from_router: u32,
    pub from_interface: String,
    pub to_router: u32,
    pub to_interface: String,
}

/// Complete lab layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabTopology {
    pub base: NetworkBlock,
    pub options: TopologyOptions,
    pub sites: Vec<SubnetSite>,
    pub routers: Vec<RouterPlan>,
    pub switches: Vec<SwitchPlan>,
    pub links: Vec<RouterLink>,
}
