//! Lab topology module.
//!
//! This module turns an allocated subnet list into a lab layout: which
//! router interface is each subnet's gateway, which switch and VLAN carry
//! it, and how the routers are chained together. The allocator knows
//! nothing about devices; the /30 ceiling for practical host assignment is
//! enforced here. [`advanced`] builds the per-subnet variant with its own
//! device counts and a routing plan.

pub mod types;
pub mod connections;
pub mod distribution;
pub mod advanced;

// Re-export key types and functions for easier access
pub use types::{LabTopology, TopologyError, TopologyOptions};
pub use connections::generate_router_links;
pub use distribution::{assign_sites, plan_routers, plan_switches};
pub use advanced::{build_advanced_lab, AdvancedLab, RoutingProtocol, SiteSpec};

use log::info;

use crate::net::NetworkBlock;
use crate::vlsm::SubnetAllocation;

/// Build the full lab layout for a successful allocation.
pub fn build_topology(
    base: NetworkBlock,
    allocations: &[SubnetAllocation],
    options: TopologyOptions,
) -> Result<LabTopology, TopologyError> {
    if allocations.is_empty() {
        return Err(TopologyError::NoSubnets);
    }

    let sites = assign_sites(allocations, &options)?;
    let routers = plan_routers(&sites, options.routers);
    let switches = plan_switches(&sites, options.switches)?;
    let links = generate_router_links(options.routers);

    info!(
        "Built lab topology for {}: {} subnets, {} routers, {} switches",
        base,
        sites.len(),
        options.routers,
        options.switches
    );

    Ok(LabTopology {
        base,
        options,
        sites,
        routers,
        switches,
        links,
    })
}
