//! Per-subnet lab layout.
//!
//! Where [`build_topology`](super::build_topology) deals one shared pool of
//! routers and switches across every subnet, an advanced lab gives each
//! subnet its own router, switch and host counts. Subnet 0 is the main
//! network; its first router carries the WAN uplink. Every subnet is sized
//! for its routers, its hosts and the gateway, placed by the VLSM allocator,
//! and the layout closes with a routing plan for the chosen protocol.

use std::net::Ipv4Addr;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::types::{TopologyError, SWITCH_PORTS, VLAN_STEP};
use crate::net::NetworkBlock;
use crate::utils::ip_utils::offset_ip;
use crate::utils::validation::{parse_site_counts, InputError};
use crate::vlsm::{allocate_vlsm, SubnetAllocation};

/// Hosts listed individually per subnet
pub const ADVANCED_SAMPLE_HOSTS: u32 = 4;

/// Routers the first switch of a subnet trunks to
pub const MAX_ROUTER_TRUNKS: u32 = 2;

/// Routing protocol configured between the subnet routers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProtocol {
    #[default]
    Static,
    Rip,
    Ospf,
}

impl RoutingProtocol {
    pub fn label(self) -> &'static str {
        match self {
            RoutingProtocol::Static => "STATIC",
            RoutingProtocol::Rip => "RIP",
            RoutingProtocol::Ospf => "OSPF",
        }
    }
}

/// Device counts for one subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSpec {
    pub routers: u32,
    pub switches: u32,
    pub hosts: u32,
}

impl SiteSpec {
    /// Addresses the subnet hands out: one per router, one per host and the
    /// gateway. `None` if the sum does not fit a `u32`.
    pub fn required_addresses(&self) -> Option<u32> {
        self.routers.checked_add(self.hosts)?.checked_add(1)
    }
}

/// Parses `routers,switches,hosts`, e.g. `1,2,40`
impl FromStr for SiteSpec {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [routers, switches, hosts] = parse_site_counts(s)?;
        Ok(Self {
            routers,
            switches,
            hosts,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteRouter {
    pub name: String,
    pub interface: String,
    pub address: Ipv4Addr,
    /// Only the main network's first router connects to the ISP
    pub wan_uplink: bool,
    pub switch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrunkPort {
    pub port: u32,
    pub peer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRange {
    pub first: u32,
    pub last: u32,
    pub hosts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSwitch {
    pub name: String,
    pub trunks: Vec<TrunkPort>,
    pub access: Option<AccessRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteHost {
    pub name: String,
    pub address: Ipv4Addr,
    pub switch: String,
    pub port: u32,
}

/// One subnet with its own devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedSite {
    pub id: usize,
    pub main: bool,
    pub spec: SiteSpec,
    pub block: NetworkBlock,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub vlan_id: u32,
    pub routers: Vec<SiteRouter>,
    pub switches: Vec<SiteSwitch>,
    pub sample_hosts: Vec<SiteHost>,
    pub remaining_hosts: u32,
    /// First address of the hosts not listed individually
    pub next_host: Option<Ipv4Addr>,
}

/// Routing commands for one router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterRouting {
    pub router: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedLab {
    pub base: NetworkBlock,
    pub routing: RoutingProtocol,
    pub sites: Vec<AdvancedSite>,
    pub routing_plan: Vec<RouterRouting>,
}

/// Allocate one subnet per spec and lay out its devices.
///
/// Sites keep their input order in the result, whatever order the allocator
/// placed them in.
pub fn build_advanced_lab(
    base: NetworkBlock,
    specs: &[SiteSpec],
    routing: RoutingProtocol,
) -> Result<AdvancedLab, TopologyError> {
    if specs.is_empty() {
        return Err(TopologyError::NoSubnets);
    }

    let demands = specs
        .iter()
        .enumerate()
        .map(|(site, spec)| {
            if spec.hosts > 0 && spec.switches == 0 {
                return Err(TopologyError::NoSwitchForHosts { site });
            }
            spec.required_addresses()
                .ok_or(TopologyError::SiteTooLarge { site })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut allocations =
        allocate_vlsm(base, &demands).map_err(|failure| TopologyError::Allocation(failure.error))?;
    allocations.sort_by_key(|a| a.request.index);

    let sites = allocations
        .iter()
        .map(|allocation| build_site(allocation, &specs[allocation.request.index]))
        .collect::<Result<Vec<_>, _>>()?;
    let routing_plan = plan_routing(&sites, routing);

    info!(
        "Built advanced lab for {}: {} subnets, {} routing",
        base,
        sites.len(),
        routing.label()
    );

    Ok(AdvancedLab {
        base,
        routing,
        sites,
        routing_plan,
    })
}

fn router_name(site: usize, main: bool, index: u32) -> String {
    if main {
        format!("MainRouter_{}", index)
    } else {
        format!("Router{}_{}", site, index)
    }
}

fn switch_name(site: usize, index: u32) -> String {
    format!("Switch{}_{}", site, index)
}

/// Hosts connected to switch `index` when `hosts` are spread over `switches`
fn hosts_on_switch(hosts: u32, switches: u32, index: u32) -> u32 {
    hosts / switches + u32::from(index < hosts % switches)
}

/// First access port: the first switch keeps Fa0/1-2 for router trunks, the
/// others keep Fa0/1 for the trunk to the first switch.
fn first_access_port(index: u32) -> u32 {
    if index == 0 {
        MAX_ROUTER_TRUNKS + 1
    } else {
        2
    }
}

fn build_site(allocation: &SubnetAllocation, spec: &SiteSpec) -> Result<AdvancedSite, TopologyError> {
    let id = allocation.request.index;
    let main = id == 0;
    let gateway = allocation.first_host();
    let first_switch = (spec.switches > 0).then(|| switch_name(id, 0));

    // Routers take addresses from the gateway upward
    let routers = (0..spec.routers)
        .map(|i| SiteRouter {
            name: router_name(id, main, i),
            interface: format!("GigabitEthernet0/{}", i),
            address: offset_ip(gateway, u64::from(i)).unwrap_or(gateway),
            wan_uplink: main && i == 0,
            switch: first_switch.clone(),
        })
        .collect::<Vec<_>>();

    let switches = (0..spec.switches)
        .map(|i| {
            let trunks = if i == 0 {
                (0..spec.routers.min(MAX_ROUTER_TRUNKS))
                    .map(|r| TrunkPort {
                        port: r + 1,
                        peer: router_name(id, main, r),
                    })
                    .collect()
            } else {
                vec![TrunkPort {
                    port: 1,
                    peer: switch_name(id, 0),
                }]
            };

            let hosts = hosts_on_switch(spec.hosts, spec.switches, i);
            let first = first_access_port(i);
            let access = (hosts > 0).then(|| AccessRange {
                first,
                last: first + hosts - 1,
                hosts,
            });
            if hosts > SWITCH_PORTS + 1 - first {
                return Err(TopologyError::AccessPortsExhausted {
                    switch: switch_name(id, i),
                    hosts,
                    ports: SWITCH_PORTS + 1 - first,
                });
            }

            Ok(SiteSwitch {
                name: switch_name(id, i),
                trunks,
                access,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Hosts follow the gateway and the router addresses
    let host_start = u64::from(spec.routers.max(1)) + 1;
    let shown = spec.hosts.min(ADVANCED_SAMPLE_HOSTS);
    let sample_hosts = (0..shown)
        .filter_map(|i| {
            let address = offset_ip(allocation.network(), host_start + u64::from(i))?;
            let (switch, port) = host_port(spec, i)?;
            Some(SiteHost {
                name: format!("PC{}_{}", id, i + 1),
                address,
                switch: switch_name(id, switch),
                port,
            })
        })
        .collect::<Vec<_>>();

    let remaining_hosts = spec.hosts - sample_hosts.len() as u32;
    let next_host = (remaining_hosts > 0)
        .then(|| offset_ip(allocation.network(), host_start + u64::from(shown)))
        .flatten();

    debug!(
        "Site {} on {}: {} routers, {} switches, {} hosts, VLAN {}",
        id,
        allocation.block,
        spec.routers,
        spec.switches,
        spec.hosts,
        (id as u32 + 1) * VLAN_STEP
    );

    Ok(AdvancedSite {
        id,
        main,
        spec: *spec,
        block: allocation.block,
        mask: allocation.mask(),
        gateway,
        vlan_id: (id as u32 + 1) * VLAN_STEP,
        routers,
        switches,
        sample_hosts,
        remaining_hosts,
        next_host,
    })
}

/// Switch index and access port of the `host`-th host of a site
fn host_port(spec: &SiteSpec, host: u32) -> Option<(u32, u32)> {
    let mut offset = 0;
    for switch in 0..spec.switches {
        let on_switch = hosts_on_switch(spec.hosts, spec.switches, switch);
        if host < offset + on_switch {
            return Some((switch, first_access_port(switch) + host - offset));
        }
        offset += on_switch;
    }
    None
}

/// Routing commands for the first router of every site that has one.
pub fn plan_routing(sites: &[AdvancedSite], routing: RoutingProtocol) -> Vec<RouterRouting> {
    sites
        .iter()
        .filter_map(|site| site.routers.first().map(|router| (site, router)))
        .map(|(site, router)| {
            let commands = match routing {
                RoutingProtocol::Static => sites
                    .iter()
                    .filter(|remote| remote.id != site.id)
                    .map(|remote| {
                        format!("ip route {} {} <next-hop>", remote.block.network(), remote.mask)
                    })
                    .collect(),
                RoutingProtocol::Rip => ["router rip", "version 2", "no auto-summary"]
                    .iter()
                    .map(|c| c.to_string())
                    .chain(sites.iter().map(|s| format!("network {}", s.block.network())))
                    .collect(),
                RoutingProtocol::Ospf => std::iter::once("router ospf 1".to_string())
                    .chain(sites.iter().map(|s| {
                        format!("network {} {} area 0", s.block.network(), s.block.wildcard())
                    }))
                    .collect(),
            };
            RouterRouting {
                router: router.name.clone(),
                commands,
            }
        })
        .collect()
}
