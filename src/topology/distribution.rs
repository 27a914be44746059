//! Device distribution across subnets.
//!
//! Subnets are dealt round-robin to routers and switches in processing
//! order. Each subnet gets its own VLAN and its gateway on the first usable
//! host; switch access ports are split evenly between the VLANs a switch
//! carries.

use log::debug;

use super::types::{
    AccessPorts, RouterInterface, RouterPlan, SubnetSite, SwitchPlan, SwitchUplink,
    TopologyError, TopologyOptions, MAX_LAB_PREFIX, SAMPLE_HOSTS, SWITCH_PORTS, VLAN_STEP,
};
use crate::utils::ip_utils::{generate_ip_range, offset_ip};
use crate::vlsm::SubnetAllocation;

/// Assign router, switch, VLAN and example hosts to each allocation.
pub fn assign_sites(
    allocations: &[SubnetAllocation],
    options: &TopologyOptions,
) -> Result<Vec<SubnetSite>, TopologyError> {
    if options.routers == 0 {
        return Err(TopologyError::InvalidDeviceCount { device: "routers" });
    }
    if options.switches == 0 {
        return Err(TopologyError::InvalidDeviceCount { device: "switches" });
    }

    allocations
        .iter()
        .enumerate()
        .map(|(i, allocation)| {
            if allocation.prefix() > MAX_LAB_PREFIX {
                return Err(TopologyError::PrefixTooLong {
                    position: allocation.position,
                    prefix: allocation.prefix(),
                });
            }

            let slot = i as u32;
            let id = i + 1;
            let (sample_hosts, remaining_hosts) = sample_hosts(allocation);

            Ok(SubnetSite {
                id,
                host_count: allocation.requested_hosts(),
                block: allocation.block,
                router_id: slot % options.routers + 1,
                switch_id: slot % options.switches + 1,
                vlan_id: id as u32 * VLAN_STEP,
                gateway: allocation.first_host(),
                mask: allocation.mask(),
                sample_hosts,
                remaining_hosts,
            })
        })
        .collect()
}

/// First few host addresses after the gateway, plus how many hosts remain.
fn sample_hosts(allocation: &SubnetAllocation) -> (Vec<std::net::Ipv4Addr>, u64) {
    // The gateway takes the first usable address
    let room = allocation.available_hosts().saturating_sub(1);
    let shown = (SAMPLE_HOSTS as u64)
        .min(u64::from(allocation.requested_hosts()))
        .min(room);

    let hosts = offset_ip(allocation.network(), 2)
        .and_then(|start| generate_ip_range(start, shown as usize).ok())
        .unwrap_or_default();
    let remaining = u64::from(allocation.requested_hosts()) - hosts.len() as u64;
    (hosts, remaining)
}

/// Group sites by router; one GigabitEthernet interface per subnet.
pub fn plan_routers(sites: &[SubnetSite], routers: u32) -> Vec<RouterPlan> {
    (1..=routers)
        .map(|id| {
            let interfaces = sites
                .iter()
                .filter(|site| site.router_id == id)
                .enumerate()
                .map(|(port, site)| RouterInterface {
                    name: format!("GigabitEthernet0/{}", port),
                    subnet_id: site.id,
                    vlan_id: site.vlan_id,
                    address: site.gateway,
                    mask: site.mask,
                    switch_id: site.switch_id,
                })
                .collect();
            RouterPlan { id, interfaces }
        })
        .collect()
}

/// Lay out VLANs, uplinks and access ports on each switch.
pub fn plan_switches(sites: &[SubnetSite], switches: u32) -> Result<Vec<SwitchPlan>, TopologyError> {
    (1..=switches)
        .map(|id| {
            let served: Vec<&SubnetSite> = sites.iter().filter(|s| s.switch_id == id).collect();
            let uplink_count = served.len() as u32;
            if uplink_count > SWITCH_PORTS {
                return Err(TopologyError::SwitchPortsExhausted {
                    switch_id: id,
                    uplinks: uplink_count,
                    ports: SWITCH_PORTS,
                });
            }

            let uplinks = served
                .iter()
                .zip(1..)
                .map(|(site, port)| SwitchUplink {
                    port,
                    vlan_id: site.vlan_id,
                    router_id: site.router_id,
                })
                .collect();

            let mut access = Vec::new();
            if uplink_count > 0 {
                let ports_per_vlan = (SWITCH_PORTS - uplink_count) / uplink_count;
                let mut next_port = uplink_count + 1;
                if ports_per_vlan > 0 {
                    for site in &served {
                        let last = (next_port + ports_per_vlan - 1).min(SWITCH_PORTS);
                        access.push(AccessPorts {
                            first: next_port,
                            last,
                            vlan_id: site.vlan_id,
                            subnet_id: site.id,
                        });
                        next_port = last + 1;
                    }
                } else {
                    debug!("Switch {} has no free access ports after {} uplinks", id, uplink_count);
                }
            }

            Ok(SwitchPlan {
                id,
                vlans: served.iter().map(|s| (s.vlan_id, s.id)).collect(),
                uplinks,
                access,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vlsm::allocate_vlsm;
    use std::net::Ipv4Addr;

    fn allocations(cidr: &str, hosts: &[u32]) -> Vec<SubnetAllocation> {
        allocate_vlsm(cidr.parse().unwrap(), hosts).unwrap()
    }

    #[test]
    fn test_round_robin_assignment() {
        let allocs = allocations("192.168.1.0/24", &[50, 30, 20, 10]);
        let options = TopologyOptions { routers: 2, switches: 3 };
        let sites = assign_sites(&allocs, &options).unwrap();

        let routers: Vec<u32> = sites.iter().map(|s| s.router_id).collect();
        let switches: Vec<u32> = sites.iter().map(|s| s.switch_id).collect();
        let vlans: Vec<u32> = sites.iter().map(|s| s.vlan_id).collect();
        assert_eq!(routers, vec![1, 2, 1, 2]);
        assert_eq!(switches, vec![1, 2, 3, 1]);
        assert_eq!(vlans, vec![10, 20, 30, 40]);
        assert_eq!(sites[0].gateway, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(
            sites[0].sample_hosts,
            vec![
                Ipv4Addr::new(192, 168, 1, 2),
                Ipv4Addr::new(192, 168, 1, 3),
                Ipv4Addr::new(192, 168, 1, 4),
            ]
        );
        assert_eq!(sites[0].remaining_hosts, 47);
    }

    #[test]
    fn test_small_subnet_samples() {
        let allocs = allocations("10.0.0.0/30", &[2]);
        let sites = assign_sites(&allocs, &TopologyOptions { routers: 1, switches: 1 }).unwrap();
        // .1 is the gateway, .2 the only host address left
        assert_eq!(sites[0].sample_hosts, vec![Ipv4Addr::new(10, 0, 0, 2)]);
        assert_eq!(sites[0].remaining_hosts, 1);
    }

    #[test]
    fn test_rejects_prefix_beyond_thirty() {
        let point_to_point = SubnetAllocation {
            position: 1,
            request: crate::vlsm::HostRequest::new(0, 1),
            block: "10.0.0.0/31".parse().unwrap(),
            host_bits: 1,
            padding: 0,
        };
        assert_eq!(
            assign_sites(&[point_to_point], &TopologyOptions { routers: 1, switches: 1 }),
            Err(TopologyError::PrefixTooLong { position: 1, prefix: 31 })
        );
    }

    #[test]
    fn test_router_interfaces() {
        let allocs = allocations("192.168.1.0/24", &[50, 30, 20]);
        let sites = assign_sites(&allocs, &TopologyOptions { routers: 2, switches: 1 }).unwrap();
        let routers = plan_routers(&sites, 2);
        assert_eq!(routers[0].interfaces.len(), 2);
        assert_eq!(routers[0].interfaces[1].name, "GigabitEthernet0/1");
        assert_eq!(routers[0].interfaces[1].subnet_id, 3);
        assert_eq!(routers[1].interfaces[0].address, Ipv4Addr::new(192, 168, 1, 65));
    }

    #[test]
    fn test_switch_ports() {
        let allocs = allocations("192.168.1.0/24", &[50, 30, 20]);
        let sites = assign_sites(&allocs, &TopologyOptions { routers: 1, switches: 2 }).unwrap();
        let switches = plan_switches(&sites, 2).unwrap();

        // Switch 1 carries subnets 1 and 3: uplinks Fa0/1-2, 11 access ports each
        let s1 = &switches[0];
        assert_eq!(s1.vlans, vec![(10, 1), (30, 3)]);
        assert_eq!(s1.uplinks.len(), 2);
        assert_eq!(
            s1.access,
            vec![
                AccessPorts { first: 3, last: 13, vlan_id: 10, subnet_id: 1 },
                AccessPorts { first: 14, last: 24, vlan_id: 30, subnet_id: 3 },
            ]
        );

        // Switch 2 carries one subnet: Fa0/2-24
        assert_eq!(
            switches[1].access,
            vec![AccessPorts { first: 2, last: 24, vlan_id: 20, subnet_id: 2 }]
        );
    }

    #[test]
    fn test_switch_without_subnets() {
        let allocs = allocations("192.168.1.0/24", &[50]);
        let sites = assign_sites(&allocs, &TopologyOptions { routers: 1, switches: 2 }).unwrap();
        let switches = plan_switches(&sites, 2).unwrap();
        assert!(switches[1].vlans.is_empty());
        assert!(switches[1].access.is_empty());
    }
}
