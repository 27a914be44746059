//! Human-readable text reports.

use color_eyre::Result;

use super::ReportFormatter;
use crate::net::NetworkDetails;
use crate::subnet::EqualSubnetting;
use crate::topology::advanced::{AdvancedLab, RoutingProtocol};
use crate::topology::LabTopology;
use crate::utils::ip_utils::is_private_ip;
use crate::vlsm::{FailurePolicy, RequestFailure, SubnetAllocation, VlsmPlan};

const WIDTH: usize = 90;

fn banner(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(WIDTH));
    lines.push(title.to_string());
    lines.push("=".repeat(WIDTH));
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(WIDTH));
}

fn join_counts<'a>(counts: impl Iterator<Item = &'a u32>) -> String {
    counts.map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

/// Step-by-step derivation of every subnet, then a final summary
#[derive(Debug, Default, Clone, Copy)]
pub struct DetailedTextReport;

/// One line per subnet
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryTextReport;

impl ReportFormatter for DetailedTextReport {
    fn render(&self, plan: &VlsmPlan) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        banner(&mut lines, "VLSM CALCULATION (Variable Length Subnet Mask)");
        lines.push(String::new());
        push_plan_header(&mut lines, plan);

        section(&mut lines, "METHOD:");
        lines.push("1. Sort subnets from LARGEST to SMALLEST host count".to_string());
        lines.push("2. For each subnet compute:".to_string());
        lines.push("   - Host bits needed: smallest n where 2^n - 2 >= H".to_string());
        lines.push("   - Prefix: 32 - n".to_string());
        lines.push("   - Block size: 2^n".to_string());
        lines.push("   - Assign ranges sequentially on block boundaries".to_string());
        lines.push(String::new());

        for (position, request) in plan.sorted.iter().enumerate().map(|(i, r)| (i + 1, r)) {
            let allocation = plan.allocations.iter().find(|a| a.position == position);
            let failure = plan.failures.iter().find(|f| f.position == position);
            if allocation.is_none() && failure.is_none() {
                // Aborted before reaching this request
                break;
            }

            banner(
                &mut lines,
                &format!("SUBNET {}: {} hosts needed", position, request.host_count),
            );
            lines.push(String::new());

            if let Some(allocation) = allocation {
                push_allocation_steps(&mut lines, allocation);
            } else if let Some(failure) = failure {
                push_failure(&mut lines, failure);
            }
        }

        push_final_summary(&mut lines, plan);
        Ok(lines.join("\n") + "\n")
    }
}

impl ReportFormatter for SummaryTextReport {
    fn render(&self, plan: &VlsmPlan) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();
        banner(&mut lines, "VLSM SUMMARY");
        lines.push(String::new());
        push_plan_header(&mut lines, plan);
        push_final_summary(&mut lines, plan);
        Ok(lines.join("\n") + "\n")
    }
}

fn push_plan_header(lines: &mut Vec<String>, plan: &VlsmPlan) {
    lines.push(format!("Generated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
    lines.push(format!("BASE NETWORK: {}", plan.base));
    lines.push(format!("NUMBER OF SUBNETS: {}", plan.requests.len()));
    lines.push(format!(
        "REQUESTED HOSTS: {}",
        join_counts(plan.requests.iter().map(|r| &r.host_count))
    ));
    lines.push(format!(
        "SORTED HOSTS (largest first): {}",
        join_counts(plan.sorted.iter().map(|r| &r.host_count))
    ));
    if plan.policy == FailurePolicy::SkipAndContinue {
        lines.push("ON FAILURE: skip the request and continue".to_string());
    }
    lines.push(String::new());
}

fn push_allocation_steps(lines: &mut Vec<String>, a: &SubnetAllocation) {
    let n = a.host_bits;
    let needed = u64::from(a.requested_hosts()) + 2;
    let size = a.block_size();

    section(lines, "STEP 1: HOST BITS");
    lines.push(format!("Hosts needed: {}", a.requested_hosts()));
    lines.push(format!(
        "Total addresses needed: {} + 2 (network + broadcast) = {}",
        a.requested_hosts(),
        needed
    ));
    lines.push(format!("Host bits (n): smallest n where 2^n >= {}", needed));
    lines.push(format!("  2^{} = {} >= {}", n, size, needed));
    lines.push(format!("Host bits: {}", n));
    lines.push(String::new());

    section(lines, "STEP 2: PREFIX AND MASK");
    lines.push(format!("Prefix: 32 - {} = /{}", n, a.prefix()));
    lines.push(format!("Subnet mask: {}", a.mask_string()));
    lines.push(format!("Block size: 2^{} = {} addresses", n, size));
    lines.push(String::new());

    section(lines, "STEP 3: RANGE ASSIGNMENT");
    if a.padding > 0 {
        lines.push(format!(
            "Alignment:            skipped {} addresses to reach a multiple of {}",
            a.padding, size
        ));
    }
    lines.push(format!("Network address:      {}", a.block));
    lines.push(format!("First usable IP:      {}", a.first_host()));
    lines.push(format!("Last usable IP:       {}", a.last_host()));
    lines.push(format!("Broadcast address:    {}", a.broadcast()));
    lines.push(format!(
        "Next base network:    {}",
        next_network_label(a.next_cursor())
    ));
    lines.push(String::new());

    section(lines, "SUMMARY:");
    lines.push(format!("Available hosts:      {}", a.available_hosts()));
    lines.push(format!("Requested hosts:      {}", a.requested_hosts()));
    lines.push(format!("Wasted hosts:         {}", a.wasted_hosts()));
    lines.push(format!("Efficiency:           {:.2}%", a.efficiency()));
    lines.push(String::new());
}

fn next_network_label(cursor: u64) -> String {
    match u32::try_from(cursor) {
        Ok(raw) => std::net::Ipv4Addr::from(raw).to_string(),
        Err(_) => "(end of IPv4 space)".to_string(),
    }
}

fn push_failure(lines: &mut Vec<String>, failure: &RequestFailure) {
    lines.push(format!("ERROR: {}", failure.error));
    lines.push(String::new());
}

fn push_final_summary(lines: &mut Vec<String>, plan: &VlsmPlan) {
    lines.push(String::new());
    banner(lines, "FINAL SUBNET SUMMARY");
    lines.push(String::new());

    for a in &plan.allocations {
        lines.push(format!(
            "Subnet {}: {} - {} ({} hosts, mask {})",
            a.position,
            a.block,
            a.broadcast(),
            a.requested_hosts(),
            a.mask_string()
        ));
    }
    for f in &plan.failures {
        lines.push(format!(
            "Subnet {}: NOT ALLOCATED ({} hosts): {}",
            f.position, f.request.host_count, f.error
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Allocated: {} of {} addresses ({:.2}% of base), {} remaining",
        plan.allocated_addresses(),
        plan.base.total_addresses(),
        plan.utilization(),
        plan.remaining_addresses()
    ));

    if !plan.is_complete() && plan.policy == FailurePolicy::Abort {
        lines.push(
            "Allocation stopped at the first failure: only the subnets listed above it are valid."
                .to_string(),
        );
    }
}

/// Detailed single-network calculation
pub fn render_network_details(details: &NetworkDetails) -> String {
    let mut lines: Vec<String> = Vec::new();
    banner(&mut lines, "DETAILED NETWORK CALCULATION");
    lines.push(String::new());
    lines.push(format!("IP: {}/{}", details.address, details.prefix));
    lines.push(String::new());

    section(&mut lines, "STEP 1: SUBNET MASK");
    lines.push(format!("/{} = {} bits set to 1", details.prefix, details.prefix));
    lines.push(format!("Binary: {}", details.mask_binary));
    lines.push(format!("Decimal: {}", details.mask));
    lines.push(String::new());

    section(&mut lines, "STEP 2: NETWORK ADDRESS");
    lines.push("IP AND mask".to_string());
    lines.push(format!("Result: {}/{}", details.network, details.prefix));
    lines.push(String::new());

    section(&mut lines, "STEP 3: BLOCK JUMP");
    match details.determining_octet {
        Some(octet) => lines.push(format!(
            "256 - {} = {} (octet {})",
            details.mask.octets()[octet],
            details.block_jump,
            octet + 1
        )),
        None => lines.push("All mask octets are 255: single-address network".to_string()),
    }
    lines.push(String::new());

    section(&mut lines, "STEP 4: BROADCAST");
    lines.push(format!("Wildcard: {}", details.wildcard));
    lines.push(format!("Broadcast: {}", details.broadcast));
    lines.push(String::new());

    banner(&mut lines, "SUMMARY");
    lines.push(format!("Network: {}/{}", details.network, details.prefix));
    lines.push(format!("Mask: {}", details.mask));
    lines.push(format!("Broadcast: {}", details.broadcast));
    lines.push(format!("Hosts: {}", details.usable_hosts));
    lines.push(format!(
        "Private (RFC 1918): {}",
        if is_private_ip(details.network) { "yes" } else { "no" }
    ));
    lines.join("\n") + "\n"
}

/// Equal-size subnetting result
pub fn render_equal_subnetting(split: &EqualSubnetting) -> String {
    let mut lines: Vec<String> = Vec::new();
    banner(&mut lines, "SUBNET CALCULATION");
    lines.push(String::new());
    lines.push(format!("Base network: {}", split.base));
    lines.push(format!("Subnets: {}", split.requested));
    lines.push(String::new());
    lines.push(format!(
        "Bits needed: {} (2^{} = {})",
        split.bits_borrowed, split.bits_borrowed, split.total_possible
    ));
    lines.push(format!("New mask: /{}", split.new_prefix));
    lines.push(format!("Hosts/subnet: {}", split.hosts_per_subnet));
    lines.push(String::new());
    for (i, subnet) in split.subnets.iter().enumerate() {
        lines.push(format!("{}. {} - {}", i + 1, subnet, subnet.broadcast()));
    }
    lines.join("\n") + "\n"
}

/// Lab layout: routers, switches, then per-subnet devices
pub fn render_topology(lab: &LabTopology) -> String {
    let mut lines: Vec<String> = Vec::new();
    banner(&mut lines, "NETWORK LAB SCHEME (VLSM)");
    lines.push(String::new());
    lines.push(format!("BASE NETWORK: {}", lab.base));
    lines.push(format!(
        "SUBNETS: {} | ROUTERS: {} | SWITCHES: {}",
        lab.sites.len(),
        lab.options.routers,
        lab.options.switches
    ));
    lines.push("METHOD: VLSM (largest subnet first)".to_string());
    lines.push(String::new());

    banner(&mut lines, "1. ROUTER CONFIGURATION");
    for router in &lab.routers {
        lines.push(String::new());
        section(&mut lines, &format!("ROUTER {}", router.id));
        if router.interfaces.is_empty() {
            lines.push("  (No subnets assigned)".to_string());
            continue;
        }
        for iface in &router.interfaces {
            lines.push(format!("  Interface {}:", iface.name));
            lines.push(format!(
                "    Description:  Gateway subnet {} (VLAN {})",
                iface.subnet_id, iface.vlan_id
            ));
            lines.push(format!("    IP Address:   {}", iface.address));
            lines.push(format!("    Subnet Mask:  {}", iface.mask));
            lines.push(format!("    Connect to:   Switch {}", iface.switch_id));
            lines.push(String::new());
        }
    }

    if !lab.links.is_empty() {
        banner(&mut lines, "ROUTER INTERCONNECTION");
        for link in &lab.links {
            lines.push(format!(
                "  Router {} {} <---> Router {} {}",
                link.from_router, link.from_interface, link.to_router, link.to_interface
            ));
        }
        lines.push(String::new());
    }

    banner(&mut lines, "2. SWITCH CONFIGURATION");
    for switch in &lab.switches {
        lines.push(String::new());
        section(&mut lines, &format!("SWITCH {}", switch.id));
        if switch.vlans.is_empty() {
            lines.push("  (No subnets assigned)".to_string());
            continue;
        }
        lines.push("  VLAN database:".to_string());
        for (vlan, subnet) in &switch.vlans {
            lines.push(format!("    - VLAN {}: name 'Subnet_{}'", vlan, subnet));
        }
        lines.push("  Uplink ports (to router):".to_string());
        for uplink in &switch.uplinks {
            lines.push(format!(
                "    - Fa0/{}: ACCESS -> VLAN {} (to Router {})",
                uplink.port, uplink.vlan_id, uplink.router_id
            ));
        }
        lines.push("  Access ports (to devices):".to_string());
        for ports in &switch.access {
            lines.push(format!(
                "    - Fa0/{}-{}: ACCESS -> VLAN {} (Subnet {})",
                ports.first, ports.last, ports.vlan_id, ports.subnet_id
            ));
        }
    }
    lines.push(String::new());

    banner(&mut lines, "3. DEVICE CONFIGURATION (summary)");
    for site in &lab.sites {
        lines.push(String::new());
        section(
            &mut lines,
            &format!(
                "SUBNET {} ({} devices) - VLAN {}",
                site.id, site.host_count, site.vlan_id
            ),
        );
        lines.push(format!("  Network: {} | Gateway: {}", site.block, site.gateway));
        for (i, host) in site.sample_hosts.iter().enumerate() {
            lines.push(format!("  PC_{}_{}:", site.id, i + 1));
            lines.push(format!(
                "    IP: {}  |  Mask: {}  |  Gateway: {}",
                host, site.mask, site.gateway
            ));
            lines.push(format!(
                "    Connect to: Switch {} (VLAN {} port)",
                site.switch_id, site.vlan_id
            ));
        }
        if site.remaining_hosts > 0 {
            lines.push(format!(
                "  ... and {} more devices configured sequentially.",
                site.remaining_hosts
            ));
        }
    }
    lines.join("\n") + "\n"
}

/// Per-subnet lab scheme with its routing plan
pub fn render_advanced_lab(lab: &AdvancedLab) -> String {
    let mut lines: Vec<String> = Vec::new();
    banner(&mut lines, "ADVANCED NETWORK LAB SCHEME (per-subnet devices)");
    lines.push(String::new());
    lines.push(format!("BASE NETWORK: {}", lab.base));
    lines.push(format!("SUBNETS:      {}", lab.sites.len()));
    lines.push(format!("ROUTING:      {}", lab.routing.label()));
    lines.push("METHOD:       VLSM (largest subnet first)".to_string());
    lines.push(String::new());

    for site in &lab.sites {
        lines.push("#".repeat(WIDTH));
        if site.main {
            lines.push(format!("SUBNET {} - MAIN NETWORK (Internet uplink)", site.id));
        } else {
            lines.push(format!("SUBNET {}", site.id));
        }
        lines.push("#".repeat(WIDTH));
        lines.push(String::new());

        section(&mut lines, "NETWORK");
        lines.push(format!("  Network:          {}", site.block));
        lines.push(format!("  Subnet Mask:      {}", site.mask));
        lines.push(format!("  Broadcast:        {}", site.block.broadcast()));
        lines.push(format!("  Gateway:          {}", site.gateway));
        lines.push(format!("  VLAN ID:          {}", site.vlan_id));
        lines.push(format!("  Usable hosts:     {}", site.block.usable_hosts()));
        lines.push(String::new());

        if !site.routers.is_empty() {
            section(&mut lines, &format!("ROUTERS ({})", site.routers.len()));
            for router in &site.routers {
                lines.push(format!("  {}:", router.name));
                lines.push(format!("    Interface:      {}", router.interface));
                lines.push(format!("    IP Address:     {}", router.address));
                lines.push(format!("    Subnet Mask:    {}", site.mask));
                if router.wan_uplink {
                    lines.push("    WAN:            GigabitEthernet0/1 to ISP, NAT overload".to_string());
                }
                lines.push(format!("    VLAN:           {}", site.vlan_id));
                if let Some(switch) = &router.switch {
                    lines.push(format!("    Connect to:     {} (trunk port)", switch));
                }
            }
            lines.push(String::new());
        }

        if !site.switches.is_empty() {
            section(&mut lines, &format!("SWITCHES ({})", site.switches.len()));
            for switch in &site.switches {
                lines.push(format!("  {}:", switch.name));
                lines.push(format!(
                    "    VLAN database:  1 (default), {} 'Subnet_{}'",
                    site.vlan_id, site.id
                ));
                for trunk in &switch.trunks {
                    lines.push(format!(
                        "    - Fa0/{}: TRUNK -> {} (allowed VLAN {})",
                        trunk.port, trunk.peer, site.vlan_id
                    ));
                }
                match &switch.access {
                    Some(ports) => lines.push(format!(
                        "    - Fa0/{}-{}: ACCESS -> VLAN {} ({} hosts)",
                        ports.first, ports.last, site.vlan_id, ports.hosts
                    )),
                    None => lines.push("    (No hosts assigned)".to_string()),
                }
            }
            lines.push(String::new());
        }

        if site.spec.hosts > 0 {
            section(&mut lines, &format!("HOSTS ({})", site.spec.hosts));
            for host in &site.sample_hosts {
                lines.push(format!("  {}:", host.name));
                lines.push(format!(
                    "    IP: {}  |  Mask: {}  |  Gateway: {}",
                    host.address, site.mask, site.gateway
                ));
                lines.push(format!("    Connect to: {} port Fa0/{}", host.switch, host.port));
            }
            if let Some(next) = site.next_host {
                lines.push(format!(
                    "  ... and {} more hosts configured sequentially from {}.",
                    site.remaining_hosts, next
                ));
            }
            lines.push(String::new());
        }
    }

    banner(&mut lines, &format!("ROUTING - {}", lab.routing.label()));
    if lab.routing_plan.is_empty() {
        lines.push("  (No routers to configure)".to_string());
    }
    for router in &lab.routing_plan {
        lines.push(String::new());
        lines.push(format!("{}:", router.router));
        for command in &router.commands {
            lines.push(format!("  Router(config)# {}", command));
        }
    }
    if lab.routing == RoutingProtocol::Static && !lab.routing_plan.is_empty() {
        lines.push(String::new());
        lines.push("The next hop is the neighbouring router's address on the transit link.".to_string());
    }
    lines.join("\n") + "\n"
}
