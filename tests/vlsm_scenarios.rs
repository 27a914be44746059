#[cfg(test)]
mod vlsm_scenarios {
    use std::net::Ipv4Addr;

    use subnetplan::net::NetworkBlock;
    use subnetplan::report::{render_topology, ReportFormat};
    use subnetplan::topology::{
        build_advanced_lab, build_topology, RoutingProtocol, SiteSpec, TopologyOptions,
    };
    use subnetplan::vlsm::{allocate_vlsm, plan_vlsm, FailurePolicy, SubnetAllocation};
    use subnetplan::SubnetError;

    fn base(cidr: &str) -> NetworkBlock {
        cidr.parse().unwrap()
    }

    fn summary(a: &SubnetAllocation) -> (String, u64, u64) {
        (a.block.to_string(), a.available_hosts(), a.wasted_hosts())
    }

    /// Classic four-subnet exercise in a /24
    #[test]
    fn test_four_subnets_in_class_c() {
        let result = allocate_vlsm(base("192.168.1.0/24"), &[50, 30, 20, 10]).unwrap();
        let rows: Vec<_> = result.iter().map(summary).collect();
        assert_eq!(
            rows,
            vec![
                ("192.168.1.0/26".to_string(), 62, 12),
                ("192.168.1.64/27".to_string(), 30, 0),
                ("192.168.1.96/27".to_string(), 30, 10),
                ("192.168.1.128/28".to_string(), 14, 4),
            ]
        );
        assert_eq!(result[1].efficiency(), 100.0);
        assert_eq!(result[3].broadcast(), Ipv4Addr::new(192, 168, 1, 143));
    }

    /// A request whose block is bigger than the whole base network
    #[test]
    fn test_block_larger_than_base() {
        let failure = allocate_vlsm(base("192.168.1.0/28"), &[20]).unwrap_err();
        assert!(failure.completed.is_empty());
        assert_eq!(
            failure.error,
            SubnetError::BlockTooLarge {
                host_count: 20,
                host_bits: 5,
                base_prefix: 28
            }
        );
    }

    /// A single host fills a /30 exactly
    #[test]
    fn test_single_host_in_slash_thirty() {
        let result = allocate_vlsm(base("10.0.0.0/30"), &[1]).unwrap();
        assert_eq!(result.len(), 1);
        let a = &result[0];
        assert_eq!(a.block.to_string(), "10.0.0.0/30");
        assert_eq!(a.first_host(), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(a.last_host(), Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(a.broadcast(), Ipv4Addr::new(10, 0, 0, 3));
        assert_eq!(a.available_hosts(), 2);
        // wasted = block usable hosts - requested hosts
        assert_eq!(a.wasted_hosts(), 1);
        assert_eq!(a.efficiency(), 50.0);
    }

    /// Two /25s exhaust a /24; the third request fails and the first two survive
    #[test]
    fn test_exhausted_base_keeps_partial_progress() {
        let failure = allocate_vlsm(base("192.168.1.0/24"), &[100, 100, 100]).unwrap_err();
        let completed: Vec<String> = failure.completed.iter().map(|a| a.block.to_string()).collect();
        assert_eq!(completed, vec!["192.168.1.0/25", "192.168.1.128/25"]);
        assert_eq!(
            failure.error,
            SubnetError::InsufficientSpace {
                host_count: 100,
                needed: 128,
                available: 0
            }
        );
    }

    /// Equal host counts keep their input order
    #[test]
    fn test_ties_keep_input_order() {
        let result = allocate_vlsm(base("192.168.10.0/24"), &[5, 5]).unwrap();
        assert_eq!(result[0].request.index, 0);
        assert_eq!(result[1].request.index, 1);
        for a in &result {
            assert_eq!(a.prefix(), 29);
            assert_eq!(a.available_hosts(), 6);
            assert_eq!(a.wasted_hosts(), 1);
        }
        assert_eq!(result[1].network(), Ipv4Addr::new(192, 168, 10, 8));
    }

    /// Results can be mapped back to the caller's input order
    #[test]
    fn test_correlate_back_to_input_order() {
        let hosts = [12, 120, 60, 2];
        let result = allocate_vlsm(base("10.10.0.0/24"), &hosts).unwrap();
        let mut by_input: Vec<Option<&SubnetAllocation>> = vec![None; hosts.len()];
        for a in &result {
            by_input[a.request.index] = Some(a);
        }
        for (i, slot) in by_input.iter().enumerate() {
            let a = slot.unwrap();
            assert_eq!(a.requested_hosts(), hosts[i]);
        }
    }

    #[test]
    fn test_topology_from_plan() {
        let b = base("192.168.1.0/24");
        let plan = plan_vlsm(b, &[50, 30, 20, 10], FailurePolicy::Abort).unwrap();
        let lab = build_topology(b, &plan.allocations, TopologyOptions { routers: 2, switches: 2 }).unwrap();
        let text = render_topology(&lab);

        assert!(text.contains("SUBNETS: 4 | ROUTERS: 2 | SWITCHES: 2"));
        assert!(text.contains("Interface GigabitEthernet0/0:"));
        assert!(text.contains("Router 1 Serial0/0/0 <---> Router 2 Serial0/0/1"));
        assert!(text.contains("VLAN 40: name 'Subnet_4'"));
        assert!(text.contains("... and 47 more devices configured sequentially."));
        assert!(text.contains("IP: 192.168.1.66  |  Mask: 255.255.255.224  |  Gateway: 192.168.1.65"));
    }

    #[test]
    fn test_all_formats_render_failed_plan() {
        let plan = plan_vlsm(base("192.168.1.0/28"), &[20], FailurePolicy::Abort).unwrap();
        for format in [ReportFormat::Detailed, ReportFormat::Summary, ReportFormat::Json] {
            let text = format.formatter().render(&plan).unwrap();
            assert!(text.contains("larger than the /28 base network"), "{:?}", format);
        }
    }

    /// Per-subnet devices on a /16, main network first
    #[test]
    fn test_advanced_lab_on_class_b() {
        let sites: Vec<SiteSpec> = ["1,1,20", "1,2,40", "2,1,10"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let lab = build_advanced_lab(base("172.16.0.0/16"), &sites, RoutingProtocol::Rip).unwrap();

        let blocks: Vec<String> = lab.sites.iter().map(|s| s.block.to_string()).collect();
        assert_eq!(blocks, vec!["172.16.0.64/27", "172.16.0.0/26", "172.16.0.96/28"]);
        assert_eq!(lab.routing_plan.len(), 3);

        let json = serde_json::to_value(&lab).unwrap();
        assert_eq!(json["routing"], "rip");
        assert_eq!(json["sites"][0]["routers"][0]["name"], "MainRouter_0");
        assert_eq!(json["sites"][2]["vlan_id"], 30);
    }
}
