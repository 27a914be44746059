//! JSON reports.

use color_eyre::eyre::Context;
use color_eyre::Result;
use serde::Serialize;

use super::ReportFormatter;
use crate::vlsm::VlsmPlan;

/// Report metadata
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub tool_version: &'static str,
}

/// Per-subnet row with every derived field spelled out
#[derive(Debug, Serialize)]
struct SubnetRow {
    position: usize,
    input_index: usize,
    requested_hosts: u32,
    network: String,
    prefix: u8,
    mask: String,
    wildcard: String,
    broadcast: String,
    first_host: String,
    last_host: String,
    host_bits: u32,
    block_size: u64,
    available_hosts: u64,
    wasted_hosts: u64,
    efficiency: f64,
    padding: u64,
}

#[derive(Debug, Serialize)]
struct Totals {
    requested_hosts: u64,
    allocated_addresses: u64,
    padding_addresses: u64,
    remaining_addresses: u64,
    utilization: f64,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    metadata: ReportMetadata,
    plan: &'a VlsmPlan,
    subnets: Vec<SubnetRow>,
    totals: Totals,
    complete: bool,
}

/// Pretty-printed JSON of the plan plus the derived fields of every subnet
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReport;

impl ReportFormatter for JsonReport {
    fn render(&self, plan: &VlsmPlan) -> Result<String> {
        let subnets = plan
            .allocations
            .iter()
            .map(|a| SubnetRow {
                position: a.position,
                input_index: a.request.index,
                requested_hosts: a.requested_hosts(),
                network: a.network().to_string(),
                prefix: a.prefix(),
                mask: a.mask_string(),
                wildcard: a.wildcard().to_string(),
                broadcast: a.broadcast().to_string(),
                first_host: a.first_host().to_string(),
                last_host: a.last_host().to_string(),
                host_bits: a.host_bits,
                block_size: a.block_size(),
                available_hosts: a.available_hosts(),
                wasted_hosts: a.wasted_hosts(),
                efficiency: a.efficiency(),
                padding: a.padding,
            })
            .collect();

        let document = JsonDocument {
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION"),
            },
            plan,
            subnets,
            totals: Totals {
                requested_hosts: plan.total_requested_hosts(),
                allocated_addresses: plan.allocated_addresses(),
                padding_addresses: plan.padding_addresses(),
                remaining_addresses: plan.remaining_addresses(),
                utilization: plan.utilization(),
            },
            complete: plan.is_complete(),
        };

        serde_json::to_string_pretty(&document).context("Failed to serialize report to JSON")
    }
}
