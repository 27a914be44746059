//! VLSM allocation.
//!
//! Requests are stable-sorted by host count, largest first, and carved out of
//! the base network with a single forward-moving cursor. Each block is the
//! smallest power of two that fits `hosts + 2` addresses and starts on a
//! multiple of its own size. The cursor is a local value threaded through
//! the loop, so planning is a pure function of its inputs.

use std::net::Ipv4Addr;

use log::{debug, info, warn};

use super::types::{
    AllocationFailure, AllocationResult, FailurePolicy, HostRequest, RequestFailure,
    SubnetAllocation, VlsmPlan,
};
use crate::error::{Result, SubnetError};
use crate::net::arithmetic::{self, MAX_PREFIX};
use crate::net::NetworkBlock;

/// Allocate one subnet per host count inside `base`, stopping at the first
/// request that cannot be placed.
///
/// On success the allocations come back in processing order (descending host
/// count, ties in input order). On failure the error carries the allocations
/// completed before the failing request.
///
/// # Examples
/// ```
/// use subnetplan::net::NetworkBlock;
/// use subnetplan::vlsm::allocate_vlsm;
///
/// let base: NetworkBlock = "192.168.1.0/24".parse().unwrap();
/// let subnets = allocate_vlsm(base, &[10, 50]).unwrap();
/// assert_eq!(subnets[0].block.to_string(), "192.168.1.0/26");
/// assert_eq!(subnets[1].block.to_string(), "192.168.1.64/28");
/// ```
pub fn allocate_vlsm(base: NetworkBlock, host_counts: &[u32]) -> AllocationResult {
    let plan = plan_vlsm(base, host_counts, FailurePolicy::Abort)?;
    match plan.failures.into_iter().next() {
        None => Ok(plan.allocations),
        Some(failure) => Err(AllocationFailure {
            completed: plan.allocations,
            error: failure.error,
        }),
    }
}

/// Plan a VLSM scheme under the given failure policy.
///
/// Input-level problems (no requests, a request below 1) are returned as
/// errors. Per-request placement failures are recorded in the plan.
pub fn plan_vlsm(base: NetworkBlock, host_counts: &[u32], policy: FailurePolicy) -> Result<VlsmPlan> {
    let requests = validate_requests(host_counts)?;

    let mut sorted = requests.clone();
    // sort_by is stable: equal host counts keep their input order
    sorted.sort_by(|a, b| b.host_count.cmp(&a.host_count));

    info!(
        "Planning {} subnets in {} ({:?} on failure)",
        sorted.len(),
        base,
        policy
    );

    let mut allocations = Vec::with_capacity(sorted.len());
    let mut failures = Vec::new();
    let mut cursor = u64::from(base.network_u32());

    for (i, request) in sorted.iter().enumerate() {
        let position = i + 1;
        match place_request(&base, cursor, *request, position) {
            Ok(allocation) => {
                debug!(
                    "Subnet {}: {} hosts -> {} ({} usable, {} wasted)",
                    position,
                    request.host_count,
                    allocation.block,
                    allocation.available_hosts(),
                    allocation.wasted_hosts()
                );
                cursor = allocation.next_cursor();
                allocations.push(allocation);
            }
            Err(error) => {
                warn!("Subnet {}: {} hosts not placed: {}", position, request.host_count, error);
                failures.push(RequestFailure {
                    position,
                    request: *request,
                    error,
                });
                if policy == FailurePolicy::Abort {
                    break;
                }
            }
        }
    }

    Ok(VlsmPlan {
        base,
        policy,
        requests,
        sorted,
        allocations,
        failures,
    })
}

fn validate_requests(host_counts: &[u32]) -> Result<Vec<HostRequest>> {
    if host_counts.is_empty() {
        return Err(SubnetError::EmptyRequestSet);
    }
    if let Some((index, &host_count)) = host_counts.iter().enumerate().find(|(_, h)| **h < 1) {
        return Err(SubnetError::InvalidRequest { index, host_count });
    }
    Ok(HostRequest::from_counts(host_counts))
}

/// Place a single request at or after `cursor`.
fn place_request(
    base: &NetworkBlock,
    cursor: u64,
    request: HostRequest,
    position: usize,
) -> Result<SubnetAllocation> {
    let host_bits = arithmetic::host_bits_needed(request.host_count).map_err(|_| {
        SubnetError::InvalidRequest {
            index: request.index,
            host_count: request.host_count,
        }
    })?;

    if host_bits > u32::from(MAX_PREFIX - base.prefix()) {
        return Err(SubnetError::BlockTooLarge {
            host_count: request.host_count,
            host_bits,
            base_prefix: base.prefix(),
        });
    }

    let prefix = MAX_PREFIX - host_bits as u8;
    let size = arithmetic::block_size(prefix)?;
    let start = arithmetic::align_to_block(cursor, size);
    let base_end = u64::from(base.broadcast_u32());

    if start + size - 1 > base_end {
        return Err(SubnetError::InsufficientSpace {
            host_count: request.host_count,
            needed: size,
            available: (base_end + 1).saturating_sub(start),
        });
    }

    // start <= base_end, which is a u32
    let network = Ipv4Addr::from(start as u32);
    let block = NetworkBlock::new(network, prefix)?;

    Ok(SubnetAllocation {
        position,
        request,
        block,
        host_bits,
        padding: start - cursor,
    })
}
