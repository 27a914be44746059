//! VLSM request and result types.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::SubnetError;
use crate::net::NetworkBlock;

/// Number of usable hosts wanted in one subnet.
///
/// `index` is the request's position in the caller's input so results,
/// which come back in descending size order, can be matched back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostRequest {
    pub index: usize,
    pub host_count: u32,
}

impl HostRequest {
    pub fn new(index: usize, host_count: u32) -> Self {
        Self { index, host_count }
    }

    /// Number requests by their position in `host_counts`
    pub fn from_counts(host_counts: &[u32]) -> Vec<Self> {
        host_counts
            .iter()
            .enumerate()
            .map(|(index, &host_count)| Self::new(index, host_count))
            .collect()
    }
}

/// What to do when a request cannot be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure; only subnets before it are valid
    #[default]
    Abort,
    /// Record the failure, leave the cursor where it was and keep going
    #[serde(alias = "skip")]
    SkipAndContinue,
}

/// One satisfied request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetAllocation {
    /// 1-based place in descending processing order
    pub position: usize,
    pub request: HostRequest,
    pub block: NetworkBlock,
    /// Host bits `n` chosen for this request (prefix = 32 - n)
    pub host_bits: u32,
    /// Addresses skipped before this block to align it to its own size
    pub padding: u64,
}

impl SubnetAllocation {
    pub fn network(&self) -> Ipv4Addr {
        self.block.network()
    }

    pub fn prefix(&self) -> u8 {
        self.block.prefix()
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.block.mask()
    }

    /// Dotted-decimal mask, e.g. `255.255.255.192`
    pub fn mask_string(&self) -> String {
        self.block.mask().to_string()
    }

    pub fn wildcard(&self) -> Ipv4Addr {
        self.block.wildcard()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.block.broadcast()
    }

    pub fn first_host(&self) -> Ipv4Addr {
        self.block.first_host()
    }

    pub fn last_host(&self) -> Ipv4Addr {
        self.block.last_host()
    }

    pub fn block_size(&self) -> u64 {
        self.block.total_addresses()
    }

    pub fn requested_hosts(&self) -> u32 {
        self.request.host_count
    }

    pub fn available_hosts(&self) -> u64 {
        self.block.usable_hosts()
    }

    pub fn wasted_hosts(&self) -> u64 {
        self.available_hosts()
            .saturating_sub(u64::from(self.request.host_count))
    }

    /// requested / usable * 100
    pub fn efficiency(&self) -> f64 {
        let available = self.available_hosts();
        if available == 0 {
            return 0.0;
        }
        f64::from(self.request.host_count) / available as f64 * 100.0
    }

    /// Cursor value after this block (broadcast + 1), as a 64-bit integer
    pub fn next_cursor(&self) -> u64 {
        u64::from(self.block.broadcast_u32()) + 1
    }
}

/// A request that could not be placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestFailure {
    pub position: usize,
    pub request: HostRequest,
    #[serde(serialize_with = "serialize_display")]
    pub error: SubnetError,
}

fn serialize_display<S: serde::Serializer>(
    error: &SubnetError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Full outcome of one planning pass, used by reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VlsmPlan {
    pub base: NetworkBlock,
    pub policy: FailurePolicy,
    /// Requests in caller order
    pub requests: Vec<HostRequest>,
    /// Requests in processing (descending) order
    pub sorted: Vec<HostRequest>,
    pub allocations: Vec<SubnetAllocation>,
    pub failures: Vec<RequestFailure>,
}

impl VlsmPlan {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_requested_hosts(&self) -> u64 {
        self.requests.iter().map(|r| u64::from(r.host_count)).sum()
    }

    /// Addresses consumed by allocated blocks, alignment padding excluded
    pub fn allocated_addresses(&self) -> u64 {
        self.allocations.iter().map(|a| a.block_size()).sum()
    }

    pub fn padding_addresses(&self) -> u64 {
        self.allocations.iter().map(|a| a.padding).sum()
    }

    /// Addresses after the last allocated block up to the base broadcast
    pub fn remaining_addresses(&self) -> u64 {
        let end = u64::from(self.base.broadcast_u32()) + 1;
        let cursor = self
            .allocations
            .last()
            .map(SubnetAllocation::next_cursor)
            .unwrap_or_else(|| u64::from(self.base.network_u32()));
        end.saturating_sub(cursor)
    }

    /// Share of the base network handed out to subnets, in percent
    pub fn utilization(&self) -> f64 {
        self.allocated_addresses() as f64 / self.base.total_addresses() as f64 * 100.0
    }
}

/// Allocation stopped at a failing request.
///
/// `completed` holds the subnets placed before the failure; those are the
/// only valid part of the scheme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Allocation stopped after {} completed subnet(s)", .completed.len())]
pub struct AllocationFailure {
    pub completed: Vec<SubnetAllocation>,
    #[source]
    pub error: SubnetError,
}

impl From<SubnetError> for AllocationFailure {
    fn from(error: SubnetError) -> Self {
        Self {
            completed: Vec::new(),
            error,
        }
    }
}

/// Ordered allocations, or the failure with the progress made before it
pub type AllocationResult = Result<Vec<SubnetAllocation>, AllocationFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation(cidr: &str, host_count: u32) -> SubnetAllocation {
        let block: NetworkBlock = cidr.parse().unwrap();
        SubnetAllocation {
            position: 1,
            request: HostRequest::new(0, host_count),
            host_bits: 32 - u32::from(block.prefix()),
            block,
            padding: 0,
        }
    }

    #[test]
    fn test_allocation_fields() {
        let a = allocation("192.168.1.0/26", 50);
        assert_eq!(a.mask_string(), "255.255.255.192");
        assert_eq!(a.first_host(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(a.last_host(), Ipv4Addr::new(192, 168, 1, 62));
        assert_eq!(a.broadcast(), Ipv4Addr::new(192, 168, 1, 63));
        assert_eq!(a.available_hosts(), 62);
        assert_eq!(a.wasted_hosts(), 12);
        assert!((a.efficiency() - 80.645).abs() < 0.01);
        assert_eq!(a.next_cursor(), u64::from(u32::from(Ipv4Addr::new(192, 168, 1, 64))));
    }

    #[test]
    fn test_full_efficiency() {
        let a = allocation("10.0.0.0/30", 2);
        assert_eq!(a.wasted_hosts(), 0);
        assert_eq!(a.efficiency(), 100.0);
    }

    #[test]
    fn test_policy_names() {
        let p: FailurePolicy = serde_yaml::from_str("skip").unwrap();
        assert_eq!(p, FailurePolicy::SkipAndContinue);
        let p: FailurePolicy = serde_yaml::from_str("abort").unwrap();
        assert_eq!(p, FailurePolicy::Abort);
        assert_eq!(FailurePolicy::default(), FailurePolicy::Abort);
    }

    #[test]
    fn test_failure_displays_cause() {
        use std::error::Error;

        let failure = AllocationFailure::from(SubnetError::EmptyRequestSet);
        assert!(failure.completed.is_empty());
        assert_eq!(failure.to_string(), "Allocation stopped after 0 completed subnet(s)");
        assert_eq!(
            failure.source().map(|cause| cause.to_string()),
            Some("No host requests supplied".to_string())
        );
    }

    #[test]
    fn test_failure_chain_names_each_message_once() {
        use std::error::Error;

        let base: NetworkBlock = "192.168.1.0/24".parse().unwrap();
        let failure = crate::vlsm::allocate_vlsm(base, &[100, 100, 100]).unwrap_err();

        let mut chain = vec![failure.to_string()];
        let mut cause = failure.source();
        while let Some(err) = cause {
            chain.push(err.to_string());
            cause = err.source();
        }
        assert_eq!(
            chain,
            vec![
                "Allocation stopped after 2 completed subnet(s)".to_string(),
                "Not enough space for 100 hosts: need 128 addresses but only 0 remain".to_string(),
            ]
        );
    }
}
