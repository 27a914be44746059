//! Variable Length Subnet Mask planning.
//!
//! This module turns a base network and a list of host counts into a set of
//! non-overlapping, minimally sized subnets, largest first.

pub mod allocator;
pub mod types;

// Re-export commonly used types
pub use allocator::{allocate_vlsm, plan_vlsm};
pub use types::{
    AllocationFailure, AllocationResult, FailurePolicy, HostRequest, RequestFailure,
    SubnetAllocation, VlsmPlan,
};
