//! # Subnetplan - IPv4 subnetting and VLSM planning
//!
//! This library computes IPv4 subnetting schemes for teaching and lab
//! preparation. Its core is a Variable Length Subnet Mask (VLSM) allocator:
//! given a base network and the number of hosts each subnet needs, it carves
//! out minimally sized, block-aligned, non-overlapping subnets, largest
//! first, and reports the derivation of each one.
//!
//! ## Architecture
//!
//! - `net`: Bit-level IPv4 arithmetic and the `NetworkBlock` value type
//! - `vlsm`: The VLSM allocator and its request/result types
//! - `subnet`: Equal-size subnetting by subnet count
//! - `topology`: Router/switch/VLAN layout built on an allocation, and
//!   per-subnet labs with a static/RIP/OSPF routing plan
//! - `report`: Detailed text, summary text and JSON formatters
//! - `config` / `config_loader`: YAML plan files
//! - `utils`: Input parsing and address helpers
//! - `error`: The `SubnetError` taxonomy
//!
//! ## Example Usage
//!
//! ```rust
//! use subnetplan::net::NetworkBlock;
//! use subnetplan::vlsm::allocate_vlsm;
//!
//! let base: NetworkBlock = "192.168.1.0/24".parse()?;
//! let subnets = allocate_vlsm(base, &[50, 30, 20, 10])?;
//!
//! assert_eq!(subnets[0].block.to_string(), "192.168.1.0/26");
//! assert_eq!(subnets[0].mask_string(), "255.255.255.192");
//! assert_eq!(subnets[3].block.to_string(), "192.168.1.128/28");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Failure Policy
//!
//! By default allocation stops at the first request that does not fit and
//! returns the subnets completed before it, since anything placed after a
//! gap would misrepresent the remaining space. [`vlsm::plan_vlsm`] also
//! offers a skip-and-continue mode.
//!
//! ## Error Handling
//!
//! Library functions return typed errors (`SubnetError`, `InputError`,
//! `TopologyError`, `ValidationError`). The command line binary wraps them
//! with `color_eyre` for reporting.

pub mod error;
pub mod net;
pub mod vlsm;
pub mod subnet;
pub mod topology;
pub mod report;
pub mod config;
pub mod config_loader;
pub mod utils;

pub use error::SubnetError;
pub use net::NetworkBlock;
pub use vlsm::{allocate_vlsm, plan_vlsm, AllocationResult, SubnetAllocation};
