//! Shared utilities: input validation and IP helpers.

pub mod ip_utils;
pub mod validation;

pub use validation::{parse_cidr, parse_host_list, InputError};
