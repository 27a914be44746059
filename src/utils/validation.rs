//! Input validation utilities.
//!
//! This module turns user-typed text (a CIDR, a host count, a comma
//! separated list of host counts) into typed values. The allocator itself
//! never sees raw strings.

use std::net::Ipv4Addr;

use crate::net::NetworkBlock;

/// Errors for malformed user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Invalid format '{input}'. Use IP/CIDR (e.g. 192.168.0.11/24)")]
    MissingPrefix { input: String },

    #[error("Invalid IP address '{input}'")]
    InvalidAddress { input: String },

    #[error("Invalid prefix '{input}' (must be 0-32)")]
    InvalidPrefix { input: String },

    #[error("{field} must be a valid integer, got '{input}'")]
    NotAnInteger { field: String, input: String },

    #[error("{field} must be greater than 0")]
    NotPositive { field: String },

    #[error("Enter at least one host count")]
    EmptyList,

    #[error("Expected {expected} comma-separated values, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Parse `a.b.c.d/p` into the network containing that address.
///
/// Host bits are masked off, so `192.168.0.11/24` yields `192.168.0.0/24`.
///
/// # Examples
/// ```
/// use subnetplan::utils::validation::parse_cidr;
///
/// let block = parse_cidr("192.168.0.11/24").unwrap();
/// assert_eq!(block.to_string(), "192.168.0.0/24");
/// assert!(parse_cidr("192.168.0.11").is_err());
/// ```
pub fn parse_cidr(input: &str) -> Result<NetworkBlock, InputError> {
    let (address, prefix) = parse_address_prefix(input)?;
    NetworkBlock::containing(address, prefix).map_err(|_| InputError::InvalidPrefix {
        input: prefix.to_string(),
    })
}

/// Split `a.b.c.d/p` into its address and prefix without normalising.
pub fn parse_address_prefix(input: &str) -> Result<(Ipv4Addr, u8), InputError> {
    let input = input.trim();
    let (ip_part, prefix_part) = input.split_once('/').ok_or_else(|| InputError::MissingPrefix {
        input: input.to_string(),
    })?;

    let address = ip_part
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| InputError::InvalidAddress {
            input: ip_part.to_string(),
        })?;

    let prefix = prefix_part
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| InputError::InvalidPrefix {
            input: prefix_part.to_string(),
        })?;

    Ok((address, prefix))
}

/// Parse a strictly positive integer for the named field
pub fn parse_positive_int(value: &str, field: &str) -> Result<u32, InputError> {
    let num = value
        .trim()
        .parse::<i64>()
        .map_err(|_| InputError::NotAnInteger {
            field: field.to_string(),
            input: value.trim().to_string(),
        })?;
    if num < 1 {
        return Err(InputError::NotPositive {
            field: field.to_string(),
        });
    }
    u32::try_from(num).map_err(|_| InputError::NotAnInteger {
        field: field.to_string(),
        input: value.trim().to_string(),
    })
}

/// Parse a comma-separated list of host counts, ignoring empty entries.
///
/// # Examples
/// ```
/// use subnetplan::utils::validation::parse_host_list;
///
/// assert_eq!(parse_host_list("50, 30,20,10"), Ok(vec![50, 30, 20, 10]));
/// assert!(parse_host_list("50,0").is_err());
/// assert!(parse_host_list(" , ").is_err());
/// ```
pub fn parse_host_list(input: &str) -> Result<Vec<u32>, InputError> {
    let hosts = input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_positive_int(entry, "Host count"))
        .collect::<Result<Vec<_>, _>>()?;

    if hosts.is_empty() {
        return Err(InputError::EmptyList);
    }
    Ok(hosts)
}

/// Parse a host list that must contain exactly `expected` entries
pub fn parse_device_list(input: &str, expected: usize) -> Result<Vec<u32>, InputError> {
    let hosts = parse_host_list(input)?;
    if hosts.len() != expected {
        return Err(InputError::CountMismatch {
            expected,
            actual: hosts.len(),
        });
    }
    Ok(hosts)
}

/// Parse `routers,switches,hosts` device counts for one subnet.
///
/// Zero is allowed for every field; a subnet may have no routers of its own.
pub fn parse_site_counts(input: &str) -> Result<[u32; 3], InputError> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    let &[routers, switches, hosts] = fields.as_slice() else {
        return Err(InputError::CountMismatch {
            expected: 3,
            actual: fields.len(),
        });
    };

    let count = |value: &str, field: &str| {
        value.parse::<u32>().map_err(|_| InputError::NotAnInteger {
            field: field.to_string(),
            input: value.to_string(),
        })
    };
    Ok([
        count(routers, "Routers")?,
        count(switches, "Switches")?,
        count(hosts, "Hosts")?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cidr() {
        assert_eq!(parse_cidr("10.0.0.0/30").unwrap().to_string(), "10.0.0.0/30");
        assert_eq!(parse_cidr(" 10.0.0.9 / 29 ").unwrap().to_string(), "10.0.0.8/29");

        assert!(matches!(parse_cidr("10.0.0.0"), Err(InputError::MissingPrefix { .. })));
        assert!(matches!(parse_cidr("10.0.0/8"), Err(InputError::InvalidAddress { .. })));
        assert!(matches!(parse_cidr("10.0.0.0/33"), Err(InputError::InvalidPrefix { .. })));
        assert!(matches!(parse_cidr("10.0.0.0/x"), Err(InputError::InvalidPrefix { .. })));
    }

    #[test]
    fn test_parse_positive_int() {
        assert_eq!(parse_positive_int("7", "Routers"), Ok(7));
        assert_eq!(
            parse_positive_int("0", "Routers"),
            Err(InputError::NotPositive { field: "Routers".to_string() })
        );
        assert!(matches!(
            parse_positive_int("-3", "Routers"),
            Err(InputError::NotPositive { .. })
        ));
        assert!(matches!(
            parse_positive_int("abc", "Routers"),
            Err(InputError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_parse_device_list() {
        assert_eq!(parse_device_list("5,5", 2), Ok(vec![5, 5]));
        assert_eq!(
            parse_device_list("5,5,5", 2),
            Err(InputError::CountMismatch { expected: 2, actual: 3 })
        );
        assert!(matches!(
            parse_device_list("5,x", 2),
            Err(InputError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_parse_site_counts() {
        assert_eq!(parse_site_counts("1, 2,40"), Ok([1, 2, 40]));
        assert_eq!(parse_site_counts("0,0,0"), Ok([0, 0, 0]));
        assert_eq!(
            parse_site_counts("1,2"),
            Err(InputError::CountMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(
            parse_site_counts("1,-2,4"),
            Err(InputError::NotAnInteger {
                field: "Switches".to_string(),
                input: "-2".to_string()
            })
        );
    }
}
