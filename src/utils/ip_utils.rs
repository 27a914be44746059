use std::net::Ipv4Addr;

/// IP utility functions for formatting and stepping through addresses

/// Render a 32-bit value as four dot-separated 8-bit binary groups
///
/// # Examples
/// ```
/// use subnetplan::utils::ip_utils::to_dotted_binary;
///
/// assert_eq!(to_dotted_binary(0xFFFF_FFC0), "11111111.11111111.11111111.11000000");
/// ```
pub fn to_dotted_binary(value: u32) -> String {
    value
        .to_be_bytes()
        .iter()
        .map(|octet| format!("{:08b}", octet))
        .collect::<Vec<_>>()
        .join(".")
}

/// Address `offset` positions after `ip`, or `None` past 255.255.255.255
pub fn offset_ip(ip: Ipv4Addr, offset: u64) -> Option<Ipv4Addr> {
    let next = u64::from(u32::from(ip)).checked_add(offset)?;
    u32::try_from(next).ok().map(Ipv4Addr::from)
}

/// Generate `count` consecutive addresses starting at `start`
pub fn generate_ip_range(start: Ipv4Addr, count: usize) -> Result<Vec<Ipv4Addr>, String> {
    (0..count as u64)
        .map(|i| offset_ip(start, i).ok_or_else(|| "IP range would exceed valid range".to_string()))
        .collect()
}

/// Check if an IPv4 address is private (RFC 1918)
pub fn is_private_ip(ip: Ipv4Addr) -> bool {
    ip.is_private()
}
