//! Router interconnection.
//!
//! Routers are chained in a line: router `r` links its Serial0/0/0 to
//! Serial0/0/1 on router `r + 1`.

use super::types::RouterLink;

pub fn generate_router_links(routers: u32) -> Vec<RouterLink> {
    (1..routers)
        .map(|r| RouterLink {
            from_router: r,
            from_interface: "Serial0/0/0".to_string(),
            to_router: r + 1,
            to_interface: "Serial0/0/1".to_string(),
        })
        .collect()
}
