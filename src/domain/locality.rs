//! Local vs. remote classification of the server host.
//!
//! A host counts as local when it is a loopback literal or resolves to an
//! address inside one of the private IPv4 ranges below. Resolution failures
//! count as remote.

use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

use tracing::debug;

const LOOPBACK_NAMES: &[&str] = &["localhost", "127.0.0.1", "::1"];

/// `(network, prefix length)` pairs.
const PRIVATE_V4_RANGES: &[(Ipv4Addr, u8)] = &[
    (Ipv4Addr::new(127, 0, 0, 0), 8),
    (Ipv4Addr::new(10, 0, 0, 0), 8),
    (Ipv4Addr::new(172, 16, 0, 0), 12),
    (Ipv4Addr::new(192, 168, 0, 0), 16),
];

pub fn is_private_v4(addr: Ipv4Addr) -> bool {
    PRIVATE_V4_RANGES.iter().any(|(network, prefix)| {
        let mask = u32::MAX << (32 - u32::from(*prefix));
        u32::from(addr) & mask == u32::from(*network) & mask
    })
}

/// Classify a bare hostname (no scheme, no port, IPv6 without brackets).
pub fn is_local_host(host: &str) -> bool {
    if LOOPBACK_NAMES.contains(&host) {
        return true;
    }

    match resolve_v4(host) {
        Some(addr) => {
            let local = is_private_v4(addr);
            debug!(host, %addr, local, "resolved server host");
            local
        }
        None => {
            debug!(host, "host did not resolve to an IPv4 address, treating as remote");
            false
        }
    }
}

fn resolve_v4(host: &str) -> Option<Ipv4Addr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        };
    }

    // Port is irrelevant, the resolver just needs one.
    (host, 0)
        .to_socket_addrs()
        .ok()?
        .find_map(|sa| match sa.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_ranges() {
        assert!(is_private_v4(Ipv4Addr::new(127, 0, 0, 1)));
        assert!(is_private_v4(Ipv4Addr::new(127, 255, 10, 3)));
        assert!(is_private_v4(Ipv4Addr::new(10, 1, 2, 3)));
        assert!(is_private_v4(Ipv4Addr::new(172, 16, 0, 1)));
        assert!(is_private_v4(Ipv4Addr::new(172, 31, 255, 254)));
        assert!(is_private_v4(Ipv4Addr::new(192, 168, 1, 20)));

        assert!(!is_private_v4(Ipv4Addr::new(172, 32, 0, 1)));
        assert!(!is_private_v4(Ipv4Addr::new(172, 15, 255, 255)));
        assert!(!is_private_v4(Ipv4Addr::new(192, 169, 0, 1)));
        assert!(!is_private_v4(Ipv4Addr::new(8, 8, 8, 8)));
        assert!(!is_private_v4(Ipv4Addr::new(11, 0, 0, 1)));
    }

    #[test]
    fn test_loopback_literals_are_local() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("::1"));
    }

    #[test]
    fn test_ip_literals_skip_dns() {
        assert!(is_local_host("10.0.0.7"));
        assert!(is_local_host("192.168.50.2"));
        assert!(!is_local_host("203.0.113.7"));
        assert!(!is_local_host("2001:db8::1"));
    }

    #[test]
    fn test_unresolvable_host_is_remote() {
        assert!(!is_local_host("ollama.invalid"));
    }
}
