//! Lead intake HTTP server

pub mod http_service;

pub use http_service::{router, AppState};

use anyhow::Context;
use std::net::{IpAddr, SocketAddr};

/// Socket address for a bind host given as a bare IPv4 or IPv6 address
pub fn listen_address(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("Invalid listen host '{}'", host))?;
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_listen_address_accepts_ipv4_and_ipv6() {
        let v4 = listen_address("0.0.0.0", 8000).unwrap();
        assert_eq!(v4, SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000));

        let v6 = listen_address("::", 8000).unwrap();
        assert_eq!(v6, SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 8000));
        assert_eq!(v6.to_string(), "[::]:8000");
    }

    #[test]
    fn test_listen_address_rejects_hostnames() {
        assert!(listen_address("localhost", 8000).is_err());
    }
}
