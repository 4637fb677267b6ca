//! # Target Resolution
//!
//! Decides which host the daily tests run against. Two strategies exist:
//!
//! * **Direct**: the user names a host and [`resolve_direct`] picks its first
//!   IPv6 address from DNS.
//! * **Random**: a candidate is drawn from a site list until one answers a
//!   liveness probe, see [`random`].

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use hecert_common::target::Target;
use tracing::debug;

use crate::error::ResolutionError;

pub mod random;

pub async fn resolve_direct(host: &str) -> Result<Target, ResolutionError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|source| ResolutionError::Lookup {
            host: host.to_string(),
            source,
        })?
        .collect();
    debug!("'{}' resolved to {} address(es)", host, addrs.len());

    let address: Ipv6Addr = first_ipv6(addrs.iter().map(SocketAddr::ip)).ok_or_else(|| {
        ResolutionError::NoIpv6Address {
            host: host.to_string(),
        }
    })?;

    Ok(Target::new(host, address))
}

/// Returns the first address that is not IPv4.
///
/// IPv4-mapped addresses (`::ffff:a.b.c.d`) count as IPv4.
pub fn first_ipv6(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv6Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V6(v6) if v6.to_ipv4_mapped().is_none() => Some(v6),
        _ => None,
    })
}
