//! Loopback-guarded web entry point.
//!
//! The check exposes environment details (paths, versions, configuration
//! values), so the web surface only answers requests originating from the
//! machine itself. Everything else is refused before any detail is
//! rendered.

use std::net::IpAddr;

use thiserror::Error;

use crate::report::CheckOutcome;
use crate::requirements::RequirementCollection;

/// Refusal to serve the check to a remote client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebAccessError {
    #[error("This script is only accessible from localhost (request from {remote})")]
    Forbidden { remote: IpAddr },
}

/// Answer a web request for the readiness check.
///
/// Accepts loopback addresses only, IPv4 and IPv6 alike. The outcome is
/// produced for the caller to render; refused requests carry the remote
/// address for the error page.
pub fn respond(
    remote: IpAddr,
    collection: &RequirementCollection,
) -> Result<CheckOutcome, WebAccessError> {
    if !remote.is_loopback() {
        tracing::warn!("Refused readiness check request from {}", remote);
        return Err(WebAccessError::Forbidden { remote });
    }

    Ok(CheckOutcome::from_collection(collection, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn collection() -> RequirementCollection {
        let mut c = RequirementCollection::new();
        c.add_requirement(true, "ok", "h");
        c.add_requirement(false, "bad", "h");
        c
    }

    #[test]
    fn ipv4_loopback_is_served() {
        let outcome = respond(IpAddr::V4(Ipv4Addr::LOCALHOST), &collection()).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.failed_requirements.len(), 1);
    }

    #[test]
    fn ipv6_loopback_is_served() {
        assert!(respond(IpAddr::V6(Ipv6Addr::LOCALHOST), &collection()).is_ok());
    }

    #[test]
    fn remote_address_is_refused_with_address_in_error() {
        let remote = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
        let err = respond(remote, &collection()).unwrap_err();
        assert_eq!(err, WebAccessError::Forbidden { remote });
        assert!(err.to_string().contains("203.0.113.7"));
    }

    #[test]
    fn private_network_address_is_still_refused() {
        let remote = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10));
        assert!(respond(remote, &collection()).is_err());
    }
}
