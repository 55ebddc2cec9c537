//! Input checks shared by the registry and the CLI.

use std::net::IpAddr;

/// Names that collide with the GET query keywords.
pub const RESERVED_NAMES: [&str; 3] = ["leader", "active", "all"];

/// Whether `name` is one of the query keywords (case-insensitive, since
/// keywords are matched that way on lookup).
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Whether `address` is a syntactically valid IPv4 or IPv6 address.
///
/// Ports are not accepted here; the engine port comes from configuration.
pub fn is_valid_address(address: &str) -> bool {
    address.parse::<IpAddr>().is_ok()
}
