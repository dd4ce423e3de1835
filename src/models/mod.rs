//! Value types for IPv4 addressing.
//!
//! - [`Address`] - a single IPv4 address
//! - [`Network`] - a CIDR network, with lazy address and subnet iterators
//! - [`Configuration`] - host address, prefix length and gateway

mod address;
mod configuration;
mod network;

// Re-export public types
pub use address::{get_cidr_mask, Address, MAX_LENGTH};
pub use configuration::Configuration;
pub use network::{AddressRange, Network, Subnets};
