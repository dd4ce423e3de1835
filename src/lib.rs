//! IPv4 address, CIDR network and host configuration value types.
//!
//! ```
//! use ipv4_netcalc::{Address, Network};
//!
//! let net: Network = "192.168.1.100/24".parse().unwrap();
//! assert_eq!(net.to_string(), "192.168.1.0/24");
//! assert_eq!(net.host_count(), 254);
//! assert!(net.contains(Address::new(192, 168, 1, 7)));
//! ```

pub mod error;
pub mod models;
pub mod processing;

pub use error::{ErrorKind, IpError, Result};
pub use models::{Address, AddressRange, Configuration, Network, Subnets};
