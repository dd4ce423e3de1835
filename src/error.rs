//! Error types for address, network and configuration operations.
//!
//! Every fallible operation returns an [`IpError`]. The variants group into
//! five kinds, see [`ErrorKind`].

use std::net::IpAddr;
use thiserror::Error;

use crate::models::{Address, Network};

/// The broad category an [`IpError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A prefix length outside `0..=32`, or an invalid subnet split.
    Range,
    /// Malformed text handed to a parser.
    Format,
    /// No text at all handed to a parser.
    NullInput,
    /// An IPv6 address where an IPv4 one was required.
    TypeMismatch,
    /// A host address that does not belong to the given network.
    Domain,
}

/// Errors returned by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpError {
    /// Prefix length is not in `0..=32`.
    #[error("prefix length {prefix} is out of range 0..=32")]
    PrefixOutOfRange { prefix: u8 },

    /// A network can only be split into longer prefixes, up to /32.
    #[error("cannot split a /{current} network into /{requested} subnets")]
    InvalidSubnetPrefix { current: u8, requested: u8 },

    /// Text could not be parsed as the requested value.
    #[error("invalid {kind} format: {input:?}")]
    Format { kind: &'static str, input: String },

    /// No text was given to parse.
    #[error("missing {kind} input")]
    NullInput { kind: &'static str },

    /// Conversion from a generic IP address that is not IPv4.
    #[error("{address} is not an IPv4 address")]
    NotIpv4 { address: IpAddr },

    /// Host address lies outside the network it is supposed to belong to.
    #[error("address {address} is not inside network {network}")]
    AddressOutsideNetwork { address: Address, network: Network },
}

impl IpError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IpError::PrefixOutOfRange { .. } | IpError::InvalidSubnetPrefix { .. } => {
                ErrorKind::Range
            }
            IpError::Format { .. } => ErrorKind::Format,
            IpError::NullInput { .. } => ErrorKind::NullInput,
            IpError::NotIpv4 { .. } => ErrorKind::TypeMismatch,
            IpError::AddressOutsideNetwork { .. } => ErrorKind::Domain,
        }
    }

    pub(crate) fn format(kind: &'static str, input: &str) -> IpError {
        log::debug!("rejected {kind} input {input:?}");
        IpError::Format {
            kind,
            input: input.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IpError>;

/// Turn an absent input into [`IpError::NullInput`].
pub(crate) fn require<T>(input: Option<T>, kind: &'static str) -> Result<T> {
    input.ok_or(IpError::NullInput { kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            IpError::PrefixOutOfRange { prefix: 33 }.kind(),
            ErrorKind::Range
        );
        assert_eq!(
            IpError::InvalidSubnetPrefix {
                current: 24,
                requested: 24
            }
            .kind(),
            ErrorKind::Range
        );
        assert_eq!(IpError::format("address", "1.2.3").kind(), ErrorKind::Format);
        assert_eq!(
            require::<&str>(None, "network").unwrap_err().kind(),
            ErrorKind::NullInput
        );
        assert_eq!(require(Some(5), "network").unwrap(), 5);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            IpError::PrefixOutOfRange { prefix: 40 }.to_string(),
            "prefix length 40 is out of range 0..=32"
        );
        assert_eq!(
            IpError::format("network", "10.0.0.0/").to_string(),
            "invalid network format: \"10.0.0.0/\""
        );
        assert_eq!(
            IpError::NullInput { kind: "address" }.to_string(),
            "missing address input"
        );
    }
}
