//! Host interface configuration: address, prefix length and default gateway.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::address::{check_prefix, Address};
use super::network::{parse_prefix, Network};
use crate::error::{require, IpError, Result};

lazy_static! {
    // "10.0.0.5/24 gw 10.0.0.1", keyword is case insensitive
    static ref GATEWAY_KEYWORD: Regex =
        Regex::new(r"(?i)^\s*(\S+)\s+(?:gw|gateway)\s+(\S+)\s*$").expect("Invalid Regex?");
}

/// An address with its prefix length and a gateway.
///
/// The address keeps its host bits, unlike [`Network`]. Nothing beyond the
/// prefix range is checked on construction, see [`Configuration::is_valid`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Configuration {
    address: Address,
    prefix_length: u8,
    gateway: Address,
}

impl Configuration {
    pub fn new(address: Address, prefix_length: u8, gateway: Address) -> Result<Configuration> {
        Ok(Configuration {
            address,
            prefix_length: check_prefix(prefix_length)?,
            gateway,
        })
    }

    /// Configuration for `host_address` inside `network`.
    ///
    /// Fails with [`IpError::AddressOutsideNetwork`] when the host is not part of it.
    pub fn from_network(
        network: &Network,
        host_address: Address,
        gateway: Address,
    ) -> Result<Configuration> {
        if !network.contains(host_address) {
            return Err(IpError::AddressOutsideNetwork {
                address: host_address,
                network: *network,
            });
        }
        Ok(Configuration {
            address: host_address,
            prefix_length: network.prefix_length(),
            gateway,
        })
    }

    /// Configuration using the first usable host of `network`.
    pub fn from_network_first_host(network: &Network, gateway: Address) -> Configuration {
        Configuration {
            address: network.first_host_address(),
            prefix_length: network.prefix_length(),
            gateway,
        }
    }

    /// Parse an optional string, `None` is reported as [`IpError::NullInput`].
    pub fn parse(text: Option<&str>) -> Result<Configuration> {
        require(text, "configuration")?.parse()
    }

    /// Non failing parse, returns `None` for malformed text.
    pub fn try_parse(text: &str) -> Option<Configuration> {
        text.parse().ok()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    pub fn gateway(&self) -> Address {
        self.gateway
    }

    pub fn network(&self) -> Network {
        Network::from_checked(self.address, self.prefix_length)
    }

    pub fn network_address(&self) -> Address {
        self.network().network_address()
    }

    pub fn broadcast_address(&self) -> Address {
        self.network().broadcast_address()
    }

    pub fn subnet_mask(&self) -> Address {
        self.network().subnet_mask()
    }

    /// Address and gateway are both usable hosts of the same network.
    ///
    /// On a /31 or /32 every address is usable, so only the gateway
    /// membership is checked.
    pub fn is_valid(&self) -> bool {
        let network = self.network();
        if self.prefix_length >= 31 {
            return network.contains(self.gateway);
        }
        let reserved = [network.network_address(), network.broadcast_address()];
        if reserved.contains(&self.address) {
            return false;
        }
        network.contains(self.gateway) && !reserved.contains(&self.gateway)
    }

    /// True when `other` is on the local network, no gateway needed.
    pub fn can_reach_directly(&self, other: Address) -> bool {
        self.network().contains(other)
    }
}

/// Split "address/prefix" without normalising the address.
fn parse_host_cidr(s: &str) -> Option<(Address, u8)> {
    let (addr, prefix) = s.split_once('/')?;
    Some((Address::try_parse(addr)?, parse_prefix(prefix)?))
}

fn parse_parts(cidr: &str, gateway: &str) -> Option<Configuration> {
    let (address, prefix_length) = parse_host_cidr(cidr)?;
    Some(Configuration {
        address,
        prefix_length,
        gateway: Address::try_parse(gateway)?,
    })
}

impl FromStr for Configuration {
    type Err = IpError;

    /// Accepts "addr/prefix gw gateway" (or "gateway" as keyword) and
    /// "addr/prefix,gateway".
    fn from_str(s: &str) -> Result<Configuration> {
        let keyword = GATEWAY_KEYWORD
            .captures(s)
            .and_then(|caps| parse_parts(&caps[1], &caps[2]));
        let parsed = keyword.or_else(|| {
            let (cidr, gateway) = s.split_once(',')?;
            parse_parts(cidr.trim(), gateway.trim())
        });
        parsed.ok_or_else(|| IpError::format("configuration", s))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} gw {}",
            self.address, self.prefix_length, self.gateway
        )
    }
}

impl Serialize for Configuration {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Configuration {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Configuration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
