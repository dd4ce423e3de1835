//! CIDR networks and lazy enumeration of their addresses and subnets.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use super::address::{mask_bits, Address, MAX_LENGTH};
use crate::error::{require, IpError, Result};

/// Parse a decimal prefix length, digits only, in `0..=32`.
pub(crate) fn parse_prefix(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u8>().ok().filter(|p| *p <= MAX_LENGTH)
}

/// IPv4 network in CIDR notation.
///
/// The stored address always has its host bits cleared, so
/// `Network::new(192.168.1.100, 24)` and `Network::new(192.168.1.0, 24)`
/// are the same value. Ordering is by network address, then prefix length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Network {
    network_address: Address,
    prefix_length: u8,
}

impl Network {
    /// Create the network of `prefix_length` that contains `address`.
    pub fn new(address: Address, prefix_length: u8) -> Result<Network> {
        Ok(Network {
            network_address: address.network(prefix_length)?,
            prefix_length,
        })
    }

    /// Build from a prefix length that has already been range checked.
    pub(crate) fn from_checked(address: Address, prefix_length: u8) -> Network {
        Network {
            network_address: Address::from_u32(address.to_u32() & mask_bits(prefix_length)),
            prefix_length,
        }
    }

    /// Parse an optional string, `None` is reported as [`IpError::NullInput`].
    pub fn parse(text: Option<&str>) -> Result<Network> {
        require(text, "network")?.parse()
    }

    /// Non failing parse, returns `None` for malformed text.
    pub fn try_parse(text: &str) -> Option<Network> {
        text.parse().ok()
    }

    pub fn network_address(&self) -> Address {
        self.network_address
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    pub fn broadcast_address(&self) -> Address {
        Address::from_u32(self.network_address.to_u32() | !self.mask())
    }

    /// Subnet mask, 0.0.0.0 for a /0.
    pub fn subnet_mask(&self) -> Address {
        Address::from_u32(self.mask())
    }

    /// Number of addresses in the network, 2^32 for a /0.
    pub fn total_address_count(&self) -> u64 {
        if self.prefix_length == MAX_LENGTH {
            1
        } else {
            1u64 << (MAX_LENGTH - self.prefix_length)
        }
    }

    /// Usable host addresses. /31 and /32 reserve no network or broadcast address.
    pub fn host_count(&self) -> u64 {
        if self.prefix_length >= 31 {
            self.total_address_count()
        } else {
            self.total_address_count().saturating_sub(2)
        }
    }

    pub fn first_host_address(&self) -> Address {
        if self.prefix_length >= 31 {
            self.network_address
        } else {
            Address::from_u32(self.network_address.to_u32() + 1)
        }
    }

    pub fn last_host_address(&self) -> Address {
        let broadcast = self.broadcast_address();
        if self.prefix_length >= 31 {
            broadcast
        } else {
            Address::from_u32(broadcast.to_u32() - 1)
        }
    }

    pub fn contains(&self, address: Address) -> bool {
        address.to_u32() & self.mask() == self.network_address.to_u32()
    }

    /// True when the two networks share at least one address.
    pub fn overlaps(&self, other: &Network) -> bool {
        self.contains(other.network_address)
            || self.contains(other.broadcast_address())
            || other.contains(self.network_address)
            || other.contains(self.broadcast_address())
    }

    /// True when `other` lies completely inside this network.
    pub fn contains_network(&self, other: &Network) -> bool {
        self.prefix_length <= other.prefix_length
            && self.contains(other.network_address)
            && self.contains(other.broadcast_address())
    }

    /// Every address from the network address to the broadcast address.
    pub fn addresses(&self) -> AddressRange {
        AddressRange::new(self.network_address, self.broadcast_address())
    }

    /// Usable host addresses, all addresses for a /31 or /32.
    pub fn host_addresses(&self) -> AddressRange {
        AddressRange::new(self.first_host_address(), self.last_host_address())
    }

    /// Split into consecutive subnets of `new_prefix_length`.
    pub fn subnets(&self, new_prefix_length: u8) -> Result<Subnets> {
        if new_prefix_length <= self.prefix_length || new_prefix_length > MAX_LENGTH {
            return Err(IpError::InvalidSubnetPrefix {
                current: self.prefix_length,
                requested: new_prefix_length,
            });
        }
        let count = 1u64 << (new_prefix_length - self.prefix_length);
        let step = 1u64 << (MAX_LENGTH - new_prefix_length);
        log::trace!("split {self} into {count} x /{new_prefix_length} (step {step})");
        Ok(Subnets {
            next_base: u64::from(self.network_address.to_u32()),
            step,
            remaining: count,
            prefix_length: new_prefix_length,
        })
    }

    /// The network of the same size directly after this one.
    ///
    /// `None` when it would start past 255.255.255.255.
    pub fn next_network(&self) -> Option<Network> {
        let next = u64::from(self.network_address.to_u32()) + self.total_address_count();
        u32::try_from(next).ok().map(|bits| Network {
            network_address: Address::from_u32(bits),
            prefix_length: self.prefix_length,
        })
    }

    /// The enclosing network one bit shorter, `None` for a /0.
    pub fn supernet(&self) -> Option<Network> {
        let prefix_length = self.prefix_length.checked_sub(1)?;
        Some(Network::from_checked(self.network_address, prefix_length))
    }

    fn mask(&self) -> u32 {
        mask_bits(self.prefix_length)
    }
}

impl FromStr for Network {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Network> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| IpError::format("network", s))?;
        let address: Address = addr.parse().map_err(|_| IpError::format("network", s))?;
        let prefix_length = parse_prefix(prefix).ok_or_else(|| IpError::format("network", s))?;
        Network::new(address, prefix_length)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network_address, self.prefix_length)
    }
}

impl IntoIterator for Network {
    type Item = Address;
    type IntoIter = AddressRange;

    fn into_iter(self) -> AddressRange {
        self.addresses()
    }
}

impl IntoIterator for &Network {
    type Item = Address;
    type IntoIter = AddressRange;

    fn into_iter(self) -> AddressRange {
        self.addresses()
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Ascending run of addresses, both ends inclusive.
///
/// Positions are kept in u64 so a full /0 (2^32 addresses) terminates.
/// Cloning gives an independent cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRange {
    front: u64,
    // one past the last address
    back: u64,
}

impl AddressRange {
    /// Addresses from `first` through `last`, empty when `first > last`.
    pub fn new(first: Address, last: Address) -> AddressRange {
        let front = u64::from(first.to_u32());
        let back = (u64::from(last.to_u32()) + 1).max(front);
        AddressRange { front, back }
    }

    /// Addresses not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.back - self.front
    }
}

impl Iterator for AddressRange {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        if self.front >= self.back {
            return None;
        }
        let addr = Address::from_u32(self.front as u32);
        self.front += 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<Address> {
        self.front = self.front.saturating_add(n as u64).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for AddressRange {
    fn next_back(&mut self) -> Option<Address> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(Address::from_u32(self.back as u32))
    }
}

impl FusedIterator for AddressRange {}

/// Consecutive equally sized subnets produced by [`Network::subnets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnets {
    next_base: u64,
    step: u64,
    remaining: u64,
    prefix_length: u8,
}

impl Subnets {
    /// Subnets not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for Subnets {
    type Item = Network;

    fn next(&mut self) -> Option<Network> {
        if self.remaining == 0 {
            return None;
        }
        let network = Network {
            network_address: Address::from_u32(self.next_base as u32),
            prefix_length: self.prefix_length,
        };
        self.next_base += self.step;
        self.remaining -= 1;
        Some(network)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Subnets {}
