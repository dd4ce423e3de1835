//! A single IPv4 address.
//!
//! [`Address`] wraps the 32 bit value of an address, most significant octet
//! first, and provides the prefix arithmetic the other types build on.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::error::{require, IpError, Result};

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// Prefix 0 is handled on its own, shifting a u32 by 32 bits overflows.
///
/// # Examples
/// ```
/// use ipv4_netcalc::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// assert_eq!(get_cidr_mask(0).unwrap(), 0);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    check_prefix(len)?;
    Ok(mask_bits(len))
}

/// Return `Err(PrefixOutOfRange)` unless `len` is in `0..=32`.
pub(crate) fn check_prefix(len: u8) -> Result<u8> {
    if len > MAX_LENGTH {
        Err(IpError::PrefixOutOfRange { prefix: len })
    } else {
        Ok(len)
    }
}

/// Mask for an already validated prefix length.
pub(crate) const fn mask_bits(len: u8) -> u32 {
    match len {
        0 => 0,
        MAX_LENGTH => u32::MAX,
        _ => u32::MAX << (MAX_LENGTH - len),
    }
}

lazy_static! {
    static ref DOTTED_QUAD: Regex =
        Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)$").expect("Invalid Regex?");
}

/// An IPv4 address stored as a big endian 32 bit value.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    /// 127.0.0.1
    pub const LOOPBACK: Address = Address::new(127, 0, 0, 1);
    /// 0.0.0.0
    pub const ANY: Address = Address(0);
    /// 255.255.255.255
    pub const BROADCAST: Address = Address(u32::MAX);

    /// Build an address from its four octets, `a` being the most significant.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address((a as u32) << 24 | (b as u32) << 16 | (c as u32) << 8 | d as u32)
    }

    pub const fn from_u32(value: u32) -> Address {
        Address(value)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 16 & 0xFF) as u8
    }

    pub const fn c(self) -> u8 {
        (self.0 >> 8 & 0xFF) as u8
    }

    pub const fn d(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Network address for the given prefix length (host bits cleared).
    pub fn network(self, prefix: u8) -> Result<Address> {
        Ok(Address(self.0 & get_cidr_mask(prefix)?))
    }

    /// Broadcast address for the given prefix length (host bits set).
    pub fn broadcast(self, prefix: u8) -> Result<Address> {
        if check_prefix(prefix)? == 0 {
            return Ok(Address::BROADCAST);
        }
        let host_mask = (1u32 << (MAX_LENGTH - prefix)) - 1;
        Ok(Address(self.network(prefix)?.0 | host_mask))
    }

    /// True when both addresses fall into the same /`prefix` network.
    ///
    /// `network_addr` does not have to be a network base address already.
    pub fn is_in_network(self, network_addr: Address, prefix: u8) -> Result<bool> {
        Ok(self.network(prefix)? == network_addr.network(prefix)?)
    }

    /// RFC 1918 private ranges: 10/8, 172.16/12 and 192.168/16.
    pub fn is_private(self) -> bool {
        self.in_block(Address::new(10, 0, 0, 0), 8)
            || self.in_block(Address::new(172, 16, 0, 0), 12)
            || self.in_block(Address::new(192, 168, 0, 0), 16)
    }

    /// 127.0.0.0/8
    pub fn is_loopback(self) -> bool {
        self.in_block(Address::new(127, 0, 0, 0), 8)
    }

    /// 224.0.0.0/4
    pub fn is_multicast(self) -> bool {
        self.in_block(Address::new(224, 0, 0, 0), 4)
    }

    /// Shortest prefix length for which this address is still the network base.
    ///
    /// ```
    /// use ipv4_netcalc::models::Address;
    /// assert_eq!(Address::new(10, 1, 0, 0).lowest_prefix(), 16);
    /// assert_eq!(Address::ANY.lowest_prefix(), 0);
    /// ```
    pub fn lowest_prefix(self) -> u8 {
        MAX_LENGTH - self.0.trailing_zeros() as u8
    }

    /// Move `delta` addresses up or down, `None` when leaving the address space.
    pub fn checked_offset(self, delta: i64) -> Option<Address> {
        i64::from(self.0)
            .checked_add(delta)
            .and_then(|v| u32::try_from(v).ok())
            .map(Address)
    }

    /// Parse an optional string, `None` is reported as [`IpError::NullInput`].
    pub fn parse(text: Option<&str>) -> Result<Address> {
        require(text, "address")?.parse()
    }

    /// Non failing parse, returns `None` for malformed text.
    ///
    /// Use `unwrap_or_default()` to fall back to 0.0.0.0.
    pub fn try_parse(text: &str) -> Option<Address> {
        text.parse().ok()
    }

    /// Convert a generic IP address, `None` and IPv6 addresses are errors.
    pub fn from_external_address(ip: Option<IpAddr>) -> Result<Address> {
        Address::try_from(require(ip, "IP address")?)
    }

    pub fn to_external_address(self) -> Ipv4Addr {
        Ipv4Addr::from(self.0)
    }

    /// Network check for the constant blocks used by the classifiers.
    fn in_block(self, base: Address, prefix: u8) -> bool {
        let mask = mask_bits(prefix);
        self.0 & mask == base.0 & mask
    }
}

impl FromStr for Address {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Address> {
        let caps = DOTTED_QUAD
            .captures(s)
            .ok_or_else(|| IpError::format("address", s))?;
        let mut octets = [0u8; 4];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = caps[i + 1]
                .parse()
                .map_err(|_| IpError::format("address", s))?;
        }
        Ok(Address::from(octets))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.a(), self.b(), self.c(), self.d())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Address {
        Address(value)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> u32 {
        addr.0
    }
}

impl From<[u8; 4]> for Address {
    fn from(octets: [u8; 4]) -> Address {
        Address(u32::from_be_bytes(octets))
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Address {
        Address(u32::from(ip))
    }
}

impl From<Address> for Ipv4Addr {
    fn from(addr: Address) -> Ipv4Addr {
        addr.to_external_address()
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> IpAddr {
        IpAddr::V4(addr.to_external_address())
    }
}

impl TryFrom<IpAddr> for Address {
    type Error = IpError;

    fn try_from(ip: IpAddr) -> Result<Address> {
        match ip {
            IpAddr::V4(v4) => Ok(Address::from(v4)),
            IpAddr::V6(_) => Err(IpError::NotIpv4 { address: ip }),
        }
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
