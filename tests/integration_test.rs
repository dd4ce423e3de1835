//! Integration tests for ipv4-netcalc
//!
//! These tests go through the public API end to end: parse, derive,
//! enumerate and serialize.

use ipv4_netcalc::{
    processing::{find_gaps, find_overlaps},
    Address, Configuration, ErrorKind, IpError, Network,
};
use serde::{Deserialize, Serialize};
use std::sync::Once;

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    });
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Interface {
    name: String,
    config: Configuration,
    routes: Vec<Network>,
    dns: Option<Address>,
}

#[test]
fn test_host_plan_workflow() {
    init_logging();
    let vnet: Network = "10.20.0.0/16".parse().expect("Failed to parse vnet");

    // carve /24s, hand the first host of the third one to a server
    let subnet = vnet.subnets(24).unwrap().nth(2).unwrap();
    assert_eq!(subnet.to_string(), "10.20.2.0/24");

    let gateway = subnet.first_host_address();
    let server = Configuration::from_network(&subnet, Address::new(10, 20, 2, 10), gateway)
        .expect("Host should be inside the subnet");
    assert!(server.is_valid());
    assert!(server.can_reach_directly(subnet.last_host_address()));
    assert!(!server.can_reach_directly(Address::new(10, 20, 3, 1)));
    assert_eq!(server.to_string(), "10.20.2.10/24 gw 10.20.2.1");

    let hosts: Vec<Address> = subnet.host_addresses().collect();
    assert_eq!(hosts.len() as u64, subnet.host_count());
    assert!(hosts.iter().all(|h| h.is_private()));
}

#[test]
fn test_reference_values() {
    init_logging();
    let n = Network::new(Address::new(192, 168, 1, 100), 24).unwrap();
    assert_eq!(n.to_string(), "192.168.1.0/24");
    assert_eq!(n.total_address_count(), 256);
    assert_eq!(n.host_count(), 254);

    let a: Network = "192.168.2.0/24".parse().unwrap();
    let b: Network = "192.168.0.0/23".parse().unwrap();
    assert!(!n.overlaps(&a));
    assert!(n.overlaps(&b));

    let c = Configuration::new(Address::new(192, 168, 1, 0), 24, Address::new(192, 168, 1, 1))
        .unwrap();
    assert!(!c.is_valid());

    assert_eq!(
        Configuration::parse(Some("192.168.1.100/24 gw 192.168.1.1")).unwrap(),
        Configuration::parse(Some("192.168.1.100/24,192.168.1.1")).unwrap()
    );

    for bad in ["", "192.168.1.0/", "192.168.1.0/33", "192.168.1.0/-1", "invalid/24"] {
        assert_eq!(
            Network::parse(Some(bad)).unwrap_err().kind(),
            ErrorKind::Format
        );
    }
    assert_eq!(Network::parse(None).unwrap_err().kind(), ErrorKind::NullInput);
}

#[test]
fn test_serde_round_trip() {
    init_logging();
    let iface = Interface {
        name: "eth0".to_string(),
        config: "192.168.1.100/24,192.168.1.1".parse().unwrap(),
        routes: vec!["10.0.0.0/8".parse().unwrap(), "0.0.0.0/0".parse().unwrap()],
        dns: Some(Address::new(1, 1, 1, 1)),
    };
    let json = serde_json::to_string(&iface).expect("Error serializing JSON");
    assert_eq!(
        json,
        r#"{"name":"eth0","config":"192.168.1.100/24 gw 192.168.1.1","routes":["10.0.0.0/8","0.0.0.0/0"],"dns":"1.1.1.1"}"#
    );
    let back: Interface = serde_json::from_str(&json).expect("Error parsing JSON");
    assert_eq!(back, iface);
}

#[test]
fn test_serde_rejects_bad_tokens() {
    init_logging();
    let err = serde_json::from_str::<Network>(r#""10.0.0.0/40""#).unwrap_err();
    assert!(err.to_string().contains("invalid network format"));
    assert!(serde_json::from_str::<Address>(r#""1.2.3""#).is_err());
    assert!(serde_json::from_str::<Address>("16909060").is_err());

    // alternate grammar on input, canonical form on output
    let c: Configuration = serde_json::from_str(r#""10.0.0.5/30 gateway 10.0.0.6""#).unwrap();
    assert_eq!(
        serde_json::to_string(&c).unwrap(),
        r#""10.0.0.5/30 gw 10.0.0.6""#
    );
}

#[test]
fn test_address_plan_checks() {
    init_logging();
    let plan: Vec<Network> = ["10.0.0.0/24", "10.0.1.0/25", "10.0.0.128/25", "10.0.3.0/24"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

    let overlaps = find_overlaps(&plan);
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].first.to_string(), "10.0.0.0/24");
    assert_eq!(overlaps[0].second.to_string(), "10.0.0.128/25");

    let parent: Network = "10.0.0.0/22".parse().unwrap();
    let gaps: Vec<String> = find_gaps(parent, &plan).iter().map(|n| n.to_string()).collect();
    assert_eq!(gaps, vec!["10.0.1.128/25", "10.0.2.0/24"]);
}

#[test]
fn test_errors_are_matchable() {
    init_logging();
    match Network::new(Address::ANY, 64) {
        Err(IpError::PrefixOutOfRange { prefix }) => assert_eq!(prefix, 64),
        other => panic!("unexpected result {other:?}"),
    }
    let net: Network = "10.0.0.0/24".parse().unwrap();
    let err = Configuration::from_network(&net, Address::LOOPBACK, Address::ANY).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
}
