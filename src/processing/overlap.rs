//! Overlapping network detection.
//!
//! Finds networks in an address plan that share addresses with each other.

use crate::models::Network;
use itertools::Itertools;

/// Two networks from the same list that share addresses.
///
/// `first` is never greater than `second`. CIDR blocks that overlap are
/// always nested, so `first` contains `second` unless they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Overlap {
    pub first: Network,
    pub second: Network,
    /// The same network appears more than once.
    pub duplicate: bool,
}

/// Find every pair of overlapping networks.
///
/// # Arguments
/// * `networks` - The networks to check, in any order
///
/// # Returns
/// One entry per overlapping pair of list positions, sorted by network
pub fn find_overlaps(networks: &[Network]) -> Vec<Overlap> {
    let mut overlaps: Vec<Overlap> = networks
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a.overlaps(b))
        .map(|(a, b)| {
            let (first, second) = if a <= b { (*a, *b) } else { (*b, *a) };
            Overlap {
                first,
                second,
                duplicate: first == second,
            }
        })
        .collect();

    overlaps.sort();
    overlaps
}

/// Log overlapping networks as warnings.
pub fn log_overlaps(overlaps: &[Overlap]) {
    if overlaps.is_empty() {
        log::info!("No overlapping networks found.");
        return;
    }

    log::warn!("Found {} overlapping network pair(s):", overlaps.len());
    for overlap in overlaps {
        if overlap.duplicate {
            log::warn!("  {} is listed more than once", overlap.first);
        } else {
            log::warn!("  {} contains {}", overlap.first, overlap.second);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nets(list: &[&str]) -> Vec<Network> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_find_overlaps_none() {
        let plan = nets(&["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/23"]);
        let overlaps = find_overlaps(&plan);
        assert!(overlaps.is_empty());
        log_overlaps(&overlaps);
    }

    #[test]
    fn test_find_overlaps() {
        let plan = nets(&["10.0.10.64/26", "10.0.0.0/8", "192.168.0.0/16", "10.0.10.0/24"]);
        let overlaps = find_overlaps(&plan);
        log_overlaps(&overlaps);

        let pairs: Vec<(String, String)> = overlaps
            .iter()
            .map(|o| (o.first.to_string(), o.second.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("10.0.0.0/8".to_string(), "10.0.10.0/24".to_string()),
                ("10.0.0.0/8".to_string(), "10.0.10.64/26".to_string()),
                ("10.0.10.0/24".to_string(), "10.0.10.64/26".to_string()),
            ]
        );
        assert!(overlaps.iter().all(|o| !o.duplicate));
        assert!(overlaps.iter().all(|o| o.first.contains_network(&o.second)));
    }

    #[test]
    fn test_find_overlaps_duplicates() {
        let plan = nets(&["172.16.0.0/24", "172.16.0.0/24"]);
        let overlaps = find_overlaps(&plan);
        assert_eq!(overlaps.len(), 1);
        assert!(overlaps[0].duplicate);
    }
}
