//! Gap finding between allocated networks.
//!
//! Identifies unused address ranges inside a parent network and expresses
//! them as the fewest aligned CIDR blocks.

use crate::models::{Address, Network, MAX_LENGTH};

/// Find the unallocated parts of `parent`.
///
/// Allocated networks outside `parent` are ignored, allocations may overlap
/// each other. A network that contains `parent` leaves no gaps.
///
/// ```
/// use ipv4_netcalc::processing::find_gaps;
/// use ipv4_netcalc::Network;
///
/// let parent: Network = "10.0.0.0/24".parse().unwrap();
/// let used: Vec<Network> = vec!["10.0.0.0/26".parse().unwrap()];
/// let gaps: Vec<String> = find_gaps(parent, &used).iter().map(|n| n.to_string()).collect();
/// assert_eq!(gaps, vec!["10.0.0.64/26", "10.0.0.128/25"]);
/// ```
pub fn find_gaps(parent: Network, allocated: &[Network]) -> Vec<Network> {
    let mut used: Vec<Network> = allocated
        .iter()
        .filter(|n| parent.overlaps(n))
        .copied()
        .collect();
    used.sort();

    let mut gaps = Vec::new();
    let mut next_free = u64::from(parent.network_address().to_u32());
    let end = u64::from(parent.broadcast_address().to_u32()) + 1;

    for n in used {
        let lo = u64::from(n.network_address().to_u32());
        let hi = u64::from(n.broadcast_address().to_u32()) + 1;
        if lo > next_free {
            fill_range(next_free, lo, &mut gaps);
        }
        next_free = next_free.max(hi);
    }
    if next_free < end {
        fill_range(next_free, end, &mut gaps);
    }

    log::debug!(
        "parent {parent}: {} allocated, {} gap block(s)",
        allocated.len(),
        gaps.len()
    );
    gaps
}

/// Cover `[lo, hi)` with the largest aligned blocks, in ascending order.
fn fill_range(mut lo: u64, hi: u64, out: &mut Vec<Network>) {
    while lo < hi {
        let aligned = Address::from_u32(lo as u32).lowest_prefix();
        // largest power of two not above the remaining span
        let span_bits = 63 - (hi - lo).leading_zeros() as u8;
        let prefix = aligned.max(MAX_LENGTH - span_bits);
        let block = Network::from_checked(Address::from_u32(lo as u32), prefix);
        lo += block.total_address_count();
        out.push(block);
    }
}
