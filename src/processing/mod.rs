//! Address plan processing over lists of networks.
//!
//! - [`overlap`] - Overlapping network detection
//! - [`gap_finder`] - Unallocated ranges inside a parent network

mod gap_finder;
mod overlap;

// Re-export public functions
pub use gap_finder::find_gaps;
pub use overlap::{find_overlaps, log_overlaps, Overlap};
