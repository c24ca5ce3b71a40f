//! Lane capacity rule for port-interface nodes.
//!
//! A port interface exposes a bundle of differential lanes. Each entry is the
//! width of one link, and the widths share a fixed pool of [`LANE_CAPACITY`].

use thiserror::Error;

/// Total lanes available on one port interface, and the widest single link.
pub const LANE_CAPACITY: u8 = 16;

/// Why a lane was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("Lane width {0} is outside 0..=16")]
    OutOfRange(i64),
    #[error("Maximum lane sum of 16 exceeded ({current} in use, {requested} requested)")]
    Exceeded { current: u32, requested: u8 },
}

/// Sum of all lane widths.
pub fn lane_sum(lanes: &[u8]) -> u32 {
    lanes.iter().map(|&w| u32::from(w)).sum()
}

/// Lanes still free in the pool.
pub fn remaining(lanes: &[u8]) -> u32 {
    u32::from(LANE_CAPACITY).saturating_sub(lane_sum(lanes))
}

/// Append `candidate` to `current` if the result stays within capacity.
///
/// The candidate is taken as a wide integer so raw user input can be passed
/// straight through; anything outside `0..=16` is rejected before the sum is
/// checked. The input slice is never modified.
pub fn try_add_lane(current: &[u8], candidate: i64) -> Result<Vec<u8>, CapacityError> {
    let width = u8::try_from(candidate)
        .ok()
        .filter(|&w| w <= LANE_CAPACITY)
        .ok_or(CapacityError::OutOfRange(candidate))?;

    let used = lane_sum(current);
    if used + u32::from(width) > u32::from(LANE_CAPACITY) {
        return Err(CapacityError::Exceeded {
            current: used,
            requested: width,
        });
    }

    let mut lanes = current.to_vec();
    lanes.push(width);
    Ok(lanes)
}
