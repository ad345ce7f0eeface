//! Time-index resolution for the resampling evaluators.
//!
//! Maps a query time onto the bracketing interval `[T[i], T[i+1]]` of an
//! ordered, strictly increasing time axis. Two policies exist: a constant-time
//! one for evenly spaced axes and a binary search for everything else. Both
//! clamp the index into `[0, n-2]`, so out-of-domain queries resolve to the
//! boundary segment and the blend weights extrapolate along its slope.

use crate::constants::SimTime;

/// A resolved interpolation interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeBracket {
    /// Lower index `i` of the interval `[T[i], T[i+1]]`.
    pub index: usize,
    /// Local spacing used to normalize the blend weights.
    pub spacing: f64,
}

/// Resolve on an evenly spaced axis: `i = floor((q - T[0]) / dt)`.
///
/// The axis must have at least two samples; `dt` is taken from the first gap.
pub(crate) fn resolve_uniform(times: &[SimTime], query: SimTime) -> TimeBracket {
    let dt = times[1] - times[0];
    let raw = ((query - times[0]) / dt).floor() as i64;
    TimeBracket {
        index: clamp_index(raw, times.len(), query),
        spacing: dt,
    }
}

/// Resolve on an arbitrary strictly increasing axis: largest `i` with
/// `T[i] <= q`, found by binary search.
pub(crate) fn resolve_monotonic(times: &[SimTime], query: SimTime) -> TimeBracket {
    // partition_point yields the first index whose time exceeds the query
    let above = times.partition_point(|&t| t <= query);
    let index = clamp_index(above as i64 - 1, times.len(), query);
    TimeBracket {
        index,
        spacing: times[index + 1] - times[index],
    }
}

fn clamp_index(raw: i64, num_samples: usize, query: SimTime) -> usize {
    let last = num_samples as i64 - 2;
    if raw < 0 {
        tracing::warn!("time {query} precedes the domain start; clamping to the first interval");
        0
    } else if raw > last {
        tracing::warn!("time {query} exceeds the domain end; clamping to the last interval");
        last as usize
    } else {
        raw as usize
    }
}

/// Affine blend weights for a resolved bracket.
///
/// `w1 + w2 = 1` identically, but neither is restricted to `[0, 1]`: a query
/// outside the stored domain produces weights that extrapolate along the
/// clamped boundary segment.
pub(crate) fn blend_weights(
    times: &[SimTime],
    bracket: TimeBracket,
    query: SimTime,
) -> (f64, f64) {
    let w1 = (times[bracket.index + 1] - query) / bracket.spacing;
    let w2 = (query - times[bracket.index]) / bracket.spacing;
    (w1, w2)
}
