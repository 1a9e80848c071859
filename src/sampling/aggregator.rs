//! Aggregation of one sampling round into a single representative value.

/// Collapses one sampling round into a single occupancy value.
///
/// Folds the counts in index order through the incremental running-mean
/// update `mean += (value - mean) / (index + 1)` and rounds the final mean
/// half away from zero, so `[1, 2]` aggregates to `2`. An empty round yields
/// `None` and the caller skips the window update for that tick.
pub fn aggregate_round(round: &[u32]) -> Option<u32> {
    if round.is_empty() {
        return None;
    }

    let mut mean = 0.0_f64;
    for (index, &count) in round.iter().enumerate() {
        mean += (count as f64 - mean) / (index as f64 + 1.0);
    }

    Some(mean.round() as u32)
}
