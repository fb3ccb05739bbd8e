//! Aggregate statistics shown above the tank list

use serde::Serialize;

use crate::record::Record;

/// Summary over the current record list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of records
    pub count: usize,
    /// Mean tank size in liters, rounded to nearest (halves round up)
    pub average_tank_size: i64,
}

/// Compute stats over `records`.
///
/// Sizes are read with the lenient leading-integer parse; a size with no
/// leading digits counts as 0. An empty list averages to 0.
pub fn summarize(records: &[Record]) -> Stats {
    let count = records.len();
    if count == 0 {
        return Stats::default();
    }

    let sum: i128 = records
        .iter()
        .map(|r| i128::from(r.liters().unwrap_or(0)))
        .sum();

    Stats {
        count,
        average_tank_size: round_div(sum, count as i128) as i64,
    }
}

/// `floor(sum / count + 0.5)` in integer arithmetic
fn round_div(sum: i128, count: i128) -> i128 {
    (2 * sum + count).div_euclid(2 * count)
}
