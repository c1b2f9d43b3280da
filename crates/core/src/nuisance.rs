//! Nuisance conversion
//!
//! The cumulative score converts to nuisance puyos at `target_points` each. The
//! whole count is split greedily into display denominations, largest first,
//! stored run-length so the list never outgrows the denomination table.
//! The fractional remainder is kept as `leftover`.

use serde::Serialize;

/// `count` copies of one denomination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Denomination {
    pub value: u64,
    pub count: u64,
}

impl Denomination {
    pub fn new(value: u64, count: u64) -> Self {
        Self { value, count }
    }
}

/// Nuisance conversion of a score
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NuisanceReport {
    /// `floor(score / target_points)`
    pub count: u64,
    /// Greedy decomposition of `count`, largest denomination first
    pub denominations: Vec<Denomination>,
    /// Fractional part of `score / target_points`, in [0, 1)
    pub leftover: f64,
}

impl NuisanceReport {
    /// Sum of the decomposed denominations (equals `count` for tables starting at 1)
    pub fn total(&self) -> u64 {
        self.denominations
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.value.saturating_mul(d.count)))
    }
}

/// Decompose `count` into denominations.
///
/// `table` is ascending. Each step takes as many of the largest entry as still
/// fit, so with a table starting at 1 the result always sums to `count`.
///
/// ```
/// use puyo_chain_core::{decompose_nuisance, Denomination};
/// use puyo_chain_core::types::NUISANCE_DENOMINATIONS;
///
/// assert_eq!(
///     decompose_nuisance(36, &NUISANCE_DENOMINATIONS),
///     vec![Denomination::new(30, 1), Denomination::new(6, 1)]
/// );
/// ```
pub fn decompose_nuisance(count: u64, table: &[u64]) -> Vec<Denomination> {
    let mut out = Vec::new();
    let mut remaining = count;
    for &value in table.iter().rev() {
        if value == 0 || remaining < value {
            continue;
        }
        out.push(Denomination::new(value, remaining / value));
        remaining %= value;
    }
    out
}

/// Convert a cumulative score into a nuisance report
pub fn calculate_nuisance(score: u64, target_points: u64, table: &[u64]) -> NuisanceReport {
    if target_points == 0 {
        return NuisanceReport::default();
    }
    let count = score / target_points;
    let remainder = score % target_points;
    NuisanceReport {
        count,
        denominations: decompose_nuisance(count, table),
        leftover: remainder as f64 / target_points as f64,
    }
}
