//! Scoring module - per-pass chain scoring
//!
//! Each clear pass scores `cleared * 10 * max(1, chain + color + group bonus)`.
//! Table lookups clamp to the last entry so long chains and big groups keep the
//! table's maximum. Arithmetic saturates at `u64::MAX`.

use puyo_chain_types::{ColorSet, CRAZY_CHAIN_BASE, POINTS_PER_PUYO};

use crate::config::EngineConfig;

/// Score calculation result for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub chain_bonus: u64,
    pub color_bonus: u64,
    pub group_bonus: u64,
    /// Sum of the three bonuses, floored at 1
    pub total_bonus: u64,
    /// Points added to the cumulative score
    pub increment: u64,
}

/// Clamped lookup; an empty table yields 0
fn lookup(table: &[u64], index: usize) -> u64 {
    match table.len() {
        0 => 0,
        len => table[index.min(len - 1)],
    }
}

/// Chain bonus for the `chain`-th pass (1-based).
///
/// Crazy mode replaces the table with `4 * 2^chain`.
pub fn calculate_chain_bonus(chain: u32, table: &[u64], crazy_mode: bool) -> u64 {
    if crazy_mode {
        return 1u64
            .checked_shl(chain)
            .map_or(u64::MAX, |pow| CRAZY_CHAIN_BASE.saturating_mul(pow));
    }
    lookup(table, chain.saturating_sub(1) as usize)
}

/// Color bonus for `distinct` colors cleared in one pass (0 if none)
pub fn calculate_color_bonus(distinct: usize, table: &[u64]) -> u64 {
    if distinct == 0 {
        return 0;
    }
    lookup(table, distinct - 1)
}

/// Sum of per-group bonuses, indexed by `size - 4` clamped to the table
pub fn calculate_group_bonus(groups: &[usize], table: &[u64]) -> u64 {
    groups
        .iter()
        .map(|&size| lookup(table, size.saturating_sub(4)))
        .fold(0u64, u64::saturating_add)
}

/// Score one clear pass
///
/// ```
/// use puyo_chain_core::{calculate_score, EngineConfig};
/// use puyo_chain_core::types::{ColorSet, PuyoColor};
///
/// let config = EngineConfig::default();
/// let colors: ColorSet = [PuyoColor::Red].into_iter().collect();
/// let result = calculate_score(4, 1, &colors, &[4], &config);
/// assert_eq!(result.total_bonus, 1);
/// assert_eq!(result.increment, 40);
/// ```
pub fn calculate_score(
    cleared: usize,
    chain: u32,
    colors: &ColorSet,
    groups: &[usize],
    config: &EngineConfig,
) -> ScoreResult {
    let chain_bonus = calculate_chain_bonus(chain, &config.chain_bonus, config.crazy_mode);
    let color_bonus = calculate_color_bonus(colors.len(), &config.color_bonus);
    let group_bonus = calculate_group_bonus(groups, &config.group_bonus);
    let total_bonus = chain_bonus
        .saturating_add(color_bonus)
        .saturating_add(group_bonus)
        .max(1);
    let increment = (cleared as u64)
        .saturating_mul(POINTS_PER_PUYO)
        .saturating_mul(total_bonus);

    ScoreResult {
        chain_bonus,
        color_bonus,
        group_bonus,
        total_bonus,
        increment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puyo_chain_types::{PuyoColor, CHAIN_BONUS, COLOR_BONUS, GROUP_BONUS};

    fn colors(list: &[PuyoColor]) -> ColorSet {
        list.iter().copied().collect()
    }

    #[test]
    fn test_chain_bonus_table() {
        assert_eq!(calculate_chain_bonus(1, &CHAIN_BONUS, false), 0);
        assert_eq!(calculate_chain_bonus(2, &CHAIN_BONUS, false), 8);
        assert_eq!(calculate_chain_bonus(5, &CHAIN_BONUS, false), 64);
        assert_eq!(calculate_chain_bonus(11, &CHAIN_BONUS, false), 256);
        // Clamped past the end
        assert_eq!(calculate_chain_bonus(40, &CHAIN_BONUS, false), 256);
    }

    #[test]
    fn test_crazy_chain_bonus() {
        assert_eq!(calculate_chain_bonus(1, &CHAIN_BONUS, true), 8);
        assert_eq!(calculate_chain_bonus(3, &CHAIN_BONUS, true), 32);
        assert_eq!(calculate_chain_bonus(62, &CHAIN_BONUS, true), u64::MAX);
        assert_eq!(calculate_chain_bonus(200, &CHAIN_BONUS, true), u64::MAX);
    }

    #[test]
    fn test_color_bonus() {
        assert_eq!(calculate_color_bonus(0, &COLOR_BONUS), 0);
        assert_eq!(calculate_color_bonus(1, &COLOR_BONUS), 0);
        assert_eq!(calculate_color_bonus(2, &COLOR_BONUS), 3);
        assert_eq!(calculate_color_bonus(5, &COLOR_BONUS), 24);
        assert_eq!(calculate_color_bonus(9, &COLOR_BONUS), 24);
    }

    #[test]
    fn test_group_bonus_clamps_both_ends() {
        assert_eq!(calculate_group_bonus(&[4], &GROUP_BONUS), 0);
        assert_eq!(calculate_group_bonus(&[5], &GROUP_BONUS), 2);
        assert_eq!(calculate_group_bonus(&[11], &GROUP_BONUS), 10);
        assert_eq!(calculate_group_bonus(&[30], &GROUP_BONUS), 10);
        // Below four clamps to index 0
        assert_eq!(calculate_group_bonus(&[2, 3], &GROUP_BONUS), 0);
        assert_eq!(calculate_group_bonus(&[5, 6, 4], &GROUP_BONUS), 5);
        assert_eq!(calculate_group_bonus(&[], &GROUP_BONUS), 0);
    }

    #[test]
    fn test_single_group_first_chain() {
        let config = EngineConfig::default();
        for size in 4..=12usize {
            let result = calculate_score(size, 1, &colors(&[PuyoColor::Green]), &[size], &config);
            let expected = (size as u64) * 10 * (GROUP_BONUS[(size - 4).min(7)]).max(1);
            assert_eq!(result.increment, expected, "size {}", size);
        }
    }

    #[test]
    fn test_multi_color_second_chain() {
        let config = EngineConfig::default();
        let result = calculate_score(
            9,
            2,
            &colors(&[PuyoColor::Red, PuyoColor::Blue]),
            &[4, 5],
            &config,
        );
        assert_eq!(result.chain_bonus, 8);
        assert_eq!(result.color_bonus, 3);
        assert_eq!(result.group_bonus, 2);
        assert_eq!(result.total_bonus, 13);
        assert_eq!(result.increment, 9 * 10 * 13);
    }

    #[test]
    fn test_score_saturates() {
        let mut config = EngineConfig::default();
        config.crazy_mode = true;
        let result = calculate_score(72, 100, &colors(&[PuyoColor::Red]), &[72], &config);
        assert_eq!(result.increment, u64::MAX);
    }
}
