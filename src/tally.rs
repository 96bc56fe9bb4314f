//! Option percentage recalculation shared by bets and group bets.

use crate::bet::BetOption;
use crate::group_bet::GroupBetOption;

/// What to show when nobody has voted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroVotePolicy {
    /// Every option gets `floor(100 / n)`.
    EqualSplit,
    /// Every option shows 0.
    Zero,
}

/// `round(votes / total * 100)`, rounding half away from zero.
pub fn percentage(votes: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((votes as f64 / total as f64) * 100.0).round() as u32
}

/// Percentages for a list of vote counts, in the same order.
pub fn percentages(votes: &[u32], policy: ZeroVotePolicy) -> Vec<u32> {
    let total: u64 = votes.iter().map(|v| *v as u64).sum();

    if total > 0 {
        return votes.iter().map(|v| percentage(*v as u64, total)).collect();
    }

    let fallback = match policy {
        ZeroVotePolicy::EqualSplit if !votes.is_empty() => 100 / votes.len() as u32,
        _ => 0,
    };
    vec![fallback; votes.len()]
}

pub fn recalculate(options: &mut [BetOption], policy: ZeroVotePolicy) {
    let votes: Vec<u32> = options.iter().map(|o| o.votes).collect();
    for (option, pct) in options.iter_mut().zip(percentages(&votes, policy)) {
        option.percentage = pct;
    }
}

pub fn recalculate_group(options: &mut [GroupBetOption], policy: ZeroVotePolicy) {
    let votes: Vec<u32> = options.iter().map(|o| o.votes).collect();
    for (option, pct) in options.iter_mut().zip(percentages(&votes, policy)) {
        option.percentage = pct;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_follow_vote_share() {
        assert_eq!(percentages(&[8, 4], ZeroVotePolicy::EqualSplit), vec![67, 33]);
        assert_eq!(percentages(&[1, 1, 1], ZeroVotePolicy::Zero), vec![33, 33, 33]);
        assert_eq!(percentages(&[1, 0, 3], ZeroVotePolicy::Zero), vec![25, 0, 75]);
    }

    #[test]
    fn test_half_rounds_up() {
        // 1/8 = 12.5%
        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn test_zero_votes_policies() {
        assert_eq!(percentages(&[0, 0, 0], ZeroVotePolicy::EqualSplit), vec![33, 33, 33]);
        assert_eq!(percentages(&[0, 0], ZeroVotePolicy::EqualSplit), vec![50, 50]);
        assert_eq!(percentages(&[0, 0], ZeroVotePolicy::Zero), vec![0, 0]);
        assert!(percentages(&[], ZeroVotePolicy::EqualSplit).is_empty());
    }

    #[test]
    fn test_sum_stays_close_to_hundred() {
        let samples: [&[u32]; 4] = [&[3, 3, 3], &[1, 2, 3, 4], &[7, 5], &[9, 1, 1, 1, 1]];
        for votes in samples {
            let sum: u32 = percentages(votes, ZeroVotePolicy::EqualSplit).iter().sum();
            let slack = votes.len() as i64;
            assert!((sum as i64 - 100).abs() < slack, "{:?} summed to {}", votes, sum);
        }
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        assert_eq!(percentages(&[3_000_000_000, 3_000_000_000], ZeroVotePolicy::EqualSplit), vec![50, 50]);
        assert_eq!(percentages(&[u32::MAX, u32::MAX, 0], ZeroVotePolicy::Zero), vec![50, 50, 0]);
    }

    #[test]
    fn test_recalculate_writes_back() {
        let mut options = vec![
            BetOption::new("a", "Yes").with_votes(3),
            BetOption::new("b", "No").with_votes(1),
        ];
        recalculate(&mut options, ZeroVotePolicy::EqualSplit);
        assert_eq!(options[0].percentage, 75);
        assert_eq!(options[1].percentage, 25);
    }
}
