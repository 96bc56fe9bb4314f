use crate::bet::{Bet, Stake};
use serde::{Deserialize, Serialize};

const RISK_TAKER_BETS: u32 = 10;
const WINNING_STREAK: u32 = 5;
const BIG_SPENDER_STAKE: f64 = 50.0;
const SOCIAL_BUTTERFLY_INVITES: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    pub total_bets: u32,
    pub won_bets: u32,
    pub lost_bets: u32,
    pub points_earned: u64,
    pub current_streak: u32,
    pub largest_money_stake: f64,
    pub friends_invited: u32,
}

impl UserStats {
    /// Won over total as a rounded percent; 0 with no bets.
    pub fn win_rate(&self) -> u32 {
        if self.total_bets == 0 {
            return 0;
        }
        crate::tally::percentage(self.won_bets.into(), self.total_bets.into())
    }

    /// Track the largest money stake among the given bets.
    pub fn record_stakes(&mut self, bets: &[&Bet]) {
        for bet in bets {
            if let Stake::Money(amount) = bet.stake {
                if amount > self.largest_money_stake {
                    self.largest_money_stake = amount;
                }
            }
        }
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        vec![
            Achievement::new("a1", "Risk Taker", "Place 10 bets", self.total_bets >= RISK_TAKER_BETS),
            Achievement::new(
                "a2",
                "Winning Streak",
                "Win 5 bets in a row",
                self.current_streak >= WINNING_STREAK,
            ),
            Achievement::new(
                "a3",
                "Big Spender",
                "Place a bet with $50+",
                self.largest_money_stake >= BIG_SPENDER_STAKE,
            ),
            Achievement::new(
                "a4",
                "Social Butterfly",
                "Invite 10 friends",
                self.friends_invited >= SOCIAL_BUTTERFLY_INVITES,
            ),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub completed: bool,
}

impl Achievement {
    fn new(id: &str, name: &str, description: &str, completed: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            completed,
        }
    }
}

pub fn mock_user_stats() -> UserStats {
    UserStats {
        total_bets: 47,
        won_bets: 32,
        lost_bets: 15,
        points_earned: 2450,
        current_streak: 5,
        largest_money_stake: 20.0,
        friends_invited: 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::Creator;
    use chrono::Utc;

    #[test]
    fn test_mock_stats_win_rate_and_achievements() {
        let stats = mock_user_stats();
        assert_eq!(stats.win_rate(), 68);

        let done: Vec<_> = stats
            .achievements()
            .into_iter()
            .map(|a| (a.name, a.completed))
            .collect();
        assert_eq!(
            done,
            vec![
                ("Risk Taker".to_string(), true),
                ("Winning Streak".to_string(), true),
                ("Big Spender".to_string(), false),
                ("Social Butterfly".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_win_rate_without_bets() {
        let stats = UserStats {
            total_bets: 0,
            won_bets: 0,
            lost_bets: 0,
            points_earned: 0,
            current_streak: 0,
            largest_money_stake: 0.0,
            friends_invited: 0,
        };
        assert_eq!(stats.win_rate(), 0);
    }

    #[test]
    fn test_money_stake_unlocks_big_spender() {
        let mut stats = mock_user_stats();
        let party = Bet::new(
            "p".to_string(),
            "Party".to_string(),
            Creator::new("Host", "H"),
            Utc::now(),
            Stake::Money(50.0),
            vec![],
        );
        stats.record_stakes(&[&party]);

        assert_eq!(stats.largest_money_stake, 50.0);
        assert!(stats.achievements()[2].completed);
    }
}
