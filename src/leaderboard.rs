use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub initials: String,
    pub points: u64,
    pub wins: u32,
    pub win_rate: u32, // percent
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer<'a> {
    pub rank: usize,
    pub medal: Option<Medal>,
    pub player: &'a Player,
}

pub struct Leaderboard {
    players: Vec<Player>,
}

impl Leaderboard {
    /// Ranks by points, then wins, then name.
    pub fn new(mut players: Vec<Player>) -> Self {
        players.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.wins.cmp(&a.wins))
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.players.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// 1-based page. Out of range pages are empty.
    pub fn page(&self, page: usize) -> Vec<RankedPlayer<'_>> {
        if page == 0 {
            return Vec::new();
        }
        self.players
            .iter()
            .enumerate()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|(i, player)| RankedPlayer {
                rank: i + 1,
                medal: Medal::for_rank(i + 1),
                player,
            })
            .collect()
    }

    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name).map(|i| i + 1)
    }
}

fn player(id: u32, name: &str, initials: &str, points: u64, wins: u32, win_rate: u32) -> Player {
    Player {
        id,
        name: name.to_string(),
        initials: initials.to_string(),
        points,
        wins,
        win_rate,
    }
}

pub fn mock_players() -> Vec<Player> {
    vec![
        player(1, "Alex Johnson", "AJ", 2450, 42, 78),
        player(2, "Sarah Williams", "SW", 2180, 37, 72),
        player(3, "Marcus Lee", "ML", 1950, 35, 65),
        player(4, "Jessica Chen", "JC", 1820, 33, 68),
        player(5, "Daniel Kim", "DK", 1720, 31, 62),
        player(6, "Rachel Patel", "RP", 1650, 30, 60),
        player(7, "Michael Brown", "MB", 1530, 28, 55),
        player(8, "Olivia Smith", "OS", 1480, 27, 58),
        player(9, "Kevin Jones", "KJ", 1350, 25, 50),
        player(10, "Emily Davis", "ED", 1290, 24, 53),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_and_medals() {
        let mut players = mock_players();
        players.reverse();
        let board = Leaderboard::new(players);

        let top = board.page(1);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].player.name, "Alex Johnson");
        assert_eq!(top[0].medal, Some(Medal::Gold));
        assert_eq!(top[2].medal, Some(Medal::Bronze));
        assert_eq!(top[3].medal, None);
        assert_eq!(board.rank_of("Emily Davis"), Some(10));
    }

    #[test]
    fn test_ties_break_on_wins() {
        let board = Leaderboard::new(vec![
            player(1, "Low", "L", 100, 1, 10),
            player(2, "High", "H", 100, 9, 90),
        ]);
        assert_eq!(board.rank_of("High"), Some(1));
    }

    #[test]
    fn test_pagination() {
        let players: Vec<_> = (0..23)
            .map(|i| player(i, &format!("P{:02}", i), "P", 1000 - i as u64, 0, 0))
            .collect();
        let board = Leaderboard::new(players);

        assert_eq!(board.page_count(), 3);
        let third = board.page(3);
        assert_eq!(third.len(), 3);
        assert_eq!(third[0].rank, 21);
        assert!(board.page(4).is_empty());
        assert!(board.page(0).is_empty());
        assert_eq!(Leaderboard::new(Vec::new()).page_count(), 1);
    }
}
