// Core modules
pub mod bet;
pub mod bet_service;
pub mod chaos_wheel;
pub mod config;
pub mod countdown;
pub mod error;
pub mod group_bet;
pub mod group_bet_service;
pub mod invite;
pub mod leaderboard;
pub mod option_matcher;
pub mod profile;
pub mod seed;
pub mod storage;
pub mod tally;
pub mod watch;

// Re-exports
pub use bet::{Bet, BetKind, BetOption, Comment, Creator, NewBet, Reaction, Stake};
pub use bet_service::{BetService, BetStatistics};
pub use config::Settings;
pub use error::{BetError, BetResult, StorageError};
pub use group_bet::{GroupBet, GroupBetOption, GroupBetUpdate, NewGroupBet};
pub use group_bet_service::GroupBetService;
pub use invite::InviteTarget;
pub use leaderboard::{Leaderboard, Player};
pub use option_matcher::OptionMatcher;
pub use profile::{Achievement, UserStats};
pub use storage::{FileStorage, MemoryStorage, Storage};
