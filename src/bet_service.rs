use crate::bet::{Bet, Comment, Creator, NewBet, Reaction};
use crate::config::Settings;
use crate::countdown;
use crate::error::{BetError, BetResult};
use crate::invite;
use crate::seed::{self, FEATURED_BET_ID};
use crate::storage::Storage;
use crate::tally::{self, ZeroVotePolicy};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, error, info};

pub const BETS_KEY: &str = "betapp_bets";
pub const USER_BETS_KEY: &str = "betapp_user_bets"; // bets the user has joined
pub const USER_CREATED_BETS_KEY: &str = "betapp_user_created_bets";

pub struct BetService<S: Storage> {
    storage: S,
    bets: HashMap<String, Bet>,
    order: Vec<String>,
    user_bets: Vec<String>,
    user_created_bets: Vec<String>,
    user: Creator,
    invite_base_url: String,
}

impl<S: Storage> BetService<S> {
    pub fn open(storage: S, settings: &Settings) -> BetResult<Self> {
        Self::open_with_rng(storage, settings, &mut rand::thread_rng())
    }

    /// Load persisted state, seed the mock bets into an empty store and make
    /// sure the featured bet exists.
    pub fn open_with_rng<R: Rng>(storage: S, settings: &Settings, rng: &mut R) -> BetResult<Self> {
        let mut service = Self {
            storage,
            bets: HashMap::new(),
            order: Vec::new(),
            user_bets: Vec::new(),
            user_created_bets: Vec::new(),
            user: Creator::new(settings.user_name.clone(), settings.user_initials.clone()),
            invite_base_url: settings.invite_base_url.clone(),
        };
        service.load_from_storage();

        let now = Utc::now();
        let mut dirty = false;

        if service.bets.is_empty() && settings.seed_mock_data {
            let mocks = seed::mock_bets(rng, now);
            info!("🌱 Seeding {} mock bets", mocks.len());
            for bet in mocks {
                service.insert(bet);
            }
            dirty = true;
        }

        if settings.seed_mock_data && !service.bets.contains_key(FEATURED_BET_ID) {
            service.insert(seed::featured_bet(now));
            dirty = true;
        }

        if dirty {
            service.save_to_storage()?;
        }
        Ok(service)
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Error loading {} from storage: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Error loading {} from storage: {}", key, e);
                None
            }
        }
    }

    fn load_from_storage(&mut self) {
        if let Some(bets) = self.read_key::<Vec<Bet>>(BETS_KEY) {
            for bet in bets {
                self.insert(bet);
            }
        }
        if let Some(ids) = self.read_key::<Vec<String>>(USER_BETS_KEY) {
            self.user_bets = dedup(ids);
        }
        if let Some(ids) = self.read_key::<Vec<String>>(USER_CREATED_BETS_KEY) {
            self.user_created_bets = dedup(ids);
        }
        debug!(
            "Loaded {} bets ({} joined, {} created)",
            self.bets.len(),
            self.user_bets.len(),
            self.user_created_bets.len()
        );
    }

    fn save_to_storage(&mut self) -> BetResult<()> {
        let bets: Vec<&Bet> = self.order.iter().filter_map(|id| self.bets.get(id)).collect();
        let bets_json = serde_json::to_string(&bets)?;
        let user_bets_json = serde_json::to_string(&self.user_bets)?;
        let created_json = serde_json::to_string(&self.user_created_bets)?;

        self.storage.set_items(vec![
            (BETS_KEY, bets_json),
            (USER_BETS_KEY, user_bets_json),
            (USER_CREATED_BETS_KEY, created_json),
        ])?;
        Ok(())
    }

    fn insert(&mut self, bet: Bet) {
        if !self.bets.contains_key(&bet.id) {
            self.order.push(bet.id.clone());
        }
        self.bets.insert(bet.id.clone(), bet);
    }

    fn bet(&self, bet_id: &str) -> BetResult<&Bet> {
        self.bets
            .get(bet_id)
            .ok_or_else(|| BetError::NotFound(bet_id.to_string()))
    }

    fn bet_mut(&mut self, bet_id: &str) -> BetResult<&mut Bet> {
        self.bets
            .get_mut(bet_id)
            .ok_or_else(|| BetError::NotFound(bet_id.to_string()))
    }

    /// Get all bets, oldest first
    pub fn get_all_bets(&self) -> Vec<&Bet> {
        self.order.iter().filter_map(|id| self.bets.get(id)).collect()
    }

    pub fn get_trending_bets(&self) -> Vec<&Bet> {
        self.get_all_bets().into_iter().filter(|bet| bet.is_trending).collect()
    }

    /// Non-trending bets, latest expiry first
    pub fn get_recent_bets(&self) -> Vec<&Bet> {
        let mut bets: Vec<&Bet> = self.get_all_bets().into_iter().filter(|bet| !bet.is_trending).collect();
        bets.sort_by(|a, b| b.expires_at.cmp(&a.expires_at));
        bets
    }

    /// Bets the user has voted on
    pub fn get_user_bets(&self) -> Vec<&Bet> {
        self.user_bets.iter().filter_map(|id| self.bets.get(id)).collect()
    }

    pub fn get_user_created_bets(&self) -> Vec<&Bet> {
        self.user_created_bets.iter().filter_map(|id| self.bets.get(id)).collect()
    }

    pub fn get_bet_by_id(&self, bet_id: &str) -> Option<&Bet> {
        self.bets.get(bet_id)
    }

    pub fn has_joined(&self, bet_id: &str) -> bool {
        self.user_bets.iter().any(|id| id == bet_id)
    }

    pub fn create_bet(&mut self, draft: NewBet) -> BetResult<&Bet> {
        let id = uuid::Uuid::new_v4().to_string();
        let options = draft.build_options(&id);
        if options.len() < 2 {
            return Err(BetError::InvalidInput("a bet needs at least two options".to_string()));
        }

        let title = draft
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled Bet".to_string());

        let mut bet = Bet::new(
            id.clone(),
            title,
            draft.created_by.unwrap_or_else(|| self.user.clone()),
            draft.expires_at.unwrap_or_else(|| Utc::now() + Duration::days(1)),
            draft.stake.unwrap_or_default(),
            options,
        );
        bet.description = draft.description.filter(|d| !d.trim().is_empty());
        tally::recalculate(&mut bet.options, ZeroVotePolicy::EqualSplit);

        info!("📝 Created bet: {} ({} options, stake {})", bet.title, bet.options.len(), bet.pool_display());

        self.insert(bet);
        self.user_created_bets.push(id.clone());
        self.save_to_storage()?;
        self.bet(&id)
    }

    /// Cast or move the user's vote. Voting for the option already held is a no-op.
    pub fn place_bet(&mut self, bet_id: &str, option_id: &str) -> BetResult<&Bet> {
        let first_vote = !self.has_joined(bet_id);

        let changed = {
            let bet = self.bet_mut(bet_id)?;
            if bet.option(option_id).is_none() {
                return Err(BetError::UnknownOption {
                    bet_id: bet_id.to_string(),
                    option_id: option_id.to_string(),
                });
            }

            if bet.user_vote.as_deref() == Some(option_id) {
                false
            } else {
                let weight = bet.vote_weight();
                let previous = bet.user_vote.take();

                for option in &mut bet.options {
                    if option.id == option_id {
                        option.votes = option.votes.saturating_add(weight);
                    } else if previous.as_deref() == Some(option.id.as_str()) {
                        option.votes = option.votes.saturating_sub(weight);
                    }
                }

                bet.user_vote = Some(option_id.to_string());
                if first_vote {
                    bet.participants = bet.participants.saturating_add(1);
                }
                tally::recalculate(&mut bet.options, ZeroVotePolicy::EqualSplit);

                info!(
                    "🗳️ Vote on '{}': {}{}",
                    bet.title,
                    option_id,
                    previous.map(|p| format!(" (moved from {})", p)).unwrap_or_default()
                );
                true
            }
        };

        if changed {
            if first_vote {
                self.user_bets.push(bet_id.to_string());
            }
            self.save_to_storage()?;
        }

        self.bet(bet_id)
    }

    /// One extra vote on the option already chosen. Allowed once per bet.
    pub fn double_down(&mut self, bet_id: &str) -> BetResult<&Bet> {
        {
            let bet = self.bet_mut(bet_id)?;
            let voted = bet
                .user_vote
                .clone()
                .ok_or_else(|| BetError::NotVoted(bet_id.to_string()))?;
            if bet.user_doubled_down {
                return Err(BetError::AlreadyDoubledDown(bet_id.to_string()));
            }

            let option = bet
                .options
                .iter_mut()
                .find(|o| o.id == voted)
                .ok_or_else(|| BetError::UnknownOption {
                    bet_id: bet_id.to_string(),
                    option_id: voted.clone(),
                })?;
            option.votes = option.votes.saturating_add(1);
            bet.user_doubled_down = true;
            tally::recalculate(&mut bet.options, ZeroVotePolicy::EqualSplit);

            info!("⏫ Doubled down on '{}' ({})", bet.title, voted);
        }

        self.save_to_storage()?;
        self.bet(bet_id)
    }

    /// Newest comment first.
    pub fn add_comment(&mut self, bet_id: &str, text: &str) -> BetResult<&Bet> {
        if text.trim().is_empty() {
            return Err(BetError::InvalidInput("comment cannot be empty".to_string()));
        }

        let comment = Comment::new(self.user.name.clone(), text.trim(), Utc::now());
        {
            let bet = self.bet_mut(bet_id)?;
            bet.comments.insert(0, comment);
            bet.comment_count = bet.comment_count.saturating_add(1);
        }

        self.save_to_storage()?;
        self.bet(bet_id)
    }

    pub fn add_reaction(&mut self, bet_id: &str, emoji: &str) -> BetResult<&Bet> {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(BetError::InvalidInput("reaction cannot be empty".to_string()));
        }

        {
            let bet = self.bet_mut(bet_id)?;
            match bet.reactions.iter_mut().find(|r| r.emoji == emoji) {
                Some(reaction) => reaction.count = reaction.count.saturating_add(1),
                None => bet.reactions.push(Reaction {
                    emoji: emoji.to_string(),
                    count: 1,
                }),
            }
        }

        self.save_to_storage()?;
        self.bet(bet_id)
    }

    pub fn toggle_like(&mut self, bet_id: &str) -> BetResult<&Bet> {
        {
            let bet = self.bet_mut(bet_id)?;
            bet.user_liked = !bet.user_liked;
        }

        self.save_to_storage()?;
        self.bet(bet_id)
    }

    pub fn format_time_left(&self, expires_at: DateTime<Utc>) -> String {
        countdown::format_time_left(expires_at, Utc::now())
    }

    pub fn generate_invite_code(&self, bet_id: &str) -> String {
        invite::bet_link(&self.invite_base_url, bet_id)
    }

    /// Drop every bet and the joined/created lists, in memory and in storage.
    pub fn clear_all(&mut self) -> BetResult<()> {
        self.bets.clear();
        self.order.clear();
        self.user_bets.clear();
        self.user_created_bets.clear();

        self.storage
            .remove_items(&[BETS_KEY, USER_BETS_KEY, USER_CREATED_BETS_KEY])?;
        info!("🧹 Cleared all bet data");
        Ok(())
    }

    pub fn get_statistics(&self) -> BetStatistics {
        BetStatistics {
            total_bets: self.bets.len(),
            trending_bets: self.bets.values().filter(|b| b.is_trending).count(),
            joined_bets: self.get_user_bets().len(),
            created_bets: self.get_user_created_bets().len(),
            total_votes: self.bets.values().map(|b| b.total_votes()).sum(),
            liked_bets: self.bets.values().filter(|b| b.user_liked).count(),
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq)]
pub struct BetStatistics {
    pub total_bets: usize,
    pub trending_bets: usize,
    pub joined_bets: usize,
    pub created_bets: usize,
    pub total_votes: u64,
    pub liked_bets: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::{BetKind, BetOption, Stake};
    use crate::storage::{FileStorage, MemoryStorage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn settings(seed: bool) -> Settings {
        Settings {
            seed_mock_data: seed,
            ..Settings::default()
        }
    }

    fn empty_service() -> BetService<MemoryStorage> {
        BetService::open(MemoryStorage::new(), &settings(false)).unwrap()
    }

    fn yes_no(service: &mut BetService<MemoryStorage>) -> String {
        service.create_bet(NewBet::titled("Will it snow?")).unwrap().id.clone()
    }

    fn votes(bet: &Bet) -> Vec<u32> {
        bet.options.iter().map(|o| o.votes).collect()
    }

    fn pcts(bet: &Bet) -> Vec<u32> {
        bet.options.iter().map(|o| o.percentage).collect()
    }

    fn stored(bet: Bet) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(BETS_KEY, serde_json::to_string(&vec![bet]).unwrap())
            .unwrap();
        storage
    }

    fn big_bet(yes: u32, no: u32) -> Bet {
        Bet::new(
            "b".to_string(),
            "Crowd favourite".to_string(),
            Creator::new("A", "A"),
            Utc::now() + Duration::days(1),
            Stake::Points(1),
            vec![BetOption::new("y", "Yes").with_votes(yes), BetOption::new("n", "No").with_votes(no)],
        )
    }

    #[test]
    fn test_seeding_populates_empty_store() {
        let mut rng = StdRng::seed_from_u64(42);
        let service = BetService::open_with_rng(MemoryStorage::new(), &settings(true), &mut rng).unwrap();

        assert_eq!(service.get_all_bets().len(), 8);
        assert!(service.get_bet_by_id(FEATURED_BET_ID).is_some());
        // seeded bets are neither joined nor created by the user
        assert!(service.get_user_bets().is_empty());
        assert!(service.get_user_created_bets().is_empty());

        let trending: Vec<_> = service.get_trending_bets().iter().map(|b| b.id.clone()).collect();
        assert_eq!(trending, vec!["1", "2", "4", "5", FEATURED_BET_ID]);
    }

    #[test]
    fn test_featured_bet_restored_without_reseeding() {
        let mut storage = MemoryStorage::new();
        let lone = Bet::new(
            "solo".to_string(),
            "Solo".to_string(),
            Creator::new("A", "A"),
            Utc::now(),
            Stake::Points(1),
            vec![],
        );
        storage
            .set_item(BETS_KEY, serde_json::to_string(&vec![lone]).unwrap())
            .unwrap();

        let service = BetService::open(storage, &settings(true)).unwrap();
        let ids: Vec<_> = service.get_all_bets().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec!["solo", FEATURED_BET_ID]);
    }

    #[test]
    fn test_recent_bets_sorted_by_latest_expiry() {
        let mut rng = StdRng::seed_from_u64(1);
        let service = BetService::open_with_rng(MemoryStorage::new(), &settings(true), &mut rng).unwrap();

        let recent: Vec<_> = service.get_recent_bets().iter().map(|b| b.id.clone()).collect();
        assert_eq!(recent, vec!["7", "6", "3"]);
    }

    #[test]
    fn test_create_bet_defaults() {
        let mut service = empty_service();
        let bet = service.create_bet(NewBet::default()).unwrap().clone();

        assert_eq!(bet.title, "Untitled Bet");
        assert_eq!(bet.created_by, Creator::new("You", "Y"));
        assert_eq!(bet.participants, 1);
        assert_eq!(bet.stake, Stake::Points(100));
        assert!(!bet.is_trending);
        assert_eq!(bet.comment_count, 0);
        assert_eq!(pcts(&bet), vec![50, 50]);
        assert_eq!(bet.options[0].id, format!("{}-1", bet.id));
        assert!(bet.expires_at > Utc::now() + Duration::hours(23));

        let created: Vec<_> = service.get_user_created_bets().iter().map(|b| b.id.clone()).collect();
        assert_eq!(created, vec![bet.id]);
    }

    #[test]
    fn test_create_multiple_choice_bet() {
        let mut service = empty_service();
        let bet = service
            .create_bet(NewBet {
                title: Some("Hackathon winner".to_string()),
                kind: Some(BetKind::Multiple),
                options: vec!["Alpha".into(), "Beta".into(), "Gamma".into()],
                stake: Some(Stake::Dare("Sing karaoke".to_string())),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(pcts(bet), vec![33, 33, 33]);
        assert_eq!(bet.options[2].id, "new-2");
        assert_eq!(bet.pool_display(), "Sing karaoke");
    }

    #[test]
    fn test_create_bet_needs_two_options() {
        let mut service = empty_service();
        let result = service.create_bet(NewBet {
            options: vec!["Only".into()],
            ..Default::default()
        });
        assert!(matches!(result, Err(BetError::InvalidInput(_))));
    }

    #[test]
    fn test_first_vote_joins_bet() {
        let mut service = empty_service();
        let id = yes_no(&mut service);
        let yes = format!("{}-1", id);

        let bet = service.place_bet(&id, &yes).unwrap();
        assert_eq!(votes(bet), vec![1, 0]);
        assert_eq!(pcts(bet), vec![100, 0]);
        assert_eq!(bet.participants, 2);
        assert_eq!(bet.user_vote.as_deref(), Some(yes.as_str()));
        assert_eq!(service.get_user_bets().len(), 1);
    }

    #[test]
    fn test_same_vote_is_noop() {
        let mut service = empty_service();
        let id = yes_no(&mut service);
        let yes = format!("{}-1", id);

        service.place_bet(&id, &yes).unwrap();
        let bet = service.place_bet(&id, &yes).unwrap();
        assert_eq!(votes(bet), vec![1, 0]);
        assert_eq!(bet.participants, 2);
    }

    #[test]
    fn test_switching_vote_moves_it() {
        let mut service = empty_service();
        let id = yes_no(&mut service);
        let (yes, no) = (format!("{}-1", id), format!("{}-2", id));

        service.place_bet(&id, &yes).unwrap();
        let bet = service.place_bet(&id, &no).unwrap();
        assert_eq!(votes(bet), vec![0, 1]);
        assert_eq!(pcts(bet), vec![0, 100]);
        // switching does not count as joining again
        assert_eq!(bet.participants, 2);
        assert_eq!(service.get_user_bets().len(), 1);
    }

    #[test]
    fn test_vote_for_unknown_option_is_rejected() {
        let mut service = empty_service();
        let id = yes_no(&mut service);

        let err = service.place_bet(&id, "maybe").unwrap_err();
        assert!(matches!(err, BetError::UnknownOption { .. }));
        assert!(service.get_bet_by_id(&id).unwrap().user_vote.is_none());
        assert!(service.get_user_bets().is_empty());
    }

    #[test]
    fn test_vote_on_missing_bet() {
        let mut service = empty_service();
        assert!(matches!(service.place_bet("nope", "x"), Err(BetError::NotFound(_))));
    }

    #[test]
    fn test_double_down_requires_vote_and_happens_once() {
        let mut service = empty_service();
        let id = yes_no(&mut service);
        let yes = format!("{}-1", id);

        assert!(matches!(service.double_down(&id), Err(BetError::NotVoted(_))));
        assert_eq!(votes(service.get_bet_by_id(&id).unwrap()), vec![0, 0]);

        service.place_bet(&id, &yes).unwrap();
        let bet = service.double_down(&id).unwrap();
        assert_eq!(votes(bet), vec![2, 0]);
        assert!(bet.user_doubled_down);

        assert!(matches!(service.double_down(&id), Err(BetError::AlreadyDoubledDown(_))));
        assert_eq!(votes(service.get_bet_by_id(&id).unwrap()), vec![2, 0]);
    }

    #[test]
    fn test_double_down_on_vanished_option_keeps_flag() {
        let mut bet = big_bet(3, 1);
        bet.user_vote = Some("gone".to_string());
        let mut service = BetService::open(stored(bet), &settings(false)).unwrap();

        let err = service.double_down("b").unwrap_err();
        assert!(matches!(err, BetError::UnknownOption { .. }));
        let bet = service.get_bet_by_id("b").unwrap();
        assert!(!bet.user_doubled_down);
        assert_eq!(votes(bet), vec![3, 1]);
    }

    #[test]
    fn test_huge_vote_counts_do_not_overflow() {
        let storage = stored(big_bet(3_000_000_000, 3_000_000_000));
        let mut service = BetService::open(storage, &settings(false)).unwrap();
        assert_eq!(service.get_statistics().total_votes, 6_000_000_000);

        let bet = service.place_bet("b", "y").unwrap();
        assert_eq!(votes(bet), vec![3_000_000_001, 3_000_000_000]);
        assert_eq!(pcts(bet), vec![50, 50]);

        let storage = stored(big_bet(u32::MAX, 0));
        let mut service = BetService::open(storage, &settings(false)).unwrap();
        service.place_bet("b", "y").unwrap();
        let bet = service.double_down("b").unwrap();
        assert_eq!(votes(bet), vec![u32::MAX, 0]);
        assert_eq!(bet.total_votes(), u32::MAX as u64);
    }

    #[test]
    fn test_switch_after_double_down_moves_full_weight() {
        let mut service = empty_service();
        let id = yes_no(&mut service);
        let (yes, no) = (format!("{}-1", id), format!("{}-2", id));

        service.place_bet(&id, &yes).unwrap();
        service.double_down(&id).unwrap();
        let bet = service.place_bet(&id, &no).unwrap();
        assert_eq!(votes(bet), vec![0, 2]);
    }

    #[test]
    fn test_comments_are_prepended() {
        let mut service = empty_service();
        let id = yes_no(&mut service);

        service.add_comment(&id, "first").unwrap();
        let bet = service.add_comment(&id, "second").unwrap();
        assert_eq!(bet.comment_count, 2);
        assert_eq!(bet.comments[0].text, "second");
        assert_eq!(bet.comments[0].author, "You");

        assert!(matches!(service.add_comment(&id, " "), Err(BetError::InvalidInput(_))));
    }

    #[test]
    fn test_reactions_increment_per_emoji() {
        let mut service = empty_service();
        let id = yes_no(&mut service);

        service.add_reaction(&id, "🔥").unwrap();
        service.add_reaction(&id, "😂").unwrap();
        let bet = service.add_reaction(&id, "🔥").unwrap();
        assert_eq!(
            bet.reactions,
            vec![
                Reaction { emoji: "🔥".to_string(), count: 2 },
                Reaction { emoji: "😂".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_toggle_like() {
        let mut service = empty_service();
        let id = yes_no(&mut service);

        assert!(service.toggle_like(&id).unwrap().user_liked);
        assert!(!service.toggle_like(&id).unwrap().user_liked);
    }

    #[test]
    fn test_invite_code() {
        let service = empty_service();
        assert_eq!(service.generate_invite_code("abc"), "http://localhost:8080/bet/abc");
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bets.redb");

        let (id, yes) = {
            let storage = FileStorage::open(&path).unwrap();
            let mut service = BetService::open(storage, &settings(false)).unwrap();
            let id = service.create_bet(NewBet::titled("Persist me")).unwrap().id.clone();
            let yes = format!("{}-1", id);
            service.place_bet(&id, &yes).unwrap();
            service.double_down(&id).unwrap();
            service.toggle_like(&id).unwrap();
            (id, yes)
        };

        let storage = FileStorage::open(&path).unwrap();
        let service = BetService::open(storage, &settings(false)).unwrap();
        let bet = service.get_bet_by_id(&id).unwrap();
        assert_eq!(bet.user_vote.as_deref(), Some(yes.as_str()));
        assert!(bet.user_doubled_down);
        assert!(bet.user_liked);
        assert_eq!(votes(bet), vec![2, 0]);
        assert_eq!(service.get_user_bets().len(), 1);
        assert_eq!(service.get_user_created_bets().len(), 1);
    }

    /// Records which keys each batched write carried.
    #[derive(Default)]
    struct BatchLog {
        inner: MemoryStorage,
        batches: Vec<Vec<String>>,
    }

    impl Storage for BatchLog {
        fn get_item(&self, key: &str) -> Result<Option<String>, crate::StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: String) -> Result<(), crate::StorageError> {
            self.batches.push(vec![key.to_string()]);
            self.inner.set_item(key, value)
        }

        fn remove_item(&mut self, key: &str) -> Result<(), crate::StorageError> {
            self.inner.remove_item(key)
        }

        fn set_items(&mut self, items: Vec<(&str, String)>) -> Result<(), crate::StorageError> {
            self.batches.push(items.iter().map(|(k, _)| k.to_string()).collect());
            self.inner.set_items(items)
        }
    }

    #[test]
    fn test_bet_keys_are_saved_in_one_batch() {
        let mut service = BetService::open(BatchLog::default(), &settings(false)).unwrap();
        let id = service.create_bet(NewBet::titled("Batch?")).unwrap().id.clone();
        service.place_bet(&id, &format!("{}-1", id)).unwrap();

        let log = service.into_storage();
        assert_eq!(log.batches.len(), 2);
        for batch in &log.batches {
            assert_eq!(batch, &vec![BETS_KEY, USER_BETS_KEY, USER_CREATED_BETS_KEY]);
        }
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(BETS_KEY, "{not json".to_string()).unwrap();
        storage.set_item(USER_BETS_KEY, "42".to_string()).unwrap();

        let service = BetService::open(storage, &settings(false)).unwrap();
        assert!(service.get_all_bets().is_empty());
        assert!(service.get_user_bets().is_empty());
    }

    #[test]
    fn test_missing_ids_are_skipped() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(USER_BETS_KEY, r#"["gone","gone"]"#.to_string())
            .unwrap();
        let service = BetService::open(storage, &settings(false)).unwrap();
        assert!(service.get_user_bets().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut service = empty_service();
        let id = yes_no(&mut service);
        service.place_bet(&id, &format!("{}-1", id)).unwrap();

        service.clear_all().unwrap();
        assert!(service.get_all_bets().is_empty());
        assert!(service.get_user_bets().is_empty());

        let storage = service.into_storage();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_statistics() {
        let mut service = empty_service();
        let id = yes_no(&mut service);
        service.place_bet(&id, &format!("{}-2", id)).unwrap();
        service.toggle_like(&id).unwrap();
        yes_no(&mut service);

        let stats = service.get_statistics();
        assert_eq!(
            stats,
            BetStatistics {
                total_bets: 2,
                trending_bets: 0,
                joined_bets: 1,
                created_bets: 2,
                total_votes: 1,
                liked_bets: 1,
            }
        );
    }
}
