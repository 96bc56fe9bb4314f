use crate::bet::Comment;
use crate::error::{BetError, BetResult, StorageError};
use crate::group_bet::{GroupBet, GroupBetUpdate, NewGroupBet};
use crate::invite;
use crate::storage::Storage;
use crate::tally::{self, ZeroVotePolicy};
use chrono::Utc;
use tracing::{info, warn};

pub const GROUP_BETS_KEY: &str = "groupBets";

/// Group bets live as a single JSON array. Nothing is cached: every call
/// reads the array, changes it and writes it back.
pub struct GroupBetService<S: Storage> {
    storage: S,
    group_base_url: String,
    user_name: String,
}

impl<S: Storage> GroupBetService<S> {
    pub fn new(storage: S, group_base_url: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            storage,
            group_base_url: group_base_url.into(),
            user_name: user_name.into(),
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Unreadable data reads as an empty list here. Mutations refuse to run
    /// over it instead, so the stored blob is never replaced.
    pub fn get_group_bets(&self) -> BetResult<Vec<GroupBet>> {
        match self.load_group_bets() {
            Err(BetError::Storage(StorageError::Json(e))) => {
                warn!("Ignoring unreadable group bets: {}", e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn load_group_bets(&self) -> BetResult<Vec<GroupBet>> {
        match self.storage.get_item(GROUP_BETS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_group_bet_by_id(&self, id: &str) -> BetResult<Option<GroupBet>> {
        Ok(self.get_group_bets()?.into_iter().find(|bet| bet.id == id))
    }

    fn save_group_bets(&mut self, bets: &[GroupBet]) -> BetResult<()> {
        self.storage.set_item(GROUP_BETS_KEY, serde_json::to_string(bets)?)?;
        Ok(())
    }

    /// Load, apply `change` to the matching bet, persist, and return the updated copy.
    fn modify<F>(&mut self, id: &str, change: F) -> BetResult<GroupBet>
    where
        F: FnOnce(&mut GroupBet) -> BetResult<()>,
    {
        let mut bets = self.load_group_bets()?;
        let bet = bets
            .iter_mut()
            .find(|bet| bet.id == id)
            .ok_or_else(|| BetError::NotFound(id.to_string()))?;

        change(bet)?;
        let updated = bet.clone();

        self.save_group_bets(&bets)?;
        Ok(updated)
    }

    pub fn create_group_bet(&mut self, draft: NewGroupBet) -> BetResult<GroupBet> {
        if draft.title.trim().is_empty() {
            return Err(BetError::InvalidInput("group bet title cannot be empty".to_string()));
        }

        let bet = draft.into_group_bet(&self.user_name, Utc::now());
        let mut bets = self.load_group_bets()?;
        bets.push(bet.clone());
        self.save_group_bets(&bets)?;

        info!("👥 Group bet created: {} ({})", bet.title, bet.id);
        Ok(bet)
    }

    pub fn update_group_bet(&mut self, id: &str, update: GroupBetUpdate) -> BetResult<GroupBet> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(BetError::InvalidInput("please provide a title for the bet".to_string()));
            }
        }

        let bet = self.modify(id, |bet| {
            if let Some(title) = update.title {
                bet.title = title;
            }
            if let Some(description) = update.description {
                bet.description = description;
            }
            if let Some(image) = update.image {
                bet.image = Some(image);
            }
            Ok(())
        })?;

        info!("✏️ Group bet updated: {}", bet.title);
        Ok(bet)
    }

    pub fn add_comment_to_group_bet(&mut self, id: &str, text: &str) -> BetResult<GroupBet> {
        if text.trim().is_empty() {
            return Err(BetError::InvalidInput("comment cannot be empty".to_string()));
        }

        let comment = Comment::new(self.user_name.clone(), text.trim(), Utc::now());
        self.modify(id, |bet| {
            bet.comments.push(comment);
            Ok(())
        })
    }

    pub fn join_group_bet(&mut self, id: &str) -> BetResult<GroupBet> {
        let bet = self.modify(id, |bet| {
            bet.participants = bet.participants.saturating_add(1);
            Ok(())
        })?;
        info!("🙋 Joined group bet {} ({} participants)", bet.title, bet.participants);
        Ok(bet)
    }

    /// Group votes are unrestricted: every call adds one vote.
    pub fn vote_on_group_bet(&mut self, id: &str, option_id: &str) -> BetResult<GroupBet> {
        self.modify(id, |bet| {
            let option = bet
                .options
                .iter_mut()
                .find(|o| o.id == option_id)
                .ok_or_else(|| BetError::UnknownOption {
                    bet_id: id.to_string(),
                    option_id: option_id.to_string(),
                })?;
            option.votes = option.votes.saturating_add(1);

            tally::recalculate_group(&mut bet.options, ZeroVotePolicy::Zero);
            Ok(())
        })
    }

    pub fn group_link(&self, id: &str) -> String {
        invite::group_link(&self.group_base_url, id)
    }
}
