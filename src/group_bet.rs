use crate::bet::{Comment, Stake};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupBetOption {
    pub id: String,
    pub label: String,
    pub percentage: u32,
    pub votes: u32,
}

impl GroupBetOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            percentage: 0,
            votes: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupBet {
    pub id: String,
    pub title: String,
    pub description: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub participants: u32,
    pub options: Vec<GroupBetOption>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub stake: Stake,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl GroupBet {
    pub fn pool_display(&self) -> String {
        self.stake.pool_display(self.participants)
    }

    pub fn time_left(&self, now: DateTime<Utc>) -> String {
        crate::countdown::short_time_left(self.expires_at, now)
    }

    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes as u64).sum()
    }
}

/// Input for a quick group bet. Empty `options` means Yes/No.
#[derive(Debug, Clone, Default)]
pub struct NewGroupBet {
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub stake: Option<Stake>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewGroupBet {
    pub fn into_group_bet(self, creator: &str, now: DateTime<Utc>) -> GroupBet {
        let id = uuid::Uuid::new_v4().to_string();
        let labels = if self.options.is_empty() {
            vec!["Yes".to_string(), "No".to_string()]
        } else {
            self.options
        };
        let options = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| GroupBetOption::new(format!("{}-{}", id, i + 1), label))
            .collect();

        GroupBet {
            id,
            title: self.title,
            description: self.description,
            creator: creator.to_string(),
            created_at: now,
            participants: 1,
            options,
            comments: Vec::new(),
            stake: self.stake.unwrap_or_default(),
            expires_at: self.expires_at.unwrap_or(now + Duration::days(1)),
            image: None,
        }
    }
}

/// Partial update; `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct GroupBetUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}
