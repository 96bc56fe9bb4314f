use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Stake {
    Money(f64),
    Points(u64),
    Dare(String),
}

impl Stake {
    /// What the whole pot is worth once every participant has staked.
    pub fn pool_display(&self, participants: u32) -> String {
        match self {
            Stake::Money(amount) => format!("${}", trim_amount(amount * participants as f64)),
            Stake::Points(points) => format!("{} pts", points.saturating_mul(participants as u64)),
            Stake::Dare(dare) => dare.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Stake::Money(_) => "money",
            Stake::Points(_) => "points",
            Stake::Dare(_) => "dare",
        }
    }
}

impl Default for Stake {
    fn default() -> Self {
        Stake::Points(100)
    }
}

fn trim_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BetKind {
    YesNo,
    Multiple,
    Time,
}

impl std::str::FromStr for BetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yesno" | "yes/no" | "binary" => Ok(BetKind::YesNo),
            "multiple" | "multiplechoice" => Ok(BetKind::Multiple),
            "time" | "timebased" => Ok(BetKind::Time),
            other => Err(format!("unknown bet kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creator {
    pub name: String,
    pub initials: String,
}

impl Creator {
    pub fn new(name: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initials: initials.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BetOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub votes: u32,
    #[serde(default)]
    pub percentage: u32,
}

impl BetOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
            votes: 0,
            percentage: 0,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_votes(mut self, votes: u32) -> Self {
        self.votes = votes;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            text: text.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reaction {
    pub emoji: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: Creator,
    pub participants: u32,
    pub expires_at: DateTime<Utc>,
    pub stake: Stake,
    pub is_trending: bool,
    pub comment_count: u32,
    pub options: Vec<BetOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<String>, // option id the user voted for
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub user_doubled_down: bool,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub user_liked: bool,
}

impl Bet {
    pub fn new(
        id: String,
        title: String,
        created_by: Creator,
        expires_at: DateTime<Utc>,
        stake: Stake,
        options: Vec<BetOption>,
    ) -> Self {
        Self {
            id,
            title,
            description: None,
            created_by,
            participants: 1,
            expires_at,
            stake,
            is_trending: false,
            comment_count: 0,
            options,
            user_vote: None,
            comments: Vec::new(),
            user_doubled_down: false,
            reactions: Vec::new(),
            user_liked: false,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_participants(mut self, participants: u32) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_trending(mut self, trending: bool) -> Self {
        self.is_trending = trending;
        self
    }

    pub fn with_comment_count(mut self, count: u32) -> Self {
        self.comment_count = count;
        self
    }

    pub fn option(&self, option_id: &str) -> Option<&BetOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes as u64).sum()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn pool_display(&self) -> String {
        self.stake.pool_display(self.participants)
    }

    /// Weight the user's vote carries on this bet.
    pub fn vote_weight(&self) -> u32 {
        if self.user_doubled_down {
            2
        } else {
            1
        }
    }
}

/// Input for [`crate::BetService::create_bet`]. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct NewBet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<Creator>,
    pub expires_at: Option<DateTime<Utc>>,
    pub stake: Option<Stake>,
    pub kind: Option<BetKind>,
    pub options: Vec<String>,
}

impl NewBet {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    /// Option list for a freshly created bet with the given id.
    pub fn build_options(&self, bet_id: &str) -> Vec<BetOption> {
        match self.kind {
            Some(BetKind::Multiple) if !self.options.is_empty() => self
                .options
                .iter()
                .enumerate()
                .map(|(i, label)| BetOption::new(format!("new-{}", i), label.clone()))
                .collect(),
            Some(_) => vec![BetOption::new("yes", "Yes"), BetOption::new("no", "No")],
            None if !self.options.is_empty() => self
                .options
                .iter()
                .enumerate()
                .map(|(i, label)| BetOption::new(format!("{}-{}", bet_id, i + 1), label.clone()))
                .collect(),
            None => vec![
                BetOption::new(format!("{}-1", bet_id), "Yes"),
                BetOption::new(format!("{}-2", bet_id), "No"),
            ],
        }
    }
}
