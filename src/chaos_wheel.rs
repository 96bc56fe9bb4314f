//! Random bet generator.

use crate::bet::{BetKind, NewBet, Stake};
use rand::seq::SliceRandom;
use rand::Rng;

pub const RANDOM_TOPICS: &[&str] = &[
    "Will it rain tomorrow?",
    "Who's paying for lunch?",
    "How long will the meeting last?",
    "First person to leave the party?",
    "Will the project launch on time?",
    "Who's getting the next promotion?",
    "Last one to arrive at the event?",
    "Next person to get a date?",
];

const BET_KINDS: [BetKind; 3] = [BetKind::YesNo, BetKind::Multiple, BetKind::Time];

const DARES: &[&str] = &["Buy coffee for everyone", "Presentation in a funny costume"];

#[derive(Debug, Clone, PartialEq)]
pub struct ChaosSpin {
    pub title: String,
    pub kind: BetKind,
    pub stake: Stake,
}

/// `(rand[0, 20) + 5) * 10`, i.e. 50..=240 in steps of 10.
fn stake_value<R: Rng>(rng: &mut R) -> u64 {
    (rng.gen_range(0..20) + 5) * 10
}

pub fn spin<R: Rng>(rng: &mut R) -> ChaosSpin {
    let title = RANDOM_TOPICS.choose(rng).copied().unwrap_or("Who's paying for lunch?");
    let kind = BET_KINDS.choose(rng).copied().unwrap_or(BetKind::YesNo);

    let stake = match rng.gen_range(0..3) {
        0 => Stake::Money(stake_value(rng) as f64),
        1 => Stake::Points(stake_value(rng)),
        _ => Stake::Dare(DARES.choose(rng).copied().unwrap_or(DARES[0]).to_string()),
    };

    ChaosSpin {
        title: title.to_string(),
        kind,
        stake,
    }
}

impl ChaosSpin {
    pub fn into_new_bet(self) -> NewBet {
        let options = match self.kind {
            BetKind::Multiple => vec!["Yes".to_string(), "No".to_string()],
            _ => Vec::new(),
        };
        NewBet {
            title: Some(self.title),
            kind: Some(self.kind),
            stake: Some(self.stake),
            options,
            ..Default::default()
        }
    }
}
