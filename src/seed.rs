//! Starter content for an empty store.

use crate::bet::{Bet, BetOption, Comment, Creator, Reaction, Stake};
use crate::tally::{self, ZeroVotePolicy};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const FEATURED_BET_ID: &str = "featured-bet-1";

fn bet(
    id: &str,
    title: &str,
    creator: (&str, &str),
    expires_at: DateTime<Utc>,
    stake: Stake,
    options: Vec<BetOption>,
) -> Bet {
    Bet::new(
        id.to_string(),
        title.to_string(),
        Creator::new(creator.0, creator.1),
        expires_at,
        stake,
        options,
    )
}

pub fn trending_bets(now: DateTime<Utc>) -> Vec<Bet> {
    vec![
        bet(
            "1",
            "Will the project be delivered on time?",
            ("Alex Johnson", "AJ"),
            now + Duration::days(3),
            Stake::Money(20.0),
            vec![
                BetOption::new("1-1", "Yes").with_color("green"),
                BetOption::new("1-2", "No").with_color("red"),
            ],
        )
        .with_participants(12)
        .with_trending(true)
        .with_comment_count(8)
        .with_description("Our team has been working on this project for months. Will we hit the deadline?"),
        bet(
            "2",
            "Who will win the hackathon?",
            ("Morgan Lee", "ML"),
            now + Duration::hours(36),
            Stake::Points(500),
            vec![
                BetOption::new("2-1", "Team Alpha"),
                BetOption::new("2-2", "Team Beta"),
                BetOption::new("2-3", "Team Gamma"),
                BetOption::new("2-4", "Team Delta"),
            ],
        )
        .with_participants(24)
        .with_trending(true)
        .with_comment_count(15),
        bet(
            "3",
            "Will Sarah be late to the meeting?",
            ("David Chen", "DC"),
            now + Duration::hours(1),
            Stake::Dare("Buy coffee for everyone".to_string()),
            vec![
                BetOption::new("3-1", "Yes, as usual").with_color("orange"),
                BetOption::new("3-2", "No, she'll be on time").with_color("blue"),
            ],
        )
        .with_participants(8)
        .with_comment_count(23),
        bet(
            "4",
            "How long will the movie night last?",
            ("Jamie Smith", "JS"),
            now + Duration::days(1),
            Stake::Money(10.0),
            vec![
                BetOption::new("4-1", "Less than 3 hours"),
                BetOption::new("4-2", "3-5 hours"),
                BetOption::new("4-3", "The whole trilogy!"),
            ],
        )
        .with_participants(16)
        .with_trending(true)
        .with_comment_count(7)
        .with_description(
            "We're watching the entire trilogy. Place your bets on how long we'll last before someone falls asleep.",
        ),
        bet(
            "5",
            "Will it rain this weekend?",
            ("Taylor Lopez", "TL"),
            now + Duration::days(2),
            Stake::Points(200),
            vec![
                BetOption::new("5-1", "Yes").with_color("blue"),
                BetOption::new("5-2", "No").with_color("yellow"),
            ],
        )
        .with_participants(32)
        .with_trending(true)
        .with_comment_count(18),
    ]
}

pub fn recent_bets(now: DateTime<Utc>) -> Vec<Bet> {
    vec![
        bet(
            "6",
            "Who will score the first goal?",
            ("Jordan Williams", "JW"),
            now + Duration::hours(3),
            Stake::Money(15.0),
            vec![
                BetOption::new("6-1", "Player A"),
                BetOption::new("6-2", "Player B"),
                BetOption::new("6-3", "Player C"),
                BetOption::new("6-4", "No goals"),
            ],
        )
        .with_participants(45)
        .with_comment_count(32),
        bet(
            "7",
            "Will the new feature be approved?",
            ("Riley Parker", "RP"),
            now + Duration::days(4),
            Stake::Dare("Presentation in a funny costume".to_string()),
            vec![
                BetOption::new("7-1", "Approved").with_color("green"),
                BetOption::new("7-2", "Rejected").with_color("red"),
                BetOption::new("7-3", "More revisions needed").with_color("yellow"),
            ],
        )
        .with_participants(19)
        .with_comment_count(14)
        .with_description("The team has been working on this new feature for weeks. Will the stakeholders approve it?"),
    ]
}

/// Mock bets with random votes, three comments and four reactions each.
pub fn mock_bets<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<Bet> {
    let mut bets = trending_bets(now);
    bets.extend(recent_bets(now));

    for bet in &mut bets {
        for option in &mut bet.options {
            option.votes = rng.gen_range(1..=10);
        }
        tally::recalculate(&mut bet.options, ZeroVotePolicy::EqualSplit);

        let first_label = bet.options.first().map(|o| o.label.clone()).unwrap_or_default();
        bet.comments = vec![
            Comment::new(
                "User1",
                format!("I think {} is the most likely outcome.", first_label),
                now - Duration::hours(2),
            ),
            Comment::new("User2", "This is an interesting bet!", now - Duration::minutes(30)),
            Comment::new("User3", "I just placed my bet. Exciting!", now - Duration::minutes(10)),
        ];
        bet.comment_count = bet.comments.len() as u32;

        bet.reactions = vec![
            Reaction { emoji: "😂".to_string(), count: rng.gen_range(1..=10) },
            Reaction { emoji: "🔥".to_string(), count: rng.gen_range(1..=8) },
            Reaction { emoji: "😮".to_string(), count: rng.gen_range(1..=5) },
            Reaction { emoji: "👍".to_string(), count: rng.gen_range(1..=7) },
        ];
    }

    bets
}

pub fn featured_bet(now: DateTime<Utc>) -> Bet {
    let mut featured = bet(
        FEATURED_BET_ID,
        "Will Alex actually show up to the party?",
        ("Party Host", "PH"),
        now + Duration::hours(2),
        Stake::Money(50.0),
        vec![
            BetOption::new("opt-1", "Yes").with_votes(8),
            BetOption::new("opt-2", "No").with_votes(4),
        ],
    )
    .with_participants(12)
    .with_trending(true)
    .with_comment_count(8)
    .with_description("Alex always says he'll come but never shows up. Let's see if tonight is different!");

    tally::recalculate(&mut featured.options, ZeroVotePolicy::EqualSplit);
    featured.comments = vec![
        Comment::new(
            "Jamie",
            "He's always saying he'll come and then doesn't show up...",
            now - Duration::minutes(30),
        ),
        Comment::new(
            "Alex's Friend",
            "I texted him and he said he's definitely coming this time!",
            now - Duration::minutes(15),
        ),
    ];
    featured.reactions = vec![
        Reaction { emoji: "😂".to_string(), count: 7 },
        Reaction { emoji: "🤔".to_string(), count: 5 },
        Reaction { emoji: "🙏".to_string(), count: 3 },
    ];
    featured
}
