use anyhow::{anyhow, bail, Context, Result};
use betmoment::{
    bet::{Bet, BetKind, BetOption, NewBet, Stake},
    bet_service::BetService,
    chaos_wheel,
    config::Settings,
    countdown,
    group_bet::{GroupBet, GroupBetUpdate, NewGroupBet},
    group_bet_service::GroupBetService,
    invite::{self, InviteTarget},
    leaderboard::{self, Leaderboard},
    option_matcher::{MatchKind, OptionMatcher},
    profile,
    storage::{FileStorage, Storage},
    watch::{render_watch_frame, run_watch},
};
use chrono::Utc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: betmoment <command> [args]

  list | trending | recent | mine          browse bets
  show <id>                               bet details and comments
  create <title> [--kind yesno|multiple|time] [--option L]...
         [--stake money|points|dare] [--value V] [--expires DATE] [--description D]
  vote <id> <option>                      option id or label
  double-down <id>
  comment <id> <text...>
  react <id> <emoji>
  like <id>
  invite <id>
  join <link>                             bet or group invite link
  group list | create | show | vote | join | comment | edit
  leaderboard [page]
  profile
  chaos [--create]
  stats
  watch                                   live countdown of trending bets
  clear";

/// Positional arguments with `--flag value` pairs removed.
fn positionals(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            if arg != "--create" {
                iter.next();
            }
        } else {
            out.push(arg.clone());
        }
    }
    out
}

fn flag_values(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|pair| pair[0] == flag)
        .map(|pair| pair[1].clone())
        .collect()
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    flag_values(args, flag).into_iter().next()
}

fn required<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("missing {}\n\n{}", what, USAGE))
}

fn parse_stake(args: &[String]) -> Result<Option<Stake>> {
    let kind = match flag_value(args, "--stake") {
        Some(kind) => kind,
        None => return Ok(None),
    };
    let value = flag_value(args, "--value");

    let stake = match kind.as_str() {
        "money" => Stake::Money(
            value
                .as_deref()
                .unwrap_or("10")
                .parse()
                .context("--value must be a number for money stakes")?,
        ),
        "points" => Stake::Points(
            value
                .as_deref()
                .unwrap_or("100")
                .parse()
                .context("--value must be a whole number for points stakes")?,
        ),
        "dare" => Stake::Dare(value.ok_or_else(|| anyhow!("dare stakes need --value <dare>"))?),
        other => bail!("unknown stake type '{}'", other),
    };
    Ok(Some(stake))
}

fn parse_expiry(args: &[String], matcher: &OptionMatcher) -> Result<Option<chrono::DateTime<Utc>>> {
    match flag_value(args, "--expires") {
        Some(raw) => matcher
            .parse_expiry(&raw)
            .map(Some)
            .ok_or_else(|| anyhow!("could not understand expiry '{}'", raw)),
        None => Ok(None),
    }
}

fn print_bet(bet: &Bet) {
    let now = Utc::now();
    println!(
        "[{}] {}{}{}",
        bet.id,
        bet.title,
        if bet.is_trending { " 🔥" } else { "" },
        if bet.user_liked { " ❤️" } else { "" }
    );
    if let Some(description) = &bet.description {
        println!("    {}", description);
    }
    println!(
        "    by {} · {} participants · pool {} · {}",
        bet.created_by.name,
        bet.participants,
        bet.pool_display(),
        countdown::short_time_left(bet.expires_at, now)
    );
    for option in &bet.options {
        let mine = bet.user_vote.as_deref() == Some(option.id.as_str());
        println!(
            "    {} {:<28} {:>3}% {:>4} votes  ({}){}",
            if mine { "●" } else { "○" },
            option.label,
            option.percentage,
            option.votes,
            option.id,
            if mine && bet.user_doubled_down { " x2" } else { "" }
        );
    }
    if !bet.reactions.is_empty() {
        let reactions: Vec<String> = bet
            .reactions
            .iter()
            .map(|r| format!("{} {}", r.emoji, r.count))
            .collect();
        println!("    {} · {} comments", reactions.join("  "), bet.comment_count);
    }
}

fn print_bet_list(title: &str, bets: &[&Bet]) {
    println!("== {} ({}) ==", title, bets.len());
    for bet in bets {
        print_bet(bet);
    }
}

fn print_group_bet(bet: &GroupBet, link: &str) {
    println!("[{}] {}", bet.id, bet.title);
    if !bet.description.is_empty() {
        println!("    {}", bet.description);
    }
    println!(
        "    by {} · {} participants · pool {} · {}",
        bet.creator,
        bet.participants,
        bet.pool_display(),
        bet.time_left(Utc::now())
    );
    for option in &bet.options {
        println!(
            "    ○ {:<28} {:>3}% {:>4} votes  ({})",
            option.label, option.percentage, option.votes, option.id
        );
    }
    for comment in &bet.comments {
        println!("    💬 {}: {}", comment.author, comment.text);
    }
    println!("    🔗 {}", link);
}

fn resolve_option(matcher: &OptionMatcher, input: &str, options: &[BetOption]) -> Result<String> {
    match matcher.resolve(input, options) {
        Some((option, MatchKind::Fuzzy(score))) => {
            info!("Matched '{}' to '{}' (similarity {:.2})", input, option.label, score);
            Ok(option.id.clone())
        }
        Some((option, _)) => Ok(option.id.clone()),
        None => {
            let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
            bail!("no option matches '{}'; choose one of: {}", input, labels.join(", "))
        }
    }
}

fn run_bet_command<S: Storage>(
    command: &str,
    args: &[String],
    storage: S,
    settings: &Settings,
) -> Result<()> {
    let mut service = BetService::open(storage, settings).context("Failed to open bet store")?;
    let matcher = OptionMatcher::default();
    let pos = positionals(args);

    match command {
        "list" => print_bet_list("All bets", &service.get_all_bets()),
        "trending" => print_bet_list("Trending", &service.get_trending_bets()),
        "recent" => print_bet_list("Recent", &service.get_recent_bets()),
        "mine" => {
            print_bet_list("Joined", &service.get_user_bets());
            print_bet_list("Created", &service.get_user_created_bets());
        }
        "show" => {
            let id = required(&pos, 0, "bet id")?;
            let bet = service
                .get_bet_by_id(id)
                .ok_or_else(|| anyhow!("Bet not found: {}", id))?;
            print_bet(bet);
            println!("    ⏳ {}", service.format_time_left(bet.expires_at));
            for comment in &bet.comments {
                println!(
                    "    💬 {} ({}): {}",
                    comment.author,
                    countdown::format_distance(comment.timestamp, Utc::now()),
                    comment.text
                );
            }
        }
        "create" => {
            let title = pos.join(" ");
            let kind = match flag_value(args, "--kind") {
                Some(raw) => Some(raw.parse::<BetKind>().map_err(|e| anyhow!(e))?),
                None => None,
            };
            let draft = NewBet {
                title: Some(title),
                description: flag_value(args, "--description"),
                expires_at: parse_expiry(args, &matcher)?,
                stake: parse_stake(args)?,
                kind,
                options: flag_values(args, "--option"),
                ..Default::default()
            };
            let bet = service.create_bet(draft)?.clone();
            print_bet(&bet);
            println!("    🔗 {}", service.generate_invite_code(&bet.id));
        }
        "vote" => {
            let id = required(&pos, 0, "bet id")?;
            let input = required(&pos, 1, "option")?;
            let options = service
                .get_bet_by_id(id)
                .ok_or_else(|| anyhow!("Bet not found: {}", id))?
                .options
                .clone();
            let option_id = resolve_option(&matcher, input, &options)?;
            print_bet(service.place_bet(id, &option_id)?);
        }
        "double-down" => {
            let id = required(&pos, 0, "bet id")?;
            print_bet(service.double_down(id)?);
        }
        "comment" => {
            let id = required(&pos, 0, "bet id")?;
            let text = pos[1..].join(" ");
            let bet = service.add_comment(id, &text)?;
            println!("💬 {} comments on '{}'", bet.comment_count, bet.title);
        }
        "react" => {
            let id = required(&pos, 0, "bet id")?;
            let emoji = required(&pos, 1, "emoji")?;
            print_bet(service.add_reaction(id, emoji)?);
        }
        "like" => {
            let id = required(&pos, 0, "bet id")?;
            let bet = service.toggle_like(id)?;
            println!("{} '{}'", if bet.user_liked { "❤️ Liked" } else { "🤍 Unliked" }, bet.title);
        }
        "invite" => {
            let id = required(&pos, 0, "bet id")?;
            if service.get_bet_by_id(id).is_none() {
                bail!("Bet not found: {}", id);
            }
            println!("{}", service.generate_invite_code(id));
        }
        "profile" => {
            let mut stats = profile::mock_user_stats();
            let mut bets = service.get_user_bets();
            bets.extend(service.get_user_created_bets());
            stats.record_stakes(&bets);

            println!("== {} ==", settings.user_name);
            println!(
                "Total bets: {} · Won: {} ({}%) · Streak: {}🔥 · Points: {}",
                stats.total_bets,
                stats.won_bets,
                stats.win_rate(),
                stats.current_streak,
                stats.points_earned
            );
            for achievement in stats.achievements() {
                println!(
                    "  {} {} - {}",
                    if achievement.completed { "✅" } else { "⬜" },
                    achievement.name,
                    achievement.description
                );
            }
        }
        "chaos" => {
            let spin = chaos_wheel::spin(&mut rand::thread_rng());
            println!("🎡 {} [{:?}] stake: {}", spin.title, spin.kind, spin.stake.pool_display(1));
            if args.iter().any(|a| a == "--create") {
                let bet = service.create_bet(spin.into_new_bet())?.clone();
                print_bet(&bet);
            }
        }
        "stats" => {
            let stats = service.get_statistics();
            println!(
                "📊 Bets: {} (trending {}) · Joined: {} · Created: {} · Votes: {} · Liked: {}",
                stats.total_bets,
                stats.trending_bets,
                stats.joined_bets,
                stats.created_bets,
                stats.total_votes,
                stats.liked_bets
            );
        }
        "clear" => {
            service.clear_all()?;
            println!("🧹 All bets cleared");
        }
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}

fn run_group_command<S: Storage>(args: &[String], storage: S, settings: &Settings) -> Result<()> {
    let mut service = GroupBetService::new(storage, settings.group_base_url.clone(), settings.user_name.clone());
    let matcher = OptionMatcher::default();
    let pos = positionals(args);
    let sub = required(&pos, 0, "group subcommand")?;

    match sub {
        "list" => {
            let bets = service.get_group_bets()?;
            println!("== Group bets ({}) ==", bets.len());
            for bet in &bets {
                print_group_bet(bet, &service.group_link(&bet.id));
            }
        }
        "create" => {
            let draft = NewGroupBet {
                title: pos[1..].join(" "),
                description: flag_value(args, "--description").unwrap_or_default(),
                options: flag_values(args, "--option"),
                stake: parse_stake(args)?,
                expires_at: parse_expiry(args, &matcher)?,
            };
            let bet = service.create_group_bet(draft)?;
            print_group_bet(&bet, &service.group_link(&bet.id));
        }
        "show" => {
            let id = required(&pos, 1, "group bet id")?;
            let bet = service
                .get_group_bet_by_id(id)?
                .ok_or_else(|| anyhow!("Group bet not found: {}", id))?;
            print_group_bet(&bet, &service.group_link(id));
        }
        "vote" => {
            let id = required(&pos, 1, "group bet id")?;
            let input = required(&pos, 2, "option")?;
            let bet = service
                .get_group_bet_by_id(id)?
                .ok_or_else(|| anyhow!("Group bet not found: {}", id))?;
            let options: Vec<BetOption> = bet
                .options
                .iter()
                .map(|o| BetOption::new(o.id.clone(), o.label.clone()))
                .collect();
            let option_id = resolve_option(&matcher, input, &options)?;
            let bet = service.vote_on_group_bet(id, &option_id)?;
            print_group_bet(&bet, &service.group_link(id));
        }
        "join" => {
            let id = required(&pos, 1, "group bet id")?;
            let bet = service.join_group_bet(id)?;
            print_group_bet(&bet, &service.group_link(id));
        }
        "comment" => {
            let id = required(&pos, 1, "group bet id")?;
            let text = pos[2..].join(" ");
            let bet = service.add_comment_to_group_bet(id, &text)?;
            println!("💬 {} comments on '{}'", bet.comments.len(), bet.title);
        }
        "edit" => {
            let id = required(&pos, 1, "group bet id")?;
            let update = GroupBetUpdate {
                title: flag_value(args, "--title"),
                description: flag_value(args, "--description"),
                image: flag_value(args, "--image"),
            };
            let bet = service.update_group_bet(id, update)?;
            print_group_bet(&bet, &service.group_link(id));
        }
        other => bail!("unknown group command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}

/// Re-read the store on every tick so votes cast from another shell show up.
async fn watch(settings: &Settings) -> Result<()> {
    let period = Duration::from_secs(settings.watch_interval_secs.max(1));
    info!("Watching trending bets (interval: {}s, Ctrl-C to stop)", period.as_secs());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Error waiting for Ctrl-C: {}", e);
        }
    };

    run_watch(period, shutdown, || {
        let storage = match FileStorage::open(&settings.data_file) {
            Ok(storage) => storage,
            Err(e) => {
                error!("Error reading {}: {}", settings.data_file, e);
                return;
            }
        };
        match BetService::open(storage, settings) {
            Ok(service) => print!("{}", render_watch_frame(&service, Utc::now())),
            Err(e) => error!("Error loading bets: {}", e),
        }
    })
    .await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let settings = Settings::load().context("Failed to load settings")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match args.first() {
        Some(command) => command.clone(),
        None => {
            println!("{}", USAGE);
            return Ok(());
        }
    };
    let rest = &args[1..];

    if command == "watch" {
        return watch(&settings).await;
    }

    let mut storage = FileStorage::open(&settings.data_file)
        .with_context(|| format!("Failed to open data file {}", settings.data_file))?;

    match command.as_str() {
        "group" => run_group_command(rest, &mut storage, &settings),
        "leaderboard" => {
            let page = positionals(rest)
                .first()
                .map(|p| p.parse::<usize>())
                .transpose()
                .context("page must be a number")?
                .unwrap_or(1);
            let board = Leaderboard::new(leaderboard::mock_players());
            println!("== Top Players (page {}/{}) ==", page, board.page_count());
            for entry in board.page(page) {
                println!(
                    "{:>3} {} {:<18} {:>6} pts {:>4} wins {:>4}%",
                    entry.rank,
                    entry.medal.map(|m| m.emoji()).unwrap_or("  "),
                    entry.player.name,
                    entry.player.points,
                    entry.player.wins,
                    entry.player.win_rate
                );
            }
            Ok(())
        }
        "join" => {
            let link = required(rest, 0, "invite link")?;
            match invite::parse_invite(link) {
                Some(InviteTarget::Bet(id)) => run_bet_command("show", &[id], &mut storage, &settings),
                Some(InviteTarget::Group(id)) => {
                    run_group_command(&["join".to_string(), id], &mut storage, &settings)
                }
                None => {
                    warn!("Not an invite link: {}", link);
                    bail!("'{}' is not a bet or group invite link", link)
                }
            }
        }
        _ => run_bet_command(&command, rest, &mut storage, &settings),
    }
}
