//! Live countdown of the trending bets.

use crate::bet_service::BetService;
use crate::countdown;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// One screen of the watch view: a timestamp header, then one line per
/// trending bet with its countdown and leading option.
pub fn render_watch_frame<S: Storage>(service: &BetService<S>, now: DateTime<Utc>) -> String {
    let mut frame = format!("── {} ──\n", now.format("%H:%M:%S"));
    for bet in service.get_trending_bets() {
        let leader = bet
            .options
            .iter()
            .max_by_key(|o| o.votes)
            .map(|o| format!("{} {}%", o.label, o.percentage))
            .unwrap_or_default();
        frame.push_str(&format!(
            "  {:<45} {:>8}  {}\n",
            bet.title,
            countdown::short_time_left(bet.expires_at, now),
            leader
        ));
    }
    frame
}

/// Call `on_tick` every `period` (the first tick fires immediately) until
/// `shutdown` resolves. Returns the number of ticks.
pub async fn run_watch<F, T>(period: Duration, shutdown: F, mut on_tick: T) -> u64
where
    F: Future<Output = ()>,
    T: FnMut(),
{
    let mut interval = tokio::time::interval(period);
    tokio::pin!(shutdown);

    let mut ticks = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                ticks += 1;
                on_tick();
            }
            _ = &mut shutdown => {
                info!("Stopping watch after {} ticks", ticks);
                break;
            }
        }
    }
    ticks
}
