pub mod render;
pub mod snapshot;

use chrono::{Datelike, NaiveDateTime};

use crate::config::settings::LeaderboardSettings;
use crate::stats::Period;
pub use snapshot::{ReportSnapshot, build_snapshot};

/// Channel messages for one report run, in posting order
pub fn assemble_messages(
    snapshot: &ReportSnapshot,
    now: NaiveDateTime,
    settings: &LeaderboardSettings,
) -> Vec<String> {
    let mut messages = vec![render::metrics_explanation()];

    for period in [Period::Week, Period::Month] {
        if let Some(message) = period_section(snapshot, period) {
            messages.push(message);
        }
    }

    if now.day() <= settings.last_month_grace_days {
        if let Some(message) = period_section(snapshot, Period::LastMonth) {
            messages.push(message);
        }
    }

    if let Some(progression) = snapshot
        .progression
        .as_ref()
        .filter(|p| p.has_meaningful_variation)
    {
        messages.push(render::progression_message(progression));
    }

    if let Some(tally) = snapshot.head_to_head(Period::AllTime) {
        let sections: Vec<String> = snapshot
            .active_players
            .iter()
            .filter_map(|player| render::head_to_head_message(player, tally))
            .collect();
        if !sections.is_empty() {
            messages.push(render::head_to_head_header());
            messages.extend(sections);
        }
    }

    messages
}

fn period_section(snapshot: &ReportSnapshot, period: Period) -> Option<String> {
    match snapshot.leaderboard(period) {
        Some(board) if !board.is_empty() => Some(render::leaderboard_message(board)),
        _ => render::empty_period_message(period),
    }
}
