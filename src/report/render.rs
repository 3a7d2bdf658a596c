use chrono::NaiveDate;

use crate::stats::{HeadToHead, Leaderboard, Period, Progression};

/// Explains the columns that appear in every leaderboard table
pub fn metrics_explanation() -> String {
    [
        "📊 *Understanding the Leaderboard Metrics*",
        "",
        "1️⃣ *Elo*: your long-term skill rating over your entire match history. \
         It goes up when you win and down when you lose; beating a higher-rated player earns more.",
        "",
        "2️⃣ *Score*: your performance for the current period, \
         `Elo + (Wins Bonus) + (Set Difference Bonus)`. It rewards skill and recent form.",
        "",
        "3️⃣ *Set Diff*: sets won minus sets lost in the period. \
         Higher means you are winning decisively.",
    ]
    .join("\n")
}

pub fn fetch_failure_message() -> String {
    "Could not fetch match data. The leaderboard could not be updated. \
     Please check the data source."
        .to_string()
}

/// Fallback for a period without matches; `None` when the period should stay silent
pub fn empty_period_message(period: Period) -> Option<String> {
    match period {
        Period::Week => {
            Some("No matches played this week yet. Let's get some games in!".to_string())
        }
        Period::Month => Some("No matches played this month yet.".to_string()),
        Period::AllTime => Some("No matches recorded yet.".to_string()),
        Period::LastMonth => None,
    }
}

pub fn leaderboard_caption(board: &Leaderboard) -> String {
    match board.period {
        Period::Week => format!("🏆 Here is *{} Leaderboard*!", board.title),
        Period::Month => format!(
            "🗓️ And here is the progress for the *{} Leaderboard*!",
            board.title
        ),
        Period::LastMonth => {
            format!("🔁 Final standings for the *{} Leaderboard*!", board.title)
        }
        Period::AllTime => format!("📚 *{} Leaderboard*", board.title),
    }
}

pub fn leaderboard_message(board: &Leaderboard) -> String {
    let mut table = TextTable::new(&[
        "Rank", "Player", "Elo", "Score", "Matches", "Wins", "Set Diff",
    ]);

    for entry in &board.entries {
        table.push_row(vec![
            entry.rank.to_string(),
            entry.name.clone(),
            format!("{:.0}", entry.elo),
            format!("{:.0}", entry.score),
            entry.matches.to_string(),
            entry.wins.to_string(),
            format!("{:+}", entry.set_diff),
        ]);
    }

    format!("{}\n{}", leaderboard_caption(board), table.to_code_block())
}

/// Rank of each active player per week, best rank first
pub fn progression_message(progression: &Progression) -> String {
    let mut headers = vec!["Player".to_string()];
    headers.extend(progression.weeks.iter().map(week_label));
    let mut table = TextTable::with_headers(headers);

    let mut rows: Vec<(&String, Vec<String>, u32)> = progression
        .players
        .iter()
        .map(|(name, series)| {
            let cells = progression
                .weeks
                .iter()
                .map(|week| {
                    series
                        .iter()
                        .find(|s| s.week_start == *week)
                        .map(|s| s.rank.to_string())
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            let latest_rank = series.last().map(|s| s.rank).unwrap_or(u32::MAX);
            (name, cells, latest_rank)
        })
        .collect();
    rows.sort_by(|a, b| a.2.cmp(&b.2).then(a.0.cmp(b.0)));

    for (name, cells, _) in rows {
        let mut row = vec![name.clone()];
        row.extend(cells);
        table.push_row(row);
    }

    format!(
        "📈 *Ranking Trends*: who's climbing over the last {} weeks\n{}",
        progression.weeks.len(),
        table.to_code_block()
    )
}

/// Wins of `player` against each opponent, or `None` if they never won
pub fn head_to_head_message(player: &str, tally: &HeadToHead) -> Option<String> {
    let opponents: Vec<_> = tally
        .opponents_of(player)
        .into_iter()
        .filter(|(_, cell)| cell.wins > 0)
        .collect();
    if opponents.is_empty() {
        return None;
    }

    let mut table = TextTable::new(&["Opponent", "W", "L", "Win %"]);
    for (opponent, cell) in opponents {
        table.push_row(vec![
            opponent.to_string(),
            cell.wins.to_string(),
            cell.losses.to_string(),
            format!("{:.0}%", cell.win_ratio() * 100.0),
        ]);
    }

    Some(format!(
        "Win stats for {}\n{}",
        bold_name(player),
        table.to_code_block()
    ))
}

pub fn head_to_head_header() -> String {
    "--- *Individual Head-to-Head Stats* ---\n(Shows your total wins against each opponent)"
        .to_string()
}

const MARKDOWN_SPECIAL: [char; 4] = ['_', '*', '`', '['];

/// Bold name outside code blocks. Telegram cannot escape inside an entity, so
/// names with Markdown metacharacters are sent as escaped plain text instead.
fn bold_name(name: &str) -> String {
    if name.contains(MARKDOWN_SPECIAL) {
        escape_markdown(name)
    } else {
        format!("*{}*", name)
    }
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn week_label(week_start: &NaiveDate) -> String {
    week_start.format("Wk %V (%b %d)").to_string()
}

/// Monospace table with left-aligned text columns
struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn new(headers: &[&str]) -> Self {
        Self::with_headers(headers.iter().map(|h| h.to_string()).collect())
    }

    fn with_headers(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    fn format_line(cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    fn to_code_block(&self) -> String {
        let widths = self.widths();
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut lines = vec![
            Self::format_line(&self.headers, &widths),
            Self::format_line(&separator, &widths),
        ];
        lines.extend(self.rows.iter().map(|row| Self::format_line(row, &widths)));

        format!("```\n{}\n```", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{LeaderboardEntry, WeeklySnapshot};
    use std::collections::BTreeMap;

    fn board() -> Leaderboard {
        Leaderboard {
            period: Period::Week,
            title: "This Week's".to_string(),
            entries: vec![LeaderboardEntry {
                rank: 1,
                name: "Pavan".to_string(),
                elo: 1515.6,
                score: 1542.6,
                matches: 2,
                wins: 2,
                losses: 0,
                set_diff: 3,
            }],
        }
    }

    #[test]
    fn test_leaderboard_table() {
        let message = leaderboard_message(&board());

        assert!(message.starts_with("🏆 Here is *This Week's Leaderboard*!"));
        assert!(message.contains("Rank  Player  Elo   Score  Matches  Wins  Set Diff"));
        assert!(message.contains("1     Pavan   1516  1543   2        2     +3"));
        assert!(message.ends_with("```"));
    }

    #[test]
    fn test_empty_period_fallbacks() {
        assert!(empty_period_message(Period::Week).unwrap().contains("this week"));
        assert!(empty_period_message(Period::LastMonth).is_none());
    }

    #[test]
    fn test_head_to_head_skips_players_without_wins() {
        let records = vec![crate::domain::MatchRecord {
            timestamp: NaiveDate::from_ymd_opt(2026, 10, 12)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            winner: "Pavan".to_string(),
            loser: "Kiran".to_string(),
            winner_sets: 2,
            loser_sets: 0,
            sequence: 0,
        }];
        let tally = HeadToHead::build(&records);

        let message = head_to_head_message("Pavan", &tally).unwrap();
        assert!(message.contains("Kiran"));
        assert!(message.contains("100%"));
        assert!(head_to_head_message("Kiran", &tally).is_none());
    }

    #[test]
    fn test_names_with_markdown_characters_are_escaped() {
        let records = vec![crate::domain::MatchRecord {
            timestamp: NaiveDate::from_ymd_opt(2026, 10, 12)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            winner: "Sri_K*".to_string(),
            loser: "Kiran".to_string(),
            winner_sets: 2,
            loser_sets: 0,
            sequence: 0,
        }];
        let tally = HeadToHead::build(&records);

        let message = head_to_head_message("Sri_K*", &tally).unwrap();

        assert!(message.starts_with("Win stats for Sri\\_K\\*\n"));
        assert_eq!(escape_markdown("[a]`b`"), "\\[a]\\`b\\`");
        assert_eq!(bold_name("Pavan"), "*Pavan*");
    }

    #[test]
    fn test_progression_rows_ordered_by_latest_rank() {
        let weeks = vec![
            NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
        ];
        let mut players = BTreeMap::new();
        players.insert(
            "Amy".to_string(),
            vec![
                WeeklySnapshot {
                    week_start: weeks[0],
                    elo: 1516.0,
                    rank: 1,
                },
                WeeklySnapshot {
                    week_start: weeks[1],
                    elo: 1490.0,
                    rank: 2,
                },
            ],
        );
        players.insert(
            "Bob".to_string(),
            vec![WeeklySnapshot {
                week_start: weeks[1],
                elo: 1510.0,
                rank: 1,
            }],
        );
        let progression = Progression {
            weeks,
            players,
            max_rank_shift: 1,
            max_elo_shift: 26.0,
            has_meaningful_variation: true,
        };

        let message = progression_message(&progression);
        let bob_line = message.lines().position(|l| l.starts_with("Bob")).unwrap();
        let amy_line = message.lines().position(|l| l.starts_with("Amy")).unwrap();

        assert!(bob_line < amy_line);
        assert!(message.contains("Wk 41 (Oct 05)"));
        assert!(message.lines().any(|l| l.starts_with("Bob") && l.contains('-')));
    }
}
