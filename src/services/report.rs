use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use log::{error, info, warn};

use super::fetch_rows;
use crate::config::settings::AppConfig;
use crate::config::PlayerAliases;
use crate::delivery::Delivery;
use crate::domain::RecordNormalizer;
use crate::report::render::fetch_failure_message;
use crate::report::{assemble_messages, build_snapshot};

/// Outcome of one report run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub delivered: usize,
    pub failed: usize,
}

pub struct ReportService {
    config: AppConfig,
    input: Option<PathBuf>,
    aliases: PlayerAliases,
    delivery: Delivery,
    now: NaiveDateTime,
}

impl ReportService {
    pub fn new(
        config: AppConfig,
        input: Option<PathBuf>,
        aliases: PlayerAliases,
        now: NaiveDateTime,
        dry_run: bool,
    ) -> Result<Self> {
        let delivery = Delivery::select(&config.delivery, dry_run)?;
        Ok(Self {
            config,
            input,
            aliases,
            delivery,
            now,
        })
    }

    pub async fn run(&mut self) -> Result<RunSummary> {
        info!("=== Starting Leaderboard Report ({}) ===\n", self.now.format("%Y-%m-%d %H:%M"));
        let mut summary = RunSummary::default();

        // Step 1: Fetch raw rows
        let rows = match fetch_rows(self.input.as_deref(), &self.config.source).await {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => {
                warn!("Match source returned no rows");
                self.deliver(&mut summary, &fetch_failure_message()).await;
                return Ok(summary);
            }
            Err(e) => {
                error!("Could not fetch match data: {:#}", e);
                self.deliver(&mut summary, &fetch_failure_message()).await;
                return Ok(summary);
            }
        };
        info!("  → Fetched {} rows\n", rows.len());

        // Step 2: Normalize into ordered match records
        let records =
            RecordNormalizer::new(&self.config.schema, &self.aliases).normalize_rows(&rows);
        info!("  → Normalized {} matches\n", records.len());

        // Step 3: Ratings, leaderboards, head-to-head and progression
        let snapshot = build_snapshot(&records, self.now, &self.config);
        let messages = assemble_messages(&snapshot, self.now, &self.config.leaderboard);
        info!("  → Assembled {} messages\n", messages.len());

        // Step 4: Deliver
        for message in &messages {
            self.deliver(&mut summary, message).await;
        }

        info!(
            "=== Report Complete: {} delivered, {} failed via {} ===",
            summary.delivered,
            summary.failed,
            self.delivery.name()
        );
        Ok(summary)
    }

    async fn deliver(&mut self, summary: &mut RunSummary, text: &str) {
        match self.delivery.send(text).await {
            Ok(()) => summary.delivered += 1,
            Err(e) => {
                error!("{:#}", e);
                summary.failed += 1;
            }
        }
    }
}
