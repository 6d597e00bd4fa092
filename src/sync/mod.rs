//! One pass of the new-hire due-date sync.
//!
//! Tickets are listed and filtered, each match has its start date resolved,
//! and tickets whose due date differs get an audit note followed by a due-date
//! rewrite. Every call is awaited in turn; nothing runs concurrently.

pub mod group;
pub mod lister;
pub mod note;
pub mod start_date;
pub mod updater;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::config::AppConfig;
use crate::error::SyncError;
use crate::providers::TicketProvider;

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub group_id: u64,
    pub subject_marker: String,
    pub start_date_label: String,
    pub lookback: Duration,
    pub dry_run: bool,
}

impl SyncSettings {
    pub fn from_config(config: &AppConfig, group_id: u64, dry_run: bool) -> Self {
        Self {
            group_id,
            subject_marker: config.subject_marker.clone(),
            start_date_label: config.start_date_label.clone(),
            lookback: Duration::minutes(config.lookback_minutes),
            dry_run,
        }
    }
}

/// Counts for one run. `missing_start_date` counts tickets whose request
/// carries no usable start date; `failed` counts calls that errored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub listed: usize,
    pub matched: usize,
    pub already_current: usize,
    pub noted: usize,
    pub updated: usize,
    pub missing_start_date: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.missing_start_date == 0
    }
}

pub async fn run(
    provider: &dyn TicketProvider,
    settings: &SyncSettings,
    now: DateTime<Utc>,
) -> Result<RunReport, SyncError> {
    info!(started_at = %now, provider = provider.name(), dry_run = settings.dry_run, "Due date sync started");

    let mut report = RunReport::default();
    let candidates = lister::collect_candidates(provider, settings, now, &mut report).await?;
    updater::apply(provider, candidates, settings.dry_run, &mut report).await;

    info!(
        listed = report.listed,
        matched = report.matched,
        already_current = report.already_current,
        noted = report.noted,
        updated = report.updated,
        missing_start_date = report.missing_start_date,
        failed = report.failed,
        "Due date sync finished"
    );
    Ok(report)
}
