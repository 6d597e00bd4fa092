use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{note, start_date, RunReport, SyncSettings};
use crate::error::SyncError;
use crate::model::candidate::{Candidate, CandidateSet};
use crate::model::ticket::Ticket;
use crate::providers::TicketProvider;

/// Recorded in the audit note when a ticket has no due date.
pub const NO_DUE_DATE: &str = "none";

/// Updated strictly after `now - lookback`, subject carries the marker, and
/// the ticket is in the configured group.
pub fn is_candidate(ticket: &Ticket, settings: &SyncSettings, now: DateTime<Utc>) -> bool {
    let floor = now - settings.lookback;
    ticket.updated_at > floor
        && ticket.subject.contains(&settings.subject_marker)
        && ticket.group_id == Some(settings.group_id)
}

/// List tickets, keep the matching ones whose due date differs from the start
/// date, and note the old due date on each. Only a failed ticket listing aborts.
pub async fn collect_candidates(
    provider: &dyn TicketProvider,
    settings: &SyncSettings,
    now: DateTime<Utc>,
    report: &mut RunReport,
) -> Result<CandidateSet, SyncError> {
    let tickets = provider.list_tickets().await?;
    report.listed = tickets.len();

    let mut seen = HashSet::new();
    let mut candidates = CandidateSet::new();

    for ticket in tickets.iter().filter(|t| is_candidate(t, settings, now)) {
        if !seen.insert(ticket.id) {
            continue;
        }
        report.matched += 1;

        let start_date =
            match start_date::resolve(provider, ticket.id, &settings.start_date_label).await {
                Ok(date) => date,
                Err(err) => {
                    if err.is_not_found() {
                        warn!(ticket_id = ticket.id, error = %err, "Skipping ticket without a start date");
                        report.missing_start_date += 1;
                    } else {
                        warn!(ticket_id = ticket.id, error = %err, "Failed to resolve start date");
                        report.failed += 1;
                    }
                    continue;
                }
            };

        let due_date = ticket.due_date();
        if due_date == Some(start_date.as_str()) {
            info!(ticket_id = ticket.id, "Ticket already updated");
            report.already_current += 1;
            continue;
        }
        let recorded = due_date.unwrap_or(NO_DUE_DATE);
        debug!(ticket_id = ticket.id, %start_date, due_date = recorded, "Due date differs from start date");

        if settings.dry_run {
            info!(ticket_id = ticket.id, due_date = recorded, "Dry run: would add past due date note");
        } else if let Err(err) = note::add_past_due_note(provider, ticket.id, recorded).await {
            warn!(ticket_id = ticket.id, error = %err, "Failed to add note, leaving due date untouched");
            report.failed += 1;
            continue;
        } else {
            report.noted += 1;
        }

        candidates.insert(Candidate {
            ticket_id: ticket.id,
            start_date,
            previous_due_date: due_date.map(String::from),
        });
    }

    Ok(candidates)
}
