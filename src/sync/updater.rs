use tracing::{debug, info, warn};

use super::RunReport;
use crate::error::SyncError;
use crate::model::candidate::{Candidate, CandidateSet};
use crate::model::ticket::TicketUpdate;
use crate::providers::TicketProvider;

/// Rewrite the due date of every candidate. Failures are logged and counted;
/// the remaining candidates are still processed.
pub async fn apply(
    provider: &dyn TicketProvider,
    candidates: CandidateSet,
    dry_run: bool,
    report: &mut RunReport,
) {
    if candidates.is_empty() {
        debug!("No tickets need a due date update");
        return;
    }
    debug!(count = candidates.len(), "Updating due dates");
    for candidate in candidates {
        if dry_run {
            info!(
                ticket_id = candidate.ticket_id,
                due_by = %candidate.start_date,
                "Dry run: would update due date"
            );
            continue;
        }
        match update_due_date(provider, &candidate).await {
            Ok(()) => report.updated += 1,
            Err(err) => {
                warn!(ticket_id = candidate.ticket_id, error = %err, "Failed to update due date");
                report.failed += 1;
            }
        }
    }
}

pub async fn update_due_date(
    provider: &dyn TicketProvider,
    candidate: &Candidate,
) -> Result<(), SyncError> {
    provider
        .update_ticket(candidate.ticket_id, &TicketUpdate::due_on(&candidate.start_date))
        .await?;
    info!(
        ticket_id = candidate.ticket_id,
        due_by = %candidate.start_date,
        previous = candidate.previous_due_date.as_deref().unwrap_or(super::lister::NO_DUE_DATE),
        "Updated due date for new hire ticket"
    );
    Ok(())
}
