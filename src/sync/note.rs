use tracing::info;

use crate::error::SyncError;
use crate::model::ticket::Note;
use crate::providers::TicketProvider;

/// Post the public "Past due date" note that precedes a due-date rewrite.
pub async fn add_past_due_note(
    provider: &dyn TicketProvider,
    ticket_id: u64,
    due_date: &str,
) -> Result<(), SyncError> {
    provider
        .add_note(ticket_id, &Note::past_due_date(due_date))
        .await?;
    info!(ticket_id, due_date, "Added note on ticket");
    Ok(())
}
