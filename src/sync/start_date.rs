use chrono::NaiveDate;

use crate::error::SyncError;
use crate::model::ticket::{date_portion, RequestedItem};
use crate::providers::TicketProvider;

/// Fetch the ticket's requested items and read the start date from the first one.
pub async fn resolve(
    provider: &dyn TicketProvider,
    ticket_id: u64,
    label: &str,
) -> Result<String, SyncError> {
    let items = provider.requested_items(ticket_id).await?;
    extract(ticket_id, &items, label)
}

/// The `label` field of the first requested item, cut to `YYYY-MM-DD`.
pub fn extract(ticket_id: u64, items: &[RequestedItem], label: &str) -> Result<String, SyncError> {
    let item = items
        .first()
        .ok_or(SyncError::NoRequestedItems { ticket_id })?;

    let value = item
        .field(label)
        .and_then(|f| f.value.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SyncError::StartDateNotFound {
            ticket_id,
            label: label.to_string(),
        })?;

    let date = date_portion(value);
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(SyncError::InvalidStartDate {
            ticket_id,
            value: value.to_string(),
        });
    }
    Ok(date.to_string())
}
