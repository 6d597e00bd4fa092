use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("ticket {ticket_id} has no requested items")]
    NoRequestedItems { ticket_id: u64 },
    #[error("ticket {ticket_id} has no \"{label}\" custom field value")]
    StartDateNotFound { ticket_id: u64, label: String },
    #[error("ticket {ticket_id} has an invalid start date: {value:?}")]
    InvalidStartDate { ticket_id: u64, value: String },
    #[error("no group named \"{name}\"")]
    GroupNotFound { name: String },
}

impl SyncError {
    /// True when the service answered but the data we need is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SyncError::NoRequestedItems { .. }
                | SyncError::StartDateNotFound { .. }
                | SyncError::GroupNotFound { .. }
        ) || matches!(self, SyncError::Server { status: 404, .. })
    }
}
