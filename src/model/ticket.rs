use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub group_id: Option<u64>,
    /// ISO-8601 date-time as sent by the service, e.g. `2024-03-20T17:00:00Z`.
    #[serde(default)]
    pub due_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Calendar-date portion of `due_by`, if the ticket has one.
    pub fn due_date(&self) -> Option<&str> {
        self.due_by.as_deref().map(date_portion)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedItem {
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl RequestedItem {
    pub fn field(&self, label: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.label == label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub body: String,
    pub private: bool,
}

impl Note {
    /// Public audit note recording the due date before it is rewritten.
    pub fn past_due_date(due_date: &str) -> Self {
        Self {
            body: format!("Past due date: {due_date}"),
            private: false,
        }
    }
}

/// Body of the legacy helpdesk update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketUpdate {
    pub helpdesk_ticket: DueDates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDates {
    pub due_by: String,
    #[serde(rename = "frDueBy")]
    pub fr_due_by: String,
}

impl TicketUpdate {
    pub fn due_on(date: &str) -> Self {
        Self {
            helpdesk_ticket: DueDates {
                due_by: date.to_string(),
                fr_due_by: date.to_string(),
            },
        }
    }
}

/// First 10 characters of an ISO-8601-like string (the `YYYY-MM-DD` part).
pub fn date_portion(value: &str) -> &str {
    match value.char_indices().nth(10) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
