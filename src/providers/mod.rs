pub mod freshservice;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::SyncError;
use crate::model::ticket::{Group, Note, RequestedItem, Ticket, TicketUpdate};

/// The ticketing calls the sync job needs. Each call is awaited on its own;
/// implementations never retry.
#[async_trait]
pub trait TicketProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn list_tickets(&self) -> Result<Vec<Ticket>, SyncError>;
    /// Requires an account with group admin privileges.
    async fn list_groups(&self) -> Result<Vec<Group>, SyncError>;
    async fn requested_items(&self, ticket_id: u64) -> Result<Vec<RequestedItem>, SyncError>;
    async fn add_note(&self, ticket_id: u64, note: &Note) -> Result<(), SyncError>;
    async fn update_ticket(&self, ticket_id: u64, update: &TicketUpdate) -> Result<(), SyncError>;
}


pub fn create_provider(config: &AppConfig) -> Box<dyn TicketProvider> {
    Box::new(freshservice::FreshserviceProvider::new(
        config.base_url.clone(),
        config.auth.clone(),
    ))
}
