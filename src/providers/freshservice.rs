use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::TicketProvider;
use crate::error::SyncError;
use crate::model::ticket::{Group, Note, RequestedItem, Ticket, TicketUpdate};

pub struct FreshserviceProvider {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl FreshserviceProvider {
    /// `auth` is the already-encoded Basic credential.
    pub fn new(base_url: String, auth: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {auth}"),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SyncError> {
        let resp = self
            .client
            .get(self.url(path))
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Turns a non-success response into `SyncError::Server`, logging status and body.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %url, %body, "Freshservice request failed");
    Err(SyncError::Server {
        status: status.as_u16(),
        body,
    })
}

#[derive(Deserialize)]
struct TicketsResponse {
    tickets: Vec<serde_json::Value>,
}

/// Decode tickets one at a time so a single malformed record is dropped
/// instead of failing the whole listing.
fn parse_tickets(values: Vec<serde_json::Value>) -> Vec<Ticket> {
    values
        .into_iter()
        .filter_map(|value| {
            let id = value.get("id").cloned();
            match serde_json::from_value::<Ticket>(value) {
                Ok(ticket) => Some(ticket),
                Err(err) => {
                    warn!(ticket_id = ?id, error = %err, "Skipping malformed ticket");
                    None
                }
            }
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestedItemsResponse {
    Bare(Vec<RequestedItem>),
    Wrapped { requested_items: Vec<RequestedItem> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupsResponse {
    Bare(Vec<Group>),
    Wrapped { groups: Vec<Group> },
}

#[async_trait]
impl TicketProvider for FreshserviceProvider {
    fn name(&self) -> &str {
        "Freshservice"
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, SyncError> {
        let resp: TicketsResponse = self.get_json("/api/v2/tickets").await?;
        let tickets = parse_tickets(resp.tickets);
        info!(count = tickets.len(), "Got list of tickets");
        Ok(tickets)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, SyncError> {
        let groups = match self.get_json::<GroupsResponse>("/api/v2/groups").await? {
            GroupsResponse::Wrapped { groups } => groups,
            GroupsResponse::Bare(groups) => groups,
        };
        Ok(groups)
    }

    async fn requested_items(&self, ticket_id: u64) -> Result<Vec<RequestedItem>, SyncError> {
        let path = format!("/api/v2/tickets/{ticket_id}/requested_items.json");
        let items = match self.get_json::<RequestedItemsResponse>(&path).await? {
            RequestedItemsResponse::Wrapped { requested_items } => requested_items,
            RequestedItemsResponse::Bare(items) => items,
        };
        Ok(items)
    }

    async fn add_note(&self, ticket_id: u64, note: &Note) -> Result<(), SyncError> {
        let resp = self
            .client
            .post(self.url(&format!("/api/v2/tickets/{ticket_id}/notes")))
            .header(AUTHORIZATION, &self.auth_header)
            .json(note)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn update_ticket(&self, ticket_id: u64, update: &TicketUpdate) -> Result<(), SyncError> {
        let resp = self
            .client
            .put(self.url(&format!("/helpdesk/tickets/{ticket_id}.json")))
            .header(AUTHORIZATION, &self.auth_header)
            .json(update)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider =
            FreshserviceProvider::new("https://acme.freshservice.com/".into(), "dG9rZW4=".into());
        assert_eq!(
            provider.url("/api/v2/tickets"),
            "https://acme.freshservice.com/api/v2/tickets"
        );
        assert_eq!(provider.auth_header, "Basic dG9rZW4=");
    }

    #[test]
    fn requested_items_accepts_bare_array() {
        let json = r#"[{"custom_fields": [{"label": "Start Date", "value": "2024-04-01"}]}]"#;
        let items = match serde_json::from_str::<RequestedItemsResponse>(json).unwrap() {
            RequestedItemsResponse::Bare(items) => items,
            RequestedItemsResponse::Wrapped { .. } => panic!("expected bare array"),
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].custom_fields[0].label, "Start Date");
    }

    #[test]
    fn requested_items_accepts_wrapped_object() {
        let json = r#"{"requested_items": []}"#;
        let parsed: RequestedItemsResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            parsed,
            RequestedItemsResponse::Wrapped { requested_items } if requested_items.is_empty()
        ));
    }

    #[test]
    fn groups_accept_both_shapes() {
        let wrapped: GroupsResponse =
            serde_json::from_str(r#"{"groups": [{"id": 1, "name": "Onboarding"}]}"#).unwrap();
        let bare: GroupsResponse =
            serde_json::from_str(r#"[{"id": 2, "name": "IT"}]"#).unwrap();
        assert!(matches!(wrapped, GroupsResponse::Wrapped { groups } if groups[0].id == 1));
        assert!(matches!(bare, GroupsResponse::Bare(groups) if groups[0].name == "IT"));
    }

    #[test]
    fn malformed_ticket_is_dropped_and_the_rest_kept() {
        let json = r#"{"tickets": [
            {"id": 9, "subject": "New Hire: Sam", "group_id": 15000022833,
             "due_by": "2024-03-20T17:00:00Z", "updated_at": "2024-03-15T10:00:00Z"},
            {"id": 10, "subject": null, "group_id": 1,
             "due_by": "2024-03-20T17:00:00Z", "updated_at": "2024-03-15T10:00:00Z"},
            {"id": 11, "subject": "Laptop", "updated_at": "yesterday"}
        ]}"#;
        let resp: TicketsResponse = serde_json::from_str(json).unwrap();
        let tickets = parse_tickets(resp.tickets);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id, 9);
        assert_eq!(tickets[0].subject, "New Hire: Sam");
    }

    const AUTH: &str = "Basic dG9rZW4=";

    fn provider_for(server: &MockServer) -> FreshserviceProvider {
        FreshserviceProvider::new(server.uri(), "dG9rZW4=".into())
    }

    #[tokio::test]
    async fn list_tickets_sends_auth_and_skips_bad_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/tickets"))
            .and(header("Authorization", AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tickets": [
                    {"id": 9, "subject": "New Hire: Sam", "group_id": 15000022833u64,
                     "due_by": "2024-03-20T17:00:00Z", "updated_at": "2024-03-15T10:00:00Z"},
                    {"id": 10, "subject": null, "group_id": 1,
                     "due_by": null, "updated_at": "2024-03-15T10:00:00Z"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tickets = provider_for(&server).list_tickets().await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id, 9);
    }

    #[tokio::test]
    async fn list_groups_hits_group_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/groups"))
            .and(header("Authorization", AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "groups": [{"id": 15000022833u64, "name": "Onboarding"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let groups = provider_for(&server).list_groups().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Onboarding");
    }

    #[tokio::test]
    async fn requested_items_hits_ticket_items_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/tickets/77/requested_items.json"))
            .and(header("Authorization", AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"custom_fields": [{"label": "Start Date", "value": "2024-04-01T00:00:00Z"}]}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let items = provider_for(&server).requested_items(77).await.unwrap();
        assert_eq!(
            items[0].field("Start Date").unwrap().value.as_deref(),
            Some("2024-04-01T00:00:00Z")
        );
    }

    #[tokio::test]
    async fn add_note_posts_public_note() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/tickets/77/notes"))
            .and(header("Authorization", AUTH))
            .and(body_json(json!({"body": "Past due date: 2024-03-20", "private": false})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"conversation": {}})))
            .expect(1)
            .mount(&server)
            .await;

        provider_for(&server)
            .add_note(77, &Note::past_due_date("2024-03-20"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_ticket_puts_both_due_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/helpdesk/tickets/77.json"))
            .and(header("Authorization", AUTH))
            .and(body_json(json!({
                "helpdesk_ticket": {"due_by": "2024-04-01", "frDueBy": "2024-04-01"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        provider_for(&server)
            .update_ticket(77, &TicketUpdate::due_on("2024-04-01"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn client_error_becomes_server_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/groups"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string(r#"{"code":"access_denied"}"#),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).list_groups().await.unwrap_err();
        match err {
            SyncError::Server { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, r#"{"code":"access_denied"}"#);
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/tickets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).list_tickets().await.unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }
}
