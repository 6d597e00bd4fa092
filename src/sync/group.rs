use tracing::info;

use crate::error::SyncError;
use crate::model::ticket::Group;
use crate::providers::TicketProvider;

/// Look up a group id by name. The group API is admin-only, so this is the
/// fallback when no `group_id` is configured.
pub async fn resolve_group_id(provider: &dyn TicketProvider, name: &str) -> Result<u64, SyncError> {
    let groups = provider.list_groups().await?;
    let group = find_group(&groups, name).ok_or_else(|| SyncError::GroupNotFound {
        name: name.to_string(),
    })?;
    info!(group_id = group.id, name, "Resolved group id");
    Ok(group.id)
}

pub fn find_group<'a>(groups: &'a [Group], name: &str) -> Option<&'a Group> {
    groups.iter().find(|g| g.name == name)
}
