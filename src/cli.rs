use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::info;

use crate::config;
use crate::providers;
use crate::sync::{self, group, RunReport, SyncSettings};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Sync { dry_run: bool },
    Groups,
    Help,
}

/// Parse arguments after the program name. No arguments means a normal sync run.
pub fn parse_args(args: &[String]) -> Result<Command> {
    let mut dry_run = false;
    let mut groups = false;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(Command::Help),
            "-n" | "--dry-run" => dry_run = true,
            "groups" => groups = true,
            other => bail!("Unknown argument: {other}"),
        }
    }

    if groups {
        if dry_run {
            bail!("--dry-run only applies to a sync run");
        }
        return Ok(Command::Groups);
    }
    Ok(Command::Sync { dry_run })
}

/// Load config, resolve the group, and run one sync pass.
pub async fn handle_sync(dry_run: bool) -> Result<RunReport> {
    let config = config::load_config()?;
    let provider = providers::create_provider(&config);

    let group_id = match config.group_id {
        Some(id) => id,
        None => {
            info!(name = %config.group_name, "No group_id configured, looking it up by name");
            group::resolve_group_id(provider.as_ref(), &config.group_name)
                .await
                .with_context(|| {
                    format!(
                        "Failed to resolve group \"{}\" (set group_id if this account lacks admin rights)",
                        config.group_name
                    )
                })?
        }
    };

    let settings = SyncSettings::from_config(&config, group_id, dry_run);
    let report = sync::run(provider.as_ref(), &settings, Utc::now())
        .await
        .context("Due date sync aborted")?;
    Ok(report)
}

/// Print every group's id and name. Needs an admin account.
pub async fn handle_groups() -> Result<()> {
    let config = config::load_config()?;
    let provider = providers::create_provider(&config);
    let groups = provider
        .list_groups()
        .await
        .context("Failed to list groups (this call requires admin rights)")?;

    for g in groups {
        println!("{}\t{}", g.id, g.name);
    }
    Ok(())
}

pub fn print_help() {
    println!("freshservice-sync - align new-hire ticket due dates with start dates\n");
    println!("USAGE:");
    println!("  freshservice-sync              Run one sync pass");
    println!("  freshservice-sync --dry-run    Show what would change without writing");
    println!("  freshservice-sync groups       List group ids (requires admin rights)");
    println!();
    println!("CONFIG:");
    println!("  ~/.freshservice-sync/config.toml, or the path in FRESHSERVICE_SYNC_CONFIG");
    println!("  Overrides: FRESHSERVICE_BASE_URL, FRESHSERVICE_AUTH, FRESHSERVICE_API_KEY,");
    println!("             FRESHSERVICE_GROUP_ID");
}
