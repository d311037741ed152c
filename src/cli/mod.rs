mod commands;
mod info;
mod init;
mod key;
mod repo;
mod token;
mod user;

pub use commands::{KeyCommands, PatCommands, RepoCommands, UserCommands};
pub use info::run_info;
pub use init::run_init;
pub use key::{run_key_add, run_key_list, run_key_remove};
pub use repo::{
    run_repo_cat, run_repo_create, run_repo_delete, run_repo_list, run_repo_rules, run_repo_tree,
};
pub use token::{run_pat_issue, run_pat_list, run_pat_revoke};
pub use user::{run_user_create, run_user_list};

use std::path::PathBuf;

use anyhow::bail;

use crate::app::App;
use crate::config::Config;
use crate::types::User;

/// Open the control plane from a data directory, checking it was initialized
pub fn open_app(data_dir: Option<String>) -> anyhow::Result<App> {
    let config = Config::load(data_dir.map(PathBuf::from));
    let state_path = config.state_path();

    if !state_path.exists() {
        bail!(
            "State not found at {}. Run 'gitloom init' first.",
            state_path.display()
        );
    }

    Ok(App::open(config)?)
}

/// Resolve the account a command acts as: an explicit `--email`, or the only
/// account when exactly one exists.
pub fn resolve_actor(app: &App, email: Option<&str>) -> anyhow::Result<User> {
    match email {
        Some(email) => match app.store.get_user_by_email(email) {
            Some(user) => Ok(user),
            None => bail!("No user with email '{email}'"),
        },
        None => match app.store.sole_user() {
            Some(user) => Ok(user),
            None if app.store.user_count() == 0 => {
                bail!("No users exist yet. Run 'gitloom user create' first.")
            }
            None => bail!("--email is required when more than one user exists"),
        },
    }
}

/// Request confirmation for a destructive operation
pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        bail!("--yes is required for destructive operations in non-interactive mode")
    } else {
        Ok(inquire::Confirm::new(message).with_default(false).prompt()?)
    }
}

/// Format a timestamp as a short relative age for listings
fn format_relative_time(time: chrono::DateTime<chrono::Utc>) -> String {
    let delta = chrono::Utc::now().signed_duration_since(time);
    if delta.num_days() > 0 {
        format!("{}d ago", delta.num_days())
    } else if delta.num_hours() > 0 {
        format!("{}h ago", delta.num_hours())
    } else if delta.num_minutes() > 0 {
        format!("{}m ago", delta.num_minutes())
    } else {
        "just now".to_string()
    }
}
