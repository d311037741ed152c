use crate::types::PatStatus;

use super::{confirm_action, format_relative_time, open_app, resolve_actor};

pub fn run_pat_issue(
    data_dir: Option<String>,
    email: Option<String>,
    name: String,
    scopes: Option<String>,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let user = resolve_actor(&app, email.as_deref())?;

    let scopes: Vec<String> = scopes
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    let issued = app.credentials.issue_pat(&user.id, &name, scopes)?;

    println!();
    println!("Token created for '{}': {}", user.email, issued.plaintext);
    println!("  Save this now - it cannot be retrieved later.");
    println!();

    Ok(())
}

pub fn run_pat_list(data_dir: Option<String>, email: Option<String>) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let user = resolve_actor(&app, email.as_deref())?;

    let tokens = app.credentials.list_pats(&user.id);
    if tokens.is_empty() {
        println!("No tokens found.");
        return Ok(());
    }

    println!();
    for token in &tokens {
        let status = match &token.status {
            PatStatus::Active => "active".to_string(),
            PatStatus::Revoked { revoked_at } => {
                format!("revoked {}", format_relative_time(*revoked_at))
            }
        };
        let last_used = match token.last_used_at {
            Some(at) => format_relative_time(at),
            None => "never used".to_string(),
        };
        println!(
            "  {}  {}...  {}  created {}  {}  [{}]",
            token.id,
            token.token_prefix,
            token.name,
            format_relative_time(token.created_at),
            last_used,
            status
        );
    }
    println!();

    Ok(())
}

pub fn run_pat_revoke(
    data_dir: Option<String>,
    id: String,
    email: Option<String>,
    yes: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let user = resolve_actor(&app, email.as_deref())?;

    let confirmed = confirm_action(
        &format!("Revoke token {} for user '{}'?", id, user.email),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    app.credentials.revoke_pat(&id, &user.id)?;

    println!();
    println!("Token revoked. It stays listed for audit.");
    println!();

    Ok(())
}
