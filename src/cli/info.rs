use serde::Serialize;

use crate::types::PatStatus;

use super::open_app;

#[derive(Serialize)]
struct StatusInfo {
    users: usize,
    tokens: usize,
    tokens_active: usize,
    tokens_revoked: usize,
    ssh_keys: usize,
    repos: usize,
}

#[derive(Serialize)]
struct UserOutput {
    id: String,
    email: String,
    name: String,
    role: String,
}

#[derive(Serialize)]
struct TokenOutput {
    id: String,
    user_id: String,
    name: String,
    prefix: String,
    status: String,
    created_at: String,
    last_used_at: Option<String>,
}

#[derive(Serialize)]
struct KeyOutput {
    id: String,
    user_id: String,
    name: String,
    key_type: String,
}

#[derive(Serialize)]
struct RepoOutput {
    id: String,
    name: String,
    visibility: String,
    path: String,
}

#[derive(Serialize)]
struct DetailedInfo {
    users: Vec<UserOutput>,
    tokens: Vec<TokenOutput>,
    ssh_keys: Vec<KeyOutput>,
    repos: Vec<RepoOutput>,
    state_path: String,
    repos_dir: String,
}

pub fn run_info(data_dir: Option<String>, json: bool) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let state = app.store.snapshot();

    if json {
        let users = state
            .users
            .iter()
            .map(|u| UserOutput {
                id: u.id.clone(),
                email: u.email.clone(),
                name: u.name.clone(),
                role: u.role.to_string(),
            })
            .collect();

        let tokens = state
            .pats
            .iter()
            .map(|p| TokenOutput {
                id: p.id.clone(),
                user_id: p.user_id.clone(),
                name: p.name.clone(),
                prefix: p.token_prefix.clone(),
                status: match p.status {
                    PatStatus::Active => "active".to_string(),
                    PatStatus::Revoked { .. } => "revoked".to_string(),
                },
                created_at: p.created_at.to_rfc3339(),
                last_used_at: p.last_used_at.map(|dt| dt.to_rfc3339()),
            })
            .collect();

        let ssh_keys = state
            .ssh_keys
            .iter()
            .map(|k| KeyOutput {
                id: k.id.clone(),
                user_id: k.user_id.clone(),
                name: k.name.clone(),
                key_type: k
                    .public_key
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .to_string(),
            })
            .collect();

        let repos = state
            .repos
            .iter()
            .map(|r| RepoOutput {
                id: r.id.clone(),
                name: r.name.clone(),
                visibility: r.visibility.to_string(),
                path: r.path.display().to_string(),
            })
            .collect();

        let info = DetailedInfo {
            users,
            tokens,
            ssh_keys,
            repos,
            state_path: app.store.path().display().to_string(),
            repos_dir: app.config.repos_dir.display().to_string(),
        };

        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        let active = state.pats.iter().filter(|p| p.status.is_active()).count();
        let info = StatusInfo {
            users: state.users.len(),
            tokens: state.pats.len(),
            tokens_active: active,
            tokens_revoked: state.pats.len() - active,
            ssh_keys: state.ssh_keys.len(),
            repos: state.repos.len(),
        };

        println!();
        println!("Gitloom Status");
        println!("{}", "─".repeat(20));
        println!("Users:     {}", info.users);
        println!(
            "Tokens:    {} ({} active, {} revoked)",
            info.tokens, info.tokens_active, info.tokens_revoked
        );
        println!("SSH keys:  {}", info.ssh_keys);
        println!("Repos:     {}", info.repos);
        println!();
        println!("State:     {}", app.store.path().display());
        println!("Repo dir:  {}", app.config.repos_dir.display());
        println!();
    }

    Ok(())
}
