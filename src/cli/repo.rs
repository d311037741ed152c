use std::fs;

use crate::git::{BlobEncoding, EntryKind};
use crate::types::{BranchRule, Visibility};

use super::{confirm_action, open_app, resolve_actor};

pub async fn run_repo_create(
    data_dir: Option<String>,
    name: String,
    visibility: Visibility,
    email: Option<String>,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let user = resolve_actor(&app, email.as_deref())?;

    let repo = app.repos.create(&name, visibility, &user.id).await?;

    println!();
    println!("Created repository '{}' ({})", repo.name, repo.visibility);
    println!("  Path: {}", repo.path.display());
    println!();

    Ok(())
}

pub fn run_repo_list(data_dir: Option<String>) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let repos = app.repos.list();

    if repos.is_empty() {
        println!("No repositories found.");
        return Ok(());
    }

    println!();
    for repo in &repos {
        println!(
            "  {}  [{}]  {}",
            repo.name,
            repo.visibility,
            repo.path.display()
        );
    }
    println!();

    Ok(())
}

pub async fn run_repo_delete(
    data_dir: Option<String>,
    name: String,
    yes: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;

    let confirmed = confirm_action(
        &format!("Delete repository '{}' and its on-disk files?", name),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    app.repos.delete(&name).await?;

    println!();
    println!("Deleted repository '{}'", name);
    println!();

    Ok(())
}

pub fn run_repo_rules(
    data_dir: Option<String>,
    name: String,
    set_file: Option<String>,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;

    if let Some(path) = set_file {
        let raw = fs::read_to_string(&path)?;
        let rules: Vec<BranchRule> = serde_json::from_str(&raw)?;
        let count = rules.len();
        app.repos.set_branch_rules(&name, rules)?;
        println!("Set {} rule(s) on '{}'", count, name);
    } else {
        let rules = app.repos.branch_rules(&name)?;
        println!("{}", serde_json::to_string_pretty(&rules)?);
    }

    Ok(())
}

pub async fn run_repo_tree(
    data_dir: Option<String>,
    name: String,
    reference: Option<String>,
    path: String,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let entries = app.repos.tree(&name, reference.as_deref(), &path).await?;

    if entries.is_empty() {
        println!("Empty tree.");
        return Ok(());
    }

    println!();
    for entry in &entries {
        let kind = match entry.entry_type {
            EntryKind::Tree => "tree",
            EntryKind::Blob => "blob",
        };
        let size = match entry.size {
            Some(size) => size.to_string(),
            None => "-".to_string(),
        };
        println!("  {}  {:>8}  {}", kind, size, entry.name);
    }
    println!();

    Ok(())
}

pub async fn run_repo_cat(
    data_dir: Option<String>,
    name: String,
    reference: Option<String>,
    path: String,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let blob = app.repos.blob(&name, reference.as_deref(), &path).await?;

    match blob.encoding {
        BlobEncoding::Utf8 => print!("{}", blob.content),
        BlobEncoding::Base64 => {
            println!("Binary content, base64-encoded:");
            println!("{}", blob.content);
        }
    }

    Ok(())
}
