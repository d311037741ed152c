use std::fs;

use super::{confirm_action, open_app, resolve_actor};

pub fn run_key_add(
    data_dir: Option<String>,
    email: Option<String>,
    name: String,
    key: Option<String>,
    key_file: Option<String>,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let user = resolve_actor(&app, email.as_deref())?;

    let public_key = match (key, key_file) {
        (Some(key), _) => key,
        (None, Some(path)) => fs::read_to_string(&path)?,
        (None, None) => anyhow::bail!("Provide the key with --key or --key-file"),
    };

    let stored = app.credentials.add_ssh_key(&user.id, &name, &public_key)?;

    println!();
    println!("Registered key '{}' for '{}'", stored.name, user.email);
    println!("  {}", stored.id);
    println!();

    Ok(())
}

pub fn run_key_list(data_dir: Option<String>, email: Option<String>) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let user = resolve_actor(&app, email.as_deref())?;

    let keys = app.credentials.list_ssh_keys(&user.id);
    if keys.is_empty() {
        println!("No keys found.");
        return Ok(());
    }

    println!();
    for key in &keys {
        let key_type = key.public_key.split_whitespace().next().unwrap_or("?");
        println!("  {}  {}  {}", key.id, key.name, key_type);
    }
    println!();

    Ok(())
}

pub fn run_key_remove(
    data_dir: Option<String>,
    id: String,
    email: Option<String>,
    yes: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let user = resolve_actor(&app, email.as_deref())?;

    let confirmed = confirm_action(
        &format!("Remove key {} for user '{}'?", id, user.email),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    app.credentials.delete_ssh_key(&id, &user.id)?;

    println!();
    println!("Key removed.");
    println!();

    Ok(())
}
