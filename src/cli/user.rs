use inquire::Password;

use super::open_app;

pub async fn run_user_create(
    data_dir: Option<String>,
    email: String,
    name: Option<String>,
    password: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;

    let password = if let Some(password) = password {
        password
    } else if non_interactive {
        anyhow::bail!("--password is required in non-interactive mode");
    } else {
        Password::new("Password:").prompt()?
    };

    let name = match name {
        Some(name) => name,
        None => email.split('@').next().unwrap_or(&email).to_string(),
    };

    let user = app.credentials.create_user(&email, &name, &password).await?;

    println!();
    println!("Created user '{}' with role '{}'", user.email, user.role);
    println!();

    Ok(())
}

pub fn run_user_list(data_dir: Option<String>) -> anyhow::Result<()> {
    let app = open_app(data_dir)?;
    let users = app.store.list_users();

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!();
    for user in &users {
        println!("  {}  {}  ({})", user.email, user.name, user.role);
    }
    println!();

    Ok(())
}
