use std::fs;
use std::path::PathBuf;

use anyhow::bail;

use crate::app::App;
use crate::config::Config;

pub async fn run_init(data_dir: Option<String>, non_interactive: bool) -> anyhow::Result<()> {
    let config = Config::load(data_dir.map(PathBuf::from));
    let state_path = config.state_path();

    if state_path.exists() {
        bail!(
            "Already initialized. State exists at: {}",
            state_path.display()
        );
    }

    fs::create_dir_all(&config.data_dir)?;
    fs::create_dir_all(&config.repos_dir)?;

    let app = App::open(config)?;
    app.store.flush()?;

    println!();
    println!("Initialized gitloom data directory");
    println!("  State:        {}", app.store.path().display());
    println!("  Repositories: {}", app.config.repos_dir.display());
    println!();

    if !non_interactive {
        create_first_user_prompt(&app).await?;
    }

    Ok(())
}

async fn create_first_user_prompt(app: &App) -> anyhow::Result<()> {
    let create_user = inquire::Confirm::new("Would you like to create the first user?")
        .with_default(false)
        .prompt()?;

    if !create_user {
        return Ok(());
    }

    let email = inquire::Text::new("Email:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(inquire::validator::Validation::Invalid(
                    "Email is required".into(),
                ))
            } else if !input.contains('@') {
                Ok(inquire::validator::Validation::Invalid(
                    "Email must contain '@'".into(),
                ))
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let local_part = email.split('@').next().unwrap_or(&email).to_string();
    let name = inquire::Text::new("Display name:")
        .with_default(&local_part)
        .prompt()?;

    let password = inquire::Password::new("Password:").prompt()?;

    let user = app.credentials.create_user(&email, &name, &password).await?;

    println!();
    println!("Created user '{}' with role '{}'", user.email, user.role);

    let issue_token = inquire::Confirm::new("Issue an access token for this user?")
        .with_default(true)
        .prompt()?;

    if issue_token {
        let issued = app.credentials.issue_pat(&user.id, "initial", Vec::new())?;

        println!();
        println!("========================================");
        println!("Access token (save this, it won't be shown again):");
        println!();
        println!("  {}", issued.plaintext);
        println!();
        println!("========================================");
        println!();
    }

    Ok(())
}
