use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gitloom::cli::{
    KeyCommands, PatCommands, RepoCommands, UserCommands, run_info, run_init, run_key_add,
    run_key_list, run_key_remove, run_pat_issue, run_pat_list, run_pat_revoke, run_repo_cat,
    run_repo_create, run_repo_delete, run_repo_list, run_repo_rules, run_repo_tree,
    run_user_create, run_user_list,
};

#[derive(Parser)]
#[command(name = "gitloom")]
#[command(about = "A minimal control plane for self-hosted Git", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and state file
    Init {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage personal access tokens
    Pat {
        #[command(subcommand)]
        command: PatCommands,
    },

    /// Manage SSH public keys
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Manage repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// Show instance status
    Info {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gitloom=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            data_dir,
            non_interactive,
        } => {
            run_init(data_dir, non_interactive).await?;
        }
        Commands::User { command } => match command {
            UserCommands::Create {
                data_dir,
                email,
                name,
                password,
                non_interactive,
            } => {
                run_user_create(data_dir, email, name, password, non_interactive).await?;
            }
            UserCommands::List { data_dir } => {
                run_user_list(data_dir)?;
            }
        },
        Commands::Pat { command } => match command {
            PatCommands::Issue {
                data_dir,
                email,
                name,
                scopes,
            } => {
                run_pat_issue(data_dir, email, name, scopes)?;
            }
            PatCommands::List { data_dir, email } => {
                run_pat_list(data_dir, email)?;
            }
            PatCommands::Revoke {
                data_dir,
                id,
                email,
                yes,
                non_interactive,
            } => {
                run_pat_revoke(data_dir, id, email, yes, non_interactive)?;
            }
        },
        Commands::Key { command } => match command {
            KeyCommands::Add {
                data_dir,
                email,
                name,
                key,
                key_file,
            } => {
                run_key_add(data_dir, email, name, key, key_file)?;
            }
            KeyCommands::List { data_dir, email } => {
                run_key_list(data_dir, email)?;
            }
            KeyCommands::Remove {
                data_dir,
                id,
                email,
                yes,
                non_interactive,
            } => {
                run_key_remove(data_dir, id, email, yes, non_interactive)?;
            }
        },
        Commands::Repo { command } => match command {
            RepoCommands::Create {
                data_dir,
                name,
                visibility,
                email,
            } => {
                run_repo_create(data_dir, name, visibility, email).await?;
            }
            RepoCommands::List { data_dir } => {
                run_repo_list(data_dir)?;
            }
            RepoCommands::Delete {
                data_dir,
                name,
                yes,
                non_interactive,
            } => {
                run_repo_delete(data_dir, name, yes, non_interactive).await?;
            }
            RepoCommands::Rules {
                data_dir,
                name,
                set_file,
            } => {
                run_repo_rules(data_dir, name, set_file)?;
            }
            RepoCommands::Tree {
                data_dir,
                name,
                r#ref,
                path,
            } => {
                run_repo_tree(data_dir, name, r#ref, path).await?;
            }
            RepoCommands::Cat {
                data_dir,
                name,
                r#ref,
                path,
            } => {
                run_repo_cat(data_dir, name, r#ref, path).await?;
            }
        },
        Commands::Info { data_dir, json } => {
            run_info(data_dir, json)?;
        }
    }

    Ok(())
}
