use clap::Subcommand;

use crate::types::Visibility;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user account
    Create {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Email address, unique across accounts
        #[arg(long)]
        email: String,

        /// Display name (defaults to the email's local part)
        #[arg(long)]
        name: Option<String>,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Skip interactive prompts (requires --password)
        #[arg(long)]
        non_interactive: bool,
    },

    /// List user accounts
    List {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PatCommands {
    /// Issue a new personal access token
    Issue {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Owning user's email (defaults to the only account when exactly
        /// one exists)
        #[arg(long)]
        email: Option<String>,

        /// Token name
        #[arg(long)]
        name: String,

        /// Comma-separated scopes (default: api:read)
        #[arg(long)]
        scopes: Option<String>,
    },

    /// List tokens for a user (prefix and status only)
    List {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Owning user's email
        #[arg(long)]
        email: Option<String>,
    },

    /// Revoke a token; the record stays listed as revoked
    Revoke {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Token ID to revoke
        #[arg(long)]
        id: String,

        /// Owning user's email
        #[arg(long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Register an SSH public key
    Add {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Owning user's email
        #[arg(long)]
        email: Option<String>,

        /// Key name
        #[arg(long)]
        name: String,

        /// Public key line (`<type> <base64> [comment]`)
        #[arg(long, conflicts_with = "key_file")]
        key: Option<String>,

        /// Read the public key from a file instead
        #[arg(long)]
        key_file: Option<String>,
    },

    /// List registered keys
    List {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Owning user's email
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove a key
    Remove {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Key ID to remove
        #[arg(long)]
        id: String,

        /// Owning user's email
        #[arg(long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum RepoCommands {
    /// Create a bare repository
    Create {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Repository name
        name: String,

        /// private, internal, or public
        #[arg(long, default_value = "private")]
        visibility: Visibility,

        /// Creating user's email
        #[arg(long)]
        email: Option<String>,
    },

    /// List repositories
    List {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Delete a repository and its on-disk files
    Delete {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Repository name
        name: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Show branch rules, or replace them from a JSON file
    Rules {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Repository name
        name: String,

        /// Replace the rule list with the JSON array in this file
        #[arg(long)]
        set_file: Option<String>,
    },

    /// List a tree at a ref and path
    Tree {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Repository name
        name: String,

        /// Ref to browse (default: main, then master, then HEAD)
        #[arg(long)]
        r#ref: Option<String>,

        /// Path within the tree (default: repository root)
        #[arg(long, default_value = "")]
        path: String,
    },

    /// Print a blob's content
    Cat {
        /// Data directory (default ./data, or $GITLOOM_DATA_DIR)
        #[arg(long)]
        data_dir: Option<String>,

        /// Repository name
        name: String,

        /// Ref to read from (default: main, then master, then HEAD)
        #[arg(long)]
        r#ref: Option<String>,

        /// Path of the blob
        #[arg(long)]
        path: String,
    },
}
