//! # Gitloom
//!
//! A minimal control plane for self-hosted Git: accounts, session and
//! personal-access-token authentication, SSH key registration, and a thin
//! lifecycle layer over bare repositories. Usable both as a standalone
//! binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! gitloom = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use gitloom::app::App;
//! use gitloom::config::Config;
//!
//! let app = App::open(Config::load(None))?;
//! let (user, session_id) = app.signup("ada@example.com", "Ada", "secret").await?;
//! let repo = app.repos.create("notes", Default::default(), &user.id).await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod app;
pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod repos;
pub mod store;
pub mod types;
