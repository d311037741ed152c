use std::sync::Arc;

use crate::auth::{Authenticator, CredentialStore, SessionManager};
use crate::config::Config;
use crate::error::Result;
use crate::git::GitCli;
use crate::repos::RepoService;
use crate::store::StateStore;
use crate::types::User;

/// One running instance of the control plane: the shared store plus the
/// services built on top of it. Constructed once per process, or per test
/// with a throwaway data directory.
pub struct App {
    pub config: Config,
    pub store: Arc<StateStore>,
    pub credentials: Arc<CredentialStore>,
    pub sessions: Arc<SessionManager>,
    pub authenticator: Authenticator,
    pub repos: RepoService,
}

impl App {
    /// Opens the state under `config`, creating the data and repository
    /// directories if needed.
    pub fn open(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        std::fs::create_dir_all(&config.repos_dir)?;

        let store = Arc::new(StateStore::open(config.state_path())?);
        let credentials = Arc::new(CredentialStore::new(Arc::clone(&store)));
        let sessions = Arc::new(SessionManager::new(config.session_ttl));
        let authenticator = Authenticator::new(
            Arc::clone(&store),
            Arc::clone(&credentials),
            Arc::clone(&sessions),
        );
        let repos = RepoService::new(
            Arc::clone(&store),
            Arc::new(GitCli),
            config.repos_dir.clone(),
        );

        Ok(Self {
            config,
            store,
            credentials,
            sessions,
            authenticator,
            repos,
        })
    }

    /// Creates an account and opens a session for it.
    pub async fn signup(&self, email: &str, name: &str, password: &str) -> Result<(User, String)> {
        let user = self.credentials.create_user(email, name, password).await?;
        let session_id = self.sessions.create(&user.id);
        Ok((user, session_id))
    }

    /// Verifies a password and opens a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self.credentials.verify_password(email, password).await?;
        let session_id = self.sessions.create(&user.id);
        Ok((user, session_id))
    }

    pub fn logout(&self, session_id: &str) {
        self.sessions.destroy(session_id);
    }
}
