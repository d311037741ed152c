use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use super::password::PasswordHasher;
use super::ssh_key::validate_public_key;
use super::token::generate_token;
use crate::error::{Error, Result};
use crate::store::StateStore;
use crate::types::{Pat, PatStatus, PatSummary, SshKey, User};

const DEFAULT_PAT_SCOPES: &[&str] = &["api:read"];

/// A token issuance result. `plaintext` is the only place the full token is
/// ever visible; the stored record keeps just its prefix and hash.
#[derive(Debug)]
pub struct IssuedPat {
    pub record: Pat,
    pub plaintext: String,
}

/// Account and credential operations: users with hashed passwords, personal
/// access tokens, and SSH keys.
///
/// Password hashing runs on a blocking thread so the slow Argon2id work does
/// not stall unrelated tasks. Everything else is a fast in-memory operation
/// against the store.
pub struct CredentialStore {
    store: Arc<StateStore>,
    hasher: Arc<PasswordHasher>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            hasher: Arc::new(PasswordHasher::new()),
        }
    }

    /// Signs up a new user. The email uniqueness check runs twice: once
    /// before the slow hash to fail fast, and again inside the store's
    /// critical section, which closes the race between two concurrent
    /// signups for the same address.
    pub async fn create_user(&self, email: &str, name: &str, password: &str) -> Result<User> {
        if email.is_empty() {
            return Err(Error::InvalidInput("email must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        if self.store.get_user_by_email(email).is_some() {
            return Err(Error::AlreadyExists("user"));
        }

        let hash = self.hash_blocking(password.to_string()).await?;
        self.store.create_user(email, name, &hash)
    }

    /// Checks an email/password pair. A missing user and a wrong password
    /// produce the same error, so a caller cannot probe which emails exist.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User> {
        let Some(user) = self.store.get_user_by_email(email) else {
            return Err(Error::InvalidCredentials);
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| Error::BackendFailure(format!("hash task failed: {e}")))??;

        if matches {
            Ok(user)
        } else {
            Err(Error::InvalidCredentials)
        }
    }

    async fn hash_blocking(&self, password: String) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| Error::BackendFailure(format!("hash task failed: {e}")))?
    }

    /// Issues a new token for `user_id`. The returned plaintext is shown to
    /// the caller once and cannot be recovered afterwards.
    pub fn issue_pat(&self, user_id: &str, name: &str, scopes: Vec<String>) -> Result<IssuedPat> {
        let user = self
            .store
            .get_user(user_id)
            .ok_or(Error::NotFound("user"))?;

        let scopes = if scopes.is_empty() {
            DEFAULT_PAT_SCOPES.iter().map(ToString::to_string).collect()
        } else {
            scopes
        };

        let token = generate_token();
        let record = Pat {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            name: name.to_string(),
            token_prefix: token.prefix,
            token_hash: token.hash,
            scopes,
            created_at: Utc::now(),
            last_used_at: None,
            status: PatStatus::Active,
        };
        self.store.create_pat(&record)?;

        Ok(IssuedPat {
            record,
            plaintext: token.plaintext,
        })
    }

    pub fn list_pats(&self, user_id: &str) -> Vec<PatSummary> {
        self.store
            .list_user_pats(user_id)
            .iter()
            .map(PatSummary::from)
            .collect()
    }

    pub fn revoke_pat(&self, pat_id: &str, user_id: &str) -> Result<()> {
        self.store.revoke_pat(pat_id, user_id)
    }

    /// Resolves a plaintext bearer token to its owning user, touching the
    /// token's `last_used_at` on the way.
    pub fn resolve_pat(&self, plaintext: &str) -> Option<User> {
        let hash = super::token::hash_token(plaintext);
        let pat = self.store.get_active_pat_by_hash(&hash)?;
        if let Err(e) = self.store.update_pat_last_used(&pat.id) {
            warn!("Failed to update token last_used_at: {e}");
        }
        self.store.get_user(&pat.user_id)
    }

    /// Registers a validated public key for `user_id`.
    pub fn add_ssh_key(&self, user_id: &str, name: &str, public_key: &str) -> Result<SshKey> {
        validate_public_key(public_key)?;
        let user = self
            .store
            .get_user(user_id)
            .ok_or(Error::NotFound("user"))?;

        let key = SshKey {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            name: name.to_string(),
            public_key: public_key.trim().to_string(),
            created_at: Utc::now(),
        };
        self.store.create_ssh_key(&key)?;
        Ok(key)
    }

    pub fn list_ssh_keys(&self, user_id: &str) -> Vec<SshKey> {
        self.store.list_user_ssh_keys(user_id)
    }

    pub fn delete_ssh_key(&self, key_id: &str, user_id: &str) -> Result<()> {
        self.store.delete_ssh_key(key_id, user_id)
    }
}
