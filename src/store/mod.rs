mod json;
mod state;

pub use state::AppState;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{BranchRule, Pat, PatStatus, Repo, SshKey, User, UserRole};

/// JSON-file-backed store for the durable [`AppState`] snapshot.
///
/// Reads are served from memory. Every mutating operation applies its change
/// and rewrites the whole document while still holding the write lock, so no
/// observer can see a half-applied mutation and saves never interleave.
/// Uniqueness checks and the first-user role decision happen inside the same
/// critical section as the insert they protect.
pub struct StateStore {
    path: PathBuf,
    state: RwLock<AppState>,
}

impl StateStore {
    /// Open the store at `path`, creating the parent directory if needed.
    /// A missing or corrupt file starts the store empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let state = json::load_state(&path);
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Best-effort save. Failures are logged and swallowed so a full disk or
    /// permissions problem degrades durability without failing the mutation
    /// that already applied in memory.
    fn persist(&self, state: &AppState) {
        if let Err(e) = json::write_state(&self.path, state) {
            warn!("Failed to persist state to {}: {e}", self.path.display());
        }
    }

    // User operations

    /// Insert a new user. Email uniqueness and the role decision (first user
    /// becomes owner) are made under the write lock, which is what makes two
    /// concurrent signups for the same email resolve to exactly one success.
    pub fn create_user(&self, email: &str, name: &str, password_hash: &str) -> Result<User> {
        let mut state = self.write();
        if state.users.iter().any(|u| u.email == email) {
            return Err(Error::AlreadyExists("user"));
        }
        let role = if state.users.is_empty() {
            UserRole::Owner
        } else {
            UserRole::Developer
        };
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        self.persist(&state);
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.read().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.read().users.iter().find(|u| u.email == email).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.read().users.len()
    }

    /// The only user in the store, if there is exactly one.
    pub fn sole_user(&self) -> Option<User> {
        let state = self.read();
        match state.users.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        }
    }

    /// All users in signup order.
    pub fn list_users(&self) -> Vec<User> {
        self.read().users.clone()
    }

    // PAT operations

    pub fn create_pat(&self, pat: &Pat) -> Result<()> {
        let mut state = self.write();
        state.pats.push(pat.clone());
        self.persist(&state);
        Ok(())
    }

    /// All of a user's tokens in creation order, revoked ones included.
    pub fn list_user_pats(&self, user_id: &str) -> Vec<Pat> {
        self.read()
            .pats
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn get_active_pat_by_hash(&self, token_hash: &str) -> Option<Pat> {
        self.read()
            .pats
            .iter()
            .find(|p| p.status.is_active() && p.token_hash == token_hash)
            .cloned()
    }

    /// Mark a token revoked. The record is kept for listing. Revoking an
    /// already-revoked token is a no-op that preserves the original
    /// revocation time.
    pub fn revoke_pat(&self, id: &str, user_id: &str) -> Result<()> {
        let mut state = self.write();
        let pat = state
            .pats
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)
            .ok_or(Error::NotFound("token"))?;
        if pat.status.is_active() {
            pat.status = PatStatus::Revoked {
                revoked_at: Utc::now(),
            };
        }
        self.persist(&state);
        Ok(())
    }

    pub fn update_pat_last_used(&self, id: &str) -> Result<()> {
        let mut state = self.write();
        let pat = state
            .pats
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::NotFound("token"))?;
        pat.last_used_at = Some(Utc::now());
        self.persist(&state);
        Ok(())
    }

    // SSH key operations

    /// Insert a key. The same key text may exist under different users, but
    /// not twice under one user.
    pub fn create_ssh_key(&self, key: &SshKey) -> Result<()> {
        let mut state = self.write();
        if state
            .ssh_keys
            .iter()
            .any(|k| k.user_id == key.user_id && k.public_key == key.public_key)
        {
            return Err(Error::AlreadyExists("ssh key"));
        }
        state.ssh_keys.push(key.clone());
        self.persist(&state);
        Ok(())
    }

    pub fn list_user_ssh_keys(&self, user_id: &str) -> Vec<SshKey> {
        self.read()
            .ssh_keys
            .iter()
            .filter(|k| k.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn delete_ssh_key(&self, id: &str, user_id: &str) -> Result<()> {
        let mut state = self.write();
        let index = state
            .ssh_keys
            .iter()
            .position(|k| k.id == id && k.user_id == user_id)
            .ok_or(Error::NotFound("ssh key"))?;
        state.ssh_keys.remove(index);
        self.persist(&state);
        Ok(())
    }

    // Repo operations

    /// Insert repository metadata. Name uniqueness is decided here, under the
    /// write lock, before the caller touches the filesystem result.
    pub fn create_repo(&self, repo: &Repo) -> Result<()> {
        let mut state = self.write();
        if state.repos.iter().any(|r| r.name == repo.name) {
            return Err(Error::AlreadyExists("repository"));
        }
        state.repos.push(repo.clone());
        self.persist(&state);
        Ok(())
    }

    pub fn get_repo(&self, name: &str) -> Option<Repo> {
        self.read().repos.iter().find(|r| r.name == name).cloned()
    }

    pub fn list_repos(&self) -> Vec<Repo> {
        self.read().repos.clone()
    }

    /// Remove repository metadata and its branch rules, returning the record
    /// so the caller can clean up the filesystem path.
    pub fn delete_repo(&self, name: &str) -> Result<Repo> {
        let mut state = self.write();
        let index = state
            .repos
            .iter()
            .position(|r| r.name == name)
            .ok_or(Error::NotFound("repository"))?;
        let repo = state.repos.remove(index);
        state.branch_rules.remove(name);
        self.persist(&state);
        Ok(repo)
    }

    // Branch rule operations

    /// Replace the whole rule list for a repository. There is no partial
    /// patch operation.
    pub fn set_branch_rules(&self, repo_name: &str, rules: Vec<BranchRule>) -> Result<()> {
        let mut state = self.write();
        if !state.repos.iter().any(|r| r.name == repo_name) {
            return Err(Error::NotFound("repository"));
        }
        state.branch_rules.insert(repo_name.to_string(), rules);
        self.persist(&state);
        Ok(())
    }

    pub fn get_branch_rules(&self, repo_name: &str) -> Vec<BranchRule> {
        self.read()
            .branch_rules
            .get(repo_name)
            .cloned()
            .unwrap_or_default()
    }

    // Snapshot and maintenance

    pub fn snapshot(&self) -> AppState {
        self.read().clone()
    }

    /// Strict save of the current state. Unlike the per-mutation autosave,
    /// failures here propagate, which lets setup paths insist on durability.
    pub fn flush(&self) -> Result<()> {
        let state = self.read();
        json::write_state(&self.path, &state)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
