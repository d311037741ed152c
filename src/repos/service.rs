use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use super::validation::validate_repo_name;
use crate::error::{Error, Result};
use crate::git::{BlobContent, GitBackend, TreeEntry};
use crate::store::StateStore;
use crate::types::{BranchRule, Repo, RepoSummary, Visibility};

/// Lifecycle of bare repositories: metadata in the store, the repository
/// itself on disk, and read-only content queries bridged to the Git backend.
///
/// The on-disk bare repository is the durable source of truth for Git
/// content. The metadata record just points at it.
pub struct RepoService {
    store: Arc<StateStore>,
    git: Arc<dyn GitBackend>,
    repos_root: PathBuf,
}

impl RepoService {
    #[must_use]
    pub fn new(store: Arc<StateStore>, git: Arc<dyn GitBackend>, repos_root: PathBuf) -> Self {
        Self {
            store,
            git,
            repos_root,
        }
    }

    /// Deterministic location for a repository: `<repos_root>/<name>.git`.
    #[must_use]
    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.repos_root.join(format!("{name}.git"))
    }

    /// Creates the bare repository on disk and records its metadata. The
    /// name is validated and checked for duplicates before anything touches
    /// the filesystem.
    pub async fn create(
        &self,
        name: &str,
        visibility: Visibility,
        created_by: &str,
    ) -> Result<Repo> {
        validate_repo_name(name)?;
        if self.store.get_repo(name).is_some() {
            return Err(Error::AlreadyExists("repository"));
        }

        let path = self.repo_path(name);
        self.git.init_bare_repo(&path).await?;

        let repo = Repo {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            visibility,
            path,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        };
        self.store.create_repo(&repo)?;
        Ok(repo)
    }

    pub fn list(&self) -> Vec<RepoSummary> {
        self.store.list_repos().iter().map(RepoSummary::from).collect()
    }

    pub fn get(&self, name: &str) -> Result<Repo> {
        self.store
            .get_repo(name)
            .ok_or(Error::NotFound("repository"))
    }

    /// Deletes the metadata record first, then best-effort removes the
    /// filesystem tree. Once the record is gone the repository is gone from
    /// the system's perspective, even if disk cleanup lags behind.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let repo = self.store.delete_repo(name)?;
        if let Err(e) = tokio::fs::remove_dir_all(&repo.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove repository files at {}: {e}",
                    repo.path.display()
                );
            }
        }
        Ok(())
    }

    /// Replaces the whole rule list for a repository.
    pub fn set_branch_rules(&self, name: &str, rules: Vec<BranchRule>) -> Result<()> {
        self.store.set_branch_rules(name, rules)
    }

    pub fn branch_rules(&self, name: &str) -> Result<Vec<BranchRule>> {
        if self.store.get_repo(name).is_none() {
            return Err(Error::NotFound("repository"));
        }
        Ok(self.store.get_branch_rules(name))
    }

    // Content queries. Each resolves the repository by name, then bridges to
    // the Git backend against its on-disk path.

    pub async fn resolve_ref(&self, name: &str, requested: Option<&str>) -> Result<String> {
        let repo = self.get(name)?;
        Ok(self.git.resolve_ref(&repo.path, requested).await)
    }

    /// Lists the tree at `path` under the requested ref (or the default ref
    /// chain when none is given). Empty `path` means the repository root.
    pub async fn tree(
        &self,
        name: &str,
        reference: Option<&str>,
        path: &str,
    ) -> Result<Vec<TreeEntry>> {
        let repo = self.get(name)?;
        let resolved = self.git.resolve_ref(&repo.path, reference).await;
        self.git.list_tree(&repo.path, &resolved, path).await
    }

    pub async fn blob(
        &self,
        name: &str,
        reference: Option<&str>,
        path: &str,
    ) -> Result<BlobContent> {
        let repo = self.get(name)?;
        let resolved = self.git.resolve_ref(&repo.path, reference).await;
        self.git.read_blob(&repo.path, &resolved, path).await
    }

    pub async fn default_branch(&self, name: &str) -> Result<String> {
        let repo = self.get(name)?;
        Ok(self.git.default_branch(&repo.path).await)
    }
}
