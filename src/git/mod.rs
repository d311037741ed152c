mod process;

pub use process::GitCli;

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    // Declaration order is the listing order: directories sort before files.
    Tree,
    Blob,
}

/// One entry from a tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub name: String,
    /// Path relative to the repository root.
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryKind,
    /// Byte size for blobs. Trees have no size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobEncoding {
    Utf8,
    Base64,
}

/// Blob content ready for transport. Binary data is base64-encoded, text is
/// passed through as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobContent {
    pub encoding: BlobEncoding,
    pub content: String,
}

/// Read-only repository queries plus bare-repo initialization.
///
/// The trait keeps callers independent of how Git is reached, so the
/// subprocess strategy can be swapped for a native object reader without
/// touching them. Query operations never mutate the repository.
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Picks the ref to browse: the requested one if it verifies, then
    /// `main`, then `master`, then `HEAD`. When nothing verifies (an empty
    /// repository), falls back to HEAD's symbolic target and finally to the
    /// literal `HEAD`, which callers must tolerate being unresolvable.
    async fn resolve_ref(&self, repo_path: &Path, requested: Option<&str>) -> String;

    /// Lists the tree at `<ref>:<path>`, directories first, names sorted
    /// within each group. An empty `path` means the repository root.
    async fn list_tree(
        &self,
        repo_path: &Path,
        ref_name: &str,
        path: &str,
    ) -> Result<Vec<TreeEntry>>;

    /// Reads the blob at `<ref>:<path>`.
    async fn read_blob(&self, repo_path: &Path, ref_name: &str, path: &str)
    -> Result<BlobContent>;

    /// The branch HEAD points at, or `main` when HEAD cannot be read
    /// symbolically.
    async fn default_branch(&self, repo_path: &Path) -> String;

    /// Creates a bare repository at `repo_path` with HEAD on `main`.
    async fn init_bare_repo(&self, repo_path: &Path) -> Result<()>;
}
