use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::fs;
use tokio::process::Command;

use super::{BlobContent, BlobEncoding, EntryKind, GitBackend, TreeEntry};
use crate::error::{Error, Result};

const GIT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);
const BINARY_SNIFF_BYTES: usize = 8192;
const HEAD_CONTENT: &str = "ref: refs/heads/main\n";

/// [`GitBackend`] that shells out to the `git` binary. Every invocation runs
/// with an explicit working directory, captured output, and a timeout, so a
/// wedged subprocess cannot stall its caller forever.
#[derive(Debug, Default)]
pub struct GitCli;

impl GitCli {
    fn command_in(repo_path: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(repo_path);
        cmd
    }

    async fn run(mut cmd: Command) -> Result<Output> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(Error::Io)?;
        tokio::time::timeout(GIT_COMMAND_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| Error::BackendFailure("git command timed out".to_string()))?
            .map_err(Error::Io)
    }

    async fn ref_verifies(&self, repo_path: &Path, ref_name: &str) -> bool {
        let cmd = Self::command_in(repo_path, &["rev-parse", "--verify", "--quiet", ref_name]);
        match Self::run(cmd).await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    async fn symbolic_head(&self, repo_path: &Path) -> Option<String> {
        let cmd = Self::command_in(repo_path, &["symbolic-ref", "--short", "HEAD"]);
        let output = Self::run(cmd).await.ok()?;
        if !output.status.success() {
            return None;
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if name.is_empty() { None } else { Some(name) }
    }
}

#[async_trait]
impl GitBackend for GitCli {
    async fn resolve_ref(&self, repo_path: &Path, requested: Option<&str>) -> String {
        let requested = requested.filter(|r| !r.is_empty());
        for candidate in requested.into_iter().chain(["main", "master", "HEAD"]) {
            if self.ref_verifies(repo_path, candidate).await {
                return candidate.to_string();
            }
        }
        // Nothing verifies against an empty repository. HEAD's symbolic
        // target still names the unborn branch.
        match self.symbolic_head(repo_path).await {
            Some(branch) => branch,
            None => "HEAD".to_string(),
        }
    }

    async fn list_tree(
        &self,
        repo_path: &Path,
        ref_name: &str,
        path: &str,
    ) -> Result<Vec<TreeEntry>> {
        let treeish = format!("{ref_name}:{path}");
        let cmd = Self::command_in(repo_path, &["ls-tree", "-z", "-l", &treeish]);
        let output = Self::run(cmd).await?;
        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }
        Ok(parse_ls_tree(&output.stdout, path))
    }

    async fn read_blob(
        &self,
        repo_path: &Path,
        ref_name: &str,
        path: &str,
    ) -> Result<BlobContent> {
        let spec = format!("{ref_name}:{path}");
        let cmd = Self::command_in(repo_path, &["cat-file", "blob", &spec]);
        let output = Self::run(cmd).await?;
        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }

        if is_binary(&output.stdout) {
            Ok(BlobContent {
                encoding: BlobEncoding::Base64,
                content: STANDARD.encode(&output.stdout),
            })
        } else {
            Ok(BlobContent {
                encoding: BlobEncoding::Utf8,
                content: String::from_utf8_lossy(&output.stdout).to_string(),
            })
        }
    }

    async fn default_branch(&self, repo_path: &Path) -> String {
        self.symbolic_head(repo_path)
            .await
            .unwrap_or_else(|| "main".to_string())
    }

    async fn init_bare_repo(&self, repo_path: &Path) -> Result<()> {
        if let Some(parent) = repo_path.parent() {
            fs::create_dir_all(parent).await.map_err(Error::Io)?;
        }

        let mut cmd = Command::new("git");
        cmd.args(["init", "--bare"]).arg(repo_path);
        match Self::run(cmd).await {
            Ok(output) if output.status.success() => {
                // Pin the unborn branch regardless of the host's
                // init.defaultBranch setting.
                fs::write(repo_path.join("HEAD"), HEAD_CONTENT)
                    .await
                    .map_err(Error::Io)?;
                Ok(())
            }
            Ok(output) => Err(Error::BackendFailure(format!(
                "failed to init bare repo: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                // No git binary on this host. Lay out the bare structure
                // directly so metadata-only flows still work.
                write_bare_layout(repo_path).await
            }
            Err(e) => Err(e),
        }
    }
}

async fn write_bare_layout(repo_path: &Path) -> Result<()> {
    fs::create_dir_all(repo_path.join("objects")).await?;
    fs::create_dir_all(repo_path.join("refs").join("heads")).await?;
    fs::create_dir_all(repo_path.join("refs").join("tags")).await?;
    fs::write(repo_path.join("HEAD"), HEAD_CONTENT).await?;
    fs::write(
        repo_path.join("config"),
        "[core]\n\trepositoryformatversion = 0\n\tbare = true\n",
    )
    .await?;
    Ok(())
}

/// Maps a failed invocation's stderr to the error a caller should see.
/// Unknown refs and paths are lookups that missed, everything else is a
/// backend problem.
fn classify_failure(stderr: &[u8]) -> Error {
    let message = String::from_utf8_lossy(stderr);
    let lowered = message.to_lowercase();
    if lowered.contains("not a valid object name")
        || lowered.contains("invalid object name")
        || lowered.contains("does not exist")
        || lowered.contains("not a tree object")
        || lowered.contains("bad file")
    {
        Error::NotFound("path")
    } else {
        Error::BackendFailure(format!("git command failed: {}", message.trim()))
    }
}

/// Parses `ls-tree -z -l` output. Each record is
/// `<mode> <type> <hash> <size>\t<name>` terminated by a NUL, with `-` as
/// the size for trees. Entry types other than blob and tree (submodules) are
/// dropped. The result is sorted directories-first, then by name.
fn parse_ls_tree(raw: &[u8], base_path: &str) -> Vec<TreeEntry> {
    let text = String::from_utf8_lossy(raw);
    let mut entries: Vec<TreeEntry> = text
        .split('\0')
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let (meta, name) = record.split_once('\t')?;
            let mut fields = meta.split_whitespace();
            let _mode = fields.next()?;
            let entry_type = match fields.next()? {
                "tree" => EntryKind::Tree,
                "blob" => EntryKind::Blob,
                _ => return None,
            };
            let _hash = fields.next()?;
            let size = match entry_type {
                EntryKind::Blob => fields.next().and_then(|s| s.parse().ok()),
                EntryKind::Tree => None,
            };
            let path = if base_path.is_empty() {
                name.to_string()
            } else {
                format!("{}/{name}", base_path.trim_end_matches('/'))
            };
            Some(TreeEntry {
                name: name.to_string(),
                path,
                entry_type,
                size,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.entry_type
            .cmp(&b.entry_type)
            .then_with(|| a.name.cmp(&b.name))
    });
    entries
}

#[must_use]
fn is_binary(content: &[u8]) -> bool {
    let sample_size = content.len().min(BINARY_SNIFF_BYTES);
    content[..sample_size].contains(&0)
}
