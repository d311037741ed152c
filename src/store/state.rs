use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{BranchRule, Pat, Repo, SshKey, User};

/// The full durable snapshot: everything the control plane knows, in one
/// document. A single instance lives for the process lifetime, loaded once at
/// startup and rewritten after every mutation.
///
/// Sessions are deliberately absent. They are in-memory only and do not
/// survive a restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub users: Vec<User>,
    pub pats: Vec<Pat>,
    #[serde(rename = "sshKeys")]
    pub ssh_keys: Vec<SshKey>,
    pub repos: Vec<Repo>,
    /// Keyed by repository name. An ordered map keeps the serialized
    /// document stable across saves.
    #[serde(rename = "branchRules")]
    pub branch_rules: BTreeMap<String, Vec<BranchRule>>,
}
