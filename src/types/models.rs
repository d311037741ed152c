use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned at signup: the first-ever user becomes the owner, everyone
/// after that a developer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Developer,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Owner => write!(f, "owner"),
            UserRole::Developer => write!(f, "developer"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Argon2id PHC string. The plaintext password is never stored.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a personal access token. Revocation is a soft delete: the
/// record stays listable for audit, it just stops authenticating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PatStatus {
    Active,
    Revoked { revoked_at: DateTime<Utc> },
}

impl PatStatus {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, PatStatus::Active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pat {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// First characters of the plaintext token, kept for display. The full
    /// plaintext is handed out once at issuance and never stored.
    pub token_prefix: String,
    /// SHA-256 hex of the full plaintext token, used for lookup.
    pub token_hash: String,
    pub scopes: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub status: PatStatus,
}

/// Listing shape for tokens: prefix and metadata only, no hash, no plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct PatSummary {
    pub id: String,
    pub name: String,
    pub token_prefix: String,
    pub scopes: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub status: PatStatus,
}

impl From<&Pat> for PatSummary {
    fn from(pat: &Pat) -> Self {
        Self {
            id: pat.id.clone(),
            name: pat.name.clone(),
            token_prefix: pat.token_prefix.clone(),
            scopes: pat.scopes.clone(),
            created_at: pat.created_at,
            last_used_at: pat.last_used_at,
            status: pat.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKey {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub public_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Internal,
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::Internal => write!(f, "internal"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "internal" => Ok(Visibility::Internal),
            "public" => Ok(Visibility::Public),
            other => Err(format!(
                "invalid visibility '{other}' (expected private, internal, or public)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repo {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
    /// Filesystem location of the bare repository. The on-disk repo is the
    /// durable source of truth for Git content; this record is metadata.
    pub path: PathBuf,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Listing shape for repositories.
#[derive(Debug, Clone, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub visibility: Visibility,
    pub path: PathBuf,
}

impl From<&Repo> for RepoSummary {
    fn from(repo: &Repo) -> Self {
        Self {
            name: repo.name.clone(),
            visibility: repo.visibility,
            path: repo.path.clone(),
        }
    }
}

/// One branch policy entry. `pattern` is matched against branch names with
/// glob semantics. Policy flags beyond the known ones are carried through
/// `extra` untouched, so callers that persist richer rule objects read back
/// exactly what they wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRule {
    pub pattern: String,
    #[serde(default)]
    pub require_up_to_date: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BranchRule {
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            require_up_to_date: false,
            extra: BTreeMap::new(),
        }
    }

    /// Whether this rule applies to the given branch name.
    #[must_use]
    pub fn matches(&self, branch: &str) -> bool {
        glob::Pattern::new(&self.pattern)
            .map(|p| p.matches(branch))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pat_status_round_trip() {
        let active = serde_json::to_value(PatStatus::Active).unwrap();
        assert_eq!(active["state"], "active");

        let revoked = PatStatus::Revoked {
            revoked_at: Utc::now(),
        };
        let value = serde_json::to_value(&revoked).unwrap();
        assert_eq!(value["state"], "revoked");
        assert!(value["revoked_at"].is_string());

        let back: PatStatus = serde_json::from_value(value).unwrap();
        assert!(!back.is_active());
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!("private".parse::<Visibility>().unwrap(), Visibility::Private);
        assert_eq!("public".parse::<Visibility>().unwrap(), Visibility::Public);
        assert!("secret".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_branch_rule_matches_glob() {
        let rule = BranchRule::new("release/*");
        assert!(rule.matches("release/1.2"));
        assert!(!rule.matches("main"));

        let exact = BranchRule::new("main");
        assert!(exact.matches("main"));
        assert!(!exact.matches("main2"));
    }

    #[test]
    fn test_branch_rule_preserves_unknown_flags() {
        let raw = serde_json::json!({
            "pattern": "main",
            "require_up_to_date": true,
            "allow_force_push": false
        });
        let rule: BranchRule = serde_json::from_value(raw).unwrap();
        assert!(rule.require_up_to_date);
        assert_eq!(rule.extra["allow_force_push"], serde_json::json!(false));

        let back = serde_json::to_value(&rule).unwrap();
        assert_eq!(back["allow_force_push"], serde_json::json!(false));
    }
}
