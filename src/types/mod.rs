mod models;

pub use models::{
    BranchRule, Pat, PatStatus, PatSummary, Repo, RepoSummary, SshKey, User, UserRole, Visibility,
};
