mod service;
mod validation;

pub use service::RepoService;
pub use validation::validate_repo_name;
