use crate::error::{Error, Result};

const MAX_REPO_NAME_LEN: usize = 100;

fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

/// Repository names become filesystem paths, so the character set is locked
/// down to alphanumerics, periods, hyphens, and underscores.
pub fn validate_repo_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(
            "repository name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_REPO_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "repository name cannot exceed {MAX_REPO_NAME_LEN} characters"
        )));
    }
    if !name.chars().all(is_valid_name_char) {
        return Err(Error::InvalidInput(
            "repository name can only contain alphanumeric characters, periods, hyphens, and underscores"
                .to_string(),
        ));
    }
    Ok(())
}
