use crate::error::{Error, Result};

/// Key types accepted for upload. The legacy `ssh-rsa` type is rejected
/// outright regardless of payload, see [`validate_public_key`].
const ALLOWED_KEY_TYPES: &[&str] = &["ssh-ed25519", "ssh-rsa-sha2-256", "ssh-rsa-sha2-512"];

/// Shortest base64 blob we accept. Anything under this is structurally
/// incapable of holding a real key.
const MIN_BLOB_LENGTH: usize = 40;

/// Validates a public key line of the form `<type> <base64-blob> [comment]`.
///
/// Malformed input fails with [`Error::InvalidInput`], never a panic.
pub fn validate_public_key(public_key: &str) -> Result<()> {
    let mut parts = public_key.split_whitespace();

    let key_type = parts
        .next()
        .ok_or_else(|| Error::InvalidInput("ssh key is empty".to_string()))?;

    if key_type == "ssh-rsa" {
        return Err(Error::InvalidInput(
            "legacy ssh-rsa keys are not accepted, use rsa-sha2 or ed25519".to_string(),
        ));
    }
    if !ALLOWED_KEY_TYPES.contains(&key_type) {
        return Err(Error::InvalidInput(format!(
            "unsupported ssh key type '{key_type}'"
        )));
    }

    let blob = parts
        .next()
        .ok_or_else(|| Error::InvalidInput("ssh key is missing its base64 payload".to_string()))?;

    if blob.len() < MIN_BLOB_LENGTH {
        return Err(Error::InvalidInput(
            "ssh key payload is too short".to_string(),
        ));
    }
    if !blob
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')
    {
        return Err(Error::InvalidInput(
            "ssh key payload is not valid base64".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ED25519_BLOB: &str = "AAAAC3NzaC1lZDI1NTE5AAAAIFYmNZW2rDLGM5mJmUPjWQ8rXW0M1DkJ3TzXq";

    #[test]
    fn test_accepts_ed25519_with_comment() {
        let key = format!("ssh-ed25519 {ED25519_BLOB} ada@laptop");
        assert!(validate_public_key(&key).is_ok());
    }

    #[test]
    fn test_accepts_rsa_sha2_without_comment() {
        let key = format!("ssh-rsa-sha2-512 {ED25519_BLOB}");
        assert!(validate_public_key(&key).is_ok());
    }

    #[test]
    fn test_rejects_legacy_rsa_regardless_of_payload() {
        let key = format!("ssh-rsa {ED25519_BLOB} ada@laptop");
        let err = validate_public_key(&key).unwrap_err();
        assert!(err.to_string().contains("legacy ssh-rsa"));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let key = format!("ssh-dss {ED25519_BLOB}");
        assert!(validate_public_key(&key).is_err());
    }

    #[test]
    fn test_rejects_short_blob() {
        assert!(validate_public_key("ssh-ed25519 AAAA comment").is_err());
    }

    #[test]
    fn test_rejects_non_base64_blob() {
        let key = format!("ssh-ed25519 {}!!!", &ED25519_BLOB[..40]);
        assert!(validate_public_key(&key).is_err());
    }

    #[test]
    fn test_rejects_empty_and_type_only_lines() {
        assert!(validate_public_key("").is_err());
        assert!(validate_public_key("ssh-ed25519").is_err());
    }
}
