use rand::Rng;
use sha2::{Digest, Sha256};

const TOKEN_PREFIX: &str = "gitloom_pat";
const SECRET_BYTES: usize = 16;
const DISPLAY_PREFIX_LENGTH: usize = 16;

/// A freshly generated personal access token.
///
/// `plaintext` is handed to the caller exactly once and never stored. Only
/// `prefix` (for display) and `hash` (for lookup) are persisted.
pub struct GeneratedToken {
    pub plaintext: String,
    pub prefix: String,
    pub hash: String,
}

/// Generates a new token with the format: gitloom_pat_<32 hex chars>
#[must_use]
pub fn generate_token() -> GeneratedToken {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill(&mut bytes);
    let plaintext = format!("{TOKEN_PREFIX}_{}", hex::encode(bytes));
    let prefix = plaintext[..DISPLAY_PREFIX_LENGTH].to_string();
    let hash = hash_token(&plaintext);
    GeneratedToken {
        plaintext,
        prefix,
        hash,
    }
}

/// SHA-256 hex of the full plaintext token. A fast hash is fine here: unlike
/// passwords, the input already carries 128 bits of entropy, so there is
/// nothing for a brute-force attacker to enumerate.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
