mod credentials;
mod identity;
mod password;
mod session;
mod ssh_key;
mod token;

pub use credentials::{CredentialStore, IssuedPat};
pub use identity::{Authenticator, RequestCredentials, parse_bearer};
pub use password::PasswordHasher;
pub use session::SessionManager;
pub use ssh_key::validate_public_key;
pub use token::{GeneratedToken, generate_token, hash_token};
