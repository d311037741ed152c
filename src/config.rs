use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

pub const ENV_DATA_DIR: &str = "GITLOOM_DATA_DIR";
pub const ENV_REPOS_DIR: &str = "GITLOOM_REPOS_DIR";
pub const ENV_SESSION_TTL_SECS: &str = "GITLOOM_SESSION_TTL_SECS";

const CONFIG_FILE_NAME: &str = "gitloom.toml";
const STATE_FILE_NAME: &str = "state.json";
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Where bare repositories live. Each repository gets `<repos_dir>/<name>.git`.
    pub repos_dir: PathBuf,
    /// How long a session stays valid after creation. `None` means sessions
    /// last for the lifetime of the process.
    pub session_ttl: Option<Duration>,
}

/// Optional settings file at `<data_dir>/gitloom.toml`. Everything in it has
/// a working default, so the file is never required.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    repos_dir: Option<PathBuf>,
    /// Session lifetime in seconds. `0` disables expiry.
    session_ttl_secs: Option<u64>,
}

impl Config {
    /// Resolve configuration for a data directory. Explicit `data_dir` wins
    /// over `GITLOOM_DATA_DIR`, which wins over `./data`. For the remaining
    /// settings, environment variables win over the settings file.
    pub fn load(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir
            .or_else(|| std::env::var_os(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let file = read_config_file(&data_dir.join(CONFIG_FILE_NAME));
        let env_repos_dir = std::env::var_os(ENV_REPOS_DIR).map(PathBuf::from);
        let env_ttl_secs = std::env::var(ENV_SESSION_TTL_SECS).ok();

        Self::from_parts(data_dir, file, env_repos_dir, env_ttl_secs)
    }

    fn from_parts(
        data_dir: PathBuf,
        file: ConfigFile,
        env_repos_dir: Option<PathBuf>,
        env_ttl_secs: Option<String>,
    ) -> Self {
        let repos_dir = env_repos_dir
            .or(file.repos_dir)
            .map(|p| {
                if p.is_relative() {
                    data_dir.join(p)
                } else {
                    p
                }
            })
            .unwrap_or_else(|| data_dir.join("repos"));

        let ttl_secs = env_ttl_secs
            .and_then(|raw| match raw.parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!("ignoring non-numeric {ENV_SESSION_TTL_SECS}={raw:?}");
                    None
                }
            })
            .or(file.session_ttl_secs);

        Self {
            data_dir,
            repos_dir,
            session_ttl: ttl_secs.filter(|secs| *secs > 0).map(Duration::from_secs),
        }
    }

    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE_NAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            repos_dir: data_dir.join("repos"),
            data_dir,
            session_ttl: None,
        }
    }
}

fn read_config_file(path: &Path) -> ConfigFile {
    let Ok(content) = fs::read_to_string(path) else {
        return ConfigFile::default();
    };
    match toml::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            warn!("Ignoring malformed config at {}: {e}", path.display());
            ConfigFile::default()
        }
    }
}
