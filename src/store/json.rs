use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::state::AppState;
use crate::error::Result;

/// Read the state document at `path`. A missing or unparseable file yields
/// the empty default, so a fresh or damaged data directory still starts.
pub fn load_state(path: &Path) -> AppState {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return AppState::default(),
        Err(e) => {
            warn!("Could not read state file {}: {e}", path.display());
            return AppState::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(e) => {
            warn!(
                "Could not parse state file {}, starting with empty state: {e}",
                path.display()
            );
            AppState::default()
        }
    }
}

/// Serialize `state` to `<path>.tmp`, then rename over `path`. Readers see
/// either the previous complete document or the new one, never a torn write.
pub fn write_state(path: &Path, state: &AppState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".tmp");
    PathBuf::from(raw)
}
