use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;

const SESSION_ID_BYTES: usize = 16;

struct SessionEntry {
    user_id: String,
    created_at: Instant,
}

/// In-memory session table. Sessions are created at login or signup,
/// destroyed at logout, and do not survive a process restart.
///
/// With `ttl` unset, a session lives as long as the process. With a `ttl`,
/// expired entries are dropped lazily on lookup.
pub struct SessionManager {
    ttl: Option<Duration>,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionManager {
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Creates a session for `user_id` and returns its unguessable id.
    pub fn create(&self, user_id: &str) -> String {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        rand::thread_rng().fill(&mut bytes);
        let session_id = hex::encode(bytes);

        self.lock().insert(
            session_id.clone(),
            SessionEntry {
                user_id: user_id.to_string(),
                created_at: Instant::now(),
            },
        );
        session_id
    }

    /// The user id behind `session_id`, if the session exists and has not
    /// expired.
    pub fn lookup(&self, session_id: &str) -> Option<String> {
        let mut sessions = self.lock();
        let entry = sessions.get(session_id)?;
        if let Some(ttl) = self.ttl {
            if entry.created_at.elapsed() >= ttl {
                sessions.remove(session_id);
                return None;
            }
        }
        Some(entry.user_id.clone())
    }

    pub fn destroy(&self, session_id: &str) {
        self.lock().remove(session_id);
    }
}
