use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::api::ApiContext;
use crate::models::{CredentialStore, CurrentUser};

/// Idle time after which a signed-in session is evicted. Matches the
/// session cookie's max age.
pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);
/// Idle time after which a session holding no token and no admitted
/// account is evicted.
pub const ANONYMOUS_SESSION_TTL: Duration = Duration::from_secs(15 * 60);

/// Per-browser session: its own credential store plus the account the
/// gate last admitted.
#[derive(Clone, Debug)]
pub struct Session {
    pub credentials: CredentialStore,
    pub user: Option<CurrentUser>,
    pub last_seen: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            credentials: CredentialStore::default(),
            user: None,
            last_seen: Instant::now(),
        }
    }
}

impl Session {
    fn is_anonymous(&self) -> bool {
        self.user.is_none() && self.credentials.token().is_none()
    }

    fn expired_at(&self, now: Instant) -> bool {
        let ttl = if self.is_anonymous() { ANONYMOUS_SESSION_TTL } else { SESSION_TTL };
        now.saturating_duration_since(self.last_seen) > ttl
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub flash_store: Arc<Mutex<HashMap<String, Vec<String>>>>,
    pub api_base_url: String,
    pub client: reqwest::Client,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            api_base_url,
            client,
            custom_css: None,
        }
    }

    /// Backend context carrying the given bearer token.
    pub fn api_context(&self, token: &str) -> ApiContext {
        ApiContext::new(self.client.clone(), self.api_base_url.clone(), token)
    }

    pub fn session(&self, sid: &str) -> Option<Session> {
        self.session_at(sid, Instant::now())
    }

    fn session_at(&self, sid: &str, now: Instant) -> Option<Session> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(sid).filter(|s| !s.expired_at(now))?;
        session.last_seen = now;
        Some(session.clone())
    }

    /// Creating or changing a session also evicts idle ones.
    pub fn update_session<F: FnOnce(&mut Session)>(&self, sid: &str, f: F) {
        let now = Instant::now();
        self.prune_sessions(now);
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.entry(sid.to_string()).or_default();
        f(session);
        session.last_seen = now;
    }

    /// Drop sessions idle past their TTL along with their pending flashes.
    /// Returns how many were removed.
    pub fn prune_sessions(&self, now: Instant) -> usize {
        let expired: Vec<String> = {
            let mut sessions = self.sessions.lock().unwrap();
            let expired: Vec<String> = sessions
                .iter()
                .filter(|(_, s)| s.expired_at(now))
                .map(|(sid, _)| sid.clone())
                .collect();
            for sid in &expired {
                sessions.remove(sid);
            }
            expired
        };
        if !expired.is_empty() {
            let mut flashes = self.flash_store.lock().unwrap();
            for sid in &expired {
                flashes.remove(sid);
            }
            tracing::debug!(count = expired.len(), "Evicted idle sessions");
        }
        expired.len()
    }

    pub fn drop_session(&self, sid: &str) {
        self.sessions.lock().unwrap().remove(sid);
        self.flash_store.lock().unwrap().remove(sid);
    }

    pub fn push_flash(&self, sid: &str, message: impl Into<String>) {
        self.flash_store
            .lock()
            .unwrap()
            .entry(sid.to_string())
            .or_default()
            .push(message.into());
    }
}
