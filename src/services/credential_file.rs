use rand::RngCore;
use std::path::Path;

use crate::models::CredentialStore;

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex::encode(b)
}

/// Read the CLI credential store. A missing or unreadable file is an empty
/// store; a store whose token went missing is recovered from the saved
/// login response.
pub async fn load_credentials(path: &Path) -> CredentialStore {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(t) => t,
        Err(_) => return CredentialStore::default(),
    };
    match serde_json::from_str::<CredentialStore>(&text) {
        Ok(mut store) => {
            store.recover();
            store
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable credential file");
            CredentialStore::default()
        }
    }
}

/// Write the store back; an empty store removes the file.
pub async fn persist_credentials(path: &Path, store: &CredentialStore) -> Result<(), std::io::Error> {
    if store.is_empty() {
        return match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        };
    }
    let text = serde_json::to_string_pretty(store)?;
    tokio::fs::write(path, text).await
}
