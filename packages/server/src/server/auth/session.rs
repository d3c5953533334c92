use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;
use uuid::Uuid;

/// In-memory backend for `tower-sessions`
///
/// Records past their expiry date are never loaded; `cleanup_expired`
/// drops them from memory.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    records: Arc<RwLock<HashMap<Id, Record>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove expired sessions (run periodically), returning how many went
    pub async fn cleanup_expired(&self) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        let now = OffsetDateTime::now_utc();
        records.retain(|_, record| record.expiry_date > now);
        before - records.len()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl tower_sessions::SessionStore for SessionStore {
    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let records = self.records.read().await;
        Ok(records
            .get(session_id)
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc())
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.write().await.remove(session_id);
        Ok(())
    }
}

/// Unpredictable hex token
pub fn generate_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two tokens without short-circuiting on the first differing byte
pub fn tokens_match(expected: &str, given: &str) -> bool {
    let (a, b) = (expected.as_bytes(), given.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
