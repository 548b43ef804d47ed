use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use ed25519_dalek::VerifyingKey;
use fe::DerivedKey;
use messages::ClientId;

/// What the server keeps for an enrolled client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub signature_public_key: VerifyingKey,
    pub decryption_key: DerivedKey,
}

/// Enrolled clients, keyed by hex identifier.
///
/// Records are never modified in place: an enrolment swaps in a complete
/// new record under the write lock, and a lookup hands out a shared pointer
/// to whichever complete record was current. Operations on one identifier
/// are therefore serialized, and nobody sees a partially written record.
#[derive(Debug, Default)]
pub struct Database {
    records: RwLock<HashMap<String, Arc<ServerRecord>>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record`; returns `true` if it replaced an earlier enrolment
    pub fn insert(&self, rid: &ClientId, record: ServerRecord) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(rid.to_hex(), Arc::new(record)).is_some()
    }

    pub fn get(&self, rid: &ClientId) -> Option<Arc<ServerRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(&rid.to_hex()).cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
