//! In-process user directory for tests.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use uuid::Uuid;

use super::repo::UserDirectory;

/// Every id resolves until it is passed to `delete`.
#[derive(Default)]
pub struct MemoryUsers {
    deleted: Mutex<HashSet<Uuid>>,
    pub fail: AtomicBool,
}

impl MemoryUsers {
    pub fn delete(&self, id: Uuid) {
        self.deleted.lock().unwrap().insert(id);
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn exists(&self, id: Uuid) -> anyhow::Result<bool> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("user directory offline");
        }
        Ok(!self.deleted.lock().unwrap().contains(&id))
    }
}
