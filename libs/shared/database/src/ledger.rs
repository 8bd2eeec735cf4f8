use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use tracing::debug;

use crate::mongo::MongoStore;

/// Append-only record of revoked tokens. Entries are never removed:
/// once a token is revoked it stays revoked, even past its natural
/// expiry (no pruning is performed).
#[async_trait]
pub trait TokenLedger: Send + Sync {
    async fn revoke(&self, token: &str) -> Result<()>;
    async fn is_revoked(&self, token: &str) -> Result<bool>;
}

pub struct MongoTokenLedger {
    tokens: Collection<Document>,
}

impl MongoTokenLedger {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            tokens: store.blacklist(),
        }
    }
}

#[async_trait]
impl TokenLedger for MongoTokenLedger {
    async fn revoke(&self, token: &str) -> Result<()> {
        // Upsert keeps revocation idempotent under concurrent logouts.
        self.tokens
            .update_one(
                doc! { "token": token },
                doc! { "$setOnInsert": { "token": token } },
            )
            .upsert(true)
            .await?;

        debug!("Token added to revocation ledger");
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        let hit = self.tokens.find_one(doc! { "token": token }).await?;
        Ok(hit.is_some())
    }
}

/// In-memory ledger used by tests and local experiments.
#[derive(Default)]
pub struct MemoryTokenLedger {
    tokens: Mutex<HashSet<String>>,
}

impl MemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenLedger for MemoryTokenLedger {
    async fn revoke(&self, token: &str) -> Result<()> {
        self.tokens
            .lock()
            .expect("ledger lock poisoned")
            .insert(token.to_string());
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        Ok(self
            .tokens
            .lock()
            .expect("ledger lock poisoned")
            .contains(token))
    }
}
