//! Provenance ledger stub

use super::ServiceResult;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

/// Receipt of a recorded ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct BlockchainService;

impl BlockchainService {
    pub fn new() -> Self {
        Self
    }

    pub async fn record_transaction(&self, payload: &Value) -> ServiceResult<Transaction> {
        let now = Utc::now();
        let bytes: [u8; 32] = rand::thread_rng().gen();
        let hash: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        let tx = Transaction {
            transaction_id: format!("tx_{}", now.timestamp_millis()),
            hash: format!("0x{}", hash),
            timestamp: now,
        };
        info!(tx = %tx.transaction_id, "Recorded ledger transaction: {}", payload);
        Ok(tx)
    }

    /// Every hash verifies until a ledger is attached
    pub async fn verify_document(&self, _content_hash: &str) -> ServiceResult<bool> {
        Ok(true)
    }

    /// Anchor a document's content hash on the ledger
    pub async fn initiate_verification(
        &self,
        document_id: Uuid,
        content_hash: &str,
        title: &str,
    ) -> ServiceResult<Transaction> {
        self.record_transaction(&json!({
            "documentId": document_id,
            "contentHash": content_hash,
            "title": title,
        }))
        .await
    }
}
