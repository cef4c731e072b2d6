//! Ledger store client.
//!
//! [`LedgerStore`] is the seam between the orchestration flow and the
//! transaction history table. The production implementation runs the
//! `kanau` processors in [`crate::entities::transaction_record`] against
//! Postgres; nothing here retries.

use crate::entities::transaction_record::{
    InsertPendingTransaction, ListPendingTransactions, ListTransactionsByWallet,
    TransactionRecord, UpdateTransactionStatus,
};
use crate::entities::{TransactionKind, TransactionStatus};
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use depovault_sdk::objects::EtherAmount;
use kanau::processor::Processor;
use thiserror::Error;

/// Errors surfaced by the ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert or update failed.
    #[error("failed to save transaction record: {0}")]
    Write(#[source] sqlx::Error),

    /// Query failed.
    #[error("failed to load transaction history: {0}")]
    Read(#[source] sqlx::Error),
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create a `pending` record for a submitted transaction.
    async fn insert_pending(
        &self,
        wallet_address: &str,
        kind: TransactionKind,
        amount: EtherAmount,
        tx_hash: &str,
    ) -> Result<TransactionRecord, StoreError>;

    /// Move the pending record for `tx_hash` to `status`.
    ///
    /// Returns how many records changed; 0 means no pending record exists
    /// for that hash.
    async fn mark_status(&self, tx_hash: &str, status: TransactionStatus)
    -> Result<u64, StoreError>;

    /// Up to 50 most recent records of a wallet, newest first.
    async fn list_by_wallet(&self, wallet_address: &str)
    -> Result<Vec<TransactionRecord>, StoreError>;

    /// Pending records of a wallet, oldest first.
    async fn list_pending(&self, wallet_address: &str)
    -> Result<Vec<TransactionRecord>, StoreError>;
}

#[async_trait]
impl LedgerStore for DatabaseProcessor {
    async fn insert_pending(
        &self,
        wallet_address: &str,
        kind: TransactionKind,
        amount: EtherAmount,
        tx_hash: &str,
    ) -> Result<TransactionRecord, StoreError> {
        self.process(InsertPendingTransaction {
            wallet_address: wallet_address.to_string(),
            kind,
            amount: amount.as_decimal(),
            tx_hash: tx_hash.to_string(),
        })
        .await
        .map_err(StoreError::Write)
    }

    async fn mark_status(
        &self,
        tx_hash: &str,
        status: TransactionStatus,
    ) -> Result<u64, StoreError> {
        self.process(UpdateTransactionStatus {
            tx_hash: tx_hash.to_string(),
            status,
        })
        .await
        .map_err(StoreError::Write)
    }

    async fn list_by_wallet(
        &self,
        wallet_address: &str,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        self.process(ListTransactionsByWallet {
            wallet_address: wallet_address.to_string(),
        })
        .await
        .map_err(StoreError::Read)
    }

    async fn list_pending(
        &self,
        wallet_address: &str,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        self.process(ListPendingTransactions {
            wallet_address: wallet_address.to_string(),
        })
        .await
        .map_err(StoreError::Read)
    }
}
