use crate::entities::{TransactionKind, TransactionStatus};
use crate::framework::DatabaseProcessor;
use depovault_sdk::objects::TransactionView;
use kanau::processor::Processor;
use rust_decimal::Decimal;

/// Maximum number of records returned by a history query.
pub const HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: i64,
    pub wallet_address: String,
    #[sqlx(rename = "type")]
    pub kind: TransactionKind,
    /// Human-readable unit, never the contract base unit.
    pub amount: Decimal,
    pub tx_hash: String,
    pub status: TransactionStatus,
    pub created_at: time::PrimitiveDateTime,
}

impl From<&TransactionRecord> for TransactionView {
    fn from(record: &TransactionRecord) -> Self {
        TransactionView {
            id: record.id,
            wallet_address: record.wallet_address.clone(),
            kind: record.kind.into(),
            amount: record.amount,
            tx_hash: record.tx_hash.clone(),
            status: record.status.into(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Create a new `pending` record for a submitted transaction.
///
/// `tx_hash` is unique; inserting the same hash twice is a write error.
pub struct InsertPendingTransaction {
    pub wallet_address: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub tx_hash: String,
}

impl Processor<InsertPendingTransaction> for DatabaseProcessor {
    type Output = TransactionRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertPendingTransaction")]
    async fn process(
        &self,
        insert: InsertPendingTransaction,
    ) -> Result<TransactionRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, TransactionRecord>(
            r#"
            INSERT INTO transactions (wallet_address, "type", amount, tx_hash, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id, wallet_address, "type", amount, tx_hash, status, created_at
            "#,
        )
        .bind(insert.wallet_address)
        .bind(insert.kind)
        .bind(insert.amount)
        .bind(insert.tx_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }
}

#[derive(Debug, Clone)]
/// Settle the pending record identified by `tx_hash`.
///
/// Only rows still in `pending` are touched, so a settled record never
/// changes again. Returns the number of rows updated (0 or 1).
pub struct UpdateTransactionStatus {
    pub tx_hash: String,
    pub status: TransactionStatus,
}

impl Processor<UpdateTransactionStatus> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateTransactionStatus")]
    async fn process(&self, update: UpdateTransactionStatus) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $2
            WHERE tx_hash = $1 AND status = 'pending'
            "#,
        )
        .bind(update.tx_hash)
        .bind(update.status)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone)]
/// Most recent records for a wallet, newest first, capped at [`HISTORY_LIMIT`].
pub struct ListTransactionsByWallet {
    pub wallet_address: String,
}

impl Processor<ListTransactionsByWallet> for DatabaseProcessor {
    type Output = Vec<TransactionRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListTransactionsByWallet")]
    async fn process(
        &self,
        query: ListTransactionsByWallet,
    ) -> Result<Vec<TransactionRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, wallet_address, "type", amount, tx_hash, status, created_at
            FROM transactions
            WHERE wallet_address = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(query.wallet_address)
        .bind(HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[derive(Debug, Clone)]
/// Records of a wallet still waiting for a receipt, oldest first.
pub struct ListPendingTransactions {
    pub wallet_address: String,
}

impl Processor<ListPendingTransactions> for DatabaseProcessor {
    type Output = Vec<TransactionRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPendingTransactions")]
    async fn process(
        &self,
        query: ListPendingTransactions,
    ) -> Result<Vec<TransactionRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, wallet_address, "type", amount, tx_hash, status, created_at
            FROM transactions
            WHERE wallet_address = $1 AND status = 'pending'
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(query.wallet_address)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
