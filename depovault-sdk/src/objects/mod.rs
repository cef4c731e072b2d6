pub mod amount;
pub mod contract;
pub mod rpc;

pub use amount::{AmountError, EtherAmount};

use serde::{Deserialize, Serialize};

/// Direction of a vault transaction.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `depovault-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Lifecycle status of a recorded transaction.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `depovault-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A transaction history entry as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: i64,
    pub wallet_address: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: rust_decimal::Decimal,
    pub tx_hash: String,
    pub status: TransactionStatus,
    pub created_at: time::PrimitiveDateTime,
}
