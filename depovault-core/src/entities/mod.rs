pub mod transaction_record;

use depovault_sdk::objects::{
    TransactionKind as SdkTransactionKind, TransactionStatus as SdkTransactionStatus,
};

/// Transaction direction for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `depovault_sdk::objects::TransactionKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "transaction_kind")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl From<TransactionKind> for SdkTransactionKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Deposit => SdkTransactionKind::Deposit,
            TransactionKind::Withdraw => SdkTransactionKind::Withdraw,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&SdkTransactionKind::from(*self), f)
    }
}

/// Transaction status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `depovault_sdk::objects::TransactionStatus`.
///
/// A record only ever leaves `Pending`; `Completed` and `Failed` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "transaction_status")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl From<TransactionStatus> for SdkTransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Pending => SdkTransactionStatus::Pending,
            TransactionStatus::Completed => SdkTransactionStatus::Completed,
            TransactionStatus::Failed => SdkTransactionStatus::Failed,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&SdkTransactionStatus::from(*self), f)
    }
}
