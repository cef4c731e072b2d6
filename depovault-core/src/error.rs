use crate::chain::ChainError;
use crate::store::StoreError;
use depovault_sdk::objects::AmountError;
use thiserror::Error;

/// Errors that end a user-initiated action.
///
/// The `Display` text of each variant is what the user sees in the error
/// banner.
#[derive(Debug, Error)]
pub enum FlowError {
    /// No wallet provider is configured.
    #[error("No wallet provider found. Configure a wallet provider to connect.")]
    WalletUnavailable,

    /// The user declined authorization, or the provider failed to answer.
    #[error("Failed to connect wallet")]
    ConnectionRejected,

    /// Input is not a positive decimal with at most 18 fractional digits.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[source] AmountError),

    /// Another deposit or withdrawal is still in flight.
    #[error("Another transaction is already in progress")]
    Busy,

    /// The provider or contract refused the submission.
    #[error("Transaction failed: {0}")]
    ChainSubmission(#[source] ChainError),

    /// Polling for the receipt failed; the record stays pending.
    #[error("Could not confirm transaction: {0}")]
    ChainConfirmation(#[source] ChainError),

    /// The transaction was included but reverted.
    #[error("Transaction {tx_hash} reverted on chain")]
    ChainReverted { tx_hash: String },

    /// Recording the transaction in the ledger failed.
    #[error("{0}")]
    StoreWrite(#[source] StoreError),
}
