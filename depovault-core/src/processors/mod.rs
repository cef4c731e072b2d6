//! Processors that drive the vault front-end.
//!
//! - `TransactionOrchestrator`: runs a deposit or withdrawal end to end
//! - `PendingReconciler`: settles records whose confirmation was never observed
//! - `HistoryLoader`: best-effort history refresh shared by both and the wallet session

pub mod history;
pub mod orchestrator;
pub mod reconciler;

pub use history::HistoryLoader;
pub use orchestrator::{FlowOutcome, TransactionOrchestrator};
pub use reconciler::{PendingReconciler, SweepReport};
