use crate::entities::transaction_record::{HISTORY_LIMIT, TransactionRecord};
use crate::state::AppStateStore;
use crate::store::LedgerStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort loader for a wallet's transaction history.
///
/// Read failures are logged and otherwise ignored; the previous history
/// stays on screen.
#[derive(Clone)]
pub struct HistoryLoader {
    store: Arc<dyn LedgerStore>,
    state: AppStateStore,
}

impl HistoryLoader {
    pub fn new(store: Arc<dyn LedgerStore>, state: AppStateStore) -> Self {
        Self { store, state }
    }

    pub async fn load(&self, wallet_address: &str) {
        match self.store.list_by_wallet(wallet_address).await {
            Ok(records) => {
                let records = newest_first(records);
                debug!(
                    wallet = %wallet_address,
                    records = records.len(),
                    "Transaction history loaded"
                );
                self.state.set_history(records);
            }
            Err(e) => {
                warn!(wallet = %wallet_address, error = %e, "Failed to load transaction history");
            }
        }
    }
}

/// Newest first by `(created_at, id)`, at most [`HISTORY_LIMIT`] entries.
fn newest_first(mut records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    records.truncate(HISTORY_LIMIT as usize);
    records
}
