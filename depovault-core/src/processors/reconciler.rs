//! PendingReconciler processor.
//!
//! The PendingReconciler is responsible for:
//! - Listing the connected wallet's records still in `pending`
//! - Checking each one's receipt once
//! - Settling included transactions (`completed`, or `failed` on revert)
//! - Reloading history when anything changed
//!
//! It covers records left behind when a confirmation wait never finished
//! (reload, crash, provider error). It never creates records.

use crate::chain::{ChainGateway, Confirmation};
use crate::entities::TransactionStatus;
use crate::processors::HistoryLoader;
use crate::state::AppStateStore;
use crate::store::{LedgerStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Counts from a single sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: u32,
    pub completed: u32,
    pub failed: u32,
}

pub struct PendingReconciler {
    gateway: Arc<dyn ChainGateway>,
    store: Arc<dyn LedgerStore>,
    state: AppStateStore,
    history: HistoryLoader,
    interval: Duration,
}

impl PendingReconciler {
    pub fn new(
        gateway: Arc<dyn ChainGateway>,
        store: Arc<dyn LedgerStore>,
        state: AppStateStore,
        interval: Duration,
    ) -> Self {
        let history = HistoryLoader::new(Arc::clone(&store), state.clone());
        Self {
            gateway,
            store,
            state,
            history,
            interval,
        }
    }

    /// Run sweeps on the configured interval until shutdown.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(interval = ?self.interval, "PendingReconciler started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("PendingReconciler received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    match self.sweep_once().await {
                        Ok(report) if report.checked > 0 => {
                            debug!(
                                checked = report.checked,
                                completed = report.completed,
                                failed = report.failed,
                                "Pending sweep finished"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Pending sweep failed"),
                    }
                }
            }
        }

        info!("PendingReconciler shutdown complete");
    }

    /// Check every pending record of the connected wallet once.
    pub async fn sweep_once(&self) -> Result<SweepReport, StoreError> {
        let mut report = SweepReport::default();
        let Some(wallet) = self.state.wallet() else {
            return Ok(report);
        };

        let pending = self.store.list_pending(&wallet).await?;
        for record in pending.into_iter().filter(|r| !r.status.is_final()) {
            report.checked += 1;

            let confirmation = match self.gateway.confirmation_status(&record.tx_hash).await {
                Ok(Some(confirmation)) => confirmation,
                Ok(None) => continue,
                Err(e) => {
                    warn!(tx_hash = %record.tx_hash, error = %e, "Failed to fetch receipt");
                    continue;
                }
            };

            let status = match confirmation {
                Confirmation::Confirmed => TransactionStatus::Completed,
                Confirmation::Reverted => TransactionStatus::Failed,
            };
            match self.store.mark_status(&record.tx_hash, status).await {
                Ok(0) => {}
                Ok(_) => {
                    info!(
                        tx_hash = %record.tx_hash,
                        status = %status,
                        "Settled pending transaction"
                    );
                    match status {
                        TransactionStatus::Failed => report.failed += 1,
                        _ => report.completed += 1,
                    }
                }
                Err(e) => {
                    warn!(
                        tx_hash = %record.tx_hash,
                        error = %e,
                        "Failed to settle pending transaction"
                    );
                }
            }
        }

        if report.completed + report.failed > 0 {
            self.history.load(&wallet).await;
        }
        Ok(report)
    }
}
