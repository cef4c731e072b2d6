//! TransactionOrchestrator processor.
//!
//! Drives one deposit or withdrawal from user input to a settled record:
//!
//! 1. Validate the amount (no I/O before this passes)
//! 2. Submit the contract call and take the hash
//! 3. Write a `pending` record (only with a wallet session)
//! 4. Wait for the receipt
//! 5. Settle the record, reload history and balance
//!
//! Every failure becomes a single error banner; nothing is retried. At most
//! one flow runs at a time.

use crate::chain::{ChainGateway, Confirmation, SubmittedOperation};
use crate::entities::{TransactionKind, TransactionStatus};
use crate::error::FlowError;
use crate::processors::HistoryLoader;
use crate::state::{AppStateStore, FlowPhase};
use crate::store::{LedgerStore, StoreError};
use depovault_sdk::objects::EtherAmount;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Result of a flow that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub kind: TransactionKind,
    pub amount: EtherAmount,
    pub tx_hash: String,
    /// Balance after reconciliation, if it could be read.
    pub balance: Option<EtherAmount>,
}

pub struct TransactionOrchestrator {
    gateway: Arc<dyn ChainGateway>,
    store: Arc<dyn LedgerStore>,
    state: AppStateStore,
    history: HistoryLoader,
    admission: Semaphore,
}

impl TransactionOrchestrator {
    pub fn new(
        gateway: Arc<dyn ChainGateway>,
        store: Arc<dyn LedgerStore>,
        state: AppStateStore,
    ) -> Self {
        let history = HistoryLoader::new(Arc::clone(&store), state.clone());
        Self {
            gateway,
            store,
            state,
            history,
            admission: Semaphore::new(1),
        }
    }

    pub fn state(&self) -> &AppStateStore {
        &self.state
    }

    pub fn history_loader(&self) -> HistoryLoader {
        self.history.clone()
    }

    pub async fn deposit(&self, input: &str) -> Result<FlowOutcome, FlowError> {
        self.execute(TransactionKind::Deposit, input).await
    }

    pub async fn withdraw(&self, input: &str) -> Result<FlowOutcome, FlowError> {
        self.execute(TransactionKind::Withdraw, input).await
    }

    /// Read the vault balance into the state. Failures are logged only.
    pub async fn refresh_balance(&self) -> Option<EtherAmount> {
        match self.gateway.query_balance().await {
            Ok(balance) => {
                self.state.set_balance(balance);
                Some(balance)
            }
            Err(e) => {
                warn!(error = %e, "Failed to query vault balance");
                None
            }
        }
    }

    /// Reload history for the connected wallet, if any.
    pub async fn refresh_history(&self) {
        if let Some(wallet) = self.state.wallet() {
            self.history.load(&wallet).await;
        }
    }

    async fn execute(&self, kind: TransactionKind, input: &str) -> Result<FlowOutcome, FlowError> {
        let _permit = self.admission.try_acquire().map_err(|_| {
            warn!(kind = %kind, "Rejected transaction while another is in flight");
            FlowError::Busy
        })?;

        self.state.begin_action();
        let result = self.run_flow(kind, input).await;

        match &result {
            Ok(outcome) => {
                self.state.end_action(FlowPhase::Done);
                let message = match outcome.kind {
                    TransactionKind::Deposit => "Deposit successful",
                    TransactionKind::Withdraw => "Withdrawal successful",
                };
                self.state.show_success(message);
            }
            Err(e) => {
                self.state.end_action(FlowPhase::Failed);
                self.state.show_error(e.to_string());
            }
        }
        result
    }

    async fn run_flow(&self, kind: TransactionKind, input: &str) -> Result<FlowOutcome, FlowError> {
        let amount = EtherAmount::parse_positive(input).map_err(FlowError::InvalidAmount)?;

        self.state.set_phase(FlowPhase::Submitting);
        let submitted = match kind {
            TransactionKind::Deposit => self.gateway.submit_deposit(amount).await,
            TransactionKind::Withdraw => self.gateway.submit_withdraw(amount).await,
        }
        .map_err(FlowError::ChainSubmission)?;

        let wallet = self.state.wallet();

        // the chain call is already out; a failed write is remembered, not fatal
        let mut store_failure: Option<StoreError> = None;
        if let Some(wallet) = &wallet {
            self.state.set_phase(FlowPhase::RecordingPending);
            if let Err(e) = self
                .store
                .insert_pending(wallet, kind, amount, &submitted.tx_hash)
                .await
            {
                error!(
                    tx_hash = %submitted.tx_hash,
                    wallet = %wallet,
                    error = %e,
                    "Failed to record pending transaction after submission"
                );
                store_failure = Some(e);
            }
        }

        self.state.set_phase(FlowPhase::AwaitingConfirmation);
        let confirmation = self
            .gateway
            .wait_for_confirmation(&submitted)
            .await
            .map_err(FlowError::ChainConfirmation)?;

        self.state.set_phase(FlowPhase::Reconciling);
        if let Some(wallet) = &wallet {
            if let Err(e) = self.settle(&submitted, confirmation).await {
                store_failure.get_or_insert(e);
            }
            self.history.load(wallet).await;
        }
        let balance = self.refresh_balance().await;

        if let Some(e) = store_failure {
            return Err(FlowError::StoreWrite(e));
        }
        if confirmation == Confirmation::Reverted {
            return Err(FlowError::ChainReverted {
                tx_hash: submitted.tx_hash,
            });
        }

        info!(
            kind = %kind,
            amount = %amount,
            tx_hash = %submitted.tx_hash,
            "Transaction completed"
        );
        Ok(FlowOutcome {
            kind,
            amount,
            tx_hash: submitted.tx_hash,
            balance,
        })
    }

    async fn settle(
        &self,
        submitted: &SubmittedOperation,
        confirmation: Confirmation,
    ) -> Result<(), StoreError> {
        let status = match confirmation {
            Confirmation::Confirmed => TransactionStatus::Completed,
            Confirmation::Reverted => TransactionStatus::Failed,
        };
        match self.store.mark_status(&submitted.tx_hash, status).await {
            Ok(0) => {
                warn!(
                    tx_hash = %submitted.tx_hash,
                    status = %status,
                    "No pending record to settle; it is missing or already settled"
                );
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    tx_hash = %submitted.tx_hash,
                    status = %status,
                    error = %e,
                    "Failed to settle transaction record"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Banner;
    use crate::testing::{EventLog, FakeChainGateway, FakeLedgerStore};
    use std::time::Duration;

    struct Harness {
        log: EventLog,
        gateway: Arc<FakeChainGateway>,
        store: Arc<FakeLedgerStore>,
        orchestrator: Arc<TransactionOrchestrator>,
    }

    fn harness(wallet: Option<&str>) -> Harness {
        let log = EventLog::default();
        let gateway = Arc::new(FakeChainGateway::new(log.clone()));
        let store = Arc::new(FakeLedgerStore::new(log.clone()));
        let state = AppStateStore::new();
        if let Some(wallet) = wallet {
            state.set_wallet(wallet.to_string());
        }
        let orchestrator = Arc::new(TransactionOrchestrator::new(
            gateway.clone(),
            store.clone(),
            state,
        ));
        Harness {
            log,
            gateway,
            store,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn test_deposit_records_pending_before_confirmation() {
        let h = harness(Some("0xwallet"));

        let outcome = h.orchestrator.deposit("1.5").await.unwrap();

        assert_eq!(outcome.tx_hash, "0xhash1");
        assert_eq!(outcome.amount.to_string(), "1.5");
        assert_eq!(
            h.log.entries(),
            vec![
                "submit_deposit 1.5",
                "insert_pending 0xwallet deposit 1.5 0xhash1",
                "wait 0xhash1",
                "mark 0xhash1 completed",
                "list_by_wallet 0xwallet",
                "query_balance",
            ]
        );

        let state = h.orchestrator.state().snapshot();
        assert_eq!(state.phase, FlowPhase::Done);
        assert!(!state.busy);
        assert_eq!(state.balance.map(|b| b.to_string()).as_deref(), Some("1.5"));
        assert_eq!(
            state.banner,
            Some(Banner::Success("Deposit successful".to_string()))
        );
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn test_balance_reflects_deposits_and_withdrawals() {
        let h = harness(Some("0xwallet"));

        h.orchestrator.deposit("2").await.unwrap();
        let outcome = h.orchestrator.withdraw("0.75").await.unwrap();

        assert_eq!(
            outcome.balance.map(|b| b.to_string()).as_deref(),
            Some("1.25")
        );
        assert_eq!(
            h.orchestrator.state().snapshot().banner,
            Some(Banner::Success("Withdrawal successful".to_string()))
        );
    }

    #[tokio::test]
    async fn test_invalid_amount_makes_no_calls() {
        let h = harness(Some("0xwallet"));

        for input in [
            "0",
            "-3",
            "abc",
            "",
            "0.0000000000000000001",
            "1_5",
            "1_000.5",
            "100000000000",
        ] {
            let result = h.orchestrator.deposit(input).await;
            assert!(
                matches!(result, Err(FlowError::InvalidAmount(_))),
                "input {input:?}"
            );
        }

        assert!(h.log.entries().is_empty());
        let state = h.orchestrator.state().snapshot();
        assert_eq!(state.phase, FlowPhase::Failed);
        assert!(!state.busy);
        assert!(matches!(state.banner, Some(Banner::Error(_))));
    }

    #[tokio::test]
    async fn test_submission_rejected_leaves_no_record() {
        let h = harness(Some("0xwallet"));
        h.gateway.reject_submissions();

        let result = h.orchestrator.withdraw("1").await;

        assert!(matches!(result, Err(FlowError::ChainSubmission(_))));
        assert_eq!(h.log.entries(), vec!["submit_withdraw 1"]);
        assert!(h.store.records().is_empty());
    }

    #[tokio::test]
    async fn test_pending_write_failure_still_reconciles() {
        let h = harness(Some("0xwallet"));
        h.store.fail_inserts();

        let result = h.orchestrator.deposit("1.5").await;

        assert!(
            matches!(result, Err(FlowError::StoreWrite(StoreError::Write(_)))),
            "expected store write error, got {result:?}"
        );
        assert_eq!(
            h.log.entries(),
            vec![
                "submit_deposit 1.5",
                "insert_pending 0xwallet deposit 1.5 0xhash1",
                "wait 0xhash1",
                "mark 0xhash1 completed",
                "list_by_wallet 0xwallet",
                "query_balance",
            ]
        );
        // the on-chain deposit is not undone
        let state = h.orchestrator.state().snapshot();
        assert_eq!(state.balance.map(|b| b.to_string()).as_deref(), Some("1.5"));
        assert_eq!(
            state.banner,
            Some(Banner::Error(
                StoreError::Write(sqlx::Error::PoolTimedOut).to_string()
            ))
        );
        assert!(h.store.records().is_empty());
    }

    #[tokio::test]
    async fn test_without_session_skips_store() {
        let h = harness(None);

        h.orchestrator.deposit("3").await.unwrap();

        assert_eq!(
            h.log.entries(),
            vec!["submit_deposit 3", "wait 0xhash1", "query_balance"]
        );
    }

    #[tokio::test]
    async fn test_reverted_transaction_marks_record_failed() {
        let h = harness(Some("0xwallet"));
        h.gateway.revert_next();

        let result = h.orchestrator.withdraw("1").await;

        assert!(matches!(result, Err(FlowError::ChainReverted { .. })));
        let records = h.store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn test_confirmation_error_leaves_record_pending() {
        let h = harness(Some("0xwallet"));
        h.gateway.fail_confirmations();

        let result = h.orchestrator.deposit("1").await;

        assert!(matches!(result, Err(FlowError::ChainConfirmation(_))));
        let records = h.store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_second_flow_is_rejected_while_busy() {
        let h = harness(Some("0xwallet"));
        let gate = h.gateway.hold_confirmations();

        let first = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.deposit("1").await })
        };
        while h.orchestrator.state().snapshot().phase != FlowPhase::AwaitingConfirmation {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let second = h.orchestrator.withdraw("1").await;
        assert!(matches!(second, Err(FlowError::Busy)));
        assert!(h.orchestrator.state().snapshot().busy);

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(!h.orchestrator.state().snapshot().busy);

        // admission is released afterwards
        gate.notify_one();
        h.orchestrator.withdraw("1").await.unwrap();
    }
}
