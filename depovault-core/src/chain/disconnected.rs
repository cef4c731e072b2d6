use super::{ChainError, ChainGateway, Confirmation, SubmittedOperation, VaultInterface};
use async_trait::async_trait;
use depovault_sdk::objects::EtherAmount;

/// Gateway used when no wallet provider is configured. Every call fails
/// with [`ChainError::NoProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisconnectedGateway;

#[async_trait]
impl ChainGateway for DisconnectedGateway {
    async fn authorized_interface(&self) -> Result<VaultInterface, ChainError> {
        Err(ChainError::NoProvider)
    }

    async fn submit_deposit(&self, _amount: EtherAmount) -> Result<SubmittedOperation, ChainError> {
        Err(ChainError::NoProvider)
    }

    async fn submit_withdraw(
        &self,
        _amount: EtherAmount,
    ) -> Result<SubmittedOperation, ChainError> {
        Err(ChainError::NoProvider)
    }

    async fn query_balance(&self) -> Result<EtherAmount, ChainError> {
        Err(ChainError::NoProvider)
    }

    async fn confirmation_status(
        &self,
        _tx_hash: &str,
    ) -> Result<Option<Confirmation>, ChainError> {
        Err(ChainError::NoProvider)
    }

    async fn wait_for_confirmation(
        &self,
        _operation: &SubmittedOperation,
    ) -> Result<Confirmation, ChainError> {
        Err(ChainError::NoProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::processors::TransactionOrchestrator;
    use crate::state::{AppStateStore, Banner};
    use crate::testing::{EventLog, FakeLedgerStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_deposit_without_provider_fails_before_recording() {
        let store = Arc::new(FakeLedgerStore::new(EventLog::default()));
        let state = AppStateStore::new();
        let orchestrator = TransactionOrchestrator::new(
            Arc::new(DisconnectedGateway),
            store.clone(),
            state.clone(),
        );

        let result = orchestrator.deposit("1").await;

        assert!(matches!(
            result,
            Err(FlowError::ChainSubmission(ChainError::NoProvider))
        ));
        assert!(store.records().is_empty());
        assert_eq!(
            state.snapshot().banner,
            Some(Banner::Error(
                "Transaction failed: no wallet provider available".to_string()
            ))
        );
    }
}
