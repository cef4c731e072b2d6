use super::{ChainError, ChainGateway, Confirmation, SubmittedOperation, VaultInterface};
use crate::config::ChainConfig;
use async_trait::async_trait;
use depovault_sdk::client::RpcClient;
use depovault_sdk::objects::EtherAmount;
use depovault_sdk::objects::contract::{
    VaultCall, decode_quantity, decode_uint256_word, encode_quantity,
};
use depovault_sdk::objects::rpc::{CallRequest, TransactionRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// [`ChainGateway`] over a wallet provider's JSON-RPC endpoint.
pub struct RpcChainGateway {
    client: Arc<RpcClient>,
    contract_address: String,
    poll_interval: Duration,
}

impl RpcChainGateway {
    pub fn new(client: Arc<RpcClient>, config: &ChainConfig) -> Self {
        Self {
            client,
            contract_address: config.contract_address.clone(),
            poll_interval: config.confirmation_poll_interval,
        }
    }

    async fn submit(
        &self,
        call: VaultCall,
        value: Option<u128>,
    ) -> Result<SubmittedOperation, ChainError> {
        let vault = self.authorized_interface().await?;
        let tx = TransactionRequest {
            from: vault.signer,
            to: vault.contract,
            value: value.map(encode_quantity),
            data: call.encode(),
        };
        let tx_hash = self.client.send_transaction(&tx).await?;
        info!(tx_hash = %tx_hash, call = ?call, "Transaction submitted");
        Ok(SubmittedOperation { tx_hash })
    }
}

#[async_trait]
impl ChainGateway for RpcChainGateway {
    async fn authorized_interface(&self) -> Result<VaultInterface, ChainError> {
        let accounts = self.client.accounts().await?;
        let signer = accounts.into_iter().next().ok_or(ChainError::NoSigner)?;
        Ok(VaultInterface {
            signer,
            contract: self.contract_address.clone(),
        })
    }

    async fn submit_deposit(&self, amount: EtherAmount) -> Result<SubmittedOperation, ChainError> {
        let units = amount.to_base_units()?;
        self.submit(VaultCall::Deposit, Some(units)).await
    }

    async fn submit_withdraw(
        &self,
        amount: EtherAmount,
    ) -> Result<SubmittedOperation, ChainError> {
        let units = amount.to_base_units()?;
        self.submit(VaultCall::Withdraw { amount: units }, None).await
    }

    async fn query_balance(&self) -> Result<EtherAmount, ChainError> {
        let vault = self.authorized_interface().await?;
        let call = CallRequest {
            from: vault.signer,
            to: vault.contract,
            data: VaultCall::GetBalance.encode(),
        };
        let word = self.client.call(&call).await?;
        let units = decode_uint256_word(&word)?;
        Ok(EtherAmount::from_base_units(units)?)
    }

    async fn confirmation_status(
        &self,
        tx_hash: &str,
    ) -> Result<Option<Confirmation>, ChainError> {
        let Some(receipt) = self.client.transaction_receipt(tx_hash).await? else {
            return Ok(None);
        };
        let block = receipt
            .block_number
            .as_deref()
            .and_then(|block| decode_quantity(block).ok());
        debug!(tx_hash = %tx_hash, block = ?block, status = ?receipt.status, "Receipt found");

        Ok(Some(if receipt.succeeded() {
            Confirmation::Confirmed
        } else {
            Confirmation::Reverted
        }))
    }

    async fn wait_for_confirmation(
        &self,
        operation: &SubmittedOperation,
    ) -> Result<Confirmation, ChainError> {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Some(confirmation) = self.confirmation_status(&operation.tx_hash).await? {
                info!(
                    tx_hash = %operation.tx_hash,
                    confirmation = ?confirmation,
                    "Transaction included"
                );
                return Ok(confirmation);
            }
            debug!(tx_hash = %operation.tx_hash, "Receipt not available yet");
        }
    }
}
