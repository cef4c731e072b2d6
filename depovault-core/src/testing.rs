//! In-memory stand-ins for the store, chain and wallet provider.

use crate::chain::{ChainError, ChainGateway, Confirmation, SubmittedOperation, VaultInterface};
use crate::entities::transaction_record::{HISTORY_LIMIT, TransactionRecord};
use crate::entities::{TransactionKind, TransactionStatus};
use crate::store::{LedgerStore, StoreError};
use crate::wallet::WalletProvider;
use async_trait::async_trait;
use depovault_sdk::client::ClientError;
use depovault_sdk::objects::EtherAmount;
use depovault_sdk::objects::contract::AbiError;
use depovault_sdk::objects::rpc::{RpcErrorObject, USER_REJECTED_CODE};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Ordered record of calls made against the fakes.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn timestamp(id: i64) -> time::PrimitiveDateTime {
    let date = time::Date::from_calendar_date(2025, time::Month::January, 1).unwrap();
    time::PrimitiveDateTime::new(date, time::Time::MIDNIGHT) + time::Duration::seconds(id)
}

pub struct FakeLedgerStore {
    log: EventLog,
    records: Mutex<Vec<TransactionRecord>>,
    next_id: AtomicI64,
    fail_inserts: AtomicBool,
    raw_listing: AtomicBool,
}

impl FakeLedgerStore {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_inserts: AtomicBool::new(false),
            raw_listing: AtomicBool::new(false),
        }
    }

    /// Add `count` completed deposits for `wallet` without logging.
    pub fn seed(&self, wallet: &str, count: usize) {
        for _ in 0..count {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.records.lock().unwrap().push(TransactionRecord {
                id,
                wallet_address: wallet.to_string(),
                kind: TransactionKind::Deposit,
                amount: Decimal::ONE,
                tx_hash: format!("0xseed{id}"),
                status: TransactionStatus::Completed,
                created_at: timestamp(id),
            });
        }
    }

    pub fn records(&self) -> Vec<TransactionRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    /// Return every matching record in insertion order from `list_by_wallet`.
    pub fn raw_listing(&self) {
        self.raw_listing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerStore for FakeLedgerStore {
    async fn insert_pending(
        &self,
        wallet_address: &str,
        kind: TransactionKind,
        amount: EtherAmount,
        tx_hash: &str,
    ) -> Result<TransactionRecord, StoreError> {
        self.log.push(format!(
            "insert_pending {wallet_address} {kind} {amount} {tx_hash}"
        ));
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Write(sqlx::Error::PoolTimedOut));
        }
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.tx_hash == tx_hash) {
            return Err(StoreError::Write(sqlx::Error::Protocol(
                "duplicate tx_hash".to_string(),
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = TransactionRecord {
            id,
            wallet_address: wallet_address.to_string(),
            kind,
            amount: amount.as_decimal(),
            tx_hash: tx_hash.to_string(),
            status: TransactionStatus::Pending,
            created_at: timestamp(id),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn mark_status(
        &self,
        tx_hash: &str,
        status: TransactionStatus,
    ) -> Result<u64, StoreError> {
        self.log.push(format!("mark {tx_hash} {status}"));
        let mut records = self.records.lock().unwrap();
        let mut changed = 0;
        for record in records
            .iter_mut()
            .filter(|r| r.tx_hash == tx_hash && !r.status.is_final())
        {
            record.status = status;
            changed += 1;
        }
        Ok(changed)
    }

    async fn list_by_wallet(
        &self,
        wallet_address: &str,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        self.log.push(format!("list_by_wallet {wallet_address}"));
        let mut records: Vec<_> = self
            .records()
            .into_iter()
            .filter(|r| r.wallet_address == wallet_address)
            .collect();
        if !self.raw_listing.load(Ordering::SeqCst) {
            records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            records.truncate(HISTORY_LIMIT as usize);
        }
        Ok(records)
    }

    async fn list_pending(
        &self,
        wallet_address: &str,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        self.log.push(format!("list_pending {wallet_address}"));
        Ok(self
            .records()
            .into_iter()
            .filter(|r| {
                r.wallet_address == wallet_address && r.status == TransactionStatus::Pending
            })
            .collect())
    }
}

pub struct FakeChainGateway {
    log: EventLog,
    next_hash: AtomicU64,
    balance: Mutex<Decimal>,
    submitted: Mutex<HashMap<String, (TransactionKind, EtherAmount)>>,
    receipts: Mutex<HashMap<String, Confirmation>>,
    reject_submissions: AtomicBool,
    revert_next: AtomicBool,
    fail_confirmations: AtomicBool,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeChainGateway {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            next_hash: AtomicU64::new(1),
            balance: Mutex::new(Decimal::ZERO),
            submitted: Mutex::new(HashMap::new()),
            receipts: Mutex::new(HashMap::new()),
            reject_submissions: AtomicBool::new(false),
            revert_next: AtomicBool::new(false),
            fail_confirmations: AtomicBool::new(false),
            gate: Mutex::new(None),
        }
    }

    pub fn reject_submissions(&self) {
        self.reject_submissions.store(true, Ordering::SeqCst);
    }

    pub fn revert_next(&self) {
        self.revert_next.store(true, Ordering::SeqCst);
    }

    pub fn fail_confirmations(&self) {
        self.fail_confirmations.store(true, Ordering::SeqCst);
    }

    /// Make confirmation waits block until the returned gate is notified.
    pub fn hold_confirmations(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn set_receipt(&self, tx_hash: &str, confirmation: Confirmation) {
        self.receipts
            .lock()
            .unwrap()
            .insert(tx_hash.to_string(), confirmation);
    }

    fn submit(
        &self,
        kind: TransactionKind,
        amount: EtherAmount,
    ) -> Result<SubmittedOperation, ChainError> {
        self.log.push(format!("submit_{kind} {amount}"));
        if self.reject_submissions.load(Ordering::SeqCst) {
            return Err(ChainError::Rejected(RpcErrorObject {
                code: -32000,
                message: "execution reverted".to_string(),
                data: None,
            }));
        }
        let tx_hash = format!("0xhash{}", self.next_hash.fetch_add(1, Ordering::SeqCst));
        self.submitted
            .lock()
            .unwrap()
            .insert(tx_hash.clone(), (kind, amount));
        Ok(SubmittedOperation { tx_hash })
    }
}

#[async_trait]
impl ChainGateway for FakeChainGateway {
    async fn authorized_interface(&self) -> Result<VaultInterface, ChainError> {
        Ok(VaultInterface {
            signer: "0xwallet".to_string(),
            contract: "0xvault".to_string(),
        })
    }

    async fn submit_deposit(&self, amount: EtherAmount) -> Result<SubmittedOperation, ChainError> {
        self.submit(TransactionKind::Deposit, amount)
    }

    async fn submit_withdraw(
        &self,
        amount: EtherAmount,
    ) -> Result<SubmittedOperation, ChainError> {
        self.submit(TransactionKind::Withdraw, amount)
    }

    async fn query_balance(&self) -> Result<EtherAmount, ChainError> {
        self.log.push("query_balance".to_string());
        let balance = *self.balance.lock().unwrap();
        Ok(EtherAmount::from_decimal(balance)?)
    }

    async fn confirmation_status(
        &self,
        tx_hash: &str,
    ) -> Result<Option<Confirmation>, ChainError> {
        self.log.push(format!("receipt {tx_hash}"));
        Ok(self.receipts.lock().unwrap().get(tx_hash).copied())
    }

    async fn wait_for_confirmation(
        &self,
        operation: &SubmittedOperation,
    ) -> Result<Confirmation, ChainError> {
        self.log.push(format!("wait {}", operation.tx_hash));
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_confirmations.load(Ordering::SeqCst) {
            return Err(ChainError::Decode(AbiError::WrongLength(0)));
        }
        if self.revert_next.swap(false, Ordering::SeqCst) {
            return Ok(Confirmation::Reverted);
        }
        let submitted = self
            .submitted
            .lock()
            .unwrap()
            .get(&operation.tx_hash)
            .copied();
        if let Some((kind, amount)) = submitted {
            let mut balance = self.balance.lock().unwrap();
            match kind {
                TransactionKind::Deposit => *balance += amount.as_decimal(),
                TransactionKind::Withdraw => *balance -= amount.as_decimal(),
            }
        }
        Ok(Confirmation::Confirmed)
    }
}

pub struct FakeWalletProvider {
    authorized: Vec<String>,
    on_request: Result<Vec<String>, i64>,
}

impl FakeWalletProvider {
    /// Accounts already authorized; a connect request returns the same list.
    pub fn authorized(accounts: &[&str]) -> Self {
        let accounts: Vec<String> = accounts.iter().map(|a| a.to_string()).collect();
        Self {
            authorized: accounts.clone(),
            on_request: Ok(accounts),
        }
    }

    /// Nothing authorized yet; a connect request grants `account`.
    pub fn granting(account: &str) -> Self {
        Self {
            authorized: Vec::new(),
            on_request: Ok(vec![account.to_string()]),
        }
    }

    /// Every connect request is declined by the user.
    pub fn rejecting() -> Self {
        Self {
            authorized: Vec::new(),
            on_request: Err(USER_REJECTED_CODE),
        }
    }
}

#[async_trait]
impl WalletProvider for FakeWalletProvider {
    async fn accounts(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.authorized.clone())
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ClientError> {
        match &self.on_request {
            Ok(accounts) => Ok(accounts.clone()),
            Err(code) => Err(ClientError::Rpc(RpcErrorObject {
                code: *code,
                message: "User rejected the request.".to_string(),
                data: None,
            })),
        }
    }
}
