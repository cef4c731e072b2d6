//! Application state shared with the presentation layer.
//!
//! [`AppState`] is owned by an [`AppStateStore`] and only changes through
//! the store's transition methods. Renderers subscribe to a `watch`
//! channel and redraw whenever a new snapshot is published.

use crate::entities::transaction_record::TransactionRecord;
use depovault_sdk::objects::EtherAmount;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// How long a success banner stays up.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(3);

/// Transient message shown to the user. Success and error are exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

/// Phase of the current deposit/withdraw flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    RecordingPending,
    AwaitingConfirmation,
    Reconciling,
    Done,
    Failed,
}

impl std::fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowPhase::Idle => "idle",
            FlowPhase::Validating => "validating",
            FlowPhase::Submitting => "submitting",
            FlowPhase::RecordingPending => "recording pending",
            FlowPhase::AwaitingConfirmation => "awaiting confirmation",
            FlowPhase::Reconciling => "reconciling",
            FlowPhase::Done => "done",
            FlowPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub wallet: Option<String>,
    pub balance: Option<EtherAmount>,
    pub history: Vec<TransactionRecord>,
    pub banner: Option<Banner>,
    pub phase: FlowPhase,
    pub busy: bool,
}

/// Single-writer owner of [`AppState`].
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct AppStateStore {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    state_tx: watch::Sender<AppState>,
    // bumped on every banner change so a stale auto-clear never wipes a newer banner
    banner_seq: AtomicU64,
    success_ttl: Duration,
}

impl Default for AppStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStateStore {
    pub fn new() -> Self {
        Self::with_success_ttl(SUCCESS_BANNER_TTL)
    }

    pub fn with_success_ttl(success_ttl: Duration) -> Self {
        let (state_tx, _) = watch::channel(AppState::default());
        Self {
            inner: Arc::new(AppStateInner {
                state_tx,
                banner_seq: AtomicU64::new(0),
                success_ttl,
            }),
        }
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state_tx.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn wallet(&self) -> Option<String> {
        self.inner.state_tx.borrow().wallet.clone()
    }

    pub fn set_wallet(&self, address: String) {
        self.inner.state_tx.send_modify(|state| state.wallet = Some(address));
    }

    pub fn set_balance(&self, balance: EtherAmount) {
        self.inner
            .state_tx
            .send_modify(|state| state.balance = Some(balance));
    }

    pub fn set_history(&self, history: Vec<TransactionRecord>) {
        self.inner.state_tx.send_modify(|state| state.history = history);
    }

    pub fn set_phase(&self, phase: FlowPhase) {
        self.inner.state_tx.send_if_modified(|state| {
            let changed = state.phase != phase;
            state.phase = phase;
            changed
        });
    }

    /// Enter a new action: busy, validating, previous banner gone.
    pub fn begin_action(&self) {
        self.inner.banner_seq.fetch_add(1, Ordering::SeqCst);
        self.inner.state_tx.send_modify(|state| {
            state.busy = true;
            state.phase = FlowPhase::Validating;
            state.banner = None;
        });
    }

    /// Leave the current action in its terminal phase.
    pub fn end_action(&self, phase: FlowPhase) {
        self.inner.state_tx.send_modify(|state| {
            state.busy = false;
            state.phase = phase;
        });
    }

    /// Show an error banner. It stays until the next action or banner.
    pub fn show_error(&self, message: impl Into<String>) {
        self.inner.banner_seq.fetch_add(1, Ordering::SeqCst);
        let banner = Banner::Error(message.into());
        self.inner
            .state_tx
            .send_modify(|state| state.banner = Some(banner));
    }

    /// Show a success banner and schedule it to clear itself.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show_success(&self, message: impl Into<String>) {
        let seq = self.inner.banner_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let banner = Banner::Success(message.into());
        self.inner
            .state_tx
            .send_modify(|state| state.banner = Some(banner));

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.success_ttl).await;
            if inner.banner_seq.load(Ordering::SeqCst) == seq {
                inner.state_tx.send_if_modified(|state| {
                    if matches!(state.banner, Some(Banner::Success(_))) {
                        state.banner = None;
                        true
                    } else {
                        false
                    }
                });
            }
        });
    }
}
