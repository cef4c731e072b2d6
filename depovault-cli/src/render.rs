//! Terminal presentation of [`AppState`].
//!
//! The renderer subscribes to the state channel and prints only what changed
//! since the previous snapshot.

use depovault_core::entities::transaction_record::TransactionRecord;
use depovault_core::state::{AppState, Banner, FlowPhase};
use depovault_sdk::objects::{EtherAmount, TransactionView};
use std::sync::Arc;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

/// Handle to the background rendering task.
pub struct Renderer {
    handle: JoinHandle<()>,
    stop: Arc<Notify>,
}

impl Renderer {
    pub fn spawn(state_rx: watch::Receiver<AppState>) -> Self {
        let stop = Arc::new(Notify::new());
        let handle = tokio::spawn(render_loop(state_rx, stop.clone()));
        Self { handle, stop }
    }

    /// Draw the latest snapshot and stop.
    pub async fn finish(self) {
        self.stop.notify_one();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Renderer task ended abnormally");
        }
    }
}

async fn render_loop(mut state_rx: watch::Receiver<AppState>, stop: Arc<Notify>) {
    let mut frame = Frame::default();
    frame.draw(&state_rx.borrow_and_update());

    loop {
        tokio::select! {
            biased;

            _ = stop.notified() => {
                frame.draw(&state_rx.borrow_and_update());
                break;
            }

            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                frame.draw(&state_rx.borrow_and_update());
            }
        }
    }
}

/// Last values printed to the terminal.
#[derive(Debug, Default)]
struct Frame {
    wallet: Option<String>,
    balance: Option<EtherAmount>,
    phase: FlowPhase,
    banner: Option<Banner>,
}

impl Frame {
    fn draw(&mut self, state: &AppState) {
        for line in self.diff(state) {
            println!("{line}");
        }
    }

    fn diff(&mut self, state: &AppState) -> Vec<String> {
        let mut lines = Vec::new();

        if state.wallet != self.wallet {
            if let Some(wallet) = &state.wallet {
                lines.push(format!("Connected: {wallet}"));
            }
            self.wallet = state.wallet.clone();
        }

        if state.phase != self.phase {
            if !matches!(state.phase, FlowPhase::Idle | FlowPhase::Done | FlowPhase::Failed) {
                lines.push(format!("... {}", state.phase));
            }
            self.phase = state.phase;
        }

        if state.balance != self.balance {
            if let Some(balance) = state.balance {
                lines.push(format!("Vault balance: {balance} ETH"));
            }
            self.balance = state.balance;
        }

        if state.banner != self.banner {
            match &state.banner {
                Some(Banner::Success(message)) => lines.push(format!("[ok] {message}")),
                Some(Banner::Error(message)) => lines.push(format!("[error] {message}")),
                None => {}
            }
            self.banner = state.banner.clone();
        }

        lines
    }
}

/// Print history rows, newest first, as a table or as JSON.
pub fn print_history(records: &[TransactionRecord], json: bool) -> Result<(), serde_json::Error> {
    let views: Vec<TransactionView> = records.iter().map(TransactionView::from).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    for view in views {
        println!(
            "{}  {:<8}  {:>24}  {:<9}  {}",
            view.created_at,
            view.kind.to_string(),
            view.amount.to_string(),
            view.status.to_string(),
            view.tx_hash
        );
    }
    Ok(())
}
