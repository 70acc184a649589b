//! Submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Broadcast a signed transaction exactly once
//! - Poll its pending state on a fixed interval within a bounded window
//! - Classify the receipt and dump its logs for the operator
//!
//! # Design Decisions
//! - No resubmission: a stale nonce would duplicate or be rejected
//! - Transient poll errors are logged and retried on the next tick
//! - An elapsed window is `TimedOutUnknown`, not an error
//! - Clock is injected so tests control the tick count

use std::time::Duration;

use alloy::primitives::TxHash;
use async_trait::async_trait;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ReceiptSummary, SubmissionOutcome, TxStatus,
};

/// Source of the delay between poll ticks.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Poll interval and total window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub window: Duration,
}

impl PollSchedule {
    /// Number of status checks the window allows.
    pub fn max_ticks(&self) -> u32 {
        if self.interval.is_zero() {
            return 1;
        }
        let ticks = self.window.as_nanos() / self.interval.as_nanos();
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            window: Duration::from_secs(30),
        }
    }
}

/// Sends signed transactions and waits for them to leave the pending state.
pub struct Confirmer<'a> {
    rpc: &'a dyn ChainRpc,
    clock: &'a dyn Clock,
    schedule: PollSchedule,
}

impl<'a> Confirmer<'a> {
    pub fn new(rpc: &'a dyn ChainRpc, clock: &'a dyn Clock, schedule: PollSchedule) -> Self {
        Self {
            rpc,
            clock,
            schedule,
        }
    }

    /// Broadcast `signed` and wait for its outcome.
    pub async fn submit(&self, signed: SignedTransaction) -> BlockchainResult<SubmissionOutcome> {
        let tx_hash = self
            .rpc
            .send_raw_transaction(signed.raw.clone())
            .await
            .map_err(|e| BlockchainError::Submit {
                from: signed.from,
                nonce: signed.nonce,
                reason: e.to_string(),
            })?;
        if tx_hash != signed.hash {
            tracing::warn!(
                expected = %signed.hash,
                reported = %tx_hash,
                "Node reported a different transaction hash"
            );
        }
        tracing::info!(tx_hash = %tx_hash, from = %signed.from, nonce = signed.nonce, "Transaction sent");

        let (status, receipt) = self.wait_for_confirmation(tx_hash).await;
        let contract_address = match &receipt {
            Some(r) => r.contract_address.or_else(|| signed.create_address()),
            None => signed.create_address(),
        };

        Ok(SubmissionOutcome {
            tx_hash,
            status,
            from: signed.from,
            nonce: signed.nonce,
            contract_address,
        })
    }

    /// Poll until `tx_hash` is no longer pending or the window closes.
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> (TxStatus, Option<ReceiptSummary>) {
        let max_ticks = self.schedule.max_ticks();

        for tick in 1..=max_ticks {
            self.clock.sleep(self.schedule.interval).await;

            match self.rpc.is_pending(tx_hash).await {
                Ok(false) => return self.classify(tx_hash).await,
                Ok(true) => {
                    tracing::debug!(tx_hash = %tx_hash, tick, "Transaction pending");
                }
                Err(e) => {
                    tracing::debug!(tx_hash = %tx_hash, tick, error = %e, "Transaction status query failed");
                }
            }
        }

        tracing::warn!(
            tx_hash = %tx_hash,
            window_secs = self.schedule.window.as_secs(),
            "check your transaction {} on explorer, make sure it's confirmed.",
            tx_hash
        );
        (TxStatus::TimedOutUnknown, None)
    }

    async fn classify(&self, tx_hash: TxHash) -> (TxStatus, Option<ReceiptSummary>) {
        let receipt = match self.rpc.receipt(tx_hash).await {
            Ok(Some(receipt)) => receipt,
            Ok(None) => {
                tracing::error!(tx_hash = %tx_hash, "Receipt not found for mined transaction");
                return (TxStatus::TimedOutUnknown, None);
            }
            Err(e) => {
                tracing::error!(tx_hash = %tx_hash, error = %e, "Failed to get receipt");
                return (TxStatus::TimedOutUnknown, None);
            }
        };

        dump_receipt(&receipt);

        let status = match (receipt.success, receipt.block_number) {
            (true, Some(block_number)) => TxStatus::Confirmed { block_number },
            (true, None) => {
                tracing::warn!(tx_hash = %tx_hash, "Successful receipt without block number");
                TxStatus::TimedOutUnknown
            }
            (false, block_number) => {
                tracing::error!(tx_hash = %tx_hash, "receipt failed");
                TxStatus::FailedOnChain { block_number }
            }
        };
        if let TxStatus::Confirmed { block_number } = status {
            tracing::info!(tx_hash = %tx_hash, block_number, "Transaction confirmed");
        }
        (status, Some(receipt))
    }
}

fn dump_receipt(receipt: &ReceiptSummary) {
    tracing::info!(
        tx_hash = %receipt.tx_hash,
        block_number = ?receipt.block_number,
        success = receipt.success,
        "Receipt"
    );
    for log in &receipt.logs {
        tracing::info!(address = %log.address, data = %log.data, "eventlog");
        for (i, topic) in log.topics.iter().enumerate() {
            tracing::info!(index = i, topic = %topic, "eventlog topic");
        }
    }
}
