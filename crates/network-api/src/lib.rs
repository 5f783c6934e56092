//! Trait surface the gossip network and handler crate is written against.
//!
//! Every trait here is `dyn`-safe and `Send + Sync` so a node binary can
//! store concrete implementations behind `Arc<dyn Trait>`, the same shape
//! `reth-network-api` exposes for its handle traits, without this crate
//! depending on any concrete mempool, EVM pool, or transport crate.

use async_trait::async_trait;
use auto_impl::auto_impl;
use bytes::Bytes;
use cchain_primitives::{AtomicTx, EthTxHash, TxId};
use thiserror::Error;

/// Fire-and-forget outbound transport primitive. `send_app_gossip` queues
/// `bytes` for delivery and never blocks on network I/O.
#[async_trait]
#[auto_impl(&, Arc)]
pub trait AppSender: Send + Sync {
    /// Queues `bytes` for gossip to the peer set. Errors are the
    /// transport's terminal errors (e.g. shutdown in progress).
    async fn send_app_gossip(&self, bytes: Bytes) -> Result<(), TransportError>;
}

/// Transport-level error surfaced by [`AppSender`]; propagated upward by
/// the outbound gossip path, never swallowed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The transport is shutting down and cannot accept further sends.
    #[error("transport is shutting down")]
    ShuttingDown,
    /// An implementation-defined transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// The atomic-transaction mempool's issuance surface, as consumed by the
/// gossip handler. Fee-ordering and eviction are the mempool's own concern
/// and are not modeled here.
#[auto_impl(&, Arc)]
pub trait Mempool: Send + Sync {
    /// Returns whether `id` is already known to the mempool (accepted,
    /// pending, or marked dropped) — used to avoid redundant re-issuance
    /// of a transaction a peer re-sends.
    fn contains(&self, id: TxId) -> bool;

    /// Submits `tx` on the standard issuance path. `local` distinguishes a
    /// locally-built transaction (whose validation errors must surface to
    /// the submitter) from a remote one (whose errors are logged and
    /// swallowed by the caller).
    fn issue_tx(&self, tx: AtomicTx, local: bool) -> Result<(), MempoolError>;
}

/// Errors raised by [`Mempool::issue_tx`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MempoolError {
    /// The transaction failed verification.
    #[error("transaction rejected: {0}")]
    Rejected(String),
    /// The mempool is full and cannot accept more pending transactions.
    #[error("mempool full")]
    Full,
}

/// A still-undecoded Ethereum transaction plus the metadata the gossip
/// layer needs to filter and batch it, without decoding its fields
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledEthTx {
    /// Stand-in identity for the transaction, used for recent-set
    /// dedup. The EVM pool owns the real transaction-hash definition;
    /// this layer only needs a stable identifier.
    pub hash: EthTxHash,
    /// The transaction's own RLP encoding, passed through unmodified.
    pub rlp: Bytes,
}

impl PooledEthTx {
    /// Size used for soft-cap batching (`common.StorageSize` in the
    /// reference implementation): the encoded transaction's byte length.
    pub fn size(&self) -> usize {
        self.rlp.len()
    }
}

/// Pool-membership status used to filter which locally-known transactions
/// are worth re-gossiping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthTxStatus {
    /// Not known to the pool.
    Unknown,
    /// Known but not yet executable (e.g. nonce gap).
    Queued,
    /// Known and executable.
    Pending,
}

/// The EVM transaction pool's surface as consumed by the gossip layer:
/// forwarding remote transactions in, and querying pending status for
/// outbound filtering. Fee-ordering and eviction are the pool's own
/// concern.
#[auto_impl(&, Arc)]
pub trait EthTxPool: Send + Sync {
    /// Current status of `hash` in the pool.
    fn status(&self, hash: EthTxHash) -> EthTxStatus;

    /// Forwards decoded-but-unverified remote transactions into the pool.
    /// Returns one result per input transaction, in order; individual
    /// failures are logged at debug by the caller and never fail the
    /// whole call.
    fn add_remotes(&self, txs: Vec<PooledEthTx>) -> Vec<Result<(), EthPoolError>>;
}

/// Per-transaction failure reported by [`EthTxPool::add_remotes`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EthPoolError {
    /// The pool rejected the transaction (e.g. underpriced, already
    /// known, invalid signature).
    #[error("transaction rejected: {0}")]
    Rejected(String),
}
