use async_trait::async_trait;
use auto_impl::auto_impl;
use bytes::Bytes;
use cchain_net_common::RecentSet;
use cchain_network_api::{AppSender, EthTxPool, EthTxStatus, Mempool, PooledEthTx, TransportError};
use cchain_primitives::{AtomicTx, EthTxHash, NodeId, TxId};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::GossipConfig;
use crate::handler::GossipHandler;

/// Outbound and inbound entry points a node binary drives the gossip layer
/// through. `dyn`-safe so a caller can hold `Arc<dyn NetworkHandle>` without
/// naming the concrete mempool/pool/transport types.
#[async_trait]
#[auto_impl(&, Arc)]
pub trait NetworkHandle: Send + Sync {
    /// Gossips a single atomic transaction to the peer set, unless it was
    /// gossiped recently or gossip is not yet active.
    async fn gossip_atomic_tx(&self, tx: AtomicTx) -> Result<(), TransportError>;

    /// Gossips the subset of `candidates` that are pending in the EVM pool
    /// and were not gossiped recently, batched under the configured soft
    /// cap, unless gossip is not yet active.
    async fn gossip_eth_txs(&self, candidates: Vec<PooledEthTx>) -> Result<(), TransportError>;

    /// Dispatches a raw inbound `AppGossip` payload to the appropriate
    /// handler based on its wire tag. Unknown tags and malformed envelopes
    /// are logged and dropped; this method itself never fails.
    fn app_gossip(&self, node_id: NodeId, bytes: Bytes);
}

/// A [`NetworkHandle`] that does nothing: every gossip call succeeds
/// trivially and inbound messages are dropped. Used where the gossip
/// subsystem is wired in but not yet (or no longer) speaking to peers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNetwork;

#[async_trait]
impl NetworkHandle for NoopNetwork {
    async fn gossip_atomic_tx(&self, _tx: AtomicTx) -> Result<(), TransportError> {
        Ok(())
    }

    async fn gossip_eth_txs(&self, _candidates: Vec<PooledEthTx>) -> Result<(), TransportError> {
        Ok(())
    }

    fn app_gossip(&self, node_id: NodeId, _bytes: Bytes) {
        trace!(?node_id, "NoopNetwork dropping inbound AppGossip");
    }
}

/// The production [`NetworkHandle`]: deduplicates via [`RecentSet`], defers
/// to `gossip_activation_time` before doing anything, batches `EthTxs`
/// under a soft cap, and dispatches inbound payloads to a [`GossipHandler`].
pub struct PushGossipNetwork<A, M, P, C = SystemClock> {
    app_sender: A,
    handler: GossipHandler<M, P>,
    clock: C,
    config: GossipConfig,
    recent_atomic: RecentSet<TxId>,
    recent_eth: RecentSet<EthTxHash>,
}

impl<A, M, P> PushGossipNetwork<A, M, P, SystemClock>
where
    A: AppSender,
    M: Mempool,
    P: EthTxPool,
{
    /// Builds a network over the real system clock.
    pub fn new(app_sender: A, mempool: M, eth_pool: P, config: GossipConfig) -> Self {
        Self::with_clock(app_sender, mempool, eth_pool, config, SystemClock)
    }
}

impl<A, M, P, C> PushGossipNetwork<A, M, P, C>
where
    A: AppSender,
    M: Mempool,
    P: EthTxPool,
    C: Clock,
{
    /// Builds a network over an injected clock, for deterministic tests of
    /// the activation gate.
    pub fn with_clock(app_sender: A, mempool: M, eth_pool: P, config: GossipConfig, clock: C) -> Self {
        Self {
            app_sender,
            handler: GossipHandler::new(mempool, eth_pool),
            clock,
            recent_atomic: RecentSet::new(config.recent_cache_size),
            recent_eth: RecentSet::new(config.recent_cache_size),
            config,
        }
    }

    /// Whether wall-clock time has reached the configured activation time.
    /// Before this point every gossip entry point is a no-op.
    fn is_active(&self) -> bool {
        self.clock.now_unix() >= self.config.gossip_activation_time
    }
}

#[async_trait]
impl<A, M, P, C> NetworkHandle for PushGossipNetwork<A, M, P, C>
where
    A: AppSender,
    M: Mempool,
    P: EthTxPool,
    C: Clock,
{
    async fn gossip_atomic_tx(&self, tx: AtomicTx) -> Result<(), TransportError> {
        if !self.is_active() {
            return Ok(());
        }

        let signed_bytes = cchain_atomic_tx::codec::marshal_signed(&tx);
        let tx_id = cchain_atomic_tx::codec::tx_id(&signed_bytes);

        if self.recent_atomic.check_and_insert(tx_id) {
            trace!(?tx_id, "skipping recently-gossiped atomic tx");
            return Ok(());
        }

        let message = cchain_wire::Message::AtomicTx(Bytes::from(signed_bytes));
        self.app_sender.send_app_gossip(cchain_wire::build(&message)).await
    }

    async fn gossip_eth_txs(&self, candidates: Vec<PooledEthTx>) -> Result<(), TransportError> {
        if !self.is_active() {
            return Ok(());
        }

        let eth_pool = self.handler.eth_pool();
        let mut kept: Vec<Bytes> = Vec::new();
        for candidate in candidates {
            if eth_pool.status(candidate.hash) != EthTxStatus::Pending {
                continue;
            }
            if self.recent_eth.check_and_insert(candidate.hash) {
                continue;
            }
            kept.push(candidate.rlp);
        }

        if kept.is_empty() {
            return Ok(());
        }

        for batch in split_into_batches(kept, self.config.eth_msg_soft_cap_size) {
            let encoded = cchain_wire::eth_txs::encode_eth_txs(&batch);
            let message = cchain_wire::Message::EthTxs(encoded);
            self.app_sender.send_app_gossip(cchain_wire::build(&message)).await?;
        }
        Ok(())
    }

    fn app_gossip(&self, node_id: NodeId, bytes: Bytes) {
        if !self.is_active() {
            trace!(?node_id, "gossip not yet active, dropping inbound AppGossip");
            return;
        }

        match cchain_wire::parse(&bytes) {
            Ok(cchain_wire::Message::AtomicTx(payload)) => {
                self.handler.handle_atomic_tx(node_id, &payload);
            }
            Ok(cchain_wire::Message::EthTxs(payload)) => {
                self.handler.handle_eth_txs(node_id, &payload);
            }
            Err(err) => {
                debug!(?node_id, %err, "dropping malformed inbound AppGossip envelope");
            }
        }
    }
}

/// Splits `items` into batches whose summed size stays at or under `cap`,
/// flushing the accumulator before an item that would overflow it. An
/// individual item larger than `cap` still ships alone in its own batch,
/// rather than being dropped or rejected.
fn split_into_batches(items: Vec<Bytes>, cap: usize) -> Vec<Vec<Bytes>> {
    let mut batches = Vec::new();
    let mut current = Vec::new();
    let mut current_size = 0usize;

    for item in items {
        let item_len = item.len();
        if !current.is_empty() && current_size + item_len > cap {
            batches.push(std::mem::take(&mut current));
            current_size = 0;
        }
        current_size += item_len;
        current.push(item);
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use cchain_network_api::{EthPoolError, MempoolError};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingSender {
        sent: Arc<Mutex<Vec<Bytes>>>,
    }

    #[async_trait]
    impl AppSender for RecordingSender {
        async fn send_app_gossip(&self, bytes: Bytes) -> Result<(), TransportError> {
            self.sent.lock().push(bytes);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct NoopMempool;

    impl Mempool for NoopMempool {
        fn contains(&self, _id: TxId) -> bool {
            false
        }
        fn issue_tx(&self, _tx: AtomicTx, _local: bool) -> Result<(), MempoolError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct AllPendingEthPool;

    impl EthTxPool for AllPendingEthPool {
        fn status(&self, _hash: EthTxHash) -> EthTxStatus {
            EthTxStatus::Pending
        }
        fn add_remotes(&self, txs: Vec<PooledEthTx>) -> Vec<Result<(), EthPoolError>> {
            txs.iter().map(|_| Ok(())).collect()
        }
    }

    fn candidate(hash_byte: u8, payload_size: usize) -> PooledEthTx {
        // A single valid RLP string item, standing in for an
        // already-encoded transaction of roughly `payload_size` bytes.
        let rlp = alloy_rlp::encode(vec![0xabu8; payload_size].as_slice());
        PooledEthTx { hash: EthTxHash::from(alloy_primitives::B256::repeat_byte(hash_byte)), rlp: Bytes::from(rlp) }
    }

    fn sample_atomic_tx() -> AtomicTx {
        use cchain_primitives::{AssetId, ChainId, Credential, EvmInput, Output, Secp256k1Signature, TransferableOutput, UnsignedAtomicTx};
        use std::collections::BTreeSet;

        let mut addrs = BTreeSet::new();
        addrs.insert(cchain_primitives::Address::repeat_byte(0x01));
        AtomicTx {
            unsigned: UnsignedAtomicTx {
                network_id: 1,
                blockchain_id: ChainId::from(alloy_primitives::B256::repeat_byte(0x10)),
                destination_chain: ChainId::from(alloy_primitives::B256::repeat_byte(0x20)),
                ins: vec![EvmInput {
                    address: cchain_primitives::Address::repeat_byte(0x02),
                    amount: 500,
                    asset_id: AssetId::from(alloy_primitives::B256::repeat_byte(0x30)),
                    nonce: 0,
                }],
                exported_outputs: vec![TransferableOutput {
                    asset_id: AssetId::from(alloy_primitives::B256::repeat_byte(0x30)),
                    output: Output { amount: 400, locktime: 0, threshold: 1, addrs },
                }],
            },
            credentials: vec![Credential::single(Secp256k1Signature([9u8; 65]))],
        }
    }

    fn network(
        activation_time: u64,
        now: u64,
        cap: usize,
    ) -> (PushGossipNetwork<RecordingSender, NoopMempool, AllPendingEthPool, crate::clock::FixedClock>, RecordingSender) {
        let sender = RecordingSender::default();
        let config = GossipConfig { gossip_activation_time: activation_time, eth_msg_soft_cap_size: cap, recent_cache_size: 512 };
        let net = PushGossipNetwork::with_clock(sender.clone(), NoopMempool, AllPendingEthPool, config, crate::clock::FixedClock(now));
        (net, sender)
    }

    #[tokio::test]
    async fn duplicate_atomic_tx_is_gossiped_once() {
        let (net, sender) = network(0, 100, 64 * 1024);
        let tx = sample_atomic_tx();
        for _ in 0..3 {
            net.gossip_atomic_tx(tx.clone()).await.unwrap();
        }
        assert_eq!(sender.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn gossip_before_activation_is_a_noop() {
        let (net, sender) = network(1_000, 100, 64 * 1024);
        net.gossip_atomic_tx(sample_atomic_tx()).await.unwrap();
        assert!(sender.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn eth_txs_are_split_across_the_soft_cap() {
        let cap = 64 * 1024;
        let (net, sender) = network(0, 100, cap);
        let candidates = vec![
            candidate(1, 40 * 1024),
            candidate(2, 30 * 1024),
            candidate(3, 20 * 1024),
        ];
        net.gossip_eth_txs(candidates).await.unwrap();

        let sent = sender.sent.lock();
        assert_eq!(sent.len(), 2, "expected exactly two batches");
        let first = cchain_wire::parse(&sent[0]).unwrap();
        let second = cchain_wire::parse(&sent[1]).unwrap();
        let cchain_wire::Message::EthTxs(first_payload) = first else { panic!("expected EthTxs") };
        let cchain_wire::Message::EthTxs(second_payload) = second else { panic!("expected EthTxs") };
        assert_eq!(cchain_wire::eth_txs::decode_eth_txs(&first_payload).unwrap().len(), 1);
        assert_eq!(cchain_wire::eth_txs::decode_eth_txs(&second_payload).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn oversized_single_tx_still_ships_alone() {
        let cap = 64 * 1024;
        let (net, sender) = network(0, 100, cap);
        net.gossip_eth_txs(vec![candidate(9, cap + 1)]).await.unwrap();
        assert_eq!(sender.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn non_pending_candidates_are_not_gossiped() {
        #[derive(Clone, Default)]
        struct NoneStatusPool;
        impl EthTxPool for NoneStatusPool {
            fn status(&self, _hash: EthTxHash) -> EthTxStatus {
                EthTxStatus::Unknown
            }
            fn add_remotes(&self, txs: Vec<PooledEthTx>) -> Vec<Result<(), EthPoolError>> {
                txs.iter().map(|_| Ok(())).collect()
            }
        }

        let sender = RecordingSender::default();
        let config = GossipConfig::default();
        let net = PushGossipNetwork::with_clock(sender.clone(), NoopMempool, NoneStatusPool, config, crate::clock::FixedClock(0));
        net.gossip_eth_txs(vec![candidate(1, 10)]).await.unwrap();
        assert!(sender.sent.lock().is_empty());
    }

    #[test]
    fn noop_network_drops_inbound_gossip() {
        let net = NoopNetwork;
        net.app_gossip(NodeId([0; 20]), Bytes::new());
    }
}
