use cchain_atomic_tx::codec;
use cchain_network_api::{EthTxPool, Mempool, PooledEthTx};
use cchain_primitives::{EthTxHash, NodeId};
use sha3::{Digest, Keccak256};
use tracing::{debug, trace};

/// Inbound-message processing for gossip payloads already split out of
/// their wire envelope. Owns no network state of its own; `node_id` is
/// carried through purely for logging.
#[derive(Debug)]
pub struct GossipHandler<M, P> {
    mempool: M,
    eth_pool: P,
}

impl<M, P> GossipHandler<M, P>
where
    M: Mempool,
    P: EthTxPool,
{
    /// Builds a handler over the given mempool and EVM transaction pool.
    pub fn new(mempool: M, eth_pool: P) -> Self {
        Self { mempool, eth_pool }
    }

    /// The mempool this handler submits inbound atomic transactions to.
    pub fn mempool(&self) -> &M {
        &self.mempool
    }

    /// The EVM pool this handler forwards inbound Ethereum transactions to.
    pub fn eth_pool(&self) -> &P {
        &self.eth_pool
    }

    /// Processes a single gossiped atomic transaction's raw signed bytes.
    ///
    /// An empty payload, a malformed encoding, or a transaction the
    /// mempool already knows about are all dropped silently; only a
    /// genuinely new, well-formed transaction reaches [`Mempool::issue_tx`].
    pub fn handle_atomic_tx(&self, node_id: NodeId, tx_bytes: &[u8]) {
        if tx_bytes.is_empty() {
            trace!(?node_id, "dropping empty AtomicTx gossip payload");
            return;
        }

        let tx = match codec::unmarshal(tx_bytes) {
            Ok(tx) => tx,
            Err(err) => {
                trace!(?node_id, %err, "dropping malformed AtomicTx gossip payload");
                return;
            }
        };

        // Re-derive the canonical signed encoding from the parsed object
        // rather than trust the bytes as received: a peer that sent a
        // structurally valid but non-canonical encoding is treated as if
        // it had sent the re-encoded, canonical form.
        let canonical = codec::marshal_signed(&tx);
        let tx_id = codec::tx_id(&canonical);

        if self.mempool.contains(tx_id) {
            trace!(?node_id, ?tx_id, "ignoring already-known AtomicTx");
            return;
        }

        if let Err(err) = self.mempool.issue_tx(tx, false) {
            trace!(?node_id, ?tx_id, %err, "remote AtomicTx rejected by mempool");
        }
    }

    /// Processes a single gossiped `EthTxs` payload's RLP-encoded list.
    ///
    /// A decode failure drops the whole payload; per-transaction pool
    /// rejections are logged individually but never fail the call.
    pub fn handle_eth_txs(&self, node_id: NodeId, txs_bytes: &[u8]) {
        if txs_bytes.is_empty() {
            trace!(?node_id, "dropping empty EthTxs gossip payload");
            return;
        }

        let items = match cchain_wire::eth_txs::decode_eth_txs(txs_bytes) {
            Ok(items) => items,
            Err(err) => {
                trace!(?node_id, %err, "dropping malformed EthTxs gossip payload");
                return;
            }
        };

        let pooled: Vec<PooledEthTx> = items
            .into_iter()
            .map(|rlp| {
                let hash = EthTxHash::from(alloy_primitives::B256::from(eth_tx_hash(&rlp)));
                PooledEthTx { hash, rlp }
            })
            .collect();

        let count = pooled.len();
        let results = self.eth_pool.add_remotes(pooled);
        for (index, result) in results.into_iter().enumerate() {
            if let Err(err) = result {
                debug!(?node_id, index, total = count, %err, "remote eth tx rejected by pool");
            }
        }
    }
}

/// Stand-in transaction identity used purely for recent-set dedup; the
/// real Ethereum transaction-hash definition belongs to the EVM pool.
fn eth_tx_hash(rlp: &[u8]) -> [u8; 32] {
    Keccak256::digest(rlp).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use cchain_network_api::{EthPoolError, EthTxStatus, MempoolError};
    use cchain_primitives::{AssetId, AtomicTx, ChainId, Credential, EvmInput, Output, Secp256k1Signature, TransferableOutput, TxId, UnsignedAtomicTx};
    use parking_lot::Mutex;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct MockMempool {
        known: Mutex<Vec<TxId>>,
        issued: Mutex<Vec<AtomicTx>>,
        reject_next: Mutex<bool>,
    }

    impl Mempool for MockMempool {
        fn contains(&self, id: TxId) -> bool {
            self.known.lock().contains(&id)
        }

        fn issue_tx(&self, tx: AtomicTx, _local: bool) -> Result<(), MempoolError> {
            if *self.reject_next.lock() {
                return Err(MempoolError::Rejected("test rejection".into()));
            }
            self.issued.lock().push(tx);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockEthPool {
        added: Mutex<Vec<PooledEthTx>>,
    }

    impl EthTxPool for MockEthPool {
        fn status(&self, _hash: EthTxHash) -> EthTxStatus {
            EthTxStatus::Unknown
        }

        fn add_remotes(&self, txs: Vec<PooledEthTx>) -> Vec<Result<(), EthPoolError>> {
            let mut added = self.added.lock();
            let results = txs.iter().map(|_| Ok(())).collect();
            added.extend(txs);
            results
        }
    }

    fn sample_tx() -> AtomicTx {
        let mut addrs = BTreeSet::new();
        addrs.insert(cchain_primitives::Address::from([0x11; 20]));
        let unsigned = UnsignedAtomicTx {
            network_id: 1,
            blockchain_id: ChainId::from(alloy_primitives::B256::from([1u8; 32])),
            destination_chain: ChainId::from(alloy_primitives::B256::from([2u8; 32])),
            ins: vec![EvmInput {
                address: cchain_primitives::Address::from([0x22; 20]),
                amount: 1_000,
                asset_id: AssetId::from(alloy_primitives::B256::from([3u8; 32])),
                nonce: 0,
            }],
            exported_outputs: vec![TransferableOutput {
                asset_id: AssetId::from(alloy_primitives::B256::from([3u8; 32])),
                output: Output { amount: 900, locktime: 0, threshold: 1, addrs },
            }],
        };
        AtomicTx {
            unsigned,
            credentials: vec![Credential::single(Secp256k1Signature([0u8; 65]))],
        }
    }

    #[test]
    fn empty_atomic_tx_payload_is_dropped() {
        let mempool = MockMempool::default();
        let eth_pool = MockEthPool::default();
        let handler = GossipHandler::new(&mempool, &eth_pool);
        handler.handle_atomic_tx(NodeId([0; 20]), &[]);
        assert!(mempool.issued.lock().is_empty());
    }

    #[test]
    fn malformed_atomic_tx_payload_is_dropped() {
        let mempool = MockMempool::default();
        let eth_pool = MockEthPool::default();
        let handler = GossipHandler::new(&mempool, &eth_pool);
        handler.handle_atomic_tx(NodeId([0; 20]), &[0xff; 4]);
        assert!(mempool.issued.lock().is_empty());
    }

    #[test]
    fn well_formed_tx_reaches_mempool_once() {
        let mempool = MockMempool::default();
        let eth_pool = MockEthPool::default();
        let handler = GossipHandler::new(&mempool, &eth_pool);
        let tx = sample_tx();
        let bytes = codec::marshal_signed(&tx);

        handler.handle_atomic_tx(NodeId([0; 20]), &bytes);
        assert_eq!(mempool.issued.lock().len(), 1);

        // Mark it known, as a real mempool would after issuance, and
        // confirm a re-send is dropped before reaching issue_tx again.
        let tx_id = codec::tx_id(&bytes);
        mempool.known.lock().push(tx_id);
        handler.handle_atomic_tx(NodeId([0; 20]), &bytes);
        assert_eq!(mempool.issued.lock().len(), 1);
    }

    #[test]
    fn mempool_rejection_does_not_panic() {
        let mempool = MockMempool::default();
        *mempool.reject_next.lock() = true;
        let eth_pool = MockEthPool::default();
        let handler = GossipHandler::new(&mempool, &eth_pool);
        let bytes = codec::marshal_signed(&sample_tx());
        handler.handle_atomic_tx(NodeId([0; 20]), &bytes);
        assert!(mempool.issued.lock().is_empty());
    }

    #[test]
    fn empty_eth_txs_payload_is_dropped() {
        let mempool = MockMempool::default();
        let eth_pool = MockEthPool::default();
        let handler = GossipHandler::new(&mempool, &eth_pool);
        handler.handle_eth_txs(NodeId([0; 20]), &[]);
        assert!(eth_pool.added.lock().is_empty());
    }

    #[test]
    fn malformed_eth_txs_payload_is_dropped() {
        let mempool = MockMempool::default();
        let eth_pool = MockEthPool::default();
        let handler = GossipHandler::new(&mempool, &eth_pool);
        handler.handle_eth_txs(NodeId([0; 20]), &[0x01]);
        assert!(eth_pool.added.lock().is_empty());
    }

    #[test]
    fn well_formed_eth_txs_reach_pool() {
        let mempool = MockMempool::default();
        let eth_pool = MockEthPool::default();
        let handler = GossipHandler::new(&mempool, &eth_pool);

        let items = vec![
            Bytes::from(alloy_rlp::encode(b"tx-one".as_slice())),
            Bytes::from(alloy_rlp::encode(b"tx-two-longer".as_slice())),
        ];
        let encoded = cchain_wire::eth_txs::encode_eth_txs(&items);
        handler.handle_eth_txs(NodeId([0; 20]), &encoded);

        assert_eq!(eth_pool.added.lock().len(), 2);
    }
}
