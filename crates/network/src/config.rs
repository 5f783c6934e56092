/// Reference soft cap on a single `EthTxs` batch, measured as the summed
/// encoded size of its member transactions.
pub const DEFAULT_ETH_MSG_SOFT_CAP_SIZE: usize = 64 * 1024;

/// Construction-time parameters for [`crate::PushGossipNetwork`].
///
/// Sourced from the (out-of-scope) node binary's configuration layer; this
/// struct only defines the shape, following `reth-config`'s plain-struct
/// style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GossipConfig {
    /// Unix-second timestamp at which gossip stops being a no-op. Until
    /// this time, every inbound and outbound gossip entry point is a
    /// no-op returning success, to coexist with peers that do not yet
    /// speak the gossip protocol.
    pub gossip_activation_time: u64,
    /// Soft cap (in summed encoded bytes) on a single outbound `EthTxs`
    /// batch.
    pub eth_msg_soft_cap_size: usize,
    /// Bound on the number of distinct identifiers each recent-set
    /// remembers.
    pub recent_cache_size: u32,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            gossip_activation_time: 0,
            eth_msg_soft_cap_size: DEFAULT_ETH_MSG_SOFT_CAP_SIZE,
            recent_cache_size: cchain_primitives::RECENT_CACHE_SIZE,
        }
    }
}
