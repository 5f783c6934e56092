use crate::ids::{AssetId, ChainId};

/// Static, per-VM-instance parameters that atomic-transaction verification
/// and state transfer are checked against.
///
/// Constructed once by the node/VM binary (out of scope for this crate) and
/// passed by reference into [`crate::Rules::at_timestamp`] and the
/// `cchain-atomic-tx`/`cchain-evm` entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VmContext {
    /// Network this VM instance is running on.
    pub network_id: u32,
    /// This chain's own chain ID.
    pub blockchain_id: ChainId,
    /// The chain atomic exports must be destined for.
    pub x_chain_id: ChainId,
    /// The native asset (AVAX) ID, used for fee accounting and x2c scaling.
    pub avax_asset_id: AssetId,
    /// Flat transaction fee, denominated in the native asset, used before
    /// `ApricotPhase3` activates.
    pub tx_fee: u64,
    /// Per-exported-output gas cost, used by the dynamic fee formula from
    /// `ApricotPhase3` onward.
    pub output_fee: u64,
    /// Per-signed-byte gas cost, used by the dynamic fee formula from
    /// `ApricotPhase3` onward.
    pub tx_bytes_fee: u64,
    /// Activation timestamp (unix seconds) for `ApricotPhase1`.
    pub apricot_phase1_time: u64,
    /// Activation timestamp (unix seconds) for `ApricotPhase3`.
    pub apricot_phase3_time: u64,
    /// Activation timestamp (unix seconds) for `ApricotPhase4`.
    pub apricot_phase4_time: u64,
}
