use crate::context::VmContext;

/// The subset of protocol-upgrade ("Apricot phase") gates that affect
/// atomic-transaction verification and fee computation.
///
/// Each flag is `true` once wall-clock/block time has passed the
/// corresponding activation timestamp in [`VmContext`]. This is
/// consensus-critical: all implementations must derive the same flags from
/// the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rules {
    /// Gates input sort/uniqueness enforcement (`errInputsNotSortedUnique`).
    pub is_apricot_phase1: bool,
    /// Gates dynamic (`gas * baseFee`) fee computation in place of the flat
    /// `txFee`.
    pub is_apricot_phase3: bool,
    /// Reserved for future gating; carried because it is named as a
    /// consensus-critical constant in the external-interfaces section
    /// alongside phase 1 and phase 3, even though no rule in this
    /// subsystem currently branches on it.
    pub is_apricot_phase4: bool,
}

impl Rules {
    /// Derives the active rule set for a given block/wall-clock timestamp
    /// (unix seconds) from the activation times configured on `ctx`.
    pub fn at_timestamp(ctx: &VmContext, timestamp: u64) -> Self {
        Self {
            is_apricot_phase1: timestamp >= ctx.apricot_phase1_time,
            is_apricot_phase3: timestamp >= ctx.apricot_phase3_time,
            is_apricot_phase4: timestamp >= ctx.apricot_phase4_time,
        }
    }
}
