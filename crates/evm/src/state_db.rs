use cchain_primitives::{Address, AssetId};

/// The EVM state surface [`crate::evm_state_transfer`] is written against.
///
/// Modeled as a trait, not a concrete database, so this crate has no
/// dependency on a storage engine — the caller (VM glue, out of scope)
/// adapts its own state database to this surface.
pub trait StateDb {
    /// Native-asset balance of `address`, in 18-decimal EVM units.
    fn get_balance(&self, address: Address) -> u128;
    /// Multi-coin balance of `address` for `asset`, in the asset's own
    /// (unscaled) units.
    fn get_multicoin_balance(&self, address: Address, asset: AssetId) -> u128;
    /// Current account nonce of `address`.
    fn get_nonce(&self, address: Address) -> u64;
    /// Debits `amount` (already x2c-scaled) from `address`'s native
    /// balance. The caller has already checked sufficiency.
    fn sub_balance(&mut self, address: Address, amount: u128);
    /// Debits `amount` from `address`'s multi-coin balance for `asset`.
    /// The caller has already checked sufficiency.
    fn sub_multicoin_balance(&mut self, address: Address, asset: AssetId, amount: u128);
    /// Sets `address`'s nonce to `nonce`.
    fn set_nonce(&mut self, address: Address, nonce: u64);
}
