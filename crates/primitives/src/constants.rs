/// Bound on the number of distinct identifiers a [`RecentSet`](https://docs.rs/cchain-net-common)
/// is guaranteed to remember; must match across all node implementations.
pub const RECENT_CACHE_SIZE: u32 = 512;

/// Scaling factor between the UTXO chain's 8-decimal AVAX denomination and
/// the EVM chain's 18-decimal native units: `1 AVAX-unit == 10^9 wei-like
/// units`.
pub const X2C_RATE: u64 = 1_000_000_000;
