use alloy_primitives::B256;
use derive_more::{AsRef, Deref, From};

/// 32-byte identifier of an atomic transaction, derived by hashing its
/// canonical signed bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef, Deref, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxId(pub B256);

/// 32-byte identifier of an account-based (EVM) transaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef, Deref, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EthTxHash(pub B256);

/// 32-byte identifier of a fungible asset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef, Deref, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetId(pub B256);

/// 32-byte identifier of the chain an object is bound to (network-local
/// chain ID, not the EVM `chainId`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef, Deref, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainId(pub B256);

/// Opaque short identifier of a remote peer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef, Deref, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub [u8; 20]);

/// 20-byte account address, Keccak-256-derived from a recovered public key.
pub type Address = alloy_primitives::Address;

impl TxId {
    /// Returns the big-endian byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_ref()
    }
}

impl AssetId {
    /// Returns the big-endian byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_ref()
    }
}

impl ChainId {
    /// Returns the big-endian byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_ref()
    }
}
