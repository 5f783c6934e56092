use std::collections::BTreeSet;

use crate::ids::{Address, AssetId};

/// A single EVM-side input to an atomic export: a debit of `amount` units of
/// `asset_id` from `address`, authorized by the credential at the same
/// index in `AtomicTx::credentials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvmInput {
    /// The EVM account debited by this input.
    pub address: Address,
    /// Amount in the asset's own (UTXO-side) denomination.
    pub amount: u64,
    /// The asset being debited.
    pub asset_id: AssetId,
    /// The nonce this input is authorized against.
    pub nonce: u64,
}

/// The recipient-side payload of a `TransferableOutput`: a threshold
/// multisig output with an optional locktime, as recognized by the
/// `secp256k1fx` output fx.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Output {
    /// Amount credited to the destination chain.
    pub amount: u64,
    /// Earliest time (unix seconds) at which the output may be spent.
    pub locktime: u64,
    /// Number of `addrs` signatures required to spend the output.
    pub threshold: u32,
    /// Addresses authorized to spend the output, compared canonically as
    /// an ascending-sorted set.
    pub addrs: BTreeSet<Address>,
}

/// An output paired with the asset it transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferableOutput {
    /// The asset being credited to the destination chain.
    pub asset_id: AssetId,
    /// The output payload.
    pub output: Output,
}

/// A single recoverable secp256k1 signature, serialized as 65 bytes
/// (`r || s || recovery_id`).
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Secp256k1Signature(pub [u8; 65]);

impl std::fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Secp256k1Signature").field(&hex_fmt(&self.0)).finish()
    }
}

fn hex_fmt(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

/// The credential accompanying a single input.
///
/// The wire format allows a credential to carry any number of signatures
/// (the general `secp256k1fx.Credential` shape), but this subsystem's
/// invariant requires exactly one per credential — well-formedness
/// verification rejects any other count rather than the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credential {
    /// The signature(s) attached to this credential.
    pub signatures: Vec<Secp256k1Signature>,
}

impl Credential {
    /// Builds a credential carrying a single signature — the only shape
    /// this subsystem's verifier accepts.
    pub fn single(signature: Secp256k1Signature) -> Self {
        Self { signatures: vec![signature] }
    }
}
