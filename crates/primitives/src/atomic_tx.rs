use crate::ids::ChainId;
use crate::tx::{Credential, EvmInput, TransferableOutput};

/// The unsigned body of an `AtomicTx::Export`: everything that goes into
/// `UnsignedBytes`, i.e. everything except `credentials`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnsignedAtomicTx {
    /// Network this transaction was issued on.
    pub network_id: u32,
    /// Chain this transaction originates from.
    pub blockchain_id: ChainId,
    /// Chain the exported outputs are destined for.
    pub destination_chain: ChainId,
    /// EVM-side debits, ordered; sorted/unique from `ApricotPhase1` onward.
    pub ins: Vec<EvmInput>,
    /// UTXO-side credits on the destination chain, ordered by canonical
    /// byte comparison of their encoded form.
    pub exported_outputs: Vec<TransferableOutput>,
}

/// A fully signed `AtomicTx::Export`.
///
/// `credentials[i]` authorizes `ins[i]`; the two sequences always have
/// equal length for a well-formed transaction (checked by the verifier,
/// not enforced by this type, since a transaction parsed off the wire may
/// be malformed).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomicTx {
    /// The signed transaction's unsigned body.
    pub unsigned: UnsignedAtomicTx,
    /// Parallel sequence to `unsigned.ins`.
    pub credentials: Vec<Credential>,
}

impl AtomicTx {
    /// Number of inputs/credentials this transaction carries.
    pub fn num_ins(&self) -> usize {
        self.unsigned.ins.len()
    }
}
