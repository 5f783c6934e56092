use cchain_primitives::{Address, AssetId, TxId};

/// A UTXO's identity: the exporting transaction plus the output's index
/// within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtxoId {
    /// The exporting atomic transaction's ID.
    pub tx_id: TxId,
    /// Index of this output within `tx_id`'s `exported_outputs`.
    pub output_index: u32,
}

/// One shared-memory write an accepted export produces: a UTXO keyed by
/// its input ID, with its spenders recorded as searchable traits so a
/// wallet on the destination chain can find funds sent to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    /// This output's UTXO identity.
    pub key: UtxoId,
    /// The asset this UTXO carries — exposed so callers can route or
    /// index puts without re-decoding `value`.
    pub asset_id: AssetId,
    /// The canonical encoded UTXO bytes.
    pub value: Vec<u8>,
    /// Addresses authorized to spend this UTXO, used as shared-memory
    /// search traits.
    pub traits: Vec<Address>,
}
