//! Standard RLP encoding of a homogeneous list of already-encoded Ethereum
//! transactions.
//!
//! Each member of the list is treated as an opaque, already RLP-encoded
//! item (the transaction's own encoding, typed or legacy) — this layer
//! never decodes transaction fields, matching the spec's scoping of the
//! EVM transaction type itself as an external collaborator.

use alloy_rlp::Header;
use bytes::Bytes;

use crate::WireError;

/// Encodes `txs` as a single RLP list whose items are `txs`' own bytes,
/// unmodified.
pub fn encode_eth_txs(txs: &[Bytes]) -> Bytes {
    let payload_length: usize = txs.iter().map(|t| t.len()).sum();
    let header = Header { list: true, payload_length };
    let mut out = Vec::with_capacity(payload_length + 9);
    header.encode(&mut out);
    for tx in txs {
        out.extend_from_slice(tx);
    }
    out.into()
}

/// Decodes an RLP list of already-encoded transactions, returning each
/// member's raw bytes (including its own header) without interpreting
/// them further.
pub fn decode_eth_txs(bytes: &[u8]) -> Result<Vec<Bytes>, WireError> {
    let mut buf = bytes;
    let header = Header::decode(&mut buf).map_err(|_| WireError::RlpDecode)?;
    if !header.list {
        return Err(WireError::RlpDecode);
    }
    if buf.len() < header.payload_length {
        return Err(WireError::RlpDecode);
    }
    let mut body = &buf[..header.payload_length];
    let mut items = Vec::new();
    while !body.is_empty() {
        let pre = body;
        let item_header = Header::decode(&mut body).map_err(|_| WireError::RlpDecode)?;
        let header_len = pre.len() - body.len();
        if body.len() < item_header.payload_length {
            return Err(WireError::RlpDecode);
        }
        let total_len = header_len + item_header.payload_length;
        items.push(Bytes::copy_from_slice(&pre[..total_len]));
        body = &body[item_header.payload_length..];
    }
    Ok(items)
}
