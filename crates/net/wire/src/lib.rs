//! Framed wire message envelope: `{tag, payload}` distinguishing the two
//! gossip message kinds, plus a total `Parse` that never panics and always
//! rejects malformed input.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

pub mod eth_txs;

/// Tag byte for an [`Message::AtomicTx`] payload.
pub const TAG_ATOMIC_TX: u8 = 0;
/// Tag byte for an [`Message::EthTxs`] payload.
pub const TAG_ETH_TXS: u8 = 1;

/// Hard per-message payload cap. Chosen comfortably above the EthTxs
/// batching soft cap; payloads beyond this size are rejected outright
/// rather than left to the caller to bound.
pub const MAX_MESSAGE_SIZE: usize = 512 * 1024;

/// A typed, parsed gossip wire message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The full signed canonical encoding of one atomic transaction.
    AtomicTx(Bytes),
    /// The RLP encoding of a list of Ethereum transactions.
    EthTxs(Bytes),
}

impl Message {
    fn tag(&self) -> u8 {
        match self {
            Message::AtomicTx(_) => TAG_ATOMIC_TX,
            Message::EthTxs(_) => TAG_ETH_TXS,
        }
    }

    fn payload(&self) -> &Bytes {
        match self {
            Message::AtomicTx(b) | Message::EthTxs(b) => b,
        }
    }
}

/// Errors returned while parsing a wire message. All are non-fatal at this
/// layer: callers log at debug/trace and drop the message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// The message was shorter than the minimum tag + length header.
    #[error("truncated message: {0} bytes")]
    Truncated(usize),
    /// The declared payload length did not match the bytes actually
    /// present.
    #[error("payload length mismatch: declared {declared}, have {actual}")]
    LengthMismatch {
        /// Length the header claimed.
        declared: usize,
        /// Length actually remaining in the buffer.
        actual: usize,
    },
    /// The tag byte did not match any recognized message kind.
    #[error("unknown message tag: {0}")]
    UnknownTag(u8),
    /// The payload exceeded [`MAX_MESSAGE_SIZE`].
    #[error("payload of {0} bytes exceeds the per-message maximum of {MAX_MESSAGE_SIZE}")]
    PayloadTooLarge(usize),
    /// The `EthTxs` payload was not a well-formed RLP list.
    #[error("malformed RLP transaction list")]
    RlpDecode,
}

/// Builds the canonical byte string for `msg`: one tag byte, a
/// big-endian `u32` payload length, then the payload.
pub fn build(msg: &Message) -> Bytes {
    let payload = msg.payload();
    let mut buf = BytesMut::with_capacity(1 + 4 + payload.len());
    buf.put_u8(msg.tag());
    buf.put_u32(payload.len() as u32);
    buf.put_slice(payload);
    buf.freeze()
}

/// Parses a wire message. Total: rejects unknown tags, truncated payloads,
/// and payloads exceeding [`MAX_MESSAGE_SIZE`], never panics.
pub fn parse(bytes: &[u8]) -> Result<Message, WireError> {
    if bytes.len() < 5 {
        return Err(WireError::Truncated(bytes.len()));
    }
    let mut buf = bytes;
    let tag = buf.get_u8();
    let len = buf.get_u32() as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(WireError::PayloadTooLarge(len));
    }
    if buf.remaining() != len {
        return Err(WireError::LengthMismatch { declared: len, actual: buf.remaining() });
    }
    let payload = Bytes::copy_from_slice(buf);
    match tag {
        TAG_ATOMIC_TX => Ok(Message::AtomicTx(payload)),
        TAG_ETH_TXS => Ok(Message::EthTxs(payload)),
        other => Err(WireError::UnknownTag(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn round_trips_atomic_tx() {
        let msg = Message::AtomicTx(Bytes::from_static(b"signed-tx-bytes"));
        let bytes = build(&msg);
        assert_eq!(parse(&bytes).unwrap(), msg);
    }

    #[test]
    fn round_trips_eth_txs() {
        let msg = Message::EthTxs(Bytes::from_static(b"rlp-list"));
        let bytes = build(&msg);
        assert_eq!(parse(&bytes).unwrap(), msg);
    }

    #[test]
    fn rejects_unknown_tag() {
        let mut bytes = build(&Message::AtomicTx(Bytes::from_static(b"x"))).to_vec();
        bytes[0] = 0xff;
        assert_matches!(parse(&bytes), Err(WireError::UnknownTag(0xff)));
    }

    #[test]
    fn rejects_truncated_header() {
        assert_matches!(parse(&[0, 0, 0]), Err(WireError::Truncated(3)));
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut bytes = build(&Message::AtomicTx(Bytes::from_static(b"abcd"))).to_vec();
        bytes.truncate(bytes.len() - 1);
        assert_matches!(parse(&bytes), Err(WireError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_oversized_payload() {
        let mut header = BytesMut::new();
        header.put_u8(TAG_ATOMIC_TX);
        header.put_u32((MAX_MESSAGE_SIZE + 1) as u32);
        assert_matches!(parse(&header), Err(WireError::PayloadTooLarge(_)));
    }
}
