//! A minimal big-endian, length-prefixed packer/unpacker pair.
//!
//! This mirrors the canonical-codec idiom used by the avalanche family of
//! VMs (codec version tag, `u32` type IDs, `u32`-length-prefixed variable
//! fields) rather than RLP, which this subsystem reserves for the
//! `EthTxs` wire payload.

use crate::error::CodecError;

/// Appends canonically-encoded fields to an in-memory buffer.
#[derive(Debug, Default)]
pub struct Packer {
    buf: Vec<u8>,
}

impl Packer {
    /// Creates an empty packer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends a `u16`.
    pub fn pack_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Appends a `u32`.
    pub fn pack_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Appends a `u64`.
    pub fn pack_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Appends raw bytes with no length prefix (used for fixed-width
    /// fields such as addresses and asset IDs).
    pub fn pack_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a `u32` length prefix followed by `bytes`.
    pub fn pack_bytes(&mut self, bytes: &[u8]) {
        self.pack_u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
    }

    /// Consumes the packer, returning the accumulated bytes.
    pub fn take(self) -> Vec<u8> {
        self.buf
    }

    /// Returns the accumulated bytes so far without consuming the packer.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// Reads canonically-encoded fields from a byte slice, advancing a cursor.
/// Every read is bounds-checked; no method panics on short input.
#[derive(Debug, Clone, Copy)]
pub struct Unpacker<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Unpacker<'a> {
    /// Wraps `buf` for reading from the start.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.buf.len() - self.pos < n {
            return Err(CodecError::UnexpectedEof);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a `u16`.
    pub fn unpack_u16(&mut self) -> Result<u16, CodecError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Reads a `u32`.
    pub fn unpack_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a `u64`.
    pub fn unpack_u64(&mut self) -> Result<u64, CodecError> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes(b.try_into().expect("8 bytes")))
    }

    /// Reads exactly `n` raw bytes.
    pub fn unpack_fixed(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        self.take(n)
    }

    /// Reads a `u32` length prefix followed by that many bytes.
    pub fn unpack_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.unpack_u32()? as usize;
        self.take(len)
    }

    /// Returns `true` once every byte of the wrapped buffer has been
    /// consumed. Used to reject trailing garbage after a well-formed
    /// decode, which would otherwise break the "unambiguous re-encoding"
    /// property.
    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }
}
