//! Well-formedness and semantic-validity rules for atomic export
//! transactions.
//!
//! [`verify`] is pure, deterministic, and consensus-critical: given the
//! same `tx`, `x_chain_id`, `ctx`, and `rules`, every implementation must
//! agree on success/failure and, for debugging parity, on which rule
//! fired first.

use std::collections::HashMap;

use cchain_primitives::{AssetId, AtomicTx, ChainId, Rules, VmContext};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SECP256K1};
use sha3::{Digest, Keccak256};
use tracing::trace;

use crate::codec::marshal_unsigned;
use crate::error::VerifyError;

/// Stateless well-formedness checks, run in the exact order below.
pub fn verify(
    tx: Option<&AtomicTx>,
    x_chain_id: ChainId,
    ctx: &VmContext,
    rules: Rules,
) -> Result<(), VerifyError> {
    let tx = tx.ok_or(VerifyError::NilTx)?;
    let unsigned = &tx.unsigned;

    if unsigned.destination_chain != x_chain_id {
        return Err(VerifyError::WrongChainId);
    }
    if unsigned.exported_outputs.is_empty() {
        return Err(VerifyError::NoExportOutputs);
    }
    if unsigned.network_id != ctx.network_id {
        return Err(VerifyError::WrongNetworkId);
    }
    if unsigned.blockchain_id != ctx.blockchain_id {
        return Err(VerifyError::WrongBlockchainId);
    }
    for (i, input) in unsigned.ins.iter().enumerate() {
        if input.amount == 0 {
            return Err(VerifyError::ZeroAmountInput(i));
        }
    }
    for (i, out) in unsigned.exported_outputs.iter().enumerate() {
        if out.output.amount == 0 {
            return Err(VerifyError::ZeroAmountOutput(i));
        }
        if out.output.threshold as usize > out.output.addrs.len() {
            return Err(VerifyError::ThresholdExceedsAddrs {
                index: i,
                threshold: out.output.threshold,
                num_addrs: out.output.addrs.len(),
            });
        }
    }
    if !is_sorted_by(&unsigned.exported_outputs, |a, b| {
        crate::codec::marshal_output(a).cmp(&crate::codec::marshal_output(b))
    }) {
        return Err(VerifyError::OutputsNotSorted);
    }
    if rules.is_apricot_phase1 && !inputs_sorted_unique(&unsigned.ins) {
        return Err(VerifyError::InputsNotSortedUnique);
    }
    Ok(())
}

/// Stateful checks layered on top of [`verify`]: fee computation, flow
/// conservation, and signature recovery bound to each input's address.
pub fn semantic_verify(
    tx: &AtomicTx,
    x_chain_id: ChainId,
    base_fee: u64,
    ctx: &VmContext,
    rules: Rules,
) -> Result<(), VerifyError> {
    verify(Some(tx), x_chain_id, ctx, rules)?;

    let unsigned_bytes = marshal_unsigned(&tx.unsigned);
    let fee = if rules.is_apricot_phase3 {
        let gas = ctx
            .output_fee
            .saturating_mul(tx.unsigned.exported_outputs.len() as u64)
            .saturating_add(ctx.tx_bytes_fee.saturating_mul(crate::codec::marshal_signed(tx).len() as u64));
        gas.saturating_mul(base_fee)
    } else {
        ctx.tx_fee
    };

    check_flow_conservation(tx, ctx.avax_asset_id, fee)?;

    if tx.credentials.len() != tx.unsigned.ins.len() {
        return Err(VerifyError::SignatureInputsMismatch {
            credentials: tx.credentials.len(),
            inputs: tx.unsigned.ins.len(),
        });
    }

    for (i, (input, cred)) in tx.unsigned.ins.iter().zip(tx.credentials.iter()).enumerate() {
        if cred.signatures.len() != 1 {
            return Err(VerifyError::CredentialStructural { index: i, count: cred.signatures.len() });
        }
        let recovered = recover_address(&unsigned_bytes, &cred.signatures[0])
            .map_err(|_| VerifyError::MalformedSignature(i))?;
        if recovered != input.address {
            trace!(index = i, expected = ?input.address, recovered = ?recovered, "credential recovered the wrong address");
            return Err(VerifyError::PublicKeySignatureMismatch(i));
        }
    }

    Ok(())
}

fn check_flow_conservation(tx: &AtomicTx, avax_asset_id: AssetId, fee: u64) -> Result<(), VerifyError> {
    let mut in_sums: HashMap<AssetId, u64> = HashMap::new();
    for input in &tx.unsigned.ins {
        let entry = in_sums.entry(input.asset_id).or_insert(0);
        *entry = entry.checked_add(input.amount).ok_or(VerifyError::Overflow)?;
    }
    let mut out_sums: HashMap<AssetId, u64> = HashMap::new();
    for out in &tx.unsigned.exported_outputs {
        let entry = out_sums.entry(out.asset_id).or_insert(0);
        *entry = entry.checked_add(out.output.amount).ok_or(VerifyError::Overflow)?;
    }
    *out_sums.entry(avax_asset_id).or_insert(0) =
        out_sums.get(&avax_asset_id).copied().unwrap_or(0).checked_add(fee).ok_or(VerifyError::Overflow)?;

    let mut assets: std::collections::HashSet<AssetId> = in_sums.keys().copied().collect();
    assets.extend(out_sums.keys().copied());
    for asset in assets {
        let in_amt = in_sums.get(&asset).copied().unwrap_or(0);
        let out_amt = out_sums.get(&asset).copied().unwrap_or(0);
        if in_amt != out_amt {
            return Err(VerifyError::FlowConservation);
        }
    }
    Ok(())
}

fn recover_address(
    unsigned_bytes: &[u8],
    sig: &cchain_primitives::Secp256k1Signature,
) -> Result<cchain_primitives::Address, secp256k1::Error> {
    let digest = Keccak256::digest(unsigned_bytes);
    let message = Message::from_digest_slice(&digest)?;
    let recovery_id = RecoveryId::from_i32(sig.0[64] as i32)?;
    let recoverable = RecoverableSignature::from_compact(&sig.0[..64], recovery_id)?;
    let pubkey = SECP256K1.recover_ecdsa(&message, &recoverable)?;
    Ok(public_key_to_address(&pubkey))
}

fn public_key_to_address(pubkey: &secp256k1::PublicKey) -> cchain_primitives::Address {
    let uncompressed = pubkey.serialize_uncompressed();
    // Drop the leading 0x04 prefix before hashing, per the Keccak-256
    // low-20-byte address derivation rule.
    let hash = Keccak256::digest(&uncompressed[1..]);
    cchain_primitives::Address::from_slice(&hash[12..])
}

fn inputs_sorted_unique(ins: &[cchain_primitives::EvmInput]) -> bool {
    ins.windows(2).all(|w| input_key(&w[0]) < input_key(&w[1]))
}

fn input_key(input: &cchain_primitives::EvmInput) -> (cchain_primitives::Address, AssetId, u64) {
    (input.address, input.asset_id, input.nonce)
}

fn is_sorted_by<T>(items: &[T], mut cmp: impl FnMut(&T, &T) -> std::cmp::Ordering) -> bool {
    items.windows(2).all(|w| cmp(&w[0], &w[1]) != std::cmp::Ordering::Greater)
}
