//! Canonical codec and verifier for atomic export transactions.
//!
//! This crate has two responsibilities, kept in separate modules because
//! they have different trust models: [`codec`] is pure data-shape
//! (un)marshaling with no notion of "valid", while [`verify`] is the
//! consensus-critical well-formedness/semantic-validity gate that the
//! gossip and mempool-submission paths both call before accepting a
//! transaction.

mod error;
pub use error::{CodecError, VerifyError};

mod packer;
pub use packer::{Packer, Unpacker};

pub mod codec;
pub use codec::{marshal_signed, marshal_unsigned, tx_id, unmarshal};

pub mod verify;
pub use verify::{semantic_verify, verify};
