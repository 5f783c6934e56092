//! Core types shared by the atomic-transaction gossip subsystem.
//!
//! This crate has no dependency on storage, networking, or EVM execution
//! crates — it only defines the wire-visible and consensus-critical shapes
//! that the rest of the workspace builds on.

mod ids;
pub use ids::{AssetId, Address, ChainId, EthTxHash, NodeId, TxId};

mod tx;
pub use tx::{Credential, EvmInput, Output, Secp256k1Signature, TransferableOutput};

mod atomic_tx;
pub use atomic_tx::{AtomicTx, UnsignedAtomicTx};

mod rules;
pub use rules::Rules;

mod context;
pub use context::VmContext;

mod constants;
pub use constants::*;
