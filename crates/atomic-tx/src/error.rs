use thiserror::Error;

/// Errors raised while marshaling or unmarshaling the canonical atomic-tx
/// encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer ended before a field's declared length was satisfied.
    #[error("unexpected end of buffer while decoding")]
    UnexpectedEof,
    /// The codec version tag did not match the only version this
    /// implementation understands.
    #[error("unsupported codec version: {0}")]
    UnsupportedVersion(u16),
    /// A type ID tag did not match any variant this implementation
    /// decodes.
    #[error("unsupported type id: {0}")]
    UnsupportedTypeId(u32),
    /// An address set was not encoded in ascending canonical order.
    #[error("addresses not canonically sorted")]
    AddrsNotSorted,
    /// Trailing bytes remained after a complete, well-formed decode.
    #[error("{0} trailing byte(s) after decode")]
    TrailingBytes(usize),
}

/// Errors raised by [`crate::verify::verify`] (stateless well-formedness)
/// and [`crate::verify::semantic_verify`] (stateful checks).
///
/// Names mirror the stable taxonomy this subsystem must preserve across
/// implementations; error *order* (which rule fires first) is part of the
/// consensus-critical behavior and is preserved by evaluating rules in the
/// exact sequence listed against each function.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// No transaction was supplied.
    #[error("nil transaction")]
    NilTx,
    /// `destination_chain` did not match the configured X-Chain ID.
    #[error("wrong destination chain id")]
    WrongChainId,
    /// `exported_outputs` was empty.
    #[error("no export outputs")]
    NoExportOutputs,
    /// `network_id` did not match the VM context.
    #[error("wrong network id")]
    WrongNetworkId,
    /// `blockchain_id` did not match the VM context.
    #[error("wrong blockchain id")]
    WrongBlockchainId,
    /// An input carried a zero amount.
    #[error("input {0} has a zero amount")]
    ZeroAmountInput(usize),
    /// An output carried a zero amount.
    #[error("output {0} has a zero amount")]
    ZeroAmountOutput(usize),
    /// An output's spend threshold exceeded its address-set size.
    #[error("output {index} has threshold {threshold} over {num_addrs} address(es)")]
    ThresholdExceedsAddrs {
        /// Index of the offending output.
        index: usize,
        /// The output's configured threshold.
        threshold: u32,
        /// Number of addresses the output carries.
        num_addrs: usize,
    },
    /// `exported_outputs` was not sorted by canonical output bytes.
    #[error("exported outputs not sorted")]
    OutputsNotSorted,
    /// `ins` was not sorted/unique per the tie-break rule (only enforced
    /// from `ApricotPhase1` onward).
    #[error("inputs not sorted/unique")]
    InputsNotSortedUnique,
    /// `credentials.len() != ins.len()`.
    #[error("credential count {credentials} does not match input count {inputs}")]
    SignatureInputsMismatch {
        /// Number of credentials present.
        credentials: usize,
        /// Number of inputs present.
        inputs: usize,
    },
    /// A credential did not carry exactly one signature.
    #[error("credential {index} carries {count} signature(s), expected exactly 1")]
    CredentialStructural {
        /// Index of the offending credential.
        index: usize,
        /// Number of signatures it carried.
        count: usize,
    },
    /// A credential's recovered address did not match its input's address.
    #[error("credential {0} recovered address does not match its input")]
    PublicKeySignatureMismatch(usize),
    /// A credential's signature bytes were not a valid recoverable
    /// signature.
    #[error("credential {0} has a malformed signature")]
    MalformedSignature(usize),
    /// An input or output amount sum overflowed `u64`.
    #[error("overflow summing amounts for asset")]
    Overflow,
    /// Flow conservation failed for the named asset: inputs did not equal
    /// outputs plus fee.
    #[error("flow conservation failed for an asset")]
    FlowConservation,
}
