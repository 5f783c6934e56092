use thiserror::Error;

/// Errors raised applying an accepted export's EVM-side state mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateTransferError {
    /// An input's address did not have sufficient balance for the asset it
    /// debits.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// An input's nonce did not match the address's expected nonce at the
    /// point it was processed.
    #[error("invalid nonce")]
    InvalidNonce,
    /// Scaling an input's amount into EVM native units overflowed.
    #[error("overflow scaling input amount")]
    Overflow,
}
