use thiserror::Error;

/// Solana primitive errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("no viable bump seed for program address derivation")]
    DerivationExhausted,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("missing signer: {0}")]
    MissingSigner(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}
