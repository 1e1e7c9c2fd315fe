use sol_core::SolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakeError {
    #[error("Derivation exhausted: {0}")]
    DerivationExhausted(String),

    #[error("Account {address} unreadable: {reason}")]
    AccountUnreadable { address: String, reason: String },

    #[error("Ledger read failed for {address}: {reason}")]
    LedgerRead { address: String, reason: String },

    #[error("Composition of {operation} aborted: {source}")]
    CompositionAborted {
        operation: &'static str,
        #[source]
        source: Box<StakeError>,
    },

    #[error("Ledger rejected transaction: {0}")]
    LedgerRejected(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Transaction build failed: {0}")]
    Transaction(String),
}

impl StakeError {
    pub(crate) fn aborted(operation: &'static str, source: StakeError) -> Self {
        StakeError::CompositionAborted {
            operation,
            source: Box::new(source),
        }
    }
}

impl From<SolError> for StakeError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::DerivationExhausted => StakeError::DerivationExhausted(e.to_string()),
            SolError::InvalidSeeds(reason)
            | SolError::InvalidAddress(reason)
            | SolError::InvalidPublicKey(reason) => StakeError::InvalidArgument(reason),
            other => StakeError::Transaction(other.to_string()),
        }
    }
}
