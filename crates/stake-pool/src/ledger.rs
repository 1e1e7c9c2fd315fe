//! Read access to ledger accounts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use sol_core::Pubkey;

use crate::error::StakeError;

/// Fetches raw account data.
///
/// `Ok(None)` means the account does not exist. Transport failures are
/// `Err(StakeError::LedgerRead { .. })`. Implementations are shared across
/// the fork/join lookups of one composition, hence `Send + Sync`.
pub trait LedgerReader: Send + Sync {
    fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, StakeError>;

    fn account_exists(&self, address: &Pubkey) -> Result<bool, StakeError> {
        Ok(self.fetch_account(address)?.is_some())
    }
}

/// A fixed snapshot of accounts, for offline composition and tests.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: HashMap<Pubkey, Vec<u8>>,
    reads: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: Pubkey, data: Vec<u8>) {
        self.accounts.insert(address, data);
    }

    pub fn with_account(mut self, address: Pubkey, data: Vec<u8>) -> Self {
        self.insert(address, data);
        self
    }

    /// Number of `fetch_account` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl LedgerReader for InMemoryLedger {
    fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, StakeError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.accounts.get(address).cloned())
    }
}
