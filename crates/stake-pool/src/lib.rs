//! Client-side transaction composition for the stake pool program.
//!
//! Derives the program's accounts (pools, entries, the identifier counter)
//! and those of its collaborators (token manager, token metadata, associated
//! token accounts), proposes pool identifiers from the ledger, and appends
//! create-pool, create-entry, stake, unstake and update-pool instructions to
//! a caller-owned [`TransactionDraft`]. Submitting the result is left to the
//! caller.

pub mod associated;
pub mod codec;
pub mod composer;
pub mod config;
pub mod draft;
pub mod error;
pub mod identifier;
pub mod instruction;
pub mod ledger;
pub mod metadata;
pub mod pda;
pub mod seeds;
pub mod token_manager;

pub use associated::{find_or_init_associated_account, find_or_init_associated_accounts, AccountRequest};
pub use composer::Composer;
pub use config::{ProgramIds, StakeConfig};
pub use draft::TransactionDraft;
pub use error::StakeError;
pub use identifier::{next_pool_identifier, IdentifierAccount, FIRST_POOL_IDENTIFIER};
pub use instruction::{is_instruction, EntryMetadata, PoolSettings, PoolUpdate};
pub use ledger::{InMemoryLedger, LedgerReader};
pub use metadata::find_metadata_address;
pub use pda::{
    find_identifier_address, find_stake_entry_address, find_stake_entry_address_for_pool,
    find_stake_pool_address,
};
pub use token_manager::{
    find_mint_counter_address, find_mint_manager_address, find_token_manager_address,
    Invalidator, TokenManagerInvalidator, TokenManagerKind,
};
