//! Solana ledger primitives for client-side transaction building.
//!
//! Addresses, program-derived addresses, keypairs, associated token
//! accounts, and the legacy message format, built on `ed25519-dalek`,
//! `curve25519-dalek`, `sha2` and `bs58` instead of `solana-sdk`.

pub mod address;
pub mod associated_token;
pub mod error;
pub mod keypair;
pub mod pda;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{
    decode_address, encode_address, is_on_curve, Pubkey, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID,
};
pub use associated_token::{
    build_create_associated_token_account, derive_associated_token_address,
    is_create_associated_token_account, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use error::SolError;
pub use keypair::Keypair;
pub use pda::{create_program_address, find_program_address, ProgramAddress};
pub use transaction::{
    compile_transaction, encode_compact_u16, serialize_message, sign_transaction,
    CompiledInstruction, SolAccountMeta, SolInstruction, SolTransaction,
};
