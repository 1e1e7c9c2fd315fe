//! Stake pool program addresses.
//!
//! Every function here is a pure seed concatenation over
//! [`sol_core::find_program_address`]; none touch the ledger.

use sol_core::{find_program_address, ProgramAddress, Pubkey};

use crate::error::StakeError;
use crate::seeds::{IDENTIFIER_SEED, STAKE_ENTRY_SEED, STAKE_POOL_SEED};

/// Derive `seeds` under `program_id`.
pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<ProgramAddress, StakeError> {
    Ok(find_program_address(seeds, program_id)?)
}

/// Stake pool PDA: `["stake-pool", identifier as u64 LE]`.
pub fn find_stake_pool_address(
    program_id: &Pubkey,
    identifier: u64,
) -> Result<ProgramAddress, StakeError> {
    derive(&[STAKE_POOL_SEED, &identifier.to_le_bytes()], program_id)
}

/// Stake entry PDA: `["stake-entry", stake_pool, original_mint]`.
pub fn find_stake_entry_address(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    original_mint: &Pubkey,
) -> Result<ProgramAddress, StakeError> {
    derive(
        &[STAKE_ENTRY_SEED, stake_pool.as_ref(), original_mint.as_ref()],
        program_id,
    )
}

/// Stake entry PDA starting from the pool identifier.
///
/// Two sequential derivations; the entry seeds need the pool address.
pub fn find_stake_entry_address_for_pool(
    program_id: &Pubkey,
    stake_pool_identifier: u64,
    original_mint: &Pubkey,
) -> Result<ProgramAddress, StakeError> {
    let stake_pool = find_stake_pool_address(program_id, stake_pool_identifier)?;
    find_stake_entry_address(program_id, &stake_pool.address, original_mint)
}

/// Singleton identifier counter PDA: `["identifier"]`.
pub fn find_identifier_address(program_id: &Pubkey) -> Result<ProgramAddress, StakeError> {
    derive(&[IDENTIFIER_SEED], program_id)
}
