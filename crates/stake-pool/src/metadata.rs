//! Token metadata program addresses.

use sol_core::{ProgramAddress, Pubkey};

use crate::error::StakeError;
use crate::pda::derive;
use crate::seeds::METADATA_SEED;

/// Token metadata PDA for `mint`: `["metadata", metadata_program, mint]`
/// under the metadata program.
pub fn find_metadata_address(
    metadata_program: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramAddress, StakeError> {
    derive(
        &[METADATA_SEED, metadata_program.as_ref(), mint.as_ref()],
        metadata_program,
    )
}
