//! SPL Token and Associated Token Account (ATA) conventions.
//!
//! Implements ATA address derivation and the ATA program's create
//! instructions without pulling in the `spl-token` or
//! `spl-associated-token-account` crates.

use crate::address::{is_on_curve, Pubkey, SYSTEM_PROGRAM_ID};
use crate::error::SolError;
use crate::pda::find_program_address;
use crate::transaction::{SolAccountMeta, SolInstruction};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
];

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
];

/// ATA program `CreateIdempotent` tag. `Create` (tag 0) fails if the
/// account already exists; the idempotent form succeeds either way.
const CREATE_IDEMPOTENT_TAG: u8 = 1;

// ---------------------------------------------------------------------------
// Address derivation
// ---------------------------------------------------------------------------

/// Derive the associated token account for an owner + mint pair.
///
/// Seeds: `[owner, token_program_id, mint]` under the ATA program.
///
/// Wallet owners are Ed25519 keys. Program-derived owners (escrows, vault
/// PDAs) are off the curve and must be opted into with
/// `allow_owner_off_curve`, mirroring the check wallets apply before sending
/// tokens to an address nobody can sign for.
pub fn derive_associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
    allow_owner_off_curve: bool,
) -> Result<Pubkey, SolError> {
    if !allow_owner_off_curve && !is_on_curve(owner) {
        return Err(SolError::InvalidPublicKey(
            "token account owner is off the curve".into(),
        ));
    }

    find_program_address(
        &[owner.as_ref(), &TOKEN_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|pda| pda.address)
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// Build an ATA program `CreateIdempotent` instruction.
///
/// Account order: payer (signer, writable), associated account (writable),
/// owner, mint, system program, token program.
pub fn build_create_associated_token_account(
    payer: &Pubkey,
    associated_account: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> SolInstruction {
    SolInstruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*payer, true),
            SolAccountMeta::writable(*associated_account, false),
            SolAccountMeta::readonly(*owner, false),
            SolAccountMeta::readonly(*mint, false),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            SolAccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: vec![CREATE_IDEMPOTENT_TAG],
    }
}

/// Whether `ix` is an ATA creation for `associated_account`.
pub fn is_create_associated_token_account(ix: &SolInstruction, associated_account: &Pubkey) -> bool {
    ix.program_id == ASSOCIATED_TOKEN_PROGRAM_ID
        && ix
            .accounts
            .get(1)
            .is_some_and(|meta| meta.pubkey == *associated_account)
}
