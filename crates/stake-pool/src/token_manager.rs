//! Token manager program: addresses, the `invalidate` instruction and the
//! custody-invalidation hook used before unstaking.

use sol_core::{
    derive_associated_token_address, ProgramAddress, Pubkey, SolAccountMeta, SolInstruction,
    TOKEN_PROGRAM_ID,
};

use crate::codec::instruction_discriminator;
use crate::config::ProgramIds;
use crate::draft::TransactionDraft;
use crate::error::StakeError;
use crate::pda::derive;
use crate::seeds::{MINT_COUNTER_SEED, MINT_MANAGER_SEED, TOKEN_MANAGER_SEED};

/// How the token manager holds the receipt token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenManagerKind {
    /// The token manager is the mint authority and can freeze/thaw.
    Managed = 1,
    /// Plain escrow transfer.
    Unmanaged = 2,
    /// Master edition delegated to the token manager.
    Edition = 3,
}

impl TokenManagerKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// `["token-manager", mint]` under the token manager program.
pub fn find_token_manager_address(
    program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramAddress, StakeError> {
    derive(&[TOKEN_MANAGER_SEED, mint.as_ref()], program_id)
}

/// `["mint-counter", mint]` under the token manager program.
pub fn find_mint_counter_address(
    program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramAddress, StakeError> {
    derive(&[MINT_COUNTER_SEED, mint.as_ref()], program_id)
}

/// `["mint-manager", mint]` under the token manager program.
pub fn find_mint_manager_address(
    program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<ProgramAddress, StakeError> {
    derive(&[MINT_MANAGER_SEED, mint.as_ref()], program_id)
}

/// Accounts of the token manager `invalidate` instruction.
#[derive(Debug, Clone, Copy)]
pub struct InvalidateAccounts {
    pub token_manager: Pubkey,
    pub token_manager_token_account: Pubkey,
    pub mint: Pubkey,
    pub recipient_token_account: Pubkey,
    pub invalidator: Pubkey,
}

pub fn invalidate(program_id: &Pubkey, accounts: &InvalidateAccounts) -> SolInstruction {
    SolInstruction {
        program_id: *program_id,
        accounts: vec![
            SolAccountMeta::writable(accounts.token_manager, false),
            SolAccountMeta::writable(accounts.token_manager_token_account, false),
            SolAccountMeta::writable(accounts.mint, false),
            SolAccountMeta::writable(accounts.recipient_token_account, false),
            SolAccountMeta::writable(accounts.invalidator, true),
            SolAccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: instruction_discriminator("invalidate").to_vec(),
    }
}

/// Appends whatever releases the token manager's custody of a receipt mint.
///
/// Runs after the unstake's associated accounts are resolved and before the
/// `unstake` instruction itself.
pub trait Invalidator: Send + Sync {
    fn invalidate(
        &self,
        draft: &mut TransactionDraft,
        receipt_mint: &Pubkey,
    ) -> Result<(), StakeError>;
}

/// Invalidates through the token manager program, with the draft payer as
/// invalidator and recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenManagerInvalidator {
    programs: ProgramIds,
}

impl TokenManagerInvalidator {
    pub fn new(programs: ProgramIds) -> Self {
        Self { programs }
    }
}

impl Invalidator for TokenManagerInvalidator {
    fn invalidate(
        &self,
        draft: &mut TransactionDraft,
        receipt_mint: &Pubkey,
    ) -> Result<(), StakeError> {
        let payer = *draft.payer();
        let token_manager =
            find_token_manager_address(&self.programs.token_manager, receipt_mint)?;

        let token_account = |owner: &Pubkey, off_curve: bool| -> Result<Pubkey, StakeError> {
            match draft.resolved_account(receipt_mint, owner) {
                Some(address) => Ok(address),
                None => Ok(derive_associated_token_address(owner, receipt_mint, off_curve)?),
            }
        };
        let token_manager_token_account = token_account(&token_manager.address, true)?;
        let recipient_token_account = token_account(&payer, false)?;

        draft.add(
            "invalidate",
            invalidate(
                &self.programs.token_manager,
                &InvalidateAccounts {
                    token_manager: token_manager.address,
                    token_manager_token_account,
                    mint: *receipt_mint,
                    recipient_token_account,
                    invalidator: payer,
                },
            ),
        );
        Ok(())
    }
}
