//! Multi-instruction stake pool operations over a [`TransactionDraft`].
//!
//! Each operation derives what it needs (independent derivations in
//! parallel), resolves associated token accounts against the ledger, and
//! appends its instructions. An operation either appends everything or, on
//! any failure, leaves the draft exactly as it found it.

use sol_core::{derive_associated_token_address, encode_address, Keypair, ProgramAddress, Pubkey};

use crate::associated::{find_or_init_associated_accounts, AccountRequest};
use crate::config::{ProgramIds, StakeConfig};
use crate::draft::TransactionDraft;
use crate::error::StakeError;
use crate::identifier::next_pool_identifier;
use crate::instruction::{
    self, EntryMetadata, InitEntryAccounts, InitPoolAccounts, PoolSettings, PoolUpdate,
    StakeAccounts, UnstakeAccounts,
};
use crate::ledger::LedgerReader;
use crate::metadata::find_metadata_address;
use crate::pda::{
    find_identifier_address, find_stake_entry_address, find_stake_entry_address_for_pool,
    find_stake_pool_address,
};
use crate::token_manager::{
    find_mint_counter_address, find_mint_manager_address, find_token_manager_address,
    Invalidator, TokenManagerInvalidator, TokenManagerKind,
};

fn join3<A, B, C, RA, RB, RC>(a: A, b: B, c: C) -> (RA, RB, RC)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    C: FnOnce() -> RC + Send,
    RA: Send,
    RB: Send,
    RC: Send,
{
    let (ra, (rb, rc)) = rayon::join(a, || rayon::join(b, c));
    (ra, rb, rc)
}

pub struct Composer<'a> {
    ledger: &'a dyn LedgerReader,
    programs: ProgramIds,
    invalidator: Box<dyn Invalidator + 'a>,
}

impl<'a> Composer<'a> {
    /// Composer using the token manager program for invalidation.
    pub fn new(ledger: &'a dyn LedgerReader, programs: ProgramIds) -> Self {
        Self {
            ledger,
            programs,
            invalidator: Box::new(TokenManagerInvalidator::new(programs)),
        }
    }

    pub fn from_config(
        ledger: &'a dyn LedgerReader,
        config: &StakeConfig,
    ) -> Result<Self, StakeError> {
        Ok(Self::new(ledger, config.program_ids()?))
    }

    /// Replace the custody-invalidation step run before `unstake`.
    pub fn with_invalidator(mut self, invalidator: impl Invalidator + 'a) -> Self {
        self.invalidator = Box::new(invalidator);
        self
    }

    pub fn programs(&self) -> &ProgramIds {
        &self.programs
    }

    /// Next unused pool identifier according to the ledger. Advisory only.
    pub fn propose_pool_identifier(&self) -> Result<u64, StakeError> {
        next_pool_identifier(self.ledger, &self.programs.stake_pool)
    }

    fn atomically<T>(
        &self,
        draft: &mut TransactionDraft,
        operation: &'static str,
        build: impl FnOnce(&mut TransactionDraft) -> Result<T, StakeError>,
    ) -> Result<T, StakeError> {
        let checkpoint = draft.checkpoint();
        match build(draft) {
            Ok(value) => Ok(value),
            Err(e) => {
                draft.rollback(checkpoint);
                log::debug!("{operation} aborted: {e}");
                Err(StakeError::aborted(operation, e))
            }
        }
    }

    /// Append `init_pool` for `identifier`. Returns the pool address.
    pub fn create_pool(
        &self,
        draft: &mut TransactionDraft,
        identifier: u64,
        settings: &PoolSettings,
    ) -> Result<Pubkey, StakeError> {
        let programs = self.programs;
        self.atomically(draft, "create_pool", |draft| {
            let (pool, counter) = rayon::join(
                || find_stake_pool_address(&programs.stake_pool, identifier),
                || find_identifier_address(&programs.stake_pool),
            );
            let pool = pool?.address;
            let payer = *draft.payer();

            draft.add(
                "init_pool",
                instruction::init_pool(
                    &programs,
                    &InitPoolAccounts {
                        stake_pool: pool,
                        identifier: counter?.address,
                        payer,
                    },
                    identifier,
                    settings,
                )?,
            );
            log::info!("create_pool: pool {identifier} at {}", encode_address(&pool));
            Ok(pool)
        })
    }

    /// Append `init_entry` for `original_mint` in pool `stake_pool_identifier`.
    /// Returns the stake entry.
    ///
    /// `receipt_mint` must be a fresh keypair; the program creates the mint
    /// at its address, so the caller signs with it. It is only borrowed and
    /// can be reused after a failed composition.
    pub fn create_entry(
        &self,
        draft: &mut TransactionDraft,
        stake_pool_identifier: u64,
        original_mint: &Pubkey,
        receipt_mint: &Keypair,
        metadata: &EntryMetadata,
    ) -> Result<Pubkey, StakeError> {
        let programs = self.programs;
        let receipt = receipt_mint.pubkey();

        let stake_entry = self.atomically(draft, "create_entry", |draft| {
            let ((pool_and_entry, mint_manager), (receipt_metadata, original_metadata)) =
                rayon::join(
                    || {
                        rayon::join(
                            || -> Result<(ProgramAddress, ProgramAddress), StakeError> {
                                let pool = find_stake_pool_address(
                                    &programs.stake_pool,
                                    stake_pool_identifier,
                                )?;
                                let entry = find_stake_entry_address(
                                    &programs.stake_pool,
                                    &pool.address,
                                    original_mint,
                                )?;
                                Ok((pool, entry))
                            },
                            || find_mint_manager_address(&programs.token_manager, &receipt),
                        )
                    },
                    || {
                        rayon::join(
                            || find_metadata_address(&programs.token_metadata, &receipt),
                            || find_metadata_address(&programs.token_metadata, original_mint),
                        )
                    },
                );
            let (pool, entry) = pool_and_entry?;
            let entry_receipt_account =
                derive_associated_token_address(&entry.address, &receipt, true)?;
            let payer = *draft.payer();

            draft.add(
                "init_entry",
                instruction::init_entry(
                    &programs,
                    &InitEntryAccounts {
                        stake_entry: entry.address,
                        stake_pool: pool.address,
                        original_mint: *original_mint,
                        original_mint_metadata: original_metadata?.address,
                        receipt_mint: receipt,
                        mint_manager: mint_manager?.address,
                        stake_entry_receipt_mint_token_account: entry_receipt_account,
                        receipt_mint_metadata: receipt_metadata?.address,
                        payer,
                    },
                    metadata,
                )?,
            );
            Ok(entry.address)
        })?;

        log::info!(
            "create_entry: entry {} receipt mint {}",
            encode_address(&stake_entry),
            encode_address(&receipt)
        );
        Ok(stake_entry)
    }

    /// Stake `original_mint` from the payer's wallet. Returns the token
    /// manager that takes custody of the receipt.
    pub fn stake(
        &self,
        draft: &mut TransactionDraft,
        stake_pool_identifier: u64,
        original_mint: &Pubkey,
        receipt_mint: &Pubkey,
    ) -> Result<Pubkey, StakeError> {
        let programs = self.programs;
        let ledger = self.ledger;

        self.atomically(draft, "stake", |draft| {
            let pool = find_stake_pool_address(&programs.stake_pool, stake_pool_identifier)?;
            let (entry, token_manager, mint_counter) = join3(
                || find_stake_entry_address(&programs.stake_pool, &pool.address, original_mint),
                || find_token_manager_address(&programs.token_manager, receipt_mint),
                || find_mint_counter_address(&programs.token_manager, receipt_mint),
            );
            let entry = entry?.address;
            let token_manager = token_manager?.address;
            let user = *draft.payer();

            let accounts = find_or_init_associated_accounts(
                draft,
                ledger,
                &[
                    AccountRequest::wallet(*original_mint, user),
                    AccountRequest::wallet(*receipt_mint, user),
                    AccountRequest::program_owned(*original_mint, entry),
                    AccountRequest::program_owned(*receipt_mint, entry),
                    AccountRequest::program_owned(*receipt_mint, token_manager),
                ],
            )?;
            let [user_original, user_receipt, entry_original, entry_receipt, manager_receipt] =
                resolved_five(accounts)?;

            draft.add(
                "stake",
                instruction::stake(
                    &programs,
                    &StakeAccounts {
                        stake_entry: entry,
                        stake_pool: pool.address,
                        original_mint: *original_mint,
                        receipt_mint: *receipt_mint,
                        stake_entry_original_mint_token_account: entry_original,
                        stake_entry_receipt_mint_token_account: entry_receipt,
                        user,
                        user_original_mint_token_account: user_original,
                        user_receipt_mint_token_account: user_receipt,
                        token_manager,
                        mint_counter: mint_counter?.address,
                        token_manager_receipt_mint_token_account: manager_receipt,
                    },
                    TokenManagerKind::Managed,
                )?,
            );
            log::info!(
                "stake: entry {} token manager {}",
                encode_address(&entry),
                encode_address(&token_manager)
            );
            Ok(token_manager)
        })
    }

    /// Unstake `original_mint` back to the payer. Invalidation of the
    /// receipt's token manager is appended before `unstake`. Returns the
    /// stake entry.
    pub fn unstake(
        &self,
        draft: &mut TransactionDraft,
        stake_pool_identifier: u64,
        original_mint: &Pubkey,
        receipt_mint: &Pubkey,
    ) -> Result<Pubkey, StakeError> {
        let programs = self.programs;
        let ledger = self.ledger;
        let invalidator = &*self.invalidator;

        self.atomically(draft, "unstake", |draft| {
            let (entry, token_manager) = rayon::join(
                || {
                    find_stake_entry_address_for_pool(
                        &programs.stake_pool,
                        stake_pool_identifier,
                        original_mint,
                    )
                },
                || find_token_manager_address(&programs.token_manager, receipt_mint),
            );
            let entry = entry?.address;
            let token_manager = token_manager?.address;
            let user = *draft.payer();

            let accounts = find_or_init_associated_accounts(
                draft,
                ledger,
                &[
                    AccountRequest::program_owned(*original_mint, entry),
                    AccountRequest::program_owned(*receipt_mint, entry),
                    AccountRequest::wallet(*original_mint, user),
                    AccountRequest::wallet(*receipt_mint, user),
                    AccountRequest::program_owned(*receipt_mint, token_manager),
                ],
            )?;
            let [entry_original, entry_receipt, user_original, user_receipt, manager_receipt] =
                resolved_five(accounts)?;

            invalidator.invalidate(draft, receipt_mint)?;

            draft.add(
                "unstake",
                instruction::unstake(
                    &programs,
                    &UnstakeAccounts {
                        stake_entry: entry,
                        token_manager,
                        stake_entry_original_mint_token_account: entry_original,
                        stake_entry_receipt_mint_token_account: entry_receipt,
                        user,
                        user_original_mint_token_account: user_original,
                        user_receipt_mint_token_account: user_receipt,
                        token_manager_receipt_mint_token_account: manager_receipt,
                    },
                ),
            );
            log::info!("unstake: entry {}", encode_address(&entry));
            Ok(entry)
        })
    }

    /// Append `update_pool`. The payer must be the pool authority.
    pub fn update_pool(
        &self,
        draft: &mut TransactionDraft,
        stake_pool_identifier: u64,
        update: &PoolUpdate,
    ) -> Result<Pubkey, StakeError> {
        let programs = self.programs;
        self.atomically(draft, "update_pool", |draft| {
            let pool =
                find_stake_pool_address(&programs.stake_pool, stake_pool_identifier)?.address;
            let payer = *draft.payer();
            draft.add(
                "update_pool",
                instruction::update_pool(&programs, &pool, &payer, update)?,
            );
            log::info!("update_pool: pool {stake_pool_identifier}");
            Ok(pool)
        })
    }
}

fn resolved_five(accounts: Vec<Pubkey>) -> Result<[Pubkey; 5], StakeError> {
    let count = accounts.len();
    accounts.try_into().map_err(|_| {
        StakeError::InvalidArgument(format!("expected 5 associated accounts, resolved {count}"))
    })
}
