//! Find-or-create for associated token accounts within a draft.
//!
//! Lookups for a batch run in parallel; creations are then appended in
//! request order, so the resulting instruction list does not depend on
//! which lookup finished first.

use rayon::prelude::*;
use sol_core::{
    build_create_associated_token_account, derive_associated_token_address,
    is_create_associated_token_account, Pubkey,
};

use crate::draft::TransactionDraft;
use crate::error::StakeError;
use crate::ledger::LedgerReader;

/// One associated token account to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRequest {
    pub mint: Pubkey,
    pub owner: Pubkey,
    /// Program-derived owners sit off the Ed25519 curve and must opt in.
    pub allow_owner_off_curve: bool,
}

impl AccountRequest {
    /// Account owned by a wallet key.
    pub fn wallet(mint: Pubkey, owner: Pubkey) -> Self {
        Self {
            mint,
            owner,
            allow_owner_off_curve: false,
        }
    }

    /// Account owned by a program-derived address.
    pub fn program_owned(mint: Pubkey, owner: Pubkey) -> Self {
        Self {
            mint,
            owner,
            allow_owner_off_curve: true,
        }
    }
}

enum Lookup {
    Resolved(Pubkey),
    Fetched { address: Pubkey, exists: bool },
}

fn lookup(
    draft: &TransactionDraft,
    ledger: &dyn LedgerReader,
    request: &AccountRequest,
) -> Result<Lookup, StakeError> {
    if let Some(address) = draft.resolved_account(&request.mint, &request.owner) {
        return Ok(Lookup::Resolved(address));
    }
    let address = derive_associated_token_address(
        &request.owner,
        &request.mint,
        request.allow_owner_off_curve,
    )?;
    let exists = ledger.account_exists(&address)?;
    Ok(Lookup::Fetched { address, exists })
}

/// Resolve every request, appending a creation for each account that
/// neither exists on the ledger nor is already created in `draft`.
///
/// Returns the addresses in request order. Pairs resolved earlier in the
/// same draft are answered from the draft without touching the ledger.
/// The payer funds every creation.
pub fn find_or_init_associated_accounts(
    draft: &mut TransactionDraft,
    ledger: &dyn LedgerReader,
    requests: &[AccountRequest],
) -> Result<Vec<Pubkey>, StakeError> {
    let lookups = {
        let snapshot: &TransactionDraft = draft;
        requests
            .par_iter()
            .map(|request| lookup(snapshot, ledger, request))
            .collect::<Result<Vec<_>, _>>()?
    };

    let payer = *draft.payer();
    let mut addresses = Vec::with_capacity(requests.len());

    for (request, lookup) in requests.iter().zip(lookups) {
        let address = match lookup {
            Lookup::Resolved(address) => address,
            Lookup::Fetched { address, exists } => {
                let pending = draft
                    .instructions()
                    .iter()
                    .any(|ix| is_create_associated_token_account(ix, &address));
                if !exists && !pending {
                    draft.add(
                        "create_associated_token_account",
                        build_create_associated_token_account(
                            &payer,
                            &address,
                            &request.owner,
                            &request.mint,
                        ),
                    );
                }
                draft.record_resolved(request.mint, request.owner, address);
                address
            }
        };
        addresses.push(address);
    }

    Ok(addresses)
}

/// Single-request form of [`find_or_init_associated_accounts`].
pub fn find_or_init_associated_account(
    draft: &mut TransactionDraft,
    ledger: &dyn LedgerReader,
    request: AccountRequest,
) -> Result<Pubkey, StakeError> {
    let addresses = find_or_init_associated_accounts(draft, ledger, &[request])?;
    addresses
        .into_iter()
        .next()
        .ok_or_else(|| StakeError::InvalidArgument("no associated account resolved".into()))
}
