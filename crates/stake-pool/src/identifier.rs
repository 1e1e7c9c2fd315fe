//! Next-pool-identifier proposals from the on-chain counter.
//!
//! `init_pool` bumps a singleton counter account. Reading it gives the next
//! free identifier, but nothing is reserved: two callers reading the same
//! count will race, and the loser's `init_pool` fails on-chain because the
//! pool address already exists. Callers should re-read and retry then.

use borsh::{BorshDeserialize, BorshSerialize};
use sol_core::{encode_address, Pubkey};

use crate::codec::{account_data, decode_account};
use crate::error::StakeError;
use crate::ledger::LedgerReader;
use crate::pda::find_identifier_address;

/// Identifier proposed when no pool has been created yet.
pub const FIRST_POOL_IDENTIFIER: u64 = 1;

const ACCOUNT_NAME: &str = "Identifier";

/// Decoded identifier counter account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct IdentifierAccount {
    pub bump: u8,
    pub count: u64,
}

impl IdentifierAccount {
    pub fn decode(data: &[u8]) -> Result<Self, StakeError> {
        decode_account(ACCOUNT_NAME, data)
    }

    pub fn encode(&self) -> Result<Vec<u8>, StakeError> {
        account_data(ACCOUNT_NAME, self)
    }
}

/// Load the counter account. `Ok(None)` when it does not exist yet.
///
/// Undecodable data is `AccountUnreadable`.
pub fn fetch_identifier(
    ledger: &dyn LedgerReader,
    program_id: &Pubkey,
) -> Result<Option<IdentifierAccount>, StakeError> {
    let address = find_identifier_address(program_id)?.address;
    let Some(data) = ledger.fetch_account(&address)? else {
        return Ok(None);
    };

    IdentifierAccount::decode(&data)
        .map(Some)
        .map_err(|e| StakeError::AccountUnreadable {
            address: encode_address(&address),
            reason: e.to_string(),
        })
}

/// Propose the next unused pool identifier.
///
/// An absent or unreadable counter yields [`FIRST_POOL_IDENTIFIER`].
/// Ledger transport errors are returned, not papered over: defaulting to `1`
/// after a timeout would propose an identifier that is almost certainly
/// taken.
pub fn next_pool_identifier(
    ledger: &dyn LedgerReader,
    program_id: &Pubkey,
) -> Result<u64, StakeError> {
    match fetch_identifier(ledger, program_id) {
        Ok(Some(account)) => account.count.checked_add(1).ok_or_else(|| {
            StakeError::InvalidArgument("pool identifier counter is at u64::MAX".into())
        }),
        Ok(None) => Ok(FIRST_POOL_IDENTIFIER),
        Err(StakeError::AccountUnreadable { address, reason }) => {
            log::warn!("identifier counter {address} unreadable ({reason}), proposing first id");
            Ok(FIRST_POOL_IDENTIFIER)
        }
        Err(e) => Err(e),
    }
}
