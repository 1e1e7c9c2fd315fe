//! Stake pool program instruction builders.
//!
//! Each builder takes fully resolved accounts; deriving them is the
//! composer's job. Account order and writability mirror the program's
//! Anchor contexts exactly, since the program reads accounts positionally.

use borsh::BorshSerialize;
use sol_core::{
    Pubkey, SolAccountMeta, SolInstruction, ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID,
    SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

use crate::codec::{instruction_data, instruction_discriminator};
use crate::config::ProgramIds;
use crate::error::StakeError;
use crate::token_manager::TokenManagerKind;

/// Whether `ix` is the `name` handler of `program_id`.
pub fn is_instruction(ix: &SolInstruction, program_id: &Pubkey, name: &str) -> bool {
    ix.program_id == *program_id && ix.data.starts_with(&instruction_discriminator(name))
}

// ---------------------------------------------------------------------------
// init_pool
// ---------------------------------------------------------------------------

/// Pool parameters chosen at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSettings {
    pub overlay_text: String,
    pub image_uri: String,
    pub allowed_collections: Vec<Pubkey>,
    pub allowed_creators: Vec<Pubkey>,
    /// Pool authority. Defaults to the payer.
    pub authority: Option<Pubkey>,
}

#[derive(Debug, Clone, Copy)]
pub struct InitPoolAccounts {
    pub stake_pool: Pubkey,
    pub identifier: Pubkey,
    pub payer: Pubkey,
}

#[derive(BorshSerialize)]
struct InitPoolArgs<'a> {
    identifier: u64,
    overlay_text: &'a str,
    image_uri: &'a str,
    requires_collections: &'a [Pubkey],
    requires_creators: &'a [Pubkey],
    authority: Pubkey,
}

pub fn init_pool(
    programs: &ProgramIds,
    accounts: &InitPoolAccounts,
    identifier: u64,
    settings: &PoolSettings,
) -> Result<SolInstruction, StakeError> {
    let data = instruction_data(
        "init_pool",
        &InitPoolArgs {
            identifier,
            overlay_text: &settings.overlay_text,
            image_uri: &settings.image_uri,
            requires_collections: &settings.allowed_collections,
            requires_creators: &settings.allowed_creators,
            authority: settings.authority.unwrap_or(accounts.payer),
        },
    )?;

    Ok(SolInstruction {
        program_id: programs.stake_pool,
        accounts: vec![
            SolAccountMeta::writable(accounts.stake_pool, false),
            SolAccountMeta::writable(accounts.identifier, false),
            SolAccountMeta::writable(accounts.payer, true),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data,
    })
}

// ---------------------------------------------------------------------------
// init_entry
// ---------------------------------------------------------------------------

/// Receipt token metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub name: String,
    pub symbol: String,
    pub text_overlay: String,
}

#[derive(Debug, Clone, Copy)]
pub struct InitEntryAccounts {
    pub stake_entry: Pubkey,
    pub stake_pool: Pubkey,
    pub original_mint: Pubkey,
    pub original_mint_metadata: Pubkey,
    pub receipt_mint: Pubkey,
    pub mint_manager: Pubkey,
    pub stake_entry_receipt_mint_token_account: Pubkey,
    pub receipt_mint_metadata: Pubkey,
    pub payer: Pubkey,
}

// `text_overlay` trails the handler's arguments; the program ignores bytes
// past the ones it reads.
#[derive(BorshSerialize)]
struct InitEntryArgs<'a> {
    name: &'a str,
    symbol: &'a str,
    text_overlay: &'a str,
}

pub fn init_entry(
    programs: &ProgramIds,
    accounts: &InitEntryAccounts,
    metadata: &EntryMetadata,
) -> Result<SolInstruction, StakeError> {
    let data = instruction_data(
        "init_entry",
        &InitEntryArgs {
            name: &metadata.name,
            symbol: &metadata.symbol,
            text_overlay: &metadata.text_overlay,
        },
    )?;

    Ok(SolInstruction {
        program_id: programs.stake_pool,
        accounts: vec![
            SolAccountMeta::writable(accounts.stake_entry, false),
            SolAccountMeta::writable(accounts.stake_pool, false),
            SolAccountMeta::readonly(accounts.original_mint, false),
            SolAccountMeta::readonly(accounts.original_mint_metadata, false),
            SolAccountMeta::writable(accounts.receipt_mint, true),
            SolAccountMeta::writable(accounts.mint_manager, false),
            SolAccountMeta::writable(accounts.stake_entry_receipt_mint_token_account, false),
            SolAccountMeta::writable(accounts.receipt_mint_metadata, false),
            SolAccountMeta::writable(accounts.payer, true),
            SolAccountMeta::readonly(RENT_SYSVAR_ID, false),
            SolAccountMeta::readonly(TOKEN_PROGRAM_ID, false),
            SolAccountMeta::readonly(programs.token_manager, false),
            SolAccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            SolAccountMeta::readonly(programs.token_metadata, false),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data,
    })
}

// ---------------------------------------------------------------------------
// stake / unstake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct StakeAccounts {
    pub stake_entry: Pubkey,
    pub stake_pool: Pubkey,
    pub original_mint: Pubkey,
    pub receipt_mint: Pubkey,
    pub stake_entry_original_mint_token_account: Pubkey,
    pub stake_entry_receipt_mint_token_account: Pubkey,
    pub user: Pubkey,
    pub user_original_mint_token_account: Pubkey,
    pub user_receipt_mint_token_account: Pubkey,
    pub token_manager: Pubkey,
    pub mint_counter: Pubkey,
    pub token_manager_receipt_mint_token_account: Pubkey,
}

#[derive(BorshSerialize)]
struct StakeArgs {
    token_manager_kind: u8,
}

pub fn stake(
    programs: &ProgramIds,
    accounts: &StakeAccounts,
    kind: TokenManagerKind,
) -> Result<SolInstruction, StakeError> {
    let data = instruction_data(
        "stake",
        &StakeArgs {
            token_manager_kind: kind.as_u8(),
        },
    )?;

    Ok(SolInstruction {
        program_id: programs.stake_pool,
        accounts: vec![
            SolAccountMeta::writable(accounts.stake_entry, false),
            SolAccountMeta::readonly(accounts.stake_pool, false),
            SolAccountMeta::readonly(accounts.original_mint, false),
            SolAccountMeta::writable(accounts.receipt_mint, false),
            SolAccountMeta::writable(accounts.stake_entry_original_mint_token_account, false),
            SolAccountMeta::writable(accounts.stake_entry_receipt_mint_token_account, false),
            SolAccountMeta::writable(accounts.user, true),
            SolAccountMeta::writable(accounts.user_original_mint_token_account, false),
            SolAccountMeta::writable(accounts.user_receipt_mint_token_account, false),
            SolAccountMeta::writable(accounts.token_manager, false),
            SolAccountMeta::writable(accounts.mint_counter, false),
            SolAccountMeta::writable(accounts.token_manager_receipt_mint_token_account, false),
            SolAccountMeta::readonly(TOKEN_PROGRAM_ID, false),
            SolAccountMeta::readonly(programs.token_manager, false),
            SolAccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            SolAccountMeta::readonly(RENT_SYSVAR_ID, false),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct UnstakeAccounts {
    pub stake_entry: Pubkey,
    pub token_manager: Pubkey,
    pub stake_entry_original_mint_token_account: Pubkey,
    pub stake_entry_receipt_mint_token_account: Pubkey,
    pub user: Pubkey,
    pub user_original_mint_token_account: Pubkey,
    pub user_receipt_mint_token_account: Pubkey,
    pub token_manager_receipt_mint_token_account: Pubkey,
}

pub fn unstake(programs: &ProgramIds, accounts: &UnstakeAccounts) -> SolInstruction {
    SolInstruction {
        program_id: programs.stake_pool,
        accounts: vec![
            SolAccountMeta::writable(accounts.stake_entry, false),
            SolAccountMeta::readonly(accounts.token_manager, false),
            SolAccountMeta::writable(accounts.stake_entry_original_mint_token_account, false),
            SolAccountMeta::writable(accounts.stake_entry_receipt_mint_token_account, false),
            SolAccountMeta::writable(accounts.user, true),
            SolAccountMeta::writable(accounts.user_original_mint_token_account, false),
            SolAccountMeta::writable(accounts.user_receipt_mint_token_account, false),
            SolAccountMeta::writable(accounts.token_manager_receipt_mint_token_account, false),
            SolAccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: instruction_discriminator("unstake").to_vec(),
    }
}

// ---------------------------------------------------------------------------
// update_pool
// ---------------------------------------------------------------------------

/// Replacement pool parameters. Every field overwrites the stored value
/// except `image_uri`, which is kept when `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolUpdate {
    pub image_uri: Option<String>,
    pub overlay_text: String,
    pub requires_collections: Vec<Pubkey>,
    pub requires_creators: Vec<Pubkey>,
    pub requires_authorization: bool,
    /// New authority. Defaults to the payer, who must be the current one.
    pub authority: Option<Pubkey>,
    pub reset_on_stake: bool,
    pub cooldown_seconds: u32,
    pub min_stake_seconds: u32,
    /// Unix timestamp after which staking closes.
    pub end_date: i64,
}

#[derive(BorshSerialize)]
struct UpdatePoolArgs<'a> {
    image_uri: Option<&'a str>,
    overlay_text: &'a str,
    requires_collections: &'a [Pubkey],
    requires_creators: &'a [Pubkey],
    requires_authorization: bool,
    authority: Pubkey,
    reset_on_stake: bool,
    cooldown_seconds: u32,
    min_stake_seconds: u32,
    end_date: i64,
}

pub fn update_pool(
    programs: &ProgramIds,
    stake_pool: &Pubkey,
    payer: &Pubkey,
    update: &PoolUpdate,
) -> Result<SolInstruction, StakeError> {
    let data = instruction_data(
        "update_pool",
        &UpdatePoolArgs {
            image_uri: update.image_uri.as_deref(),
            overlay_text: &update.overlay_text,
            requires_collections: &update.requires_collections,
            requires_creators: &update.requires_creators,
            requires_authorization: update.requires_authorization,
            authority: update.authority.unwrap_or(*payer),
            reset_on_stake: update.reset_on_stake,
            cooldown_seconds: update.cooldown_seconds,
            min_stake_seconds: update.min_stake_seconds,
            end_date: update.end_date,
        },
    )?;

    Ok(SolInstruction {
        program_id: programs.stake_pool,
        accounts: vec![
            SolAccountMeta::writable(*stake_pool, false),
            SolAccountMeta::writable(*payer, true),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYER: Pubkey = [0xAAu8; 32];

    fn programs() -> ProgramIds {
        ProgramIds::default()
    }

    #[test]
    fn init_pool_layout() {
        let settings = PoolSettings {
            overlay_text: "HODL".into(),
            image_uri: String::new(),
            allowed_collections: vec![[0x0Cu8; 32]],
            allowed_creators: vec![],
            authority: None,
        };
        let accounts = InitPoolAccounts {
            stake_pool: [1u8; 32],
            identifier: [2u8; 32],
            payer: PAYER,
        };
        let ix = init_pool(&programs(), &accounts, 7, &settings).unwrap();

        assert!(is_instruction(&ix, &programs().stake_pool, "init_pool"));
        assert_eq!(&ix.data[8..16], &7u64.to_le_bytes());
        assert_eq!(&ix.data[16..20], &[4, 0, 0, 0]);
        assert_eq!(&ix.data[20..24], b"HODL");
        // empty image uri, one collection, no creators, authority
        assert_eq!(ix.data.len(), 24 + 4 + (4 + 32) + 4 + 32);
        assert_eq!(&ix.data[ix.data.len() - 32..], &PAYER);
        assert!(ix.accounts[2].is_signer);
        assert_eq!(ix.accounts[3].pubkey, SYSTEM_PROGRAM_ID);
    }

    #[test]
    fn init_pool_explicit_authority() {
        let settings = PoolSettings {
            authority: Some([0x0Du8; 32]),
            ..PoolSettings::default()
        };
        let accounts = InitPoolAccounts {
            stake_pool: [1u8; 32],
            identifier: [2u8; 32],
            payer: PAYER,
        };
        let ix = init_pool(&programs(), &accounts, 1, &settings).unwrap();
        assert_eq!(&ix.data[ix.data.len() - 32..], &[0x0Du8; 32]);
    }

    #[test]
    fn init_entry_signers_and_order() {
        let accounts = InitEntryAccounts {
            stake_entry: [1u8; 32],
            stake_pool: [2u8; 32],
            original_mint: [3u8; 32],
            original_mint_metadata: [4u8; 32],
            receipt_mint: [5u8; 32],
            mint_manager: [6u8; 32],
            stake_entry_receipt_mint_token_account: [7u8; 32],
            receipt_mint_metadata: [8u8; 32],
            payer: PAYER,
        };
        let metadata = EntryMetadata {
            name: "Receipt".into(),
            symbol: "RCPT".into(),
            text_overlay: "staked".into(),
        };
        let ix = init_entry(&programs(), &accounts, &metadata).unwrap();

        assert_eq!(ix.accounts.len(), 15);
        let signers: Vec<_> = ix
            .accounts
            .iter()
            .filter(|m| m.is_signer)
            .map(|m| m.pubkey)
            .collect();
        assert_eq!(signers, vec![[5u8; 32], PAYER]);
        assert_eq!(ix.accounts[11].pubkey, programs().token_manager);
        assert_eq!(ix.accounts[13].pubkey, programs().token_metadata);
        assert_eq!(&ix.data[8..12], &[7, 0, 0, 0]);
    }

    #[test]
    fn stake_carries_managed_kind() {
        let accounts = StakeAccounts {
            stake_entry: [1u8; 32],
            stake_pool: [2u8; 32],
            original_mint: [3u8; 32],
            receipt_mint: [4u8; 32],
            stake_entry_original_mint_token_account: [5u8; 32],
            stake_entry_receipt_mint_token_account: [6u8; 32],
            user: PAYER,
            user_original_mint_token_account: [7u8; 32],
            user_receipt_mint_token_account: [8u8; 32],
            token_manager: [9u8; 32],
            mint_counter: [10u8; 32],
            token_manager_receipt_mint_token_account: [11u8; 32],
        };
        let ix = stake(&programs(), &accounts, TokenManagerKind::Managed).unwrap();
        assert_eq!(ix.data, vec![206, 176, 202, 18, 200, 209, 179, 108, 1]);
        assert_eq!(ix.accounts.len(), 17);
        assert!(ix.accounts[6].is_signer);
        assert!(!ix.accounts[1].is_writable);
    }

    #[test]
    fn unstake_is_bare_discriminator() {
        let accounts = UnstakeAccounts {
            stake_entry: [1u8; 32],
            token_manager: [2u8; 32],
            stake_entry_original_mint_token_account: [3u8; 32],
            stake_entry_receipt_mint_token_account: [4u8; 32],
            user: PAYER,
            user_original_mint_token_account: [5u8; 32],
            user_receipt_mint_token_account: [6u8; 32],
            token_manager_receipt_mint_token_account: [7u8; 32],
        };
        let ix = unstake(&programs(), &accounts);
        assert!(is_instruction(&ix, &programs().stake_pool, "unstake"));
        assert_eq!(ix.data.len(), 8);
        assert_eq!(ix.accounts[4].pubkey, PAYER);
    }

    #[test]
    fn update_pool_layout() {
        let update = PoolUpdate {
            image_uri: None,
            overlay_text: String::new(),
            requires_authorization: true,
            cooldown_seconds: 60,
            min_stake_seconds: 3600,
            end_date: -1,
            ..PoolUpdate::default()
        };
        let ix = update_pool(&programs(), &[1u8; 32], &PAYER, &update).unwrap();

        assert_eq!(&ix.data[..8], &[239, 214, 170, 78, 36, 35, 30, 34]);
        // none, empty overlay, two empty vecs, bool, authority, bool, u32, u32, i64
        assert_eq!(ix.data.len(), 8 + 1 + 4 + 4 + 4 + 1 + 32 + 1 + 4 + 4 + 8);
        assert_eq!(ix.data[8], 0);
        assert_eq!(ix.data[21], 1);
        assert_eq!(&ix.data[22..54], &PAYER);
        assert_eq!(&ix.data[ix.data.len() - 8..], &(-1i64).to_le_bytes());
        assert!(ix.accounts[1].is_signer);
    }

    #[test]
    fn is_instruction_checks_program() {
        let ix =
            update_pool(&programs(), &[1u8; 32], &PAYER, &PoolUpdate::default()).unwrap();
        assert!(!is_instruction(&ix, &[0u8; 32], "update_pool"));
        assert!(!is_instruction(&ix, &programs().stake_pool, "init_pool"));
    }
}
