//! Derivation seeds and program identities.

use sol_core::Pubkey;

/// Stake pool program: `stkBL96RZkjY5ine4TvPihGqW8UHJfch2cokjAPzV8i`
pub const STAKE_POOL_PROGRAM_ID: Pubkey = [
    0x0d, 0x09, 0x8c, 0x4f, 0x9f, 0x98, 0xac, 0xa0, 0x58, 0xe6, 0x74, 0x7e, 0x73, 0x8d, 0x3a,
    0x68, 0xd4, 0x58, 0x9a, 0xba, 0x7f, 0xb1, 0x7a, 0x37, 0xe3, 0x73, 0xe6, 0x56, 0x1d, 0xa5,
    0x80, 0x97,
];

/// Token manager program: `mgr99QFMYByTqGPWmNqunV7vBLmWWXdSrHUfV8Jf3JM`
pub const TOKEN_MANAGER_PROGRAM_ID: Pubkey = [
    0x0b, 0x72, 0x9c, 0x6c, 0x45, 0xf1, 0x8c, 0x9d, 0x2b, 0xf8, 0x96, 0xf8, 0x97, 0xf6, 0x44,
    0xe3, 0xbb, 0x6f, 0xd1, 0xd5, 0xc8, 0x95, 0x18, 0xe7, 0x7a, 0xaa, 0xe5, 0x71, 0x80, 0x63,
    0x5a, 0x96,
];

/// Token metadata program: `metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bWCrL9kc`
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = [
    0x0b, 0x70, 0x65, 0xb1, 0xe3, 0xd1, 0x7c, 0x45, 0x38, 0x9d, 0x52, 0x7f, 0x6b, 0x04, 0xc3,
    0xcd, 0x58, 0xb8, 0x6c, 0x73, 0x1a, 0xa0, 0xfd, 0xb5, 0x49, 0xb6, 0xd0, 0xfa, 0x37, 0x71,
    0xd1, 0x29,
];

// Stake pool program namespaces
pub const STAKE_POOL_SEED: &[u8] = b"stake-pool";
pub const STAKE_ENTRY_SEED: &[u8] = b"stake-entry";
pub const IDENTIFIER_SEED: &[u8] = b"identifier";

// Token manager program namespaces
pub const TOKEN_MANAGER_SEED: &[u8] = b"token-manager";
pub const MINT_COUNTER_SEED: &[u8] = b"mint-counter";
pub const MINT_MANAGER_SEED: &[u8] = b"mint-manager";

// Metadata program namespace
pub const METADATA_SEED: &[u8] = b"metadata";
