//! Ed25519 keypairs for accounts that must co-sign a transaction, such as a
//! freshly created mint.

use ed25519_dalek::Signer;
use rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::address::{encode_address, Pubkey};

/// An Ed25519 keypair. The 32-byte seed is wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Keypair {
    secret: [u8; 32],
    #[zeroize(skip)]
    public: Pubkey,
}

impl Keypair {
    /// Generate a keypair from the OS random source.
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        let keypair = Self::from_secret(&secret);
        secret.zeroize();
        keypair
    }

    /// Rebuild a keypair from its 32-byte Ed25519 seed.
    pub fn from_secret(secret: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(secret);
        Self {
            secret: *secret,
            public: signing_key.verifying_key().to_bytes(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.public
    }

    /// Sign `message`, returning the 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&self.secret);
        signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &encode_address(&self.public))
            .finish_non_exhaustive()
    }
}
