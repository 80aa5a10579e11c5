//! X25519 key exchange
//!
//! Two parties each generate a keypair, swap public keys and compute the
//! same 32-byte shared secret. The secret is returned as-is; callers that
//! want a cipher key from it can run it through [`derive_cipher_key`].

use hkdf::Hkdf;
use sha2::Sha256;
use tracing::debug;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::random::random_array;
use super::secret::{Key, KEY_LEN};
use crate::error::{PoniError, Result};

/// HKDF info string for cipher keys derived from a shared secret
const HKDF_INFO: &[u8] = b"poni x25519 cipher key v1";

/// An X25519 keypair. The private scalar is zeroed on drop.
pub struct KeyPair {
    private_key: StaticSecret,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random keypair
    pub fn generate() -> Result<Self> {
        let scalar = Zeroizing::new(random_array::<KEY_LEN>()?);
        Ok(Self::from_scalar(&scalar))
    }

    /// Rebuild a keypair from an encoded private scalar
    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self> {
        let scalar: Zeroizing<[u8; KEY_LEN]> = Zeroizing::new(bytes.try_into().map_err(|_| {
            PoniError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
        })?);
        Ok(Self::from_scalar(&scalar))
    }

    fn from_scalar(scalar: &Zeroizing<[u8; KEY_LEN]>) -> Self {
        let private_key = StaticSecret::from(**scalar);
        let public_key = PublicKey::from(&private_key);
        Self {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> Key {
        Key::new(self.private_key.to_bytes())
    }

    pub fn public_key_bytes(&self) -> [u8; KEY_LEN] {
        self.public_key.to_bytes()
    }

    /// Diffie-Hellman with a peer's public key
    pub fn shared_secret(&self, peer_public: &[u8]) -> Result<Key> {
        let peer: [u8; KEY_LEN] = peer_public.try_into().map_err(|_| {
            PoniError::InvalidPublicKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                peer_public.len()
            ))
        })?;

        let shared = self.private_key.diffie_hellman(&PublicKey::from(peer));
        if !shared.was_contributory() {
            return Err(PoniError::InvalidPublicKey("low-order point".into()));
        }

        debug!("computed x25519 shared secret");
        Ok(Key::new(shared.to_bytes()))
    }
}

pub fn generate_keypair() -> Result<KeyPair> {
    KeyPair::generate()
}

/// Compute the shared secret between `private` and `peer_public`
///
/// # Errors
/// `InvalidPrivateKey` / `InvalidPublicKey` if either side is not 32 bytes,
/// `InvalidPublicKey` if the peer point has low order
pub fn shared_secret(private: &[u8], peer_public: &[u8]) -> Result<Key> {
    KeyPair::from_private_bytes(private)?.shared_secret(peer_public)
}

/// Stretch a raw shared secret into a uniformly random cipher key (HKDF-SHA256)
pub fn derive_cipher_key(shared: &Key) -> Result<Key> {
    let mut out = [0u8; KEY_LEN];
    Hkdf::<Sha256>::new(None, shared)
        .expand(HKDF_INFO, &mut out)
        .map_err(|e| PoniError::Derivation(e.to_string()))?;
    Ok(Key::new(out))
}
