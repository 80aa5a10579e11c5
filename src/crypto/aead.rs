//! AES-256-GCM authenticated encryption
//!
//! Every `seal` draws a fresh 96-bit nonce from the OS RNG. Ciphertexts
//! carry the 16-byte authentication tag at the end; no associated data is
//! bound. Whole messages are processed in one call.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm,
};
use tracing::debug;

use super::random::random_array;
use super::secret::{SecureBytes, KEY_LEN};
use crate::error::{PoniError, Result};

/// Nonce length for AES-GCM (96 bits)
pub const NONCE_LEN: usize = 12;

/// Authentication tag length (128 bits)
pub const TAG_LEN: usize = 16;

pub type Nonce = [u8; NONCE_LEN];

fn cipher(key: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LEN {
        return Err(PoniError::InvalidKeySize {
            expected: KEY_LEN,
            actual: key.len(),
        });
    }

    Aes256Gcm::new_from_slice(key).map_err(|_| PoniError::InvalidKeySize {
        expected: KEY_LEN,
        actual: key.len(),
    })
}

/// Encrypt `plaintext` under `key`
///
/// # Returns
/// Tuple of (nonce, ciphertext) where ciphertext is `plaintext.len() + 16`
/// bytes long and ends with the tag
///
/// # Errors
/// `InvalidKeySize` unless the key is exactly 32 bytes, `Randomness` if the
/// nonce cannot be drawn
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<(Nonce, Vec<u8>)> {
    let cipher = cipher(key)?;
    let nonce: Nonce = random_array()?;

    let ciphertext = cipher
        .encrypt(aes_gcm::Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| PoniError::InvalidArgument("plaintext too large to seal".into()))?;

    debug!(plaintext_len = plaintext.len(), "sealed message");
    Ok((nonce, ciphertext))
}

/// Decrypt and verify `ciphertext` produced by [`seal`]
///
/// # Errors
/// `AuthenticationFailed` if the tag does not verify, meaning the data was
/// altered or the key is not the one it was sealed under
pub fn open(key: &[u8], nonce: &Nonce, ciphertext: &[u8]) -> Result<SecureBytes> {
    let cipher = cipher(key)?;

    let plaintext = cipher
        .decrypt(aes_gcm::Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| PoniError::AuthenticationFailed)?;

    debug!(plaintext_len = plaintext.len(), "opened message");
    Ok(SecureBytes::new(plaintext))
}
