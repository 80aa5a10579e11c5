//! Cryptographic core of poni
//!
//! This module provides:
//! - Argon2id / scrypt password-based key derivation
//! - AES-256-GCM authenticated encryption
//! - Blob framing (stream and salted layouts)
//! - X25519 key exchange
//! - Secret containers with automatic zeroing

mod aead;
mod exchange;
mod framing;
mod kdf;
mod random;
mod secret;

pub use aead::{open, seal, Nonce, NONCE_LEN, TAG_LEN};
pub use exchange::{derive_cipher_key, generate_keypair, shared_secret, KeyPair};
pub use framing::{
    frame, frame_with_salt, unframe, unframe_with_salt, BlobMode, SALTED_HEADER_LEN,
    STREAM_HEADER_LEN,
};
pub use kdf::{DerivedKey, Kdf, Salt, SALT_LEN};
pub use random::fill_random;
pub use secret::{Key, SecureBytes, KEY_LEN};

/// Seal `plaintext` under a raw key into a stream blob
pub fn encrypt_with_key(key: &[u8], plaintext: &[u8]) -> crate::Result<Vec<u8>> {
    let (nonce, ciphertext) = seal(key, plaintext)?;
    Ok(frame(&nonce, &ciphertext))
}

/// Open a stream blob with a raw key
pub fn decrypt_with_key(key: &[u8], blob: &[u8]) -> crate::Result<SecureBytes> {
    let (nonce, ciphertext) = unframe(blob)?;
    open(key, &nonce, ciphertext)
}

/// Derive a key from `password` under a fresh salt and seal into a salted blob
pub fn encrypt_with_password(kdf: &Kdf, password: &[u8], plaintext: &[u8]) -> crate::Result<Vec<u8>> {
    let derived = kdf.derive(password)?;
    let (nonce, ciphertext) = seal(&derived.key, plaintext)?;
    Ok(frame_with_salt(&derived.salt, &nonce, &ciphertext))
}

/// Re-derive the key from the salt embedded in `blob` and open it
pub fn decrypt_with_password(kdf: &Kdf, password: &[u8], blob: &[u8]) -> crate::Result<SecureBytes> {
    let (salt, nonce, ciphertext) = unframe_with_salt(blob)?;
    let key = kdf.derive_with_salt(password, &salt)?;
    open(&key, &nonce, ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PoniError;

    const FAST_KDF: Kdf = Kdf::Scrypt {
        log_n: 10,
        r: 8,
        p: 1,
    };

    #[test]
    fn test_password_scenario_stream_blob() {
        let salt = [0u8; SALT_LEN];
        let key = Kdf::scrypt()
            .derive_with_salt(b"correct horse battery staple", &salt)
            .unwrap();

        let blob = encrypt_with_key(&key, b"hello").unwrap();
        assert_eq!(blob.len(), 12 + 5 + 16);

        let plaintext = decrypt_with_key(&key, &blob).unwrap();
        assert_eq!(&*plaintext, b"hello");

        let other = Kdf::scrypt()
            .derive_with_salt(b"correct horse battery stapler", &salt)
            .unwrap();
        assert!(matches!(
            decrypt_with_key(&other, &blob),
            Err(PoniError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_password_blob_roundtrip() {
        let blob = encrypt_with_password(&FAST_KDF, b"a long passphrase", b"file contents").unwrap();
        assert_eq!(blob.len(), SALTED_HEADER_LEN + 13 + TAG_LEN);

        let plaintext = decrypt_with_password(&FAST_KDF, b"a long passphrase", &blob).unwrap();
        assert_eq!(&*plaintext, b"file contents");

        assert!(matches!(
            decrypt_with_password(&FAST_KDF, b"the wrong passphrase", &blob),
            Err(PoniError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_decrypt_legacy_pbkdf2_blob() {
        let blob = crate::armor::decode(
            "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh9aWlpaWlpaWlpaWlr7EWoeYqqD86Loo5ozvbnODb/omHVOwvLQKRHkHcdmy3U=",
            "fixture",
        )
        .unwrap();
        assert_eq!(blob.len(), SALTED_HEADER_LEN + 17 + TAG_LEN);

        let plaintext =
            decrypt_with_password(&Kdf::pbkdf2(), b"correct horse battery staple", &blob).unwrap();
        assert_eq!(&*plaintext, b"legacy poni file\n");
    }

    #[test]
    fn test_truncated_blobs() {
        let key = [1u8; KEY_LEN];
        assert!(matches!(
            decrypt_with_key(&key, &[0u8; 5]),
            Err(PoniError::MalformedBlob { .. })
        ));
        assert!(matches!(
            decrypt_with_password(&FAST_KDF, b"pw", &[0u8; 20]),
            Err(PoniError::MalformedBlob { .. })
        ));
    }
}
