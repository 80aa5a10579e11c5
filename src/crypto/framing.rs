//! Byte layout of encrypted blobs
//!
//! ```text
//! stream: [12 bytes: nonce][N bytes: ciphertext][16 bytes: tag]
//! salted: [32 bytes: salt][12 bytes: nonce][N bytes: ciphertext][16 bytes: tag]
//! ```
//!
//! Blobs made with a raw key use the stream layout. Blobs made with a
//! password use the salted layout so the key can be re-derived on decryption.
//! There is no version tag or length prefix.

use super::aead::{Nonce, NONCE_LEN};
use super::kdf::{Salt, SALT_LEN};
use crate::error::{PoniError, Result};

/// Header length of a stream blob
pub const STREAM_HEADER_LEN: usize = NONCE_LEN;

/// Header length of a salted blob
pub const SALTED_HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobMode {
    /// `nonce || ciphertext`, used with raw keys
    Stream,
    /// `salt || nonce || ciphertext`, used with passwords
    Salted,
}

impl BlobMode {
    pub fn header_len(self) -> usize {
        match self {
            BlobMode::Stream => STREAM_HEADER_LEN,
            BlobMode::Salted => SALTED_HEADER_LEN,
        }
    }
}

fn check_len(blob: &[u8], mode: BlobMode) -> Result<()> {
    let expected = mode.header_len();
    if blob.len() < expected {
        return Err(PoniError::MalformedBlob {
            expected,
            actual: blob.len(),
        });
    }
    Ok(())
}

pub fn frame(nonce: &Nonce, ciphertext: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(STREAM_HEADER_LEN + ciphertext.len());
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(ciphertext);
    blob
}

/// Split a stream blob into its nonce and ciphertext
pub fn unframe(blob: &[u8]) -> Result<(Nonce, &[u8])> {
    check_len(blob, BlobMode::Stream)?;

    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
    let mut out = [0u8; NONCE_LEN];
    out.copy_from_slice(nonce);
    Ok((out, ciphertext))
}

pub fn frame_with_salt(salt: &Salt, nonce: &Nonce, ciphertext: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(SALTED_HEADER_LEN + ciphertext.len());
    blob.extend_from_slice(salt);
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(ciphertext);
    blob
}

/// Split a salted blob into its salt, nonce and ciphertext
pub fn unframe_with_salt(blob: &[u8]) -> Result<(Salt, Nonce, &[u8])> {
    check_len(blob, BlobMode::Salted)?;

    let (salt_bytes, rest) = blob.split_at(SALT_LEN);
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(salt_bytes);

    let (nonce, ciphertext) = unframe(rest)?;
    Ok((salt, nonce, ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let nonce = [0xAAu8; NONCE_LEN];
        let blob = frame(&nonce, b"cipher");
        assert_eq!(&blob[..NONCE_LEN], &nonce);
        assert_eq!(&blob[NONCE_LEN..], b"cipher");

        let salt = [0x55u8; SALT_LEN];
        let blob = frame_with_salt(&salt, &nonce, b"cipher");
        assert_eq!(blob.len(), 44 + 6);
        assert_eq!(&blob[..SALT_LEN], &salt);
        assert_eq!(&blob[SALT_LEN..SALTED_HEADER_LEN], &nonce);
        assert_eq!(&blob[SALTED_HEADER_LEN..], b"cipher");
    }

    #[test]
    fn test_unframe_roundtrip() {
        let nonce = [7u8; NONCE_LEN];
        for len in [0usize, 1, 16, 17, 300] {
            let ciphertext: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let blob = frame(&nonce, &ciphertext);
            let (n, ct) = unframe(&blob).unwrap();
            assert_eq!(n, nonce);
            assert_eq!(ct, &ciphertext[..]);
        }
    }

    #[test]
    fn test_unframe_with_salt_roundtrip() {
        let salt = [3u8; SALT_LEN];
        let nonce = [9u8; NONCE_LEN];
        let blob = frame_with_salt(&salt, &nonce, b"payload and tag");
        let (s, n, ct) = unframe_with_salt(&blob).unwrap();
        assert_eq!(s, salt);
        assert_eq!(n, nonce);
        assert_eq!(ct, b"payload and tag");
    }

    #[test]
    fn test_header_only_blob_is_accepted() {
        let (_, ct) = unframe(&[0u8; STREAM_HEADER_LEN]).unwrap();
        assert!(ct.is_empty());
        let (_, _, ct) = unframe_with_salt(&[0u8; SALTED_HEADER_LEN]).unwrap();
        assert!(ct.is_empty());
    }

    #[test]
    fn test_short_blobs_are_malformed() {
        assert!(matches!(
            unframe(&[0u8; 5]),
            Err(PoniError::MalformedBlob { expected: 12, actual: 5 })
        ));
        assert!(matches!(
            unframe_with_salt(&[0u8; 43]),
            Err(PoniError::MalformedBlob { expected: 44, actual: 43 })
        ));
    }
}
