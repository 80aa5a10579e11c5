//! Password-based key derivation
//!
//! Three functions are available, each with fixed work factors:
//! - Argon2id (default): 64 MiB, 3 passes, 4 lanes
//! - scrypt: N = 2^17, r = 8, p = 1, which reproduces keys made by the
//!   legacy scrypt-based keygen
//! - PBKDF2-HMAC-SHA3-256 with 200,000 rounds, the derivation behind
//!   existing password-encrypted files
//!
//! Every derivation yields a 32-byte key bound to a 32-byte salt. The salt is
//! not secret and is stored next to the ciphertext in salted blobs.

use argon2::{Algorithm, Argon2, Params, Version};
use sha3::Sha3_256;
use tracing::debug;
use zeroize::Zeroize;

use super::random::random_array;
use super::secret::{Key, KEY_LEN};
use crate::error::{PoniError, Result};

/// Salt length in bytes (256 bits)
pub const SALT_LEN: usize = 32;

pub type Salt = [u8; SALT_LEN];

const ARGON2_MEMORY_KIB: u32 = 65536; // 64 MiB
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 4;

const SCRYPT_LOG_N: u8 = 17; // N = 131072
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

const PBKDF2_ITERATIONS: u32 = 200_000;

/// A key-derivation function together with its cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kdf {
    Argon2id {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
    Scrypt {
        log_n: u8,
        r: u32,
        p: u32,
    },
    Pbkdf2 {
        iterations: u32,
    },
}

impl Default for Kdf {
    fn default() -> Self {
        Kdf::argon2id()
    }
}

/// A freshly derived key with the salt it was derived under
#[derive(Debug)]
pub struct DerivedKey {
    pub key: Key,
    pub salt: Salt,
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.salt.zeroize();
    }
}

impl Kdf {
    /// Argon2id with the production work factors
    pub const fn argon2id() -> Self {
        Kdf::Argon2id {
            memory_kib: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }

    /// scrypt with the production work factors
    pub const fn scrypt() -> Self {
        Kdf::Scrypt {
            log_n: SCRYPT_LOG_N,
            r: SCRYPT_R,
            p: SCRYPT_P,
        }
    }

    /// PBKDF2-HMAC-SHA3-256 with the production round count
    pub const fn pbkdf2() -> Self {
        Kdf::Pbkdf2 {
            iterations: PBKDF2_ITERATIONS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kdf::Argon2id { .. } => "argon2id",
            Kdf::Scrypt { .. } => "scrypt",
            Kdf::Pbkdf2 { .. } => "pbkdf2",
        }
    }

    /// Derive a key under a fresh random salt
    pub fn derive(&self, password: &[u8]) -> Result<DerivedKey> {
        let salt: Salt = random_array()?;
        let key = self.derive_with_salt(password, &salt)?;
        Ok(DerivedKey { key, salt })
    }

    /// Re-derive the key for a known salt. Deterministic for identical inputs.
    pub fn derive_with_salt(&self, password: &[u8], salt: &Salt) -> Result<Key> {
        let mut out = [0u8; KEY_LEN];

        match *self {
            Kdf::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                let params = Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
                    .map_err(|e| PoniError::Derivation(format!("argon2 params: {}", e)))?;
                Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                    .hash_password_into(password, salt, &mut out)
                    .map_err(|e| PoniError::Derivation(e.to_string()))?;
            }
            Kdf::Scrypt { log_n, r, p } => {
                let params = scrypt::Params::new(log_n, r, p, KEY_LEN)
                    .map_err(|e| PoniError::Derivation(format!("scrypt params: {}", e)))?;
                scrypt::scrypt(password, salt, &params, &mut out)
                    .map_err(|e| PoniError::Derivation(e.to_string()))?;
            }
            Kdf::Pbkdf2 { iterations } => {
                if iterations == 0 {
                    return Err(PoniError::Derivation("pbkdf2 needs at least one round".into()));
                }
                pbkdf2::pbkdf2_hmac::<Sha3_256>(password, salt, iterations, &mut out);
            }
        }

        debug!(kdf = self.name(), "derived key from password");

        let key = Key::new(out);
        out.zeroize();
        Ok(key)
    }
}
