//! Containers for secret material that zero themselves on drop
//!
//! - `Key` holds exactly 32 bytes: a cipher key, an X25519 scalar or a
//!   shared secret.
//! - `SecureBytes` holds variable-length secrets such as decrypted plaintext.
//!
//! Neither type prints its contents through `Debug`.

use std::ops::Deref;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{PoniError, Result};

/// Length of every key handled by the tool (256 bits)
pub const KEY_LEN: usize = 32;

/// A fixed-size 256-bit secret
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a key out of an arbitrary slice, rejecting anything but 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; KEY_LEN] = bytes.try_into().map_err(|_| PoniError::InvalidKeySize {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Deref for Key {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Key {}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key([REDACTED])")
    }
}

/// A variable-length secret buffer that is zeroed on drop
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of `data`; its memory is locked where the platform allows
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// Keep the pages out of swap (best effort, may fail without privileges)
    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
