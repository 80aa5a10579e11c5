//! OS-backed randomness for salts, nonces and private scalars

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{PoniError, Result};

/// Fill `buf` from the operating system RNG
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| PoniError::Randomness(e.to_string()))
}

/// Return `N` fresh random bytes
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}
