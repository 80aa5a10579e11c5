//! Base64 armor for keys, salts and blobs (RFC 4648, padded)

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{PoniError, Result};

pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode armored text. `what` names the value in the error message.
pub fn decode(text: &str, what: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| PoniError::Decode(format!("{}: {}", what, e)))
}
