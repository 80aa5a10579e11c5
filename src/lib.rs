//! poni - symmetric encryption, key derivation and key exchange on the command line
//!
//! This crate provides:
//! - Password-based key derivation (Argon2id, scrypt, PBKDF2-SHA3)
//! - AES-256-GCM sealing with fresh random nonces
//! - A fixed blob layout: `nonce || ciphertext` for raw keys,
//!   `salt || nonce || ciphertext` for passwords
//! - X25519 keypairs and shared secrets
//! - A registry of subcommands dispatched by name

pub mod armor;
pub mod cli;
pub mod crypto;
pub mod error;
pub mod input;
pub mod output;

pub use error::{PoniError, Result};
