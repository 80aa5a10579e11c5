//! Derive a key from a password

use std::io::Write;

use clap::Parser;
use secrecy::ExposeSecret;

use super::{check_password_len, parse_args, Command, Io, PasswordArgs};
use crate::armor;
use crate::crypto::{Kdf, Salt, SALT_LEN};
use crate::error::{PoniError, Result};

/// Derive a 256-bit key from a password. Without a salt a fresh one is
/// generated and printed along with the key.
#[derive(Debug, Parser)]
#[command(name = "keygen")]
struct KeygenArgs {
    #[command(flatten)]
    password: PasswordArgs,

    /// Base64-encoded salt from an earlier derivation
    #[arg(short = 's', long = "salt")]
    salt: Option<String>,
}

pub struct Keygen;

impl Command for Keygen {
    fn name(&self) -> &'static str {
        "keygen"
    }

    fn about(&self) -> &'static str {
        "Derive a key from a password"
    }

    fn run(&self, args: &[String], io: &mut Io<'_>) -> Result<()> {
        let Some(args) = parse_args::<KeygenArgs>(self.name(), args, io)? else {
            return Ok(());
        };

        let salt = args
            .salt
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(decode_salt)
            .transpose()?;

        let password = args
            .password
            .password(salt.is_none())?
            .ok_or_else(|| PoniError::InvalidArgument("-p <password> is required".into()))?;
        let kdf: Kdf = args.password.kdf.into();

        let output = match salt {
            Some(salt) => {
                let key = kdf.derive_with_salt(password.expose_secret().as_bytes(), &salt)?;
                format!("Key: {}\n", armor::encode(&key))
            }
            None => {
                check_password_len(password.expose_secret())?;
                let derived = kdf.derive(password.expose_secret().as_bytes())?;
                format!(
                    "Key: {}\nSalt: {}\n",
                    armor::encode(&derived.key),
                    armor::encode(&derived.salt)
                )
            }
        };

        io.stdout.write_all(output.as_bytes())?;
        io.stdout.flush()?;
        Ok(())
    }
}

fn decode_salt(encoded: &str) -> Result<Salt> {
    let bytes = armor::decode(encoded, "salt")?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        PoniError::InvalidArgument(format!(
            "salt must be {} bytes, got {}",
            SALT_LEN,
            bytes.len()
        ))
    })
}
