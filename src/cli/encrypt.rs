//! Encrypt a message, file or stdin

use std::path::PathBuf;

use clap::Parser;
use secrecy::ExposeSecret;
use tracing::info;

use super::{parse_args, Command, Io, KeyArgs, KeyMaterial};
use crate::armor;
use crate::crypto;
use crate::error::{PoniError, Result};
use crate::input::InputSource;
use crate::output::{self, OutputTarget};

/// Encrypt with AES-256-GCM. A raw key (-k) produces `nonce || ciphertext`;
/// a password produces `salt || nonce || ciphertext`. Input is taken from -m,
/// then -f, then stdin.
#[derive(Debug, Parser)]
#[command(name = "encrypt")]
struct EncryptArgs {
    #[command(flatten)]
    keys: KeyArgs,

    /// Message to encrypt
    #[arg(short = 'm', long = "message")]
    message: Option<String>,

    /// File whose contents will be encrypted
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Base64-encode the output
    #[arg(short = 'a', long = "armor", short_alias = 'e')]
    armor: bool,

    /// Write the result to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Delete the input file after successful encryption
    #[arg(short = 'd', long = "delete")]
    delete: bool,
}

pub struct Encrypt;

impl Command for Encrypt {
    fn name(&self) -> &'static str {
        "encrypt"
    }

    fn about(&self) -> &'static str {
        "Encrypt data with a key or password"
    }

    fn run(&self, args: &[String], io: &mut Io<'_>) -> Result<()> {
        let Some(args) = parse_args::<EncryptArgs>(self.name(), args, io)? else {
            return Ok(());
        };

        let source = InputSource::select(args.message, args.file);
        if args.delete && source.file_path().is_none() {
            return Err(PoniError::InvalidArgument("-d requires -f <file>".into()));
        }
        if args.delete {
            if let Some(path) = source.file_path() {
                output::check_removable(path, args.output.as_deref())?;
            }
        }

        let material = args.keys.resolve(true)?;
        let plaintext = source.read_all(io.stdin)?;

        let blob = match &material {
            KeyMaterial::Raw(key) => crypto::encrypt_with_key(key, &plaintext)?,
            KeyMaterial::Password(password, kdf) => {
                crypto::encrypt_with_password(kdf, password.expose_secret().as_bytes(), &plaintext)?
            }
        };

        let data = if args.armor {
            let mut text = armor::encode(&blob);
            text.push('\n');
            text.into_bytes()
        } else {
            blob
        };

        OutputTarget::from_path(args.output).write(io.stdout, &data)?;

        if args.delete {
            if let Some(path) = source.file_path() {
                output::remove_source(path)?;
            }
        }

        info!(len = plaintext.len(), armored = args.armor, "encrypted input");
        Ok(())
    }
}
