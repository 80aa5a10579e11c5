//! Subcommand implementations

pub mod decrypt;
pub mod encrypt;
pub mod keyexchange;
pub mod keygen;
pub mod registry;

use std::io::{Read, Write};

use clap::error::ErrorKind;
use clap::{Args, Parser, ValueEnum};
use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};

use crate::armor;
use crate::crypto::{Kdf, Key};
use crate::error::{PoniError, Result};

pub use registry::CommandRegistry;

/// Minimum password length for fresh derivations
pub const MIN_PASSWORD_LEN: usize = 10;

/// Prompt attempts before giving up on a new password
const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Standard streams handed to a command
pub struct Io<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
}

/// A subcommand. Each one parses its own flags and handles `-h` itself.
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    /// One-line description for the command list
    fn about(&self) -> &'static str;

    fn run(&self, args: &[String], io: &mut Io<'_>) -> Result<()>;
}

/// Parse `args` for command `name`.
///
/// Returns `Ok(None)` when help was requested; the usage has then already
/// been written to stdout and the command must stop.
pub(crate) fn parse_args<P: Parser>(name: &str, args: &[String], io: &mut Io<'_>) -> Result<Option<P>> {
    let argv = std::iter::once(name.to_string()).chain(args.iter().cloned());

    match P::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(io.stdout, "{}", e.render())?;
            io.stdout.flush()?;
            Ok(None)
        }
        Err(e) => {
            let rendered = e.render().to_string();
            let first = rendered.lines().next().unwrap_or_default();
            Err(PoniError::InvalidArgument(
                first.trim_start_matches("error: ").to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KdfArg {
    Argon2id,
    Scrypt,
    Pbkdf2,
}

impl From<KdfArg> for Kdf {
    fn from(arg: KdfArg) -> Self {
        match arg {
            KdfArg::Argon2id => Kdf::argon2id(),
            KdfArg::Scrypt => Kdf::scrypt(),
            KdfArg::Pbkdf2 => Kdf::pbkdf2(),
        }
    }
}

/// Password flags shared by every command that derives keys
#[derive(Debug, Args)]
pub struct PasswordArgs {
    /// Password or passphrase to derive the key from
    #[arg(short = 'p', long = "password", conflicts_with = "ask_password")]
    pub password: Option<String>,

    /// Read the password from the terminal instead of the command line
    #[arg(long)]
    pub ask_password: bool,

    /// Key-derivation function
    #[arg(long, value_enum, default_value_t = KdfArg::Argon2id)]
    pub kdf: KdfArg,
}

impl PasswordArgs {
    /// The password from `-p` or the terminal, if either was requested
    pub fn password(&self, confirm: bool) -> Result<Option<SecretString>> {
        if self.ask_password {
            let password = if confirm {
                prompt_new_password()?
            } else {
                prompt_password()?
            };
            return Ok(Some(password));
        }

        Ok(self
            .password
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| SecretString::new(p.clone())))
    }
}

/// Key flags for encrypt and decrypt: a raw key or a password
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Base64-encoded 256-bit key
    #[arg(short = 'k', long = "key", conflicts_with_all = ["password", "ask_password"])]
    pub key: Option<String>,

    #[command(flatten)]
    pub password: PasswordArgs,
}

/// Secret material a cipher key is obtained from
pub enum KeyMaterial {
    Raw(Key),
    Password(SecretString, Kdf),
}

impl KeyArgs {
    /// Decide the key source. `fresh` marks a first use of a password, which
    /// is confirmed when prompted and checked against the length minimum.
    pub fn resolve(&self, fresh: bool) -> Result<KeyMaterial> {
        if let Some(encoded) = self.key.as_deref().filter(|k| !k.is_empty()) {
            let bytes = armor::decode(encoded, "key")?;
            return Ok(KeyMaterial::Raw(Key::from_slice(&bytes)?));
        }

        match self.password.password(fresh)? {
            Some(password) => {
                if fresh {
                    check_password_len(password.expose_secret())?;
                }
                Ok(KeyMaterial::Password(password, self.password.kdf.into()))
            }
            None => Err(PoniError::InvalidArgument(
                "one of -k <key>, -p <password> or --ask-password is required".into(),
            )),
        }
    }
}

pub fn check_password_len(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PoniError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

/// Prompt for a new password with confirmation
pub fn prompt_new_password() -> Result<SecretString> {
    for _ in 0..MAX_PROMPT_ATTEMPTS {
        let password = rpassword::prompt_password("Enter password: ")?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            eprintln!(
                "{} Password must be at least {} characters long",
                "Error:".red(),
                MIN_PASSWORD_LEN
            );
            continue;
        }

        let confirm = rpassword::prompt_password("Confirm password: ")?;

        if password != confirm {
            eprintln!("{} Passwords do not match", "Error:".red());
            continue;
        }

        return Ok(SecretString::new(password));
    }

    Err(PoniError::InvalidArgument("no acceptable password entered".into()))
}

/// Prompt for an existing password
pub fn prompt_password() -> Result<SecretString> {
    let password = rpassword::prompt_password("Enter password: ")?;
    Ok(SecretString::new(password))
}
