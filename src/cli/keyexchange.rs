//! X25519 key exchange

use std::io::Write;

use clap::{ArgGroup, Parser};

use super::{parse_args, Command, Io};
use crate::armor;
use crate::crypto::{self, KeyPair};
use crate::error::{PoniError, Result};

/// Generate an X25519 keypair, or compute the shared secret between your
/// private key and a peer's public key.
#[derive(Debug, Parser)]
#[command(name = "keyexchange")]
#[command(group(ArgGroup::new("action").args(["generate_keys", "generate_shared"])))]
struct KeyExchangeArgs {
    /// Generate a new keypair
    #[arg(long)]
    generate_keys: bool,

    /// Compute the shared secret (requires -k and -r)
    #[arg(long, requires_all = ["private_key", "public_key"])]
    generate_shared: bool,

    /// Your base64-encoded private key
    #[arg(short = 'k', long = "private-key")]
    private_key: Option<String>,

    /// The peer's base64-encoded public key
    #[arg(short = 'r', long = "public-key")]
    public_key: Option<String>,

    /// Also print a cipher key derived from the secret with HKDF-SHA256
    #[arg(long, requires = "generate_shared")]
    derive: bool,
}

pub struct KeyExchange;

impl Command for KeyExchange {
    fn name(&self) -> &'static str {
        "keyexchange"
    }

    fn about(&self) -> &'static str {
        "Generate X25519 keypairs and shared secrets"
    }

    fn run(&self, args: &[String], io: &mut Io<'_>) -> Result<()> {
        let Some(args) = parse_args::<KeyExchangeArgs>(self.name(), args, io)? else {
            return Ok(());
        };

        let output = if args.generate_keys {
            let keypair = KeyPair::generate()?;
            format!(
                "Private key: {}\nPublic key: {}\n",
                armor::encode(&keypair.private_key()),
                armor::encode(&keypair.public_key_bytes())
            )
        } else if args.generate_shared {
            let private = armor::decode(args.private_key.as_deref().unwrap_or_default(), "private key")?;
            let public = armor::decode(args.public_key.as_deref().unwrap_or_default(), "public key")?;

            let shared = crypto::shared_secret(&private, &public)?;
            let mut text = format!("Shared secret: {}\n", armor::encode(&shared));
            if args.derive {
                let key = crypto::derive_cipher_key(&shared)?;
                text.push_str(&format!("Derived key: {}\n", armor::encode(&key)));
            }
            text
        } else {
            return Err(PoniError::InvalidArgument(
                "one of --generate-keys or --generate-shared is required".into(),
            ));
        };

        io.stdout.write_all(output.as_bytes())?;
        io.stdout.flush()?;
        Ok(())
    }
}
