//! Decrypt a message, file or stdin

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

/// Decrypt a blob made by `encrypt`. With -k the blob is `nonce || ciphertext`;
/// with a password it is `salt || nonce || ciphertext`. Input is taken from
/// -m (always base64), then -f, then stdin.
#[derive(Debug, Parser)]
#[command(name = "decrypt")]
struct DecryptArgs {
    #[command(flatten)]
    keys: KeyArgs,

    /// Base64-encoded blob to decrypt
    #[arg(short = 'm', long = "message")]
    message: Option<String>,

    /// File whose contents will be decrypted
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// File or stdin input is base64 text rather than raw bytes
    #[arg(short = 'a', long = "armor")]
    armor: bool,

    /// Print the plaintext as UTF-8 text
    #[arg(short = 's', long = "string")]
    as_string: bool,

    /// Write the plaintext to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Delete the input file after successful decryption
    #[arg(short = 'd', long = "delete")]
    delete: bool,
}

pub struct Decrypt;

impl Command for Decrypt {
    fn name(&self) -> &'static str {
        "decrypt"
    }

    fn about(&self) -> &'static str {
        "Decrypt data with a key or password"
    }

    fn run(&self, args: &[String], io: &mut Io<'_>) -> Result<()> {
        let Some(args) = parse_args::<DecryptArgs>(self.name(), args, io)? else {
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

        let material = args.keys.resolve(false)?;

        let raw = source.read_all(io.stdin)?;
        let blob = match source {
            InputSource::Message(_) => armor::decode(&String::from_utf8_lossy(&raw), "message")?,
            _ if args.armor => armor::decode(&String::from_utf8_lossy(&raw), "input")?,
            _ => raw,
        };

        let plaintext = match &material {
            KeyMaterial::Raw(key) => crypto::decrypt_with_key(key, &blob)?,
            KeyMaterial::Password(password, kdf) => {
                crypto::decrypt_with_password(kdf, password.expose_secret().as_bytes(), &blob)?
            }
        };

        let target = OutputTarget::from_path(args.output);
        if args.as_string {
            let text = std::str::from_utf8(&plaintext)
                .map_err(|e| PoniError::Decode(format!("plaintext as UTF-8: {}", e)))?;
            let mut line = String::with_capacity(text.len() + 1);
            line.push_str(text);
            line.push('\n');
            target.write(io.stdout, line.as_bytes())?;
        } else {
            target.write(io.stdout, &plaintext)?;
        }

        if args.delete {
            if let Some(path) = source.file_path() {
                output::remove_source(path)?;
            }
        }

        info!(len = plaintext.len(), "decrypted input");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::encrypt::Encrypt;
    use crate::cli::test_support::run_command;
    use crate::crypto::{Kdf, SALT_LEN};
    use std::fs;

    fn key_b64(byte: u8) -> String {
        armor::encode(&[byte; 32])
    }

    fn encrypt_armored(args: &[&str], stdin: &[u8]) -> String {
        let mut full = args.to_vec();
        full.push("-a");
        let (result, out) = run_command(&Encrypt, &full, stdin);
        result.unwrap();
        String::from_utf8(out).unwrap().trim().to_string()
    }

    #[test]
    fn test_message_roundtrip_as_string() {
        let key = key_b64(7);
        let blob = encrypt_armored(&["-k", &key, "-m", "hello"], b"");

        let (result, out) = run_command(&Decrypt, &["-k", &key, "-m", &blob, "-s"], b"");
        result.unwrap();
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn test_raw_stdin_roundtrip() {
        let key = key_b64(7);
        let (result, blob) = run_command(&Encrypt, &["-k", &key], &[0, 159, 146, 150]);
        result.unwrap();

        let (result, out) = run_command(&Decrypt, &["-k", &key], &blob);
        result.unwrap();
        assert_eq!(out, [0, 159, 146, 150]);
    }

    #[test]
    fn test_armored_stdin() {
        let key = key_b64(7);
        let blob = encrypt_armored(&["-k", &key, "-m", "via stdin"], b"");

        let (result, out) = run_command(&Decrypt, &["-k", &key, "-a", "-s"], blob.as_bytes());
        result.unwrap();
        assert_eq!(out, b"via stdin\n");
    }

    #[test]
    fn test_password_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("secret.enc");
        let output = dir.path().join("secret.txt");

        let blob = crypto::encrypt_with_password(&Kdf::scrypt(), b"pass phrase 42", b"file body").unwrap();
        fs::write(&input, &blob).unwrap();

        let (result, out) = run_command(
            &Decrypt,
            &[
                "-p",
                "pass phrase 42",
                "--kdf",
                "scrypt",
                "-f",
                input.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "-d",
            ],
            b"",
        );
        result.unwrap();
        assert!(out.is_empty());
        assert!(!input.exists());
        assert_eq!(fs::read(&output).unwrap(), b"file body");
    }

    #[test]
    fn test_delete_refuses_output_over_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.enc");

        let key = key_b64(5);
        let (result, blob) = run_command(&Encrypt, &["-k", &key, "-m", "hello"], b"");
        result.unwrap();
        fs::write(&path, &blob).unwrap();

        let p = path.to_str().unwrap();
        let (result, out) = run_command(&Decrypt, &["-k", &key, "-f", p, "-o", p, "-d"], b"");

        assert!(matches!(result, Err(PoniError::InvalidArgument(_))));
        assert!(out.is_empty());
        assert_eq!(fs::read(&path).unwrap(), blob);
    }

    #[test]
    fn test_legacy_pbkdf2_file() {
        // salt 00..1f, nonce 5a x 12, PBKDF2-HMAC-SHA3-256 with 200,000 rounds
        let legacy = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh9aWlpaWlpaWlpaWlr7EWoeYqqD86Loo5ozvbnODb/omHVOwvLQKRHkHcdmy3U=";
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("legacy.enc");
        fs::write(&input, armor::decode(legacy, "fixture").unwrap()).unwrap();

        let (result, out) = run_command(
            &Decrypt,
            &[
                "-p",
                "correct horse battery staple",
                "--kdf",
                "pbkdf2",
                "-f",
                input.to_str().unwrap(),
            ],
            b"",
        );
        result.unwrap();
        assert_eq!(out, b"legacy poni file\n");
    }

    #[test]
    fn test_wrong_key_is_authentication_failure() {
        let blob = encrypt_armored(&["-k", &key_b64(1), "-m", "hello"], b"");

        let (result, out) = run_command(&Decrypt, &["-k", &key_b64(2), "-m", &blob], b"");
        assert!(matches!(result, Err(PoniError::AuthenticationFailed)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_failed_decryption_keeps_source_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("secret.enc");
        let output = dir.path().join("secret.txt");

        let (result, blob) = run_command(&Encrypt, &["-k", &key_b64(1), "-m", "hello"], b"");
        result.unwrap();
        fs::write(&input, &blob).unwrap();

        let (result, _) = run_command(
            &Decrypt,
            &[
                "-k",
                &key_b64(2),
                "-f",
                input.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "-d",
            ],
            b"",
        );
        assert!(matches!(result, Err(PoniError::AuthenticationFailed)));
        assert!(input.exists());
        assert!(!output.exists());
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        let short = armor::encode(&[0u8; 5]);
        let (result, _) = run_command(&Decrypt, &["-k", &key_b64(1), "-m", &short], b"");
        assert!(matches!(
            result,
            Err(PoniError::MalformedBlob { expected: 12, actual: 5 })
        ));

        let (result, _) = run_command(&Decrypt, &["-p", "password", "--kdf", "scrypt"], &[0u8; SALT_LEN]);
        assert!(matches!(
            result,
            Err(PoniError::MalformedBlob { expected: 44, actual: 32 })
        ));
    }

    #[test]
    fn test_bad_base64_message() {
        let (result, _) = run_command(&Decrypt, &["-k", &key_b64(1), "-m", "***"], b"");
        assert!(matches!(result, Err(PoniError::Decode(_))));
    }

    #[test]
    fn test_non_utf8_with_string_flag() {
        let key = key_b64(3);
        let (result, blob) = run_command(&Encrypt, &["-k", &key], &[0xff, 0xfe]);
        result.unwrap();

        let (result, out) = run_command(&Decrypt, &["-k", &key, "-s"], &blob);
        assert!(matches!(result, Err(PoniError::Decode(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_key_required() {
        let (result, _) = run_command(&Decrypt, &["-m", "AAAA"], b"");
        assert!(matches!(result, Err(PoniError::InvalidArgument(_))));
    }
}
