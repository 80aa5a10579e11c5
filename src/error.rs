use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoniError>;

#[derive(Debug, Error)]
pub enum PoniError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("For your security passwords must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Failed to decode {0}")]
    Decode(String),

    #[error("Malformed blob: expected at least {expected} bytes, got {actual}")]
    MalformedBlob { expected: usize, actual: usize },

    #[error("Invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("Authentication failed: data was tampered with or the key is wrong")]
    AuthenticationFailed,

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Secure randomness unavailable: {0}")]
    Randomness(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command '{0}' not found")]
    CommandNotFound(String),

    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),
}

impl PoniError {
    /// Process exit code for this failure. Every kind gets its own code.
    pub fn exit_code(&self) -> u8 {
        match self {
            PoniError::InvalidArgument(_) => 2,
            PoniError::PasswordTooShort(_) => 3,
            PoniError::Decode(_) => 4,
            PoniError::MalformedBlob { .. } => 5,
            PoniError::InvalidKeySize { .. } => 6,
            PoniError::AuthenticationFailed => 7,
            PoniError::InvalidPublicKey(_) => 8,
            PoniError::InvalidPrivateKey(_) => 9,
            PoniError::Derivation(_) => 10,
            PoniError::Randomness(_) => 11,
            PoniError::Io(_) => 12,
            PoniError::CommandNotFound(_) => 13,
            PoniError::DuplicateCommand(_) => 14,
        }
    }
}
