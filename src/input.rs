//! Where a command reads its payload from

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Payload given directly on the command line
    Message(String),
    /// Payload read from a file
    File(PathBuf),
    /// Payload read from standard input
    Stdin,
}

impl InputSource {
    /// Pick the source by precedence: message, then file, then stdin.
    /// Empty values do not count.
    pub fn select(message: Option<String>, file: Option<PathBuf>) -> Self {
        match (message, file) {
            (Some(m), _) if !m.is_empty() => InputSource::Message(m),
            (_, Some(f)) if !f.as_os_str().is_empty() => InputSource::File(f),
            _ => InputSource::Stdin,
        }
    }

    /// Read the whole payload in one shot
    pub fn read_all(&self, stdin: &mut dyn Read) -> Result<Vec<u8>> {
        let data = match self {
            InputSource::Message(m) => m.as_bytes().to_vec(),
            InputSource::File(path) => fs::read(path)?,
            InputSource::Stdin => {
                let mut buf = Vec::new();
                stdin.read_to_end(&mut buf)?;
                buf
            }
        };
        debug!(source = self.kind(), len = data.len(), "read input");
        Ok(data)
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            InputSource::File(path) => Some(path),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            InputSource::Message(_) => "message",
            InputSource::File(_) => "file",
            InputSource::Stdin => "stdin",
        }
    }
}
