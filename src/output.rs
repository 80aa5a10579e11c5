//! Writing command results without leaving partial files behind

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{PoniError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => OutputTarget::File(p),
            None => OutputTarget::Stdout,
        }
    }

    /// Write `data` in full. Files are staged in a temporary file next to the
    /// destination and renamed into place only once everything is written.
    pub fn write(&self, stdout: &mut dyn Write, data: &[u8]) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                stdout.write_all(data)?;
                stdout.flush()?;
            }
            OutputTarget::File(path) => write_atomic(path, data)?,
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // NamedTempFile is created 0600 on unix
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), len = data.len(), "wrote output file");
    Ok(())
}

/// Refuse to delete `source` when `output` names the same file: the result
/// would be renamed onto the source and then removed with it.
pub fn check_removable(source: &Path, output: Option<&Path>) -> Result<()> {
    let Some(output) = output else {
        return Ok(());
    };
    // A missing source fails later on read
    let Ok(source) = fs::canonicalize(source) else {
        return Ok(());
    };

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let (Ok(parent), Some(name)) = (fs::canonicalize(parent), output.file_name()) else {
        return Ok(());
    };

    if parent.join(name) == source {
        return Err(PoniError::InvalidArgument(format!(
            "-d would delete the output file {}",
            output.display()
        )));
    }
    Ok(())
}

/// Remove the source file once its result has been written
pub fn remove_source(path: &Path) -> Result<()> {
    fs::remove_file(path)?;
    debug!(path = %path.display(), "removed source file");
    Ok(())
}
