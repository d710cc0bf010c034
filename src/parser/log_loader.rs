//! Read a training log into memory.
//!
//! Logs are read in one go; the parser works on the full text.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for log files that cannot be read.
#[derive(Debug)]
pub enum LogLoadError {
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for LogLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLoadError::Read { path, source } => {
                write!(f, "Failed to read log file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LogLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogLoadError::Read { source, .. } => Some(source),
        }
    }
}

/// Read the whole log file at `path`.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, since trainers
/// sometimes interleave binary noise from other libraries into their logs.
///
/// # Returns
///
/// The file contents, or `LogLoadError::Read` if the file cannot be opened.
pub fn read_log(path: &Path) -> Result<String, LogLoadError> {
    let bytes = fs::read(path).map_err(|source| LogLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Log file {} is not valid UTF-8, replacing invalid bytes", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    log::info!("Loaded {} bytes from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_log() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Iteration 0, loss = 0.5").unwrap();

        let text = read_log(file.path()).unwrap();
        assert_eq!(text, "Iteration 0, loss = 0.5\n");
    }

    #[test]
    fn test_read_log_replaces_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Iteration 0, loss = 0.5\n\xff\n").unwrap();

        let text = read_log(file.path()).unwrap();
        assert!(text.starts_with("Iteration 0, loss = 0.5\n"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.log");

        let err = read_log(&path).unwrap_err();
        let LogLoadError::Read { path: err_path, source } = &err;
        assert_eq!(err_path, &path);
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().starts_with("Failed to read log file"));
    }
}
