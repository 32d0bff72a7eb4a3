//! Asset errors and the fail-fast exit path
//!
//! Loaders return `Result`. Anything the game cannot run without is routed
//! through [`fatal`] at the top level, which logs and terminates.

use std::fmt;
use std::path::PathBuf;

/// Error type for model, texture and config loading
#[derive(Debug)]
pub enum AssetError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    Obj { path: PathBuf, line: usize, message: String },
    Image(String),
    InvalidModel(String),
}

impl From<ron::error::SpannedError> for AssetError {
    fn from(e: ron::error::SpannedError) -> Self {
        AssetError::Parse(e)
    }
}

impl From<ron::Error> for AssetError {
    fn from(e: ron::Error) -> Self {
        AssetError::Serialize(e)
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io { path, source } => write!(f, "IO error reading {}: {}", path.display(), source),
            AssetError::Parse(e) => write!(f, "Parse error: {}", e),
            AssetError::Serialize(e) => write!(f, "Serialize error: {}", e),
            AssetError::Obj { path, line, message } => {
                write!(f, "Bad OBJ record in {} line {}: {}", path.display(), line, message)
            }
            AssetError::Image(e) => write!(f, "Image error: {}", e),
            AssetError::InvalidModel(e) => write!(f, "Invalid model: {}", e),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::Parse(e) => Some(e),
            AssetError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

/// Log the failed operation and terminate the process
pub fn fatal(context: &str, err: impl fmt::Display) -> ! {
    log::error!("{}: {}", context, err);
    std::process::exit(1)
}
