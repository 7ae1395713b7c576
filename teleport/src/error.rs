use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors surfaced while loading or validating teleport configuration.
///
/// Frame ticks never fail; every degenerate numeric case there is handled by policy.
#[derive(Debug)]
pub enum TeleportError {
    /// Configuration file could not be read
    ConfigIo { path: PathBuf, source: io::Error },

    /// Configuration was not valid JSON, or named an unknown variant
    /// (e.g. a curve type other than `parabolic` / `line`)
    ConfigParse { source: serde_json::Error },

    /// A configuration value is outside its allowed range
    Validation { field: &'static str, reason: String },
}

impl TeleportError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        TeleportError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TeleportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeleportError::ConfigIo { path, source } => {
                write!(f, "Failed to read teleport config '{}': {}", path.display(), source)
            }
            TeleportError::ConfigParse { source } => {
                write!(f, "Failed to parse teleport config: {}", source)
            }
            TeleportError::Validation { field, reason } => {
                write!(f, "Invalid teleport config value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TeleportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TeleportError::ConfigIo { source, .. } => Some(source),
            TeleportError::ConfigParse { source } => Some(source),
            TeleportError::Validation { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TeleportError {
    fn from(source: serde_json::Error) -> Self {
        TeleportError::ConfigParse { source }
    }
}

pub type Result<T> = std::result::Result<T, TeleportError>;
