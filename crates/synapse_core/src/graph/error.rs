//! Error contract for network lookups and mutations.

use crate::model::key::KeyError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors raised by network enumeration, lookup, linking and rekeying.
#[derive(Debug)]
pub enum NetworkError {
    /// Key does not resolve to an existing file under the root.
    NotFound { key: String },
    /// Reading or writing the file behind `key` failed.
    Io { key: String, source: io::Error },
    /// Listing a category directory failed.
    Scan { dir: PathBuf, source: io::Error },
    /// Rekey rejected before any file was touched.
    InvalidRekey { key: String, reason: String },
    /// Link-bearing access requested on an attachment.
    NotANote { key: String },
    /// Codec-level rejection of a key or path.
    InvalidKey(KeyError),
}

impl NetworkError {
    pub(crate) fn io(key: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    pub(crate) fn invalid_rekey(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRekey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means "key does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for NetworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { key } => write!(f, "key not found: \"{key}\""),
            Self::Io { key, source } => write!(f, "could not access \"{key}\": {source}"),
            Self::Scan { dir, source } => {
                write!(f, "could not scan `{}`: {source}", dir.display())
            }
            Self::InvalidRekey { key, reason } => {
                write!(f, "cannot rekey \"{key}\": {reason}")
            }
            Self::NotANote { key } => write!(f, "\"{key}\" is not a note"),
            Self::InvalidKey(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Scan { source, .. } => Some(source),
            Self::InvalidKey(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidRekey { .. } | Self::NotANote { .. } => None,
        }
    }
}

impl From<KeyError> for NetworkError {
    fn from(value: KeyError) -> Self {
        Self::InvalidKey(value)
    }
}
