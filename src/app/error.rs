use std::fmt;

use thiserror::Error;

/// Why a listing or thread could not be produced.
///
/// All three map to the same user-facing "not found" condition today, but
/// callers that care can tell "try again" apart from "does not exist".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Nothing stored under the cache key.
    NotCached,
    /// The server answered with a non-2xx status.
    Unavailable { status: u16 },
    /// The page parsed fine but held zero posts (unknown listings are
    /// redirected to a generic page instead of a real 404).
    NoPosts,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::NotCached => write!(f, "no cache entry"),
            NotFoundReason::Unavailable { status } => write!(f, "server returned {}", status),
            NotFoundReason::NoPosts => write!(f, "listing has no posts"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ThreadreelError {
    #[error("Not found: {0}")]
    NotFound(NotFoundReason),

    #[error("Cannot open cache file: {0}")]
    CannotOpenCacheFile(#[source] std::io::Error),

    #[error("Cannot decode cache file: {0}")]
    CannotDecodeCacheFile(#[source] serde_json::Error),

    #[error("Cannot encode cache file: {0}")]
    CannotEncodeCacheFile(String),

    #[error("Cache entry is expired")]
    CacheEntryExpired,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unrecognized server type in configuration: {0}")]
    UnrecognizedAdapter(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ThreadreelError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ThreadreelError::NotFound(_))
    }

    /// Errors raised by the disk cache. The client treats every one of them
    /// as a miss.
    pub fn is_cache_error(&self) -> bool {
        matches!(
            self,
            ThreadreelError::NotFound(NotFoundReason::NotCached)
                | ThreadreelError::CannotOpenCacheFile(_)
                | ThreadreelError::CannotDecodeCacheFile(_)
                | ThreadreelError::CannotEncodeCacheFile(_)
                | ThreadreelError::CacheEntryExpired
        )
    }
}

pub type Result<T> = std::result::Result<T, ThreadreelError>;
