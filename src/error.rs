//! Error handling for the loader.
//!
//! This module defines every failure a [`Loader`](crate::Loader) can report,
//! from misuse of the episode state machine to backend I/O failures.

use thiserror::Error;

/// A specialized `Result` type for loader operations.
///
/// It's equivalent to `std::result::Result<T, LoaderError>`.
///
/// # Examples
///
/// ```rust
/// use dataloader::{Loader, MemoryBackend, Result};
///
/// fn header(bytes: Vec<u8>) -> Result<Vec<u8>> {
///     let mut loader = Loader::new(MemoryBackend::new(bytes));
///     loader.load()?;
///     Ok(loader.slice(0, 4)?.to_vec())
/// }
///
/// assert_eq!(header(b"RIFF....".to_vec()).unwrap(), b"RIFF");
/// ```
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Error types for loader operations.
///
/// The polling accessors ([`Loader::read`](crate::Loader::read),
/// [`Loader::read_until`](crate::Loader::read_until) and
/// [`Loader::read_all`](crate::Loader::read_all)) never return these; they
/// report any failure as "0 bytes transferred". Use
/// [`Loader::try_read`](crate::Loader::try_read) to observe the cause.
///
/// # Examples
///
/// ```rust
/// use dataloader::{Loader, LoaderError, MemoryBackend};
///
/// let mut loader = Loader::new(MemoryBackend::new(vec![0u8; 16]));
///
/// // No episode is active yet
/// match loader.try_read(8) {
///     Err(LoaderError::NotLoading) => {}
///     other => panic!("unexpected: {:?}", other),
/// }
///
/// loader.load().unwrap();
/// assert!(matches!(loader.load(), Err(LoaderError::AlreadyLoading)));
/// ```
#[derive(Error, Debug)]
pub enum LoaderError {
    /// `load()` was called while an episode is still in progress.
    #[error("Loader is already loading")]
    AlreadyLoading,

    /// An operation that requires an active episode was invoked outside one.
    #[error("Loader is not loading")]
    NotLoading,

    /// The backend refused to open; the loader stays empty.
    #[error("Backend failed to open")]
    Open(#[source] std::io::Error),

    /// The buffer could not grow to the requested size.
    ///
    /// Raised when the allocator refuses or when the configured buffer limit
    /// would be exceeded. The buffer and counters are left exactly as they were.
    #[error("Failed to grow buffer to {requested} bytes ({loaded} bytes loaded)")]
    Allocation { requested: usize, loaded: usize },

    /// The backend failed to close.
    #[error("Backend failed to close")]
    Close(#[source] std::io::Error),

    /// The backend failed while transferring bytes.
    #[error("Backend failed to read")]
    Read(#[source] std::io::Error),

    /// A requested byte range is empty or not available from the source.
    #[error("Invalid range ({start}..{end}) - {loaded} bytes available")]
    InvalidRange {
        start: usize,
        end: usize,
        loaded: usize,
    },

    /// I/O error while preparing a backend.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Compression format detection error from niffler.
    #[cfg(feature = "niffler")]
    #[error("Niffler error")]
    Niffler(#[from] niffler::Error),
}

impl LoaderError {
    /// Returns true if the error is a misuse of the episode state machine
    /// rather than a failure of the backend or the allocator.
    pub fn is_state_error(&self) -> bool {
        matches!(self, Self::AlreadyLoading | Self::NotLoading)
    }
}
