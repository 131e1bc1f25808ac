//! # dataloader - Incremental Byte Loading over Pluggable Backends
//!
//! `dataloader` pulls bytes from an arbitrary I/O source into an in-memory
//! buffer on demand, in bounded increments. It decouples a consumer (e.g. a
//! file-format parser that needs "at least N bytes available") from the
//! transport the bytes come from.
//!
//! ## Model
//!
//! - A [`Backend`] is a byte source: `open`, `read`, `length`, `at_end` and
//!   `close`. Files, memory maps, in-memory blobs, seekable readers and
//!   compressed files are provided; anything else can implement the trait.
//! - A [`Loader`] owns a growable buffer and drives one backend through load
//!   episodes: `Empty -> Loading -> Loaded`, and back to `Empty` on `reset`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dataloader::{LoadStatus, Loader, MemoryBackend};
//!
//! # fn main() -> dataloader::Result<()> {
//! let source = b"Vgm \x00\x10\x00\x00 and the rest of the file".to_vec();
//! let mut loader = Loader::new(MemoryBackend::new(source));
//!
//! // Open the source and eagerly fetch the header
//! loader.set_preload_bytes(8);
//! loader.load()?;
//! assert!(loader.loaded_size() >= 8);
//! assert_eq!(&loader.data()[..4], b"Vgm ");
//!
//! // Ask for more only when the parser needs it
//! let body = loader.slice(9, 12)?;
//! assert_eq!(body, b"and");
//!
//! // Fetch everything else; the episode completes at end of stream
//! loader.read_all();
//! assert_eq!(loader.status(), LoadStatus::Loaded);
//! assert_eq!(loader.loaded_size(), loader.total_size());
//! # Ok(())
//! # }
//! ```
//!
//! ### File I/O with Compression
//!
//! ```rust,no_run
//! use dataloader::{load_to_vec, Loader};
//!
//! # fn main() -> dataloader::Result<()> {
//! // Stream a file (automatically decompresses)
//! let mut loader = Loader::from_path("track.vgz")?;
//! loader.load()?;
//! loader.read_until(0x100);
//!
//! // Or load everything at once
//! let bytes = load_to_vec("track.vgm")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Runtime Backend Selection
//!
//! ```rust
//! use dataloader::{BoxedBackend, Loader, MemoryBackend, ReaderBackend};
//! use std::io::Cursor;
//!
//! let in_memory = std::env::args().count() > 0;
//! let backend: BoxedBackend = if in_memory {
//!     Box::new(MemoryBackend::new(vec![0u8; 32]))
//! } else {
//!     Box::new(ReaderBackend::new(Cursor::new(vec![0u8; 32])))
//! };
//! let mut loader = Loader::new(backend);
//! loader.load().unwrap();
//! assert_eq!(loader.read_all(), 32);
//! ```
//!
//! ## Error Handling
//!
//! The polling reads (`read`, `read_until`, `read_all`) report failures as
//! "0 bytes transferred" and never change state on failure. Lifecycle calls and
//! [`Loader::try_read`] return `Result<T, LoaderError>`:
//!
//! ```rust
//! use dataloader::{Loader, LoaderError, LoaderConfig, MemoryBackend};
//!
//! let config = LoaderConfig::new().with_buffer_limit(16);
//! let mut loader = Loader::with_config(MemoryBackend::new(vec![0u8; 64]), config);
//! loader.load().unwrap();
//!
//! assert_eq!(loader.read(32), 0);
//! match loader.try_read(32) {
//!     Err(LoaderError::Allocation { requested, loaded }) => {
//!         assert_eq!((requested, loaded), (32, 0));
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! ## Logging
//!
//! Episode transitions are logged through the [`log`](https://docs.rs/log)
//! facade at `debug`, individual reads at `trace`, and swallowed backend
//! failures at `warn`. No logger is installed by the library.
//!
//! ## Features
//!
//! - `niffler` (default): [`DecoderBackend`] and compression detection in
//!   [`Loader::from_path`].
//! - `serde` (default): `Serialize`/`Deserialize` for [`LoadStatus`],
//!   [`LoaderConfig`] and [`Progress`].

mod constructs;
mod error;
mod io;

pub use constructs::{LoadStatus, LoaderConfig, Progress};
pub use error::{LoaderError, Result};
#[cfg(feature = "niffler")]
pub use io::DecoderBackend;
pub use io::{
    load_to_vec, Backend, BoxedBackend, FileBackend, Loader, MemoryBackend, MmapBackend,
    ReaderBackend,
};
