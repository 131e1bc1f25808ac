//! The incremental loader.
//!
//! A [`Loader`] pulls bytes from a [`Backend`] into an owned buffer on demand
//! and tracks how much of the source is held in memory.

use std::{fmt, fs::File, io, mem::ManuallyDrop, path::Path};

use super::{buffer::GrowBuffer, Backend, BoxedBackend, FileBackend};
use crate::{LoadStatus, LoaderConfig, LoaderError, Progress, Result};

#[cfg(feature = "niffler")]
use {super::DecoderBackend, std::io::BufReader};

/// Shortest file `niffler` can sniff a compression magic from.
#[cfg(feature = "niffler")]
const SNIFF_LEN: u64 = 5;

/// Incremental, on-demand byte loader.
///
/// A loader owns a growable buffer and drives a [`Backend`] through load
/// episodes. Consumers ask for "at least N more bytes" and read the loaded
/// prefix back through [`data`](Loader::data).
///
/// # Episodes
///
/// - [`load`](Loader::load) opens the backend and starts an episode
///   ([`LoadStatus::Loading`]).
/// - [`read`](Loader::read) and friends grow the buffer. Once the backend
///   reports end of stream the backend is closed and the episode ends in
///   [`LoadStatus::Loaded`], keeping the buffer.
/// - [`cancel`](Loader::cancel) ends the episode early, keeping the buffer.
/// - [`reset`](Loader::reset) releases everything and returns to
///   [`LoadStatus::Empty`].
///
/// # Error Reporting
///
/// `read`, `read_until` and `read_all` never fail: any failure shows up as
/// "0 bytes transferred" with the buffer and counters unchanged. Use
/// [`try_read`](Loader::try_read) to learn why a read transferred nothing.
///
/// # Examples
///
/// ```rust
/// use dataloader::{LoadStatus, Loader, MemoryBackend};
///
/// # fn main() -> dataloader::Result<()> {
/// let source: Vec<u8> = (0..100).collect();
/// let mut loader = Loader::new(MemoryBackend::new(source));
///
/// loader.load()?;
/// assert_eq!(loader.total_size(), 100);
///
/// // Pull the first 16 bytes
/// loader.read_until(16);
/// assert_eq!(&loader.data()[..4], &[0, 1, 2, 3]);
///
/// // Pull the rest; the episode finishes on its own
/// loader.read_all();
/// assert_eq!(loader.loaded_size(), 100);
/// assert_eq!(loader.status(), LoadStatus::Loaded);
/// # Ok(())
/// # }
/// ```
pub struct Loader<B: Backend> {
    /// Byte source, also holding its own per-source context
    backend: B,

    /// Loaded prefix of the source
    buffer: GrowBuffer,

    /// Episode state
    status: LoadStatus,

    /// Source size reported by the backend at open time
    total: usize,

    /// Preload and buffer limits
    config: LoaderConfig,
}

impl<B: Backend> Loader<B> {
    /// Binds a backend to a fresh, empty loader.
    ///
    /// No I/O happens until [`load`](Loader::load) is called.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, LoaderConfig::default())
    }

    /// Binds a backend to a fresh, empty loader with the given configuration.
    pub fn with_config(backend: B, config: LoaderConfig) -> Self {
        Self {
            backend,
            buffer: GrowBuffer::new(),
            status: LoadStatus::Empty,
            total: 0,
            config,
        }
    }

    /// Starts a new load episode.
    ///
    /// Any previous buffer is released first. On success the total size is
    /// taken from the backend and, if a preload threshold is configured, the
    /// buffer is filled up to it before returning. A short preload is not an
    /// error.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::AlreadyLoading`] if an episode is in progress. Nothing
    ///   is changed.
    /// - [`LoaderError::Open`] if the backend fails to open. The loader stays
    ///   empty.
    pub fn load(&mut self) -> Result<()> {
        if self.status.is_loading() {
            return Err(LoaderError::AlreadyLoading);
        }

        // not loading, so no backend close can fail here
        self.reset()?;

        self.backend.open().map_err(LoaderError::Open)?;
        self.total = self.backend.length();
        self.status = LoadStatus::Loading;
        log::debug!("loader: opened source ({} bytes)", self.total);

        if let Some(preload) = self.config.preload() {
            let preloaded = self.read_until(preload);
            log::debug!("loader: preloaded {} of {} bytes", preloaded, preload);
        }
        Ok(())
    }

    /// Reads up to `n` more bytes, reporting why nothing was read.
    ///
    /// The read boundary is `loaded + n` clamped to the total size, saturating
    /// instead of wrapping. The backend may transfer fewer bytes than asked
    /// for. When the backend reports end of stream after a transfer it is
    /// closed and the episode ends in [`LoadStatus::Loaded`].
    ///
    /// Returns the number of bytes transferred; `Ok(0)` means the backend had
    /// no more data to give right now.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::NotLoading`] outside an episode.
    /// - [`LoaderError::Allocation`] if the buffer cannot grow.
    /// - [`LoaderError::Read`] if the backend read failed.
    ///
    /// The buffer and counters are unchanged on every error.
    pub fn try_read(&mut self, n: usize) -> Result<usize> {
        if !self.status.is_loading() {
            return Err(LoaderError::NotLoading);
        }

        let loaded = self.buffer.len();
        let target = loaded.saturating_add(n).min(self.total);
        if target == loaded {
            return Ok(0);
        }
        if !self.config.allows(target) {
            return Err(LoaderError::Allocation {
                requested: target,
                loaded,
            });
        }

        let result = match self.buffer.grow_to(target) {
            Ok(gap) => self.backend.read(gap),
            Err(_) => {
                return Err(LoaderError::Allocation {
                    requested: target,
                    loaded,
                })
            }
        };
        let transferred = match result {
            Ok(read) => read.min(target - loaded),
            Err(e) => {
                self.buffer.commit(loaded);
                return Err(LoaderError::Read(e));
            }
        };
        self.buffer.commit(loaded + transferred);
        if transferred == 0 {
            return Ok(0);
        }
        log::trace!(
            "loader: read {} bytes ({}/{})",
            transferred,
            self.buffer.len(),
            self.total
        );

        if self.backend.at_end() {
            self.finish();
        }
        Ok(transferred)
    }

    /// Reads up to `n` more bytes.
    ///
    /// Same as [`try_read`](Loader::try_read), except that every failure is
    /// reported as 0 bytes transferred.
    pub fn read(&mut self, n: usize) -> usize {
        match self.try_read(n) {
            Ok(transferred) => transferred,
            Err(e) if e.is_state_error() => 0,
            Err(e) => {
                log::warn!("loader: read of {} bytes failed: {}", n, e);
                0
            }
        }
    }

    /// Reads until at least `offset` bytes are loaded (or the source ends).
    ///
    /// Short reads are retried; the call stops early only when a read
    /// transfers nothing. Returns the number of bytes transferred.
    pub fn read_until(&mut self, offset: usize) -> usize {
        let goal = offset.min(self.total);
        let mut transferred = 0;
        while self.buffer.len() < goal {
            match self.read(goal - self.buffer.len()) {
                0 => break,
                n => transferred += n,
            }
        }
        transferred
    }

    /// Reads the remainder of the source.
    ///
    /// Stops on the first read that transfers nothing: either the source is
    /// exhausted or the backend stalled. The two cases are not told apart
    /// here; inspect [`status`](Loader::status) afterwards. Returns the number
    /// of bytes transferred.
    pub fn read_all(&mut self) -> usize {
        let mut transferred = 0;
        loop {
            match self.read(self.total - self.buffer.len()) {
                0 => break,
                n => transferred += n,
            }
        }
        transferred
    }

    /// Ends the current episode early, keeping the loaded bytes.
    ///
    /// Does nothing outside an episode.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Close`] if the backend fails to close; the
    /// episode then stays in progress and the call may be retried.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.status.is_loading() {
            return Ok(());
        }
        self.backend.close().map_err(LoaderError::Close)?;
        self.status = LoadStatus::Loaded;
        log::debug!(
            "loader: cancelled at {}/{} bytes",
            self.buffer.len(),
            self.total
        );
        Ok(())
    }

    /// Returns the loader to [`LoadStatus::Empty`], releasing the buffer.
    ///
    /// An episode in progress is cancelled first. The loader is reset even if
    /// that cancel fails.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Close`] if the backend failed to close. The
    /// reset itself has still happened.
    pub fn reset(&mut self) -> Result<()> {
        if self.status.is_empty() {
            return Ok(());
        }
        let cancelled = self.cancel();
        if let Err(e) = &cancelled {
            log::warn!("loader: resetting despite close failure: {}", e);
        }

        self.buffer.release();
        self.total = 0;
        self.status = LoadStatus::Empty;
        log::debug!("loader: reset");
        cancelled
    }

    /// Sets the preload threshold used by the next [`load`](Loader::load).
    ///
    /// A threshold of zero disables preloading.
    pub fn set_preload_bytes(&mut self, bytes: usize) {
        self.config.preload_bytes = Some(bytes);
    }

    /// Caps the size the buffer may grow to.
    pub fn set_buffer_limit(&mut self, limit: Option<usize>) {
        self.config.buffer_limit = limit;
    }

    pub fn config(&self) -> LoaderConfig {
        self.config
    }

    /// Loaded bytes, valid until the next mutating call.
    pub fn data(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Source size reported by the backend (0 when empty).
    pub fn total_size(&self) -> usize {
        self.total
    }

    /// Number of bytes held in the buffer.
    pub fn loaded_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn progress(&self) -> Progress {
        Progress {
            status: self.status,
            loaded: self.buffer.len(),
            total: self.total,
        }
    }

    /// Returns the bytes in `start..end`, loading up to `end` first.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidRange`] if the range is empty or the
    /// source cannot provide bytes up to `end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dataloader::{Loader, LoaderError, MemoryBackend};
    ///
    /// let mut loader = Loader::new(MemoryBackend::new(b"Vgm \x71\x01\x00\x00".to_vec()));
    /// loader.load().unwrap();
    ///
    /// assert_eq!(loader.slice(0, 4).unwrap(), b"Vgm ");
    /// assert!(matches!(
    ///     loader.slice(4, 12),
    ///     Err(LoaderError::InvalidRange { loaded: 8, .. })
    /// ));
    /// ```
    pub fn slice(&mut self, start: usize, end: usize) -> Result<&[u8]> {
        if end <= start {
            return Err(LoaderError::InvalidRange {
                start,
                end,
                loaded: self.buffer.len(),
            });
        }
        self.read_until(end);
        let data = self.buffer.as_slice();
        if end > data.len() {
            return Err(LoaderError::InvalidRange {
                start,
                end,
                loaded: data.len(),
            });
        }
        Ok(&data[start..end])
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resets the loader and releases it.
    ///
    /// Dropping a loader does the same, ignoring any close failure.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Close`] if the backend failed to close.
    pub fn teardown(mut self) -> Result<()> {
        self.reset()
    }

    /// Ends the episode and hands over the loaded bytes.
    pub fn into_data(mut self) -> Vec<u8> {
        if let Err(e) = self.cancel() {
            log::warn!("loader: releasing data despite close failure: {}", e);
        }
        let data = std::mem::take(&mut self.buffer).into_vec();
        self.total = 0;
        self.status = LoadStatus::Empty;
        data
    }

    /// Resets the loader and returns its backend.
    pub fn into_backend(mut self) -> B {
        // close failures are logged by reset
        self.reset().ok();
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `this` is never touched again. The backend is moved out and
        // the buffer, the only other field with drop glue, is dropped in place.
        unsafe {
            let backend = std::ptr::read(&this.backend);
            std::ptr::drop_in_place(&mut this.buffer);
            backend
        }
    }

    /// Closes the backend after end of stream and ends the episode.
    ///
    /// A close failure is logged; the episode ends regardless.
    fn finish(&mut self) {
        if let Err(e) = self.backend.close() {
            log::warn!("loader: failed to close backend at end of stream: {}", e);
        }
        self.status = LoadStatus::Loaded;
        log::debug!("loader: end of stream after {} bytes", self.buffer.len());
    }
}

/// Resets the loader when dropped so the backend is always closed.
impl<B: Backend> Drop for Loader<B> {
    fn drop(&mut self) {
        self.reset().ok();
    }
}

impl<B: Backend> fmt::Debug for Loader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("status", &self.status)
            .field("loaded", &self.buffer.len())
            .field("total", &self.total)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Loader<BoxedBackend> {
    /// Creates a loader for a file path.
    ///
    /// Compressed files (gzip, bzip2, xz, zstd) are detected and decompressed
    /// on the fly when the `niffler` feature is enabled; everything else is
    /// streamed as-is. The file is only inspected here, not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for inspection.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use dataloader::Loader;
    ///
    /// # fn main() -> dataloader::Result<()> {
    /// let mut loader = Loader::from_path("track.vgz")?;
    /// loader.set_preload_bytes(0x100);
    /// loader.load()?;
    /// println!("{} of {} bytes ready", loader.loaded_size(), loader.total_size());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        #[cfg(feature = "niffler")]
        {
            if file.metadata()?.len() >= SNIFF_LEN {
                let (_, format) = niffler::send::get_reader(Box::new(BufReader::new(file)))?;
                if format != niffler::send::compression::Format::No {
                    log::debug!("loader: {} is {:?} compressed", path.display(), format);
                    return Ok(Self::new(Box::new(DecoderBackend::new(path))));
                }
            }
        }
        #[cfg(not(feature = "niffler"))]
        drop(file);

        Ok(Self::new(Box::new(FileBackend::new(path))))
    }
}

/// Loads an entire file into memory at once.
///
/// Compressed files are decompressed when the `niffler` feature is enabled.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the buffer cannot hold it,
/// or the source ends before its reported size.
///
/// # Examples
///
/// ```rust,no_run
/// use dataloader::load_to_vec;
///
/// # fn main() -> dataloader::Result<()> {
/// let bytes = load_to_vec("track.vgm")?;
/// println!("Loaded {} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
pub fn load_to_vec<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut loader = Loader::from_path(path)?;
    loader.load()?;
    loop {
        match loader.try_read(loader.total_size() - loader.loaded_size()) {
            Ok(0) | Err(LoaderError::NotLoading) => break,
            Ok(_) => {}
            Err(e) => return Err(e),
        }
    }
    if loader.loaded_size() < loader.total_size() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "source ended after {} of {} bytes",
                loader.loaded_size(),
                loader.total_size()
            ),
        )
        .into());
    }
    Ok(loader.into_data())
}
