//! The capability contract every byte source implements.

use std::io;

/// A pluggable byte source driven by a [`Loader`](crate::Loader).
///
/// The implementing value is both the capability table and the per-source
/// context: everything a backend needs between calls (handles, positions,
/// decoders) lives in `self`.
///
/// # Contract
///
/// - [`open`](Backend::open) may be called once per load episode, provided the
///   previous episode was closed. Each episode starts from offset 0.
/// - [`read`](Backend::read) returns `Ok(0)` only at end of stream. It may
///   transfer fewer bytes than `dst.len()` for any reason.
/// - [`length`](Backend::length) is valid after a successful `open` and may be
///   an upper bound for streaming sources.
/// - [`at_end`](Backend::at_end) becomes true once the source is exhausted.
/// - [`close`](Backend::close) releases handles held for the episode but keeps
///   the backend reusable.
///
/// All calls block until they complete.
///
/// # Examples
///
/// ```rust
/// use dataloader::{Backend, Loader};
/// use std::io;
///
/// /// Yields `len` copies of one byte.
/// struct Repeat {
///     byte: u8,
///     len: usize,
///     pos: usize,
/// }
///
/// impl Backend for Repeat {
///     fn open(&mut self) -> io::Result<()> {
///         self.pos = 0;
///         Ok(())
///     }
///     fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
///         let n = dst.len().min(self.len - self.pos);
///         dst[..n].fill(self.byte);
///         self.pos += n;
///         Ok(n)
///     }
///     fn length(&self) -> usize {
///         self.len
///     }
///     fn at_end(&self) -> bool {
///         self.pos == self.len
///     }
///     fn close(&mut self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let mut loader = Loader::new(Repeat { byte: 0xAA, len: 8, pos: 0 });
/// loader.load().unwrap();
/// loader.read_all();
/// assert_eq!(loader.data(), &[0xAA; 8]);
/// ```
pub trait Backend {
    /// Prepares the source for a new episode.
    fn open(&mut self) -> io::Result<()>;

    /// Transfers up to `dst.len()` bytes into `dst`.
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize>;

    /// Total size of the source in bytes.
    fn length(&self) -> usize;

    /// Returns true once the source is exhausted.
    fn at_end(&self) -> bool;

    /// Releases the resources held for the current episode.
    fn close(&mut self) -> io::Result<()>;
}

/// Type-erased backend used for runtime backend selection.
pub type BoxedBackend = Box<dyn Backend + Send>;

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        (**self).read(dst)
    }
    fn length(&self) -> usize {
        (**self).length()
    }
    fn at_end(&self) -> bool {
        (**self).at_end()
    }
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        (**self).read(dst)
    }
    fn length(&self) -> usize {
        (**self).length()
    }
    fn at_end(&self) -> bool {
        (**self).at_end()
    }
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}
