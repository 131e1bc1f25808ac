use std::{io, sync::Arc};

use super::Backend;

/// Serves bytes already held in memory.
///
/// The bytes are shared, so cloning a `MemoryBackend` is cheap and every clone
/// keeps its own read position.
///
/// # Examples
///
/// ```rust
/// use dataloader::{Loader, MemoryBackend};
///
/// let mut loader = Loader::new(MemoryBackend::new(b"hello world".to_vec()));
/// loader.load().unwrap();
/// loader.read(5);
/// assert_eq!(loader.data(), b"hello");
/// ```
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    bytes: Arc<[u8]>,
    pos: usize,
    open: bool,
}
impl MemoryBackend {
    pub fn new<T: Into<Arc<[u8]>>>(bytes: T) -> Self {
        Self {
            bytes: bytes.into(),
            pos: 0,
            open: false,
        }
    }
    pub fn is_open(&self) -> bool {
        self.open
    }
}
impl Backend for MemoryBackend {
    fn open(&mut self) -> io::Result<()> {
        self.pos = 0;
        self.open = true;
        Ok(())
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if !self.open {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "memory backend is not open",
            ));
        }
        let src = &self.bytes[self.pos..];
        let n = dst.len().min(src.len());
        dst[..n].copy_from_slice(&src[..n]);
        self.pos += n;
        Ok(n)
    }
    fn length(&self) -> usize {
        self.bytes.len()
    }
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
    fn close(&mut self) -> io::Result<()> {
        self.open = false;
        Ok(())
    }
}
