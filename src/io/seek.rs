use std::io::{self, Read, Seek, SeekFrom};

use super::Backend;

/// Adapts any seekable reader.
///
/// Each episode rewinds the reader to its start; the length is measured by
/// seeking to the end at open time.
///
/// # Examples
///
/// ```rust
/// use dataloader::{Loader, ReaderBackend};
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(vec![1u8, 2, 3, 4]);
/// let mut loader = Loader::new(ReaderBackend::new(cursor));
/// loader.load().unwrap();
/// loader.read_all();
/// assert_eq!(loader.data(), &[1, 2, 3, 4]);
/// ```
#[derive(Debug)]
pub struct ReaderBackend<R: Read + Seek> {
    inner: R,
    len: usize,
    pos: usize,
}
impl<R: Read + Seek> ReaderBackend<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            len: 0,
            pos: 0,
        }
    }
    pub fn get_ref(&self) -> &R {
        &self.inner
    }
    pub fn into_inner(self) -> R {
        self.inner
    }
}
impl<R: Read + Seek> Backend for ReaderBackend<R> {
    fn open(&mut self) -> io::Result<()> {
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(0))?;
        self.len = usize::try_from(end).map_err(|_| {
            io::Error::new(io::ErrorKind::FileTooLarge, "source does not fit in memory")
        })?;
        self.pos = 0;
        Ok(())
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let n = loop {
            match self.inner.read(dst) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other?,
            }
        };
        self.pos += n;
        Ok(n)
    }
    fn length(&self) -> usize {
        self.len
    }
    fn at_end(&self) -> bool {
        self.pos >= self.len
    }
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}
