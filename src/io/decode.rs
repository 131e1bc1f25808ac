use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use niffler::send::compression::Format;

use super::Backend;

type BoxedReader = Box<dyn Read + Send>;

/// Streams a possibly compressed file, decompressing on the fly.
///
/// The compression format (gzip, bzip2, xz, zstd or none) is detected by
/// `niffler` each time the backend is opened. The decompressed size is not
/// stored in most of these formats, so the reported length is either the
/// caller's size hint or the result of a counting pass over the decompressed
/// stream at open time.
///
/// A size hint may overestimate the real size. The loader then stops on the
/// first empty read without marking the episode complete.
///
/// # Examples
///
/// ```rust,no_run
/// use dataloader::{DecoderBackend, Loader};
///
/// # fn main() -> dataloader::Result<()> {
/// let mut loader = Loader::new(DecoderBackend::new("song.vgz"));
/// loader.load()?;
/// loader.read_until(0x40);
/// println!("format: {:?}", loader.backend().format());
/// # Ok(())
/// # }
/// ```
pub struct DecoderBackend {
    path: PathBuf,
    size_hint: Option<usize>,
    reader: Option<BoxedReader>,
    format: Option<Format>,
    len: usize,
    pos: usize,
    eof: bool,
}
impl DecoderBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            size_hint: None,
            reader: None,
            format: None,
            len: 0,
            pos: 0,
            eof: false,
        }
    }

    /// Uses `size` as the decompressed length instead of measuring it.
    pub fn with_size_hint(mut self, size: usize) -> Self {
        self.size_hint = Some(size);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compression format detected by the last `open`.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    fn decoder(&self) -> io::Result<(BoxedReader, Format)> {
        let file = File::open(&self.path).map(BufReader::new)?;
        niffler::send::get_reader(Box::new(file)).map_err(io::Error::other)
    }

    /// Decompresses the whole stream once to learn its size.
    fn measure(&self) -> io::Result<usize> {
        let (mut reader, _format) = self.decoder()?;
        let size = io::copy(&mut reader, &mut io::sink())?;
        usize::try_from(size).map_err(|_| {
            io::Error::new(io::ErrorKind::FileTooLarge, "stream does not fit in memory")
        })
    }
}
impl Backend for DecoderBackend {
    fn open(&mut self) -> io::Result<()> {
        let len = match self.size_hint {
            Some(size) => size,
            None => self.measure()?,
        };
        let (reader, format) = self.decoder()?;
        log::debug!(
            "decoder: opened {} ({:?}, {} bytes)",
            self.path.display(),
            format,
            len
        );
        self.reader = Some(reader);
        self.format = Some(format);
        self.len = len;
        self.pos = 0;
        self.eof = false;
        Ok(())
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "decoder backend is not open",
            ));
        };
        let n = loop {
            match reader.read(dst) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other?,
            }
        };
        if n == 0 && !dst.is_empty() {
            self.eof = true;
        }
        self.pos += n;
        Ok(n)
    }
    fn length(&self) -> usize {
        self.len
    }
    fn at_end(&self) -> bool {
        self.eof || self.pos >= self.len
    }
    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        Ok(())
    }
}

impl std::fmt::Debug for DecoderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderBackend")
            .field("path", &self.path)
            .field("size_hint", &self.size_hint)
            .field("format", &self.format)
            .field("len", &self.len)
            .field("pos", &self.pos)
            .field("eof", &self.eof)
            .finish()
    }
}
