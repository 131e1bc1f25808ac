use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use super::Backend;

/// Streams a file from disk with plain reads.
///
/// The file is opened on [`open`](Backend::open) and its size taken from the
/// file metadata; [`close`](Backend::close) drops the handle.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: Option<File>,
    len: usize,
    pos: usize,
}
impl FileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: None,
            len: 0,
            pos: 0,
        }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}
impl Backend for FileBackend {
    fn open(&mut self) -> io::Result<()> {
        let file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        self.len = usize::try_from(len).map_err(|_| {
            io::Error::new(io::ErrorKind::FileTooLarge, "file does not fit in memory")
        })?;
        self.pos = 0;
        self.file = Some(file);
        Ok(())
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "file backend is not open",
            ));
        };
        let n = loop {
            match file.read(dst) {
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
        self.file = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_backend() {
        let temp_path = std::env::temp_dir().join("dataloader_test_file_backend.bin");
        fs::write(&temp_path, b"0123456789").unwrap();

        let mut backend = FileBackend::new(&temp_path);
        assert_eq!(backend.path(), temp_path.as_path());
        assert!(!backend.is_open());

        backend.open().unwrap();
        assert!(backend.is_open());
        assert_eq!(backend.length(), 10);

        let mut dst = [0u8; 4];
        assert_eq!(backend.read(&mut dst).unwrap(), 4);
        assert_eq!(&dst, b"0123");
        assert!(!backend.at_end());

        let mut dst = [0u8; 16];
        let mut total = 0;
        loop {
            let n = backend.read(&mut dst[total..]).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(&dst[..total], b"456789");
        assert!(backend.at_end());

        backend.close().unwrap();
        assert!(!backend.is_open());

        fs::remove_file(temp_path).unwrap();
    }

    #[test]
    fn test_file_backend_missing_file() {
        let mut backend = FileBackend::new("dataloader_does_not_exist.bin");
        let err = backend.open().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!backend.is_open());
    }

    #[test]
    fn test_file_backend_read_without_open() {
        let mut backend = FileBackend::new("unused.bin");
        let mut dst = [0u8; 4];
        assert_eq!(
            backend.read(&mut dst).unwrap_err().kind(),
            io::ErrorKind::NotConnected
        );
    }
}
