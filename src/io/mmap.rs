use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use memmap2::Mmap;

use super::Backend;

/// Serves a file through a read-only memory map.
///
/// The map is created on [`open`](Backend::open) and dropped on
/// [`close`](Backend::close). Reads are plain copies out of the mapping, so a
/// read always transfers as much as was asked for, up to the end of the file.
///
/// The file must not be truncated by another process while it is mapped.
#[derive(Debug)]
pub struct MmapBackend {
    path: PathBuf,
    map: Option<Mmap>,
    pos: usize,
}
impl MmapBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            map: None,
            pos: 0,
        }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn is_mapped(&self) -> bool {
        self.map.is_some()
    }
}
impl Backend for MmapBackend {
    fn open(&mut self) -> io::Result<()> {
        let file = File::open(&self.path)?;
        let map = unsafe { Mmap::map(&file)? };
        self.map = Some(map);
        self.pos = 0;
        Ok(())
    }
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let Some(map) = self.map.as_ref() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "mmap backend is not open",
            ));
        };
        let src = &map[self.pos..];
        let n = dst.len().min(src.len());
        dst[..n].copy_from_slice(&src[..n]);
        self.pos += n;
        Ok(n)
    }
    fn length(&self) -> usize {
        self.map.as_ref().map_or(0, |map| map.len())
    }
    fn at_end(&self) -> bool {
        self.pos >= self.length()
    }
    fn close(&mut self) -> io::Result<()> {
        self.map = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LoadStatus, Loader};
    use std::fs;

    #[test]
    fn test_mmap_backend() {
        let temp_path = std::env::temp_dir().join("dataloader_test_mmap_backend.bin");
        let contents: Vec<u8> = (0..=255).collect();
        fs::write(&temp_path, &contents).unwrap();

        let mut backend = MmapBackend::new(&temp_path);
        assert_eq!(backend.length(), 0);
        backend.open().unwrap();
        assert!(backend.is_mapped());
        assert_eq!(backend.length(), 256);

        let mut dst = [0u8; 100];
        assert_eq!(backend.read(&mut dst).unwrap(), 100);
        assert_eq!(&dst[..], &contents[..100]);

        let mut dst = [0u8; 200];
        assert_eq!(backend.read(&mut dst).unwrap(), 156);
        assert!(backend.at_end());

        backend.close().unwrap();
        assert!(!backend.is_mapped());

        fs::remove_file(temp_path).unwrap();
    }

    #[test]
    fn test_mmap_loader_episode() {
        let temp_path = std::env::temp_dir().join("dataloader_test_mmap_loader.bin");
        fs::write(&temp_path, vec![7u8; 4096]).unwrap();

        let mut loader = Loader::new(MmapBackend::new(&temp_path));
        loader.load().unwrap();
        assert_eq!(loader.total_size(), 4096);

        assert_eq!(loader.read(1000), 1000);
        assert_eq!(loader.status(), LoadStatus::Loading);

        loader.read_all();
        assert_eq!(loader.status(), LoadStatus::Loaded);
        assert_eq!(loader.data(), &[7u8; 4096][..]);

        let backend = loader.into_backend();
        assert!(!backend.is_mapped());

        fs::remove_file(temp_path).unwrap();
    }

    #[test]
    fn test_mmap_missing_file() {
        let mut backend = MmapBackend::new("dataloader_mmap_missing.bin");
        assert!(backend.open().is_err());
        assert!(!backend.is_mapped());
    }
}
