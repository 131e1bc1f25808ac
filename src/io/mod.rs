mod backend;
mod buffer;
#[cfg(feature = "niffler")]
mod decode;
mod file;
mod loader;
mod memory;
mod mmap;
mod seek;

pub use backend::{Backend, BoxedBackend};
#[cfg(feature = "niffler")]
pub use decode::DecoderBackend;
pub use file::FileBackend;
pub use loader::{load_to_vec, Loader};
pub use memory::MemoryBackend;
pub use mmap::MmapBackend;
pub use seek::ReaderBackend;
