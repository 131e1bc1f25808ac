/// Runtime configuration of a [`Loader`](crate::Loader).
///
/// Changes take effect on the next call to [`Loader::load`](crate::Loader::load)
/// (preload) or the next read (buffer limit).
///
/// # Examples
///
/// ```rust
/// use dataloader::LoaderConfig;
///
/// let config = LoaderConfig::new()
///     .with_preload_bytes(256)
///     .with_buffer_limit(1 << 20);
///
/// assert_eq!(config.preload(), Some(256));
/// assert_eq!(config.buffer_limit, Some(1 << 20));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoaderConfig {
    /// Byte offset to fill eagerly right after a successful `open`
    pub preload_bytes: Option<usize>,
    /// Largest size the buffer may grow to (unbounded if `None`)
    pub buffer_limit: Option<usize>,
}
impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_preload_bytes(mut self, bytes: usize) -> Self {
        self.preload_bytes = Some(bytes);
        self
    }
    pub fn with_buffer_limit(mut self, limit: usize) -> Self {
        self.buffer_limit = Some(limit);
        self
    }

    /// Effective preload threshold.
    ///
    /// A configured threshold of zero is the same as no threshold.
    pub fn preload(&self) -> Option<usize> {
        self.preload_bytes.filter(|&n| n > 0)
    }

    /// Returns true if a buffer of `size` bytes fits within the limit.
    pub fn allows(&self, size: usize) -> bool {
        self.buffer_limit.is_none_or(|limit| size <= limit)
    }
}
