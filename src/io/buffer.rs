use std::collections::TryReserveError;

/// Growable, exclusively owned byte buffer backing a loader.
///
/// `len` counts the valid bytes; the allocation past it holds a zeroed (or
/// previously handed out) tail that is reused by the next growth, so every
/// byte is zero-filled at most once per episode. Growth is all-or-nothing: a
/// failed [`grow_to`](GrowBuffer::grow_to) leaves both the contents and the
/// length untouched. Memory is only returned on
/// [`release`](GrowBuffer::release).
#[derive(Debug, Default)]
pub(crate) struct GrowBuffer {
    data: Vec<u8>,
    len: usize,
    /// Bytes zero-filled since the last release
    #[cfg(test)]
    zero_filled: usize,
}
impl GrowBuffer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.len
    }
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }
    #[cfg(test)]
    pub fn zero_filled(&self) -> usize {
        self.zero_filled
    }
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Makes room for `size` valid bytes and returns the gap past the
    /// current length for the caller to fill.
    ///
    /// Only the part of the gap that was never initialised is zero-filled.
    /// Sizes at or below the current length return an empty gap.
    pub fn grow_to(&mut self, size: usize) -> Result<&mut [u8], TryReserveError> {
        let init = self.data.len();
        if size > init {
            self.data.try_reserve_exact(size - init)?;
            self.data.resize(size, 0);
            #[cfg(test)]
            {
                self.zero_filled += size - init;
            }
        }
        let end = size.max(self.len);
        Ok(&mut self.data[self.len..end])
    }

    /// Marks the first `len` bytes as valid, leaving any unfilled tail for
    /// the next growth.
    pub fn commit(&mut self, len: usize) {
        debug_assert!(len <= self.data.len());
        self.len = len;
    }

    /// Frees the allocation.
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.len = 0;
        #[cfg(test)]
        {
            self.zero_filled = 0;
        }
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.truncate(self.len);
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_returns_zeroed_tail() {
        let mut buffer = GrowBuffer::new();
        let tail = buffer.grow_to(4).unwrap();
        assert_eq!(tail, &[0, 0, 0, 0]);
        tail.copy_from_slice(b"abcd");
        buffer.commit(4);

        let tail = buffer.grow_to(6).unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(&buffer.as_slice()[..4], b"abcd");
    }

    #[test]
    fn test_grow_below_len_is_noop() {
        let mut buffer = GrowBuffer::new();
        buffer.grow_to(8).unwrap();
        buffer.commit(8);
        assert!(buffer.grow_to(4).unwrap().is_empty());
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_failed_grow_preserves_contents() {
        let mut buffer = GrowBuffer::new();
        buffer.grow_to(3).unwrap().copy_from_slice(b"xyz");
        buffer.commit(3);

        assert!(buffer.grow_to(usize::MAX).is_err());
        assert_eq!(buffer.as_slice(), b"xyz");
    }

    #[test]
    fn test_short_fill_reuses_zeroed_tail() {
        let mut buffer = GrowBuffer::new();
        buffer.grow_to(100).unwrap()[..10].fill(1);
        buffer.commit(10);
        assert_eq!(buffer.as_slice(), &[1u8; 10][..]);

        let gap = buffer.grow_to(100).unwrap();
        assert_eq!(gap.len(), 90);
        gap[..20].fill(2);
        buffer.commit(30);

        assert_eq!(buffer.grow_to(100).unwrap().len(), 70);
        assert_eq!(buffer.zero_filled(), 100);
        assert_eq!(buffer.len(), 30);
        assert_eq!(&buffer.as_slice()[10..], &[2u8; 20][..]);
    }

    #[test]
    fn test_into_vec_drops_tail() {
        let mut buffer = GrowBuffer::new();
        buffer.grow_to(64).unwrap()[..4].copy_from_slice(b"abcd");
        buffer.commit(4);
        assert_eq!(buffer.into_vec(), b"abcd");
    }

    #[test]
    fn test_commit_keeps_capacity() {
        let mut buffer = GrowBuffer::new();
        buffer.grow_to(1024).unwrap();
        buffer.commit(10);
        assert_eq!(buffer.len(), 10);
        assert!(buffer.capacity() >= 1024);
    }

    #[test]
    fn test_release() {
        let mut buffer = GrowBuffer::new();
        buffer.grow_to(1024).unwrap();
        buffer.release();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 0);
        assert_eq!(buffer.zero_filled(), 0);
        assert!(buffer.as_slice().is_empty());
    }
}
