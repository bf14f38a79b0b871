//! Byte payload of a single file.

use crate::error::{StoreError, StoreResult};

/// Growable byte buffer with positional reads and writes.
///
/// Writes past the end zero-fill the gap. Those bytes are real zeros in the
/// buffer afterwards, indistinguishable from written zeros. The buffer holds
/// no cursor; callers track their own position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBuffer {
    bytes: Vec<u8>,
}

impl ContentBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `data` at `offset`, growing the buffer as needed.
    ///
    /// Always writes every byte. The resulting length is
    /// `max(old_len, offset + data.len())`. Returns `data.len()`.
    pub fn write_at(&mut self, data: &[u8], offset: usize) -> usize {
        let end = offset + data.len();
        if end > self.bytes.len() {
            self.bytes.resize(end, 0);
        }
        self.bytes[offset..end].copy_from_slice(data);
        data.len()
    }

    /// Read into `dest` starting at `offset`.
    ///
    /// Returns [`StoreError::EndOfData`] when `offset` is at or past the end.
    /// Otherwise copies `min(dest.len(), len - offset)` bytes and returns the
    /// count. Reads never change the length.
    pub fn read_at(&self, dest: &mut [u8], offset: usize) -> StoreResult<usize> {
        if offset >= self.bytes.len() {
            return Err(StoreError::EndOfData);
        }

        let available = &self.bytes[offset..];
        let n = dest.len().min(available.len());
        dest[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    /// Resize to exactly `size` bytes, zero-filling when growing.
    pub fn truncate(&mut self, size: usize) {
        self.bytes.resize(size, 0);
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
