//! Definition of a ring buffer.

use crate::{Record, RingError, RingOptions, memory::Memory};
use std::{cmp::min, path::Path};
use tracing::debug;

/// A fixed size circular buffer of bytes.
///
/// RingBuffer is a tape of bytes with a single cursor. Both reads and writes start
/// at the cursor and advance it, wrapping around to 0 when the end of the tape is
/// reached. It makes trade-offs that you should be aware of.
///
/// * Reads and writes share the same cursor, they are not producer/consumer offsets.
/// * There is no overflow detection, writes silently overwrite unread bytes.
/// * Transfers larger than capacity keep wrapping around till all bytes are moved.
/// * There is no synchronization, a ring buffer must have a single owner.
///
/// Memory is either private to this ring buffer or a shared memory map of a file.
/// When file backed, any other process mapping the same file sees bytes written
/// into this ring buffer, but never its cursor.
#[derive(Debug)]
pub struct RingBuffer {
    // Number of bytes in the ring buffer, always > 0.
    capacity: usize,

    // Index where next read or write starts, always < capacity.
    cursor: usize,

    // Bytes of the ring buffer.
    memory: Memory,
}

impl RingBuffer {
    /// Create a new ring buffer backed by private, zeroed memory.
    ///
    /// # Errors
    ///
    /// * [`RingError::Configuration`] if capacity == 0.
    /// * [`RingError::Allocation`] if memory cannot be allocated.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of bytes in this ring buffer.
    pub fn anonymous(capacity: usize) -> Result<Self, RingError> {
        RingOptions::new().open(capacity)
    }

    /// Create a new ring buffer backed by a shared memory map of a file.
    ///
    /// * File is created if it does not exist.
    /// * File shorter than capacity is extended with zeros, it's never truncated.
    /// * Existing bytes of the file are visible through the ring buffer.
    ///
    /// Use [`RingOptions`] for more control over construction.
    ///
    /// # Errors
    ///
    /// * [`RingError::Configuration`] if capacity == 0.
    /// * [`RingError::File`] if file cannot be opened, extended or mapped.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the backing file.
    /// * `capacity` - Number of bytes in this ring buffer.
    pub fn file_backed(path: impl AsRef<Path>, capacity: usize) -> Result<Self, RingError> {
        RingOptions::new().path(path.as_ref()).open(capacity)
    }

    pub(crate) fn from_parts(capacity: usize, memory: Memory) -> Self {
        debug_assert!(capacity > 0);
        debug_assert_eq!(capacity, memory.as_ref().len());

        Self {
            capacity,
            cursor: 0,
            memory,
        }
    }

    /// Number of bytes in this ring buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index where the next read or write starts.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Path to the backing file, if this ring buffer is file backed.
    pub fn path(&self) -> Option<&Path> {
        self.memory.path()
    }

    /// true if this ring buffer is backed by a file, false otherwise.
    pub fn is_file_backed(&self) -> bool {
        self.path().is_some()
    }

    /// All the bytes in this ring buffer, starting from index 0.
    ///
    /// Does not move the cursor.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.memory.as_ref()
    }

    /// Write bytes into the ring buffer starting at cursor.
    ///
    /// * If bytes are empty, this operation is no-op.
    /// * Cursor is advanced by bytes.len(), modulo capacity.
    /// * Wraps around as many times as needed, overwriting older bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Bytes to write.
    pub fn write(&mut self, mut bytes: &[u8]) {
        let mut cursor = self.cursor;

        // If number of bytes is greater than the capacity of this ring buffer, a prefix of
        // those bytes will be overwritten by the same write. We can skip those bytes as long
        // as the cursor is moved past them. This makes every write at most 2 memcpy operations.
        if bytes.len() > self.capacity {
            let skip = bytes.len() - self.capacity;
            cursor = (cursor + skip) % self.capacity;
            bytes = &bytes[skip..];
        }

        // One copy from cursor till end of the ring buffer.
        // Another one from index 0 for whatever wrapped around.
        let (first, second) = bytes.split_at(min(bytes.len(), self.capacity - cursor));
        let memory = self.memory.as_mut();
        memory[cursor..(cursor + first.len())].copy_from_slice(first);
        memory[..second.len()].copy_from_slice(second);

        self.cursor = (cursor + bytes.len()) % self.capacity;
    }

    /// Read bytes from the ring buffer starting at cursor.
    ///
    /// * If buf is empty, this operation is no-op.
    /// * Cursor is advanced by buf.len(), modulo capacity.
    /// * Wraps around as many times as needed, so bytes repeat when buf.len() > capacity.
    ///
    /// # Arguments
    ///
    /// * `buf` - Buffer to fill with bytes from the ring buffer.
    pub fn read(&mut self, mut buf: &mut [u8]) {
        let memory = self.memory.as_ref();
        let mut cursor = self.cursor;

        while !buf.is_empty() {
            let len = min(buf.len(), self.capacity - cursor);
            let (chunk, rest) = std::mem::take(&mut buf).split_at_mut(len);
            chunk.copy_from_slice(&memory[cursor..(cursor + len)]);

            cursor = (cursor + len) % self.capacity;
            buf = rest;
        }

        self.cursor = cursor;
    }

    /// Write raw bytes of records into the ring buffer starting at cursor.
    ///
    /// Same semantics as [`RingBuffer::write`].
    ///
    /// # Arguments
    ///
    /// * `records` - Records to write.
    pub fn write_records<T: Record>(&mut self, records: &[T]) {
        let bytes = T::to_bytes_slice(records);
        debug_assert_eq!(bytes.len(), records.len() * T::size());
        self.write(bytes);
    }

    /// Read raw bytes from the ring buffer starting at cursor into records.
    ///
    /// Same semantics as [`RingBuffer::read`]. Nothing guarantees that bytes read
    /// were written as records of the same type, or at the same alignment.
    ///
    /// # Arguments
    ///
    /// * `records` - Records to overwrite with bytes from the ring buffer.
    pub fn read_records<T: Record>(&mut self, records: &mut [T]) {
        let len = records.len() * T::size();
        let bytes = T::to_bytes_slice_mut(records);
        debug_assert_eq!(bytes.len(), len);
        self.read(bytes);
    }

    /// Synchronously write back modified bytes to the backing file.
    ///
    /// No-op for ring buffers backed by private memory.
    ///
    /// # Errors
    ///
    /// * [`RingError::File`] if bytes cannot be written back.
    pub fn flush(&self) -> Result<(), RingError> {
        self.memory.flush()
    }

    /// Release memory held by this ring buffer.
    ///
    /// Memory is released even when an error is returned. Dropping a ring buffer
    /// also releases memory, but errors during teardown are silently ignored.
    /// Backing file, if any, is never deleted or truncated.
    ///
    /// # Errors
    ///
    /// * [`RingError::Unmap`] if file backed memory could not be released cleanly.
    pub fn destroy(self) -> Result<(), RingError> {
        debug!(capacity = self.capacity, path = ?self.path(), "destroying ring buffer");
        self.memory.release()
    }
}
