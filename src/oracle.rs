//! Reference implementation of a ring buffer tape using standard library primitives.

/// A byte at a time model of a ring buffer with a single cursor.
///
/// Deliberately naive, so that it's obviously correct. Used to validate
/// wrap around logic of [`RingBuffer`](crate::RingBuffer) in tests.
#[derive(Debug)]
pub(crate) struct Oracle {
    cursor: usize,
    bytes: Vec<u8>,
}

impl Oracle {
    /// Create a new instance of this ring buffer, every byte set to 0.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of bytes in this ring buffer.
    #[track_caller]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be > 0");

        Self {
            cursor: 0,
            bytes: vec![0; capacity],
        }
    }

    /// Current position of the cursor.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// All the bytes in this ring buffer.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write bytes one at a time, advancing cursor after every byte.
    pub(crate) fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.bytes[self.cursor] = *byte;
            self.advance();
        }
    }

    /// Read bytes one at a time, advancing cursor after every byte.
    pub(crate) fn read(&mut self, buf: &mut [u8]) {
        for byte in buf {
            *byte = self.bytes[self.cursor];
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor == self.bytes.len() {
            self.cursor = 0;
        }
    }
}
