//! Definition of options to construct a ring buffer.

use crate::{RingBuffer, RingError, memory::Memory};
use std::path::PathBuf;
use tracing::debug;

/// A builder to configure and construct a [`RingBuffer`].
///
/// By default a ring buffer is backed by private memory. Set a path to
/// back it by a shared memory map of a file instead.
///
/// ```no_run
/// use ringtape::RingOptions;
///
/// let ring = RingOptions::new()
///     .path("/tmp/ringtape")
///     .zero_fill(true)
///     .open(4096)?;
/// # Ok::<(), ringtape::RingError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RingOptions {
    path: Option<PathBuf>,
    zero_fill: bool,
    populate: bool,
}

impl RingOptions {
    /// Create options for a ring buffer backed by private memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Back the ring buffer with a file at this path.
    ///
    /// The file is created if it does not exist.
    pub fn path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// Overwrite the mapped range of the backing file with zeros.
    ///
    /// Otherwise bytes already in the file are visible through the ring buffer.
    /// Has no effect on private memory, which is always zeroed.
    pub fn zero_fill(&mut self, zero_fill: bool) -> &mut Self {
        self.zero_fill = zero_fill;
        self
    }

    /// Pre-fault all pages of the backing file mapping.
    ///
    /// Has no effect on private memory.
    pub fn populate(&mut self) -> &mut Self {
        self.populate = true;
        self
    }

    /// Construct a ring buffer with these options.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of bytes the ring buffer holds, must be > 0.
    pub fn open(&self, capacity: usize) -> Result<RingBuffer, RingError> {
        if capacity == 0 {
            return Err(RingError::Configuration("capacity must be > 0"));
        }

        let memory = match &self.path {
            None => Memory::anonymous(capacity)?,
            Some(path) => Memory::map_file(path, capacity, self.zero_fill, self.populate)?,
        };

        debug!(capacity, path = ?self.path, "constructed ring buffer");
        Ok(RingBuffer::from_parts(capacity, memory))
    }
}
