//! Definition of a loop that pumps bytes from an input stream into a ring buffer.

use crate::{RingBuffer, RingError};
use std::{
    io::{self, ErrorKind, Read},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::{debug, trace};

/// Destination of bytes pumped by [`run`].
pub trait Sink {
    /// Accept bytes read from an input stream.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Bytes actually read, never empty.
    fn accept(&mut self, bytes: &[u8]);
}

impl Sink for RingBuffer {
    #[inline]
    fn accept(&mut self, bytes: &[u8]) {
        self.write(bytes);
    }
}

/// A cooperative request to stop pumping bytes.
///
/// Clones share the same flag, so a clone can be handed to a signal handler
/// while the original is passed to [`run`]. The flag is only checked between
/// reads, a blocked read is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    /// Create a new shutdown flag that is not yet requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request for the loop to stop before its next read.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// true if shutdown was requested, false otherwise.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Reason a loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Input stream reached end of stream.
    EndOfStream,

    /// Shutdown was requested.
    Shutdown,
}

/// Summary of work done by a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingested {
    /// Total number of bytes forwarded to sink.
    pub bytes: u64,

    /// Number of times sink accepted bytes.
    pub writes: u64,

    /// Why the loop stopped.
    pub stop: Stop,
}

/// Pump bytes from a reader into a sink until end of stream or shutdown.
///
/// * Reads up to chunk_size bytes at a time.
/// * Forwards exactly the bytes read, there is no framing.
/// * Shutdown is checked once before every read.
/// * Interrupted reads are retried, any other read error stops the loop.
///
/// # Errors
///
/// * [`RingError::Configuration`] if chunk_size == 0.
/// * [`RingError::Read`] if reading from reader fails.
///
/// # Arguments
///
/// * `reader` - Input stream to read bytes from.
/// * `sink` - Destination of bytes read.
/// * `chunk_size` - Maximum number of bytes to read at a time.
/// * `shutdown` - Request to stop the loop.
pub fn run<R: Read, S: Sink + ?Sized>(
    mut reader: R,
    sink: &mut S,
    chunk_size: usize,
    shutdown: &Shutdown,
) -> Result<Ingested, RingError> {
    if chunk_size == 0 {
        return Err(RingError::Configuration("chunk size must be > 0"));
    }

    let mut buf = vec![0u8; chunk_size];
    let mut bytes = 0;
    let mut writes = 0;

    let stop = loop {
        if shutdown.is_requested() {
            break Stop::Shutdown;
        }

        let len = match reader.read(&mut buf) {
            Ok(0) => break Stop::EndOfStream,
            Ok(len) => len,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(RingError::Read(e)),
        };

        trace!(len, "ingested chunk");
        sink.accept(&buf[..len]);
        bytes += len as u64;
        writes += 1;
    };

    debug!(bytes, writes, ?stop, "stopped ingesting");
    Ok(Ingested {
        bytes,
        writes,
        stop,
    })
}

/// Pump bytes from standard input into a ring buffer until end of stream or shutdown.
///
/// On unix and windows standard input is read without any buffering in user
/// space, elsewhere reads go through the buffered [`io::Stdin`]. Bytes are never
/// translated, i.e, line endings and encodings are preserved as is.
///
/// See [`run`] for details.
pub fn run_stdin(
    ring: &mut RingBuffer,
    chunk_size: usize,
    shutdown: &Shutdown,
) -> Result<Ingested, RingError> {
    run(raw_stdin()?, ring, chunk_size, shutdown)
}

// Stdin in std is always buffered, so read from a duplicate of the handle instead.
#[cfg(unix)]
fn raw_stdin() -> Result<impl Read, RingError> {
    use std::os::fd::AsFd;

    let fd = io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .map_err(RingError::Read)?;

    Ok(std::fs::File::from(fd))
}

#[cfg(windows)]
fn raw_stdin() -> Result<impl Read, RingError> {
    use std::os::windows::io::AsHandle;

    let handle = io::stdin()
        .as_handle()
        .try_clone_to_owned()
        .map_err(RingError::Read)?;

    Ok(std::fs::File::from(handle))
}

#[cfg(not(any(unix, windows)))]
fn raw_stdin() -> Result<impl Read, RingError> {
    Ok(io::stdin().lock())
}
