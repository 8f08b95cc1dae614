//! # Ringtape
//!
//! Ringtape provides a fixed size circular buffer of bytes, used as a lightweight staging
//! area for raw bytes streamed from a producer (typically standard input).
//!
//! ## RingBuffer
//!
//! A [`RingBuffer`] is a tape of bytes with a single cursor shared by reads and writes.
//! Transfers wrap around to the start of the tape when they cross its end. Memory is either
//! private to the ring buffer, or a shared memory map of a file so that other processes can
//! map the same file and observe bytes written into it.
//!
//! ## Ingest
//!
//! [`ingest::run`] pumps bytes from any reader into a ring buffer until end of stream or
//! until a [`Shutdown`] is requested. [`ingest::run_stdin`] does the same for standard input.
//!
//! ## Record
//!
//! A [`Record`] is a fixed size element that can be moved through a ring buffer as raw bytes.
//! There is a blanket implementation for [`Record`] for supported types from popular crates.
//! This can be activated with one of the feature flags below. Note only one of the features
//! can be enabled, not both.
//!
//! * `bytemuck` - For types that implement supported traits from [`bytemuck`](https://docs.rs/bytemuck/latest/bytemuck/) (default)
//! * `zerocopy` - For types that implement supported traits from [`zerocopy`](https://docs.rs/zerocopy/latest/zerocopy/)

pub mod ingest;

pub(crate) mod error;
pub(crate) mod heap;
pub(crate) mod memory;
pub(crate) mod options;
pub(crate) mod record;
pub(crate) mod ring;

#[cfg(test)]
pub(crate) mod oracle;

// Internally used types.
pub(crate) use heap::Heap;

// Externally exposed types.
pub use error::{FileOp, RingError};
pub use ingest::{Ingested, Shutdown, Sink, Stop};
pub use options::RingOptions;
pub use record::Record;
pub use ring::RingBuffer;
