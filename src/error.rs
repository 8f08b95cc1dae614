//! Definition of errors surfaced by ring buffers.

use std::{fmt, io, path::PathBuf};
use thiserror::Error;

/// Different types of error that can happen while managing a [`RingBuffer`](crate::RingBuffer).
///
/// Reads and writes against a live ring buffer never fail. Errors only happen
/// at construction, teardown and when pulling bytes from an input stream.
#[derive(Debug, Error)]
pub enum RingError {
    #[error("Invalid ring buffer configuration: {0}")]
    Configuration(&'static str),

    #[error("Cannot allocate {0} bytes of memory for ring buffer")]
    Allocation(usize),

    #[error("Cannot {} backing file {}: {}", .op, .path.display(), .source)]
    File {
        op: FileOp,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Cannot release mapping of backing file {}: {}", .path.display(), .source)]
    Unmap { path: PathBuf, source: io::Error },

    #[error("Cannot read from input stream: {0}")]
    Read(#[source] io::Error),
}

/// Operation on a backing file that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Open,
    Extend,
    Map,
    Flush,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            FileOp::Open => "open",
            FileOp::Extend => "extend",
            FileOp::Map => "map",
            FileOp::Flush => "flush",
        };

        f.write_str(op)
    }
}
