//! Definition of storage that backs a ring buffer.

use crate::{FileOp, Heap, RingError};
use memmap2::{MmapMut, MmapOptions};
use std::{
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

/// Contiguous bytes that hold contents of a ring buffer.
///
/// Exactly one of the two variants backs a ring buffer, it's never both.
#[derive(Debug)]
pub(crate) enum Memory {
    /// Private memory allocated on heap.
    Heap(Heap),

    /// Memory shared with a file on disk.
    Mapped(Mapped),
}

/// A shared, writeable memory map of a file.
///
/// Writes to the mapping are visible through the file, subject to when
/// the OS decides to write back dirty pages.
#[derive(Debug)]
pub(crate) struct Mapped {
    path: PathBuf,
    mmap: MmapMut,

    // Kept open for as long as the mapping lives.
    file: File,
}

impl Memory {
    /// Allocate private zeroed memory.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of bytes to allocate.
    pub(crate) fn anonymous(capacity: usize) -> Result<Self, RingError> {
        Heap::alloc_zeroed(capacity).map(Memory::Heap)
    }

    /// Map the first `capacity` bytes of a file into memory.
    ///
    /// * File is created if it does not exist.
    /// * File is extended with zeros if it is shorter than capacity, never truncated.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the backing file.
    /// * `capacity` - Number of bytes to map.
    /// * `zero_fill` - Overwrite mapped range of the file with zeros.
    /// * `populate` - Pre-fault all the mapped pages.
    pub(crate) fn map_file(
        path: &Path,
        capacity: usize,
        zero_fill: bool,
        populate: bool,
    ) -> Result<Self, RingError> {
        let error = |op: FileOp| {
            let path = path.to_path_buf();
            move |source: io::Error| RingError::File { op, path, source }
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(error(FileOp::Open))?;

        // Mapping past the end of a file is undefined, so grow it first.
        let len = file.metadata().map_err(error(FileOp::Open))?.len();
        if len < capacity as u64 {
            file.set_len(capacity as u64).map_err(error(FileOp::Extend))?;
        }

        let mut options = MmapOptions::new();
        options.len(capacity);
        if populate {
            options.populate();
        }

        // Safety: Cross process access to the file is the whole point of this
        // mapping. Consistency of shared bytes is an obligation of the callers.
        let mut mmap = unsafe { options.map_mut(&file) }.map_err(error(FileOp::Map))?;
        if zero_fill {
            mmap.fill(0);
        }

        Ok(Memory::Mapped(Mapped {
            path: path.to_path_buf(),
            mmap,
            file,
        }))
    }

    /// Path to the backing file, if any.
    pub(crate) fn path(&self) -> Option<&Path> {
        match self {
            Memory::Heap(_) => None,
            Memory::Mapped(mapped) => Some(&mapped.path),
        }
    }

    /// Synchronously write back modified pages to the backing file.
    pub(crate) fn flush(&self) -> Result<(), RingError> {
        match self {
            Memory::Heap(_) => Ok(()),
            Memory::Mapped(mapped) => mapped.mmap.flush().map_err(|source| RingError::File {
                op: FileOp::Flush,
                path: mapped.path.clone(),
                source,
            }),
        }
    }

    /// Release this memory.
    ///
    /// Memory is released even when an error is returned. Contents of
    /// the backing file, if any, are left in place.
    pub(crate) fn release(self) -> Result<(), RingError> {
        match self {
            Memory::Heap(heap) => {
                drop(heap);
                Ok(())
            }

            Memory::Mapped(Mapped { path, mmap, file }) => {
                let flushed = mmap.flush();

                // Unmap before closing the file descriptor.
                drop(mmap);
                drop(file);

                flushed.map_err(|source| RingError::Unmap { path, source })
            }
        }
    }
}

impl AsRef<[u8]> for Memory {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        match self {
            Memory::Heap(heap) => heap,
            Memory::Mapped(mapped) => &mapped.mmap,
        }
    }
}

impl AsMut<[u8]> for Memory {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        match self {
            Memory::Heap(heap) => heap,
            Memory::Mapped(mapped) => &mut mapped.mmap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_file_of_capacity() {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("ring");

        let memory = Memory::map_file(&path, 4096, false, false).expect("Should map file");
        assert_eq!(memory.as_ref().len(), 4096);
        assert!(memory.as_ref().iter().all(|byte| *byte == 0));
        assert_eq!(memory.path(), Some(path.as_path()));
        memory.release().expect("Should release mapping");

        let len = std::fs::metadata(&path).expect("Should stat file").len();
        assert_eq!(len, 4096);
    }

    #[test]
    fn never_truncates_longer_file() {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("ring");
        std::fs::write(&path, vec![7u8; 64]).expect("Should write file");

        let memory = Memory::map_file(&path, 16, false, true).expect("Should map file");
        assert_eq!(memory.as_ref(), &[7u8; 16]);
        memory.release().expect("Should release mapping");

        let len = std::fs::metadata(&path).expect("Should stat file").len();
        assert_eq!(len, 64);
    }

    #[test]
    fn zero_fill_only_mapped_range() {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("ring");
        std::fs::write(&path, vec![7u8; 32]).expect("Should write file");

        let memory = Memory::map_file(&path, 16, true, false).expect("Should map file");
        memory.release().expect("Should release mapping");

        let bytes = std::fs::read(&path).expect("Should read file");
        assert_eq!(&bytes[..16], &[0u8; 16]);
        assert_eq!(&bytes[16..], &[7u8; 16]);
    }

    #[test]
    fn open_failure() {
        let dir = TempDir::new().expect("Should create temp dir");

        // A directory cannot be opened for writing.
        match Memory::map_file(dir.path(), 16, false, false) {
            Err(RingError::File { op, path, .. }) => {
                assert_eq!(op, FileOp::Open);
                assert_eq!(path, dir.path());
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn extend_failure() {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("ring");

        // No file system can hold this many bytes.
        match Memory::map_file(&path, usize::MAX, false, false) {
            Err(RingError::File { op, .. }) => assert_eq!(op, FileOp::Extend),
            other => panic!("Unexpected result: {other:?}"),
        }

        // File was created, but never grown.
        let len = std::fs::metadata(&path).expect("Should stat file").len();
        assert_eq!(len, 0);
    }

    #[test]
    fn anonymous_has_no_path() {
        let memory = Memory::anonymous(8).expect("Should allocate memory");
        assert_eq!(memory.path(), None);
        assert!(memory.flush().is_ok());
        assert!(memory.release().is_ok());
    }
}
