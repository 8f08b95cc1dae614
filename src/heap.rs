//! Definition of private, zero initialized memory.

use crate::RingError;
use std::{
    alloc::{Layout, alloc_zeroed, dealloc},
    ops::{Deref, DerefMut},
    ptr::NonNull,
    slice::{from_raw_parts, from_raw_parts_mut},
};

// Safety: Raw pointer is only exposed via Deref and DerefMut.
unsafe impl Sync for Heap {}
unsafe impl Send for Heap {}

/// Bytes allocated using the registered global allocator.
///
/// * If no custom allocator is registered, the default allocator from Rust std is used.
/// * Every byte is zero when allocation succeeds.
/// * Uses RAII pattern to free memory when heap memory goes out of scope.
#[derive(Debug)]
pub(crate) struct Heap {
    len: usize,
    layout: Layout,
    ptr: NonNull<u8>,
}

impl Heap {
    /// Allocate some zeroed bytes on heap.
    ///
    /// Unlike `Vec`, failure to allocate is reported back to the caller
    /// rather than aborting the process.
    ///
    /// # Arguments
    ///
    /// * `len` - Number of bytes to allocate, must be > 0.
    #[track_caller]
    pub(crate) fn alloc_zeroed(len: usize) -> Result<Self, RingError> {
        assert!(len > 0, "zero length memory cannot be allocated");

        // Fails when trying to allocate more than isize::MAX bytes.
        let layout = Layout::array::<u8>(len).map_err(|_| RingError::Allocation(len))?;

        // We'll get a non-null pointer only if allocation was successful.
        // Safety: Layout is valid and has non-zero size.
        let ptr = NonNull::new(unsafe { alloc_zeroed(layout) })
            .ok_or(RingError::Allocation(len))?;

        Ok(Self { len, layout, ptr })
    }
}

impl Drop for Heap {
    #[inline]
    fn drop(&mut self) {
        // Safety
        // * Cannot initialize with invalid pointer and layout.
        unsafe {
            dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}

impl Deref for Heap {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        // Safety
        // * Pointer is guaranteed to be initialized.
        // * length is guaranteed to be > 0.
        unsafe { from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for Heap {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // Safety
        // * Pointer is guaranteed to be initialized.
        // * length is guaranteed to be > 0.
        unsafe { from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}
