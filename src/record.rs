//! Definition of fixed size types that can be moved through a ring buffer as raw bytes.

/// Fixed sized type with compile time known layout, size and alignment.
///
/// The basic idea is that this type provides support for zero-copy transmutation
/// between a slice of records and byte slice. You probably don't want to handwrite
/// these yourself. There are crates that allows one to safely perform this transmutation.
pub trait Record: Sized {
    /// Size of the record.
    fn size() -> usize;

    /// Zero copy transmute from record slice to bytes.
    ///
    /// # Arguments
    ///
    /// * `records` - Record slice to transmute.
    fn to_bytes_slice(records: &[Self]) -> &[u8];

    /// Zero copy transmute from mutable record slice to mutable bytes.
    ///
    /// Every bit pattern written into returned bytes must be a valid record.
    ///
    /// # Arguments
    ///
    /// * `records` - Record slice to transmute.
    fn to_bytes_slice_mut(records: &mut [Self]) -> &mut [u8];
}

// There will be conflicting implementations if both features are enabled.
#[cfg(all(feature = "zerocopy", feature = "bytemuck"))]
compile_error!("Either zerocopy or bytemuck feature can be enabled, not both");

// Support for zero copy transmutation for compatible types from bytemuck crate.
#[cfg(all(feature = "bytemuck", not(feature = "zerocopy")))]
use bytemuck::{Pod, cast_slice_mut, must_cast_slice};

#[cfg(all(feature = "bytemuck", not(feature = "zerocopy")))]
impl<T: Pod> Record for T {
    fn size() -> usize {
        size_of::<T>()
    }

    fn to_bytes_slice(records: &[Self]) -> &[u8] {
        must_cast_slice(records)
    }

    fn to_bytes_slice_mut(records: &mut [Self]) -> &mut [u8] {
        cast_slice_mut(records)
    }
}

// Support for zero copy transmutation for compatible types from zerocopy crate.
#[cfg(all(feature = "zerocopy", not(feature = "bytemuck")))]
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[cfg(all(feature = "zerocopy", not(feature = "bytemuck")))]
impl<T: FromBytes + IntoBytes + Immutable + KnownLayout> Record for T {
    fn size() -> usize {
        size_of::<T>()
    }

    fn to_bytes_slice(records: &[Self]) -> &[u8] {
        records.as_bytes()
    }

    fn to_bytes_slice_mut(records: &mut [Self]) -> &mut [u8] {
        records.as_mut_bytes()
    }
}

#[cfg(test)]
#[cfg(all(feature = "bytemuck", not(feature = "zerocopy")))]
mod tests {
    use super::*;
    use bolero::{TypeGenerator, check};
    use bytemuck::Zeroable;

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, TypeGenerator, Pod, Zeroable)]
    struct Sample {
        timestamp: u64,
        value: u32,
        channel: u32,
    }

    #[test]
    fn bytes_cover_whole_slice() {
        check!().with_type::<Vec<Sample>>().for_each(|records| {
            let bytes = Sample::to_bytes_slice(records);
            assert_eq!(Sample::size() * records.len(), bytes.len());
        });
    }

    #[test]
    fn mutable_bytes_alias_records() {
        check!().with_type::<Vec<Sample>>().for_each(|records| {
            let expected = records.clone();
            let mut returned = vec![Sample::zeroed(); records.len()];

            // Copy raw bytes into a zeroed slice of records.
            let src = Sample::to_bytes_slice(records);
            Sample::to_bytes_slice_mut(&mut returned).copy_from_slice(src);
            assert_eq!(expected, returned);
        });
    }
}
