//! Compact half-open span used for token line maps.
//!
//! Uses `u32` indices to keep tokens small (8 bytes vs 16 for a usize pair).
//! Supports documents up to 4G lines.

/// Compact `[start, end)` span over source lines.
///
/// # Example
/// ```
/// use fencemark::Range;
///
/// let map = Range::from_usize(2, 5);
/// assert_eq!((map.start, map.end), (2, 5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

// Compile-time size verification
const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize values.
    ///
    /// # Panics
    /// Panics in debug mode if values exceed u32::MAX.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self::new(start as u32, end as u32)
    }
}
