//! Alignment constants and helpers.
//!
//! `rallocator` targets 16-byte payload alignment (`DSIZE`), the layout
//! libc's own `malloc` uses on 64-bit targets. Block sizes are always a
//! multiple of `DSIZE` and at least `MIN_BLOCK_SIZE`, which leaves the low
//! 4 bits of every header/footer free for flags -- only bit 0
//! (`ALLOC_BIT`) is used.

/// Machine word size in bytes; the width of a header, a footer, and each
/// free-list link slot.
pub const WSIZE: usize = 8;

/// Double-word size in bytes; the granularity every block size is a
/// multiple of.
pub const DSIZE: usize = 16;

/// Smallest possible block: header + prev-link + next-link + footer.
pub const MIN_BLOCK_SIZE: usize = 32;

/// Default minimum heap-extension chunk, requested when a fit search
/// misses and the extension size would otherwise be smaller.
pub const CHUNKSIZE: usize = 1 << 12;

/// Allocation-bit mask within a header/footer word.
pub const ALLOC_BIT: usize = 0x1;

/// Mask isolating the size field of a header/footer word.
pub const SIZE_MASK: usize = !0xF;

/// Rounds `value` up to the next multiple of machine-word size.
///
/// # Examples
///
/// ```rust
/// use std::mem;
/// use rallocator::align;
///
/// match mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + ::std::mem::size_of::<usize>() - 1) & !(::std::mem::size_of::<usize>() - 1)
  };
}

/// Rounds `value` up to the next multiple of `align`, which must be a
/// power of two. Used to round allocation and heap-extension requests up
/// to `DSIZE`.
#[inline]
pub const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}
