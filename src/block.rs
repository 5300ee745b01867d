//! Pure address arithmetic over the managed region.
//!
//! Every function here takes a *payload pointer* -- the address returned
//! to callers, or that will be -- and reads or writes metadata at fixed
//! offsets from it. A block is never modeled as a language-level value;
//! its identity is its position in the region, so these are free
//! functions over raw pointers rather than methods on a struct.
//!
//! ```text
//! -8          0              +8             size-16       size-8
//!  |  header  | prev-free link | next-free link | ... | footer |
//!              ^ payload pointer (bp)
//! ```
//!
//! The prev/next free-link slots overlap the payload area and are only
//! meaningful while the block is free.

use std::ptr;

use crate::align::{ALLOC_BIT, DSIZE, SIZE_MASK, WSIZE};

/// Packs a size and an allocation flag into a single header/footer word.
/// `size` must already be a multiple of 16; the low 4 bits are reserved
/// for flags, of which only bit 0 (`ALLOC_BIT`) is used.
#[inline]
pub fn pack(size: usize, alloc: bool) -> usize {
    (size & SIZE_MASK) | (alloc as usize * ALLOC_BIT)
}

/// Address of `bp`'s header word.
#[inline]
pub unsafe fn header(bp: *mut u8) -> *mut usize {
    unsafe { bp.sub(WSIZE).cast() }
}

/// Address of `bp`'s footer word. Reads the header to find the size.
#[inline]
pub unsafe fn footer(bp: *mut u8) -> *mut usize {
    unsafe { bp.add(size(bp) - DSIZE).cast() }
}

/// The size recorded in `bp`'s header, in bytes.
#[inline]
pub unsafe fn size(bp: *mut u8) -> usize {
    unsafe { header(bp).read() & SIZE_MASK }
}

/// Whether `bp`'s header marks the block allocated.
#[inline]
pub unsafe fn is_alloc(bp: *mut u8) -> bool {
    unsafe { header(bp).read() & ALLOC_BIT != 0 }
}

/// Writes matching header and footer words for `bp`, encoding `new_size`
/// and `alloc`. Callers must pass the block's true physical size: this
/// does not read the old header, so it may be used to re-frame a block to
/// a different size (as the splitter and coalescer do).
#[inline]
pub unsafe fn set_header_footer(bp: *mut u8, new_size: usize, alloc: bool) {
    unsafe {
        let word = pack(new_size, alloc);
        header(bp).write(word);
        bp.add(new_size - DSIZE).cast::<usize>().write(word);
    }
}

/// The physically-next block's payload pointer: `bp + size(bp)`.
#[inline]
pub unsafe fn next_blkp(bp: *mut u8) -> *mut u8 {
    unsafe { bp.add(size(bp)) }
}

/// The physically-previous block's payload pointer, found in O(1) via
/// its boundary-tag footer at `bp - DSIZE`.
#[inline]
pub unsafe fn prev_blkp(bp: *mut u8) -> *mut u8 {
    unsafe {
        let prev_size = bp.sub(DSIZE).cast::<usize>().read() & SIZE_MASK;
        bp.sub(prev_size)
    }
}

/// Address of `bp`'s prev-free link slot (offset 0). Valid only while
/// `bp` is free.
#[inline]
pub unsafe fn prev_free_slot(bp: *mut u8) -> *mut *mut u8 {
    bp.cast()
}

/// Address of `bp`'s next-free link slot (offset `WSIZE`). Valid only
/// while `bp` is free.
#[inline]
pub unsafe fn next_free_slot(bp: *mut u8) -> *mut *mut u8 {
    unsafe { bp.add(WSIZE).cast() }
}

#[inline]
pub unsafe fn prev_free(bp: *mut u8) -> *mut u8 {
    unsafe { prev_free_slot(bp).read() }
}

#[inline]
pub unsafe fn set_prev_free(bp: *mut u8, link: *mut u8) {
    unsafe { prev_free_slot(bp).write(link) }
}

#[inline]
pub unsafe fn next_free(bp: *mut u8) -> *mut u8 {
    unsafe { next_free_slot(bp).read() }
}

#[inline]
pub unsafe fn set_next_free(bp: *mut u8, link: *mut u8) {
    unsafe { next_free_slot(bp).write(link) }
}

/// `true` if `p` is a 16-byte-aligned address -- the alignment every
/// payload pointer returned to callers must have.
#[inline]
pub fn is_payload_aligned(p: *const u8) -> bool {
    (p as usize) % DSIZE == 0
}

/// Convenience: a null payload pointer, for call sites that want to name
/// the sentinel without importing `std::ptr` directly.
#[inline]
pub fn null() -> *mut u8 {
    ptr::null_mut()
}
