//! Placement of a request into a free block found by the fit search:
//! either the whole block is consumed, or the trailing remainder is
//! split off as a new free block.

use crate::align::MIN_BLOCK_SIZE;
use crate::block;
use crate::coalesce;
use crate::freelist;

/// Removes `bp` from the free list and allocates `request` bytes out of
/// it. `request` must be `<= bp`'s current size.
///
/// If the remainder (`bp`'s size minus `request`) is large enough to
/// stand alone (`>= MIN_BLOCK_SIZE`), it is split off, framed as a free
/// block, and run through the coalescer. In the common path from
/// [`crate::fit::find_fit`] the remainder is physically isolated and
/// coalescing degenerates to a plain free-list insert; the coalesce call
/// earns its keep when `bp` came from [`crate::heap::extend`], whose
/// split can land a fresh free block right next to one the extension
/// merged in a moment earlier. Otherwise the whole block is allocated,
/// accepting up to `MIN_BLOCK_SIZE - 1` bytes of internal fragmentation.
pub unsafe fn place(head: &mut *mut u8, bp: *mut u8, request: usize) {
    unsafe {
        let block_size = block::size(bp);
        debug_assert!(request <= block_size, "place: request exceeds block size");

        freelist::remove(head, bp);

        if block_size - request >= MIN_BLOCK_SIZE {
            block::set_header_footer(bp, request, true);
            let rest = block::next_blkp(bp);
            block::set_header_footer(rest, block_size - request, false);
            coalesce::coalesce(head, rest);
        } else {
            block::set_header_footer(bp, block_size, true);
        }
    }
}
