//! Heap extension: asks the region primitive for more bytes, frames them
//! as one free block, rebuilds the epilogue, and coalesces.

use log::debug;

use crate::align::{DSIZE, MIN_BLOCK_SIZE};
use crate::block;
use crate::coalesce;
use crate::mem;

/// Extends the managed region by at least `nbytes` (rounded up to a
/// multiple of `DSIZE` and to at least `MIN_BLOCK_SIZE`), returning the
/// payload pointer of the (possibly already-merged) resulting free
/// block, or `None` if the region primitive failed. `*epilogue` is
/// updated in place to the new end-of-region marker.
pub unsafe fn extend(head: &mut *mut u8, epilogue: &mut *mut u8, nbytes: usize) -> Option<*mut u8> {
    unsafe {
        let size = crate::align::align_up(nbytes, DSIZE).max(MIN_BLOCK_SIZE);

        // `sbrk` returns the old break, which is exactly where the old
        // (zero-size) epilogue header lived -- that slot becomes the new
        // free block's header.
        let bp = mem::extend(size)?;
        block::set_header_footer(bp, size, false);

        let new_epilogue = block::next_blkp(bp);
        block::header(new_epilogue).write(block::pack(0, true));
        *epilogue = new_epilogue;

        debug!("extended heap by {size} bytes, new epilogue at {new_epilogue:p}");

        Some(coalesce::coalesce(head, bp))
    }
}
