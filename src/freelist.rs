//! The explicit, doubly-linked, LIFO free list.
//!
//! There is no separate tail pointer: the **prologue** block is
//! permanently linked in at the tail position and marked allocated, so
//! every scan can terminate on a single condition (`block::is_alloc`)
//! rather than a null check. `insert`/`remove` have no failure path --
//! callers must establish that the block is (or isn't) already a member,
//! as appropriate.

use crate::block;

/// Inserts `bp` at the head of the free list pointed to by `head`.
/// Requires `bp` to be free and not already linked in.
pub unsafe fn insert(head: &mut *mut u8, bp: *mut u8) {
    unsafe {
        debug_assert!(!block::is_alloc(bp), "insert: bp must be free");
        let old_head = *head;
        block::set_next_free(bp, old_head);
        block::set_prev_free(old_head, bp);
        block::set_prev_free(bp, block::null());
        *head = bp;
    }
}

/// Removes `bp` from the free list pointed to by `head`. Requires `bp`
/// to currently be a member.
pub unsafe fn remove(head: &mut *mut u8, bp: *mut u8) {
    unsafe {
        debug_assert!(!block::is_alloc(bp), "remove: bp must be free");
        if bp == *head {
            *head = block::next_free(bp);
        } else {
            block::set_next_free(block::prev_free(bp), block::next_free(bp));
        }
        block::set_prev_free(block::next_free(bp), block::prev_free(bp));
    }
}
