//! Structural audit: walks the region and the free
//! list, checking every invariant this allocator maintains. Side-effect-free besides log
//! output; never mutates state, so it is safe to call between any two
//! public operations, including from a test harness or a trace driver.

use log::{error, trace};

use crate::align::{DSIZE, MIN_BLOCK_SIZE};
use crate::block;
use crate::error::AllocError;

/// Walks the managed region from `prologue` to `epilogue`, then the free
/// list from `free_head`, and cross-checks the two. `verbosity > 0` logs
/// every block visited at [`log::Level::Trace`]; any violation is logged
/// at [`log::Level::Error`] and returned as the first one found.
pub unsafe fn check(
    prologue: *mut u8,
    free_head: *mut u8,
    epilogue: *mut u8,
    verbosity: u32,
) -> Result<(), AllocError> {
    unsafe {
        if block::size(prologue) != MIN_BLOCK_SIZE || !block::is_alloc(prologue) {
            error!("prologue at {prologue:p} is not a {MIN_BLOCK_SIZE}-byte allocated block");
            return Err(AllocError::Corrupt { at: prologue as usize });
        }

        let mut bp = prologue;
        let mut prev_was_free = false;
        let mut free_count_by_walk = 0usize;

        while bp != epilogue {
            let size = block::size(bp);
            let alloc = block::is_alloc(bp);

            if size % DSIZE != 0 || size < MIN_BLOCK_SIZE {
                error!("block at {bp:p} has invalid size {size}");
                return Err(AllocError::Corrupt { at: bp as usize });
            }
            if block::header(bp).read() != block::footer(bp).read() {
                error!("block at {bp:p} header/footer mismatch");
                return Err(AllocError::Corrupt { at: bp as usize });
            }
            if !alloc && prev_was_free {
                error!("physically adjacent free blocks ending at {bp:p}");
                return Err(AllocError::Corrupt { at: bp as usize });
            }
            if !alloc {
                free_count_by_walk += 1;
            }
            if verbosity > 0 {
                trace!("block at {bp:p} size={size} alloc={alloc}");
            }

            prev_was_free = !alloc;
            bp = block::next_blkp(bp);
        }

        let epilogue_word = block::header(epilogue).read();
        if epilogue_word != block::pack(0, true) {
            error!("epilogue at {epilogue:p} is not an allocated zero-size marker");
            return Err(AllocError::Corrupt { at: epilogue as usize });
        }

        let mut node = free_head;
        let mut free_count_by_list = 0usize;
        while !block::is_alloc(node) {
            if node != free_head {
                let prev = block::prev_free(node);
                if block::next_free(prev) != node {
                    error!("free-list backward link broken at {node:p}");
                    return Err(AllocError::Corrupt { at: node as usize });
                }
            }
            let next = block::next_free(node);
            if !block::is_alloc(next) && block::prev_free(next) != node {
                error!("free-list forward link broken at {node:p}");
                return Err(AllocError::Corrupt { at: node as usize });
            }
            free_count_by_list += 1;
            node = next;
        }

        if node != prologue {
            error!("free list terminates at {node:p}, not the prologue at {prologue:p}");
            return Err(AllocError::Corrupt { at: node as usize });
        }

        if free_count_by_list != free_count_by_walk {
            error!(
                "free list accounts for {free_count_by_list} blocks, \
                 region walk found {free_count_by_walk}"
            );
            return Err(AllocError::Corrupt { at: free_head as usize });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coalesce;
    use crate::freelist;

    fn fresh_heap() -> (Vec<u8>, *mut u8, *mut u8, *mut u8) {
        let mut buf = vec![0u8; 512];
        let prologue = unsafe { buf.as_mut_ptr().add(32) };
        unsafe {
            block::set_header_footer(prologue, MIN_BLOCK_SIZE, true);
            block::set_prev_free(prologue, block::null());
            block::set_next_free(prologue, block::null());
        }
        let mut free_head = prologue;
        let bp = unsafe { block::next_blkp(prologue) };
        unsafe {
            block::set_header_footer(bp, 64, false);
            freelist::insert(&mut free_head, bp);
        }
        let epilogue = unsafe { block::next_blkp(bp) };
        unsafe { block::header(epilogue).write(block::pack(0, true)) };
        (buf, prologue, free_head, epilogue)
    }

    #[test]
    fn well_formed_heap_passes() {
        let (_buf, prologue, free_head, epilogue) = fresh_heap();
        unsafe {
            assert!(check(prologue, free_head, epilogue, 0).is_ok());
        }
    }

    #[test]
    fn detects_header_footer_mismatch() {
        let (_buf, prologue, free_head, epilogue) = fresh_heap();
        let bp = unsafe { block::next_blkp(prologue) };
        unsafe {
            block::footer(bp).write(block::pack(48, false));
        }
        unsafe {
            assert_eq!(
                check(prologue, free_head, epilogue, 0),
                Err(AllocError::Corrupt { at: bp as usize })
            );
        }
    }

    #[test]
    fn detects_adjacent_free_blocks() {
        let (mut buf, prologue, _free_head, _epilogue) = fresh_heap();
        let bp = unsafe { block::next_blkp(prologue) };
        // Frame a second free block directly after `bp` without
        // coalescing -- an invariant violation.
        let second = unsafe { block::next_blkp(bp) };
        unsafe {
            block::set_header_footer(second, 64, false);
        }
        let epilogue = unsafe { block::next_blkp(second) };
        unsafe { block::header(epilogue).write(block::pack(0, true)) };

        let mut free_head = prologue;
        unsafe {
            freelist::insert(&mut free_head, bp);
            freelist::insert(&mut free_head, second);
        }
        let _keep_alive = &mut buf;

        unsafe {
            assert!(check(prologue, free_head, epilogue, 0).is_err());
        }
    }

    #[test]
    fn coalesced_heap_still_passes() {
        let (_buf, prologue, mut free_head, mut epilogue) = fresh_heap();
        unsafe {
            let bp = block::next_blkp(prologue);
            // Free a neighbor right after `bp`, forcing a coalesce so the
            // audit sees one larger block instead of two adjacent frees.
            let neighbor_size = 32;
            let neighbor = block::next_blkp(bp);
            block::set_header_footer(neighbor, neighbor_size, false);
            epilogue = block::next_blkp(neighbor);
            block::header(epilogue).write(block::pack(0, true));
            coalesce::coalesce(&mut free_head, neighbor);

            assert!(check(prologue, free_head, epilogue, 1).is_ok());
        }
    }

    #[test]
    fn detects_free_list_not_terminating_at_prologue() {
        let (_buf, prologue, free_head, epilogue) = fresh_heap();
        unsafe {
            // Point the only free block's forward link past the prologue,
            // straight at the (allocated) epilogue. The block count still
            // matches the region walk, so only the terminator check below
            // can catch this.
            block::set_next_free(free_head, epilogue);
            assert_eq!(
                check(prologue, free_head, epilogue, 0),
                Err(AllocError::Corrupt { at: epilogue as usize })
            );
        }
    }
}
