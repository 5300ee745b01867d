//! The public surface: `initialize`, `allocate`, `release`, `reallocate`,
//! and the diagnostic `check`. Everything in the sibling modules
//! composes here.

use std::ptr;

use log::debug;

use crate::align::{ALLOC_BIT, CHUNKSIZE, DSIZE, MIN_BLOCK_SIZE, WSIZE, align_up};
use crate::block;
use crate::check;
use crate::coalesce;
use crate::error::AllocError;
use crate::fit;
use crate::freelist;
use crate::heap;
use crate::mem;
use crate::place;

/// A single-threaded, boundary-tag, explicit-free-list allocator driving
/// one contiguous region obtained from `sbrk`.
///
/// Only one `Allocator` should be initialized at a time: `sbrk` itself is
/// process-global, and this allocator assumes serialized access -- no
/// interior synchronization is attempted, and none is needed for the
/// intended single-threaded use.
pub struct Allocator {
    prologue: *mut u8,
    free_head: *mut u8,
    epilogue: *mut u8,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator {
    /// An allocator with no backing region yet. Call [`Allocator::initialize`]
    /// before any other operation.
    pub const fn new() -> Self {
        Self {
            prologue: ptr::null_mut(),
            free_head: ptr::null_mut(),
            epilogue: ptr::null_mut(),
        }
    }

    /// Lays out the initial prologue/epilogue pair:
    ///
    /// ```text
    /// | pad (8) | prologue header/links/footer (32) | epilogue header (8) |
    /// ```
    ///
    /// Sets the free-list head to the prologue, which stays in the list
    /// permanently as its allocated tail sentinel. Returns `0` on
    /// success, `-1` if the region primitive fails. Must be called
    /// exactly once, before any other operation.
    pub fn initialize(&mut self) -> i32 {
        unsafe {
            let base = match mem::extend(WSIZE + MIN_BLOCK_SIZE + WSIZE) {
                Some(base) => base,
                None => return -1,
            };

            let prologue = base.add(WSIZE + WSIZE);
            block::set_header_footer(prologue, MIN_BLOCK_SIZE, true);
            block::set_prev_free(prologue, ptr::null_mut());
            block::set_next_free(prologue, ptr::null_mut());

            let epilogue = prologue.add(MIN_BLOCK_SIZE);
            block::header(epilogue).write(block::pack(0, true));

            self.prologue = prologue;
            self.free_head = prologue;
            self.epilogue = epilogue;

            debug!("initialized heap, prologue at {prologue:p}, epilogue at {epilogue:p}");
            0
        }
    }

    /// Requests `size` bytes of 16-byte-aligned storage. Returns a null
    /// pointer if `size` is zero or the region cannot be grown enough to
    /// satisfy the request; existing allocations are left untouched in
    /// that case.
    pub fn allocate(&mut self, size: usize) -> *mut u8 {
        if size == 0 {
            return ptr::null_mut();
        }

        let request = align_up(size + DSIZE, DSIZE).max(MIN_BLOCK_SIZE);

        unsafe {
            let bp = match fit::find_fit(self.free_head, request) {
                Some(bp) => bp,
                None => match heap::extend(&mut self.free_head, &mut self.epilogue, request.max(CHUNKSIZE)) {
                    Some(bp) => bp,
                    None => return ptr::null_mut(),
                },
            };

            place::place(&mut self.free_head, bp, request);
            bp
        }
    }

    /// Frees a block previously returned by `allocate`/`reallocate`. A
    /// null pointer is a no-op.
    ///
    /// Passing a pointer that was not returned by this allocator, or one
    /// already released, is undefined behavior. In debug
    /// builds a defensive header/footer equality check runs first and
    /// silently returns on mismatch rather than corrupting the heap
    /// further; it is compiled out of release builds, and is not a
    /// substitute for callers upholding the precondition.
    pub fn release(&mut self, p: *mut u8) {
        if p.is_null() {
            return;
        }

        unsafe {
            #[cfg(debug_assertions)]
            if Self::looks_corrupt(p) {
                return;
            }

            let size = block::size(p);
            block::set_header_footer(p, size, false);
            coalesce::coalesce(&mut self.free_head, p);
        }
    }

    /// Resizes the block at `p`, following the standard aliases: `p ==
    /// NULL` behaves as `allocate(size)`; `size == 0` behaves as
    /// `release(p)` and returns a null pointer. Otherwise, grows in
    /// place when the current block is already big enough, or when the
    /// physically-next block is free and large enough to absorb; falls
    /// back to allocate + copy + release otherwise. Returns a null
    /// pointer (without releasing `p`) if the fallback allocation fails.
    pub fn reallocate(&mut self, p: *mut u8, size: usize) -> *mut u8 {
        if p.is_null() {
            return self.allocate(size);
        }
        if size == 0 {
            self.release(p);
            return ptr::null_mut();
        }

        unsafe {
            #[cfg(debug_assertions)]
            if Self::looks_corrupt(p) {
                return ptr::null_mut();
            }

            let request = align_up(size + DSIZE, DSIZE).max(MIN_BLOCK_SIZE);
            let mut block_size = block::size(p);

            if request <= block_size {
                return p;
            }

            let next = block::next_blkp(p);
            if !block::is_alloc(next) && block_size + block::size(next) >= request {
                let next_size = block::size(next);
                freelist::remove(&mut self.free_head, next);
                block_size += next_size;

                if block_size - request >= MIN_BLOCK_SIZE {
                    block::set_header_footer(p, request, true);
                    let rest = block::next_blkp(p);
                    block::set_header_footer(rest, block_size - request, false);
                    coalesce::coalesce(&mut self.free_head, rest);
                } else {
                    block::set_header_footer(p, block_size, true);
                }
                return p;
            }

            let new_ptr = self.allocate(size);
            if new_ptr.is_null() {
                return ptr::null_mut();
            }
            ptr::copy_nonoverlapping(p, new_ptr, block_size - DSIZE);
            self.release(p);
            new_ptr
        }
    }

    /// Runs the structural audit against this
    /// allocator's current state. `verbosity > 0` logs every block
    /// visited at [`log::Level::Trace`]. Side-effect-free besides
    /// logging; never mutates state.
    pub fn check(&self, verbosity: u32) -> Result<(), AllocError> {
        unsafe { check::check(self.prologue, self.free_head, self.epilogue, verbosity) }
    }

    #[cfg(debug_assertions)]
    unsafe fn looks_corrupt(p: *mut u8) -> bool {
        unsafe {
            let header = block::header(p).read();
            let footer = block::footer(p).read();
            header != footer || header & ALLOC_BIT == 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // `Allocator` drives the process-global `sbrk` break; the kernel
    // serializes individual syscalls so concurrent allocators never
    // corrupt each other's regions, but a single allocator's own
    // sequence of calls must still run on one thread at a time.
    static SINGLE_THREAD: Mutex<()> = Mutex::new(());

    fn is_aligned(p: *mut u8, align: usize) -> bool {
        (p as usize) % align == 0
    }

    #[test]
    fn allocate_small_then_release() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);

        let p = a.allocate(1);
        assert!(!p.is_null());
        assert!(is_aligned(p, DSIZE));
        assert_eq!(unsafe { block::size(p) }, MIN_BLOCK_SIZE);

        a.release(p);
        assert!(a.check(0).is_ok());
    }

    #[test]
    fn adjacent_releases_coalesce() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);

        let x = a.allocate(100);
        let y = a.allocate(100);
        assert!(!x.is_null() && !y.is_null());

        a.release(x);
        a.release(y);

        assert!(a.check(0).is_ok());
        unsafe {
            assert!(block::size(a.free_head) >= 224);
            // exactly one free block (plus the prologue sentinel)
            assert!(block::is_alloc(block::next_free(a.free_head)));
        }
    }

    #[test]
    fn first_fit_reuses_freed_block_and_splits() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);

        let x = a.allocate(4000);
        let y = a.allocate(4000);
        assert!(!x.is_null() && !y.is_null());

        a.release(x);
        let z = a.allocate(2000);
        assert_eq!(z, x);
        assert!(a.check(0).is_ok());
    }

    #[test]
    fn reallocate_grow_preserves_contents() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);

        let x = a.allocate(16);
        assert!(!x.is_null());
        unsafe { ptr::write_bytes(x, 0xAB, 16) };

        let y = a.reallocate(x, 128);
        assert!(!y.is_null());
        let bytes = unsafe { std::slice::from_raw_parts(y, 16) };
        assert!(bytes.iter().all(|&b| b == 0xAB));
        assert!(a.check(0).is_ok());
    }

    #[test]
    fn reallocate_shrink_is_a_noop() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);

        let x = a.allocate(64);
        let y = a.reallocate(x, 48);
        assert_eq!(y, x);
    }

    #[test]
    fn reallocate_absorbs_freed_neighbor() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);

        let x = a.allocate(32);
        let y = a.allocate(32);
        a.release(y);

        let z = a.reallocate(x, 48);
        assert_eq!(z, x);
        assert!(unsafe { block::size(z) } >= 64);
        assert!(a.check(0).is_ok());
    }

    #[test]
    fn allocate_zero_returns_null() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);
        assert!(a.allocate(0).is_null());
    }

    #[test]
    fn release_null_is_noop() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);
        a.release(ptr::null_mut());
        assert!(a.check(0).is_ok());
    }

    #[test]
    fn reallocate_to_same_size_is_identity() {
        let _guard = SINGLE_THREAD.lock().unwrap();
        let mut a = Allocator::new();
        assert_eq!(a.initialize(), 0);
        let p = a.allocate(40);
        let size = unsafe { block::size(p) } - DSIZE;
        let q = a.reallocate(p, size);
        assert_eq!(p, q);
    }
}
