//! # rallocator - A boundary-tag, explicit-free-list memory allocator
//!
//! This crate implements the classic allocate / free / reallocate /
//! initialize interface over a contiguous, monotonically-growable byte
//! region obtained from `sbrk`. It is a general-purpose allocator, not a
//! bump/arena allocator: freed blocks are coalesced with their physically
//! adjacent neighbors and reused by later allocations.
//!
//! ## Overview
//!
//! Every block carries an 8-byte header and an identical 8-byte footer
//! (a "boundary tag"), which makes the physically-previous block
//! reachable in O(1) without a second linked structure over all blocks:
//!
//! ```text
//!   -8        0              +8              size-16      size-8
//!    | header | prev-free link | next-free link | ... | footer |
//!              ^ payload pointer, 16-byte aligned
//! ```
//!
//! Free blocks additionally form an explicit, doubly-linked, LIFO free
//! list terminated by a permanently-allocated **prologue** sentinel
//! (rather than a null pointer), so list scans only ever need to check
//! one condition. A zero-size allocated **epilogue** header marks the
//! current high end of the region and terminates upward neighbor walks.
//!
//! ```text
//!   Managed region:
//!
//!   [ prologue (32B, allocated) ] [ ... blocks ... ] [ epilogue (0B, allocated) ]
//!            ^ free-list tail                              ^ high-water mark
//! ```
//!
//! ## Crate structure
//!
//! ```text
//!   rallocator
//!   ├── align      - alignment constants and macros (align!, align_up)
//!   ├── mem        - the sbrk region-extension primitive
//!   ├── block      - pure address arithmetic: header/footer, neighbors, free links
//!   ├── freelist   - doubly-linked LIFO free-list insert/remove
//!   ├── coalesce   - boundary-tag merging of adjacent free blocks
//!   ├── place      - consume-or-split placement of a request into a free block
//!   ├── fit        - first-fit free-list search
//!   ├── heap       - extends the region and reframes the epilogue
//!   ├── check      - structural audit (invariants, free-list well-formedness)
//!   ├── error      - the two-kind internal error vocabulary
//!   └── allocator  - the public Allocator type composing all of the above
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rallocator::Allocator;
//!
//! let mut a = Allocator::new();
//! assert_eq!(a.initialize(), 0);
//!
//! unsafe {
//!     let p = a.allocate(64) as *mut u64;
//!     assert!(!p.is_null());
//!     *p = 42;
//!     assert_eq!(*p, 42);
//!     a.release(p as *mut u8);
//! }
//! ```
//!
//! ## Concurrency
//!
//! This allocator is **not** thread-safe and does not attempt to be: it
//! assumes a single caller serializes every `allocate`/`release`/
//! `reallocate`/`check` call, matching the non-goal spelled out for this
//! design. `sbrk` itself is a process-wide resource, so only one
//! `Allocator` should be driving the heap at a time.
//!
//! ## Safety
//!
//! This crate is inherently unsafe: it performs raw pointer arithmetic
//! over an unstructured byte region and trusts that every pointer handed
//! to `release`/`reallocate` was previously returned by this allocator
//! and not already freed. Violating that precondition is undefined
//! behavior, as with any `malloc`-shaped API.

mod align;
mod allocator;
mod block;
mod check;
mod coalesce;
mod error;
mod fit;
mod freelist;
mod heap;
mod mem;
mod place;

pub use align::{CHUNKSIZE, DSIZE, MIN_BLOCK_SIZE, WSIZE, align_up};
pub use allocator::Allocator;
pub use error::AllocError;
