//! Wrapper around the `sbrk` region-extension primitive.
//!
//! This is the lower-level heap-extension primitive the core treats as
//! an external collaborator: it only knows how to grow the
//! process break by a byte count and report the base of the new segment,
//! or signal failure. The managed region is therefore process-global --
//! consistent with the single-threaded, serialized-access model the rest
//! of this crate assumes.

use libc::{c_void, intptr_t, sbrk};

/// Returns the current program break: the base address the next
/// [`extend`] call will carve its segment from. Used once, by
/// [`crate::Allocator::initialize`], to align the initial layout.
pub fn current_break() -> *mut u8 {
    unsafe { sbrk(0) as *mut u8 }
}

/// Grows the managed region by `nbytes`, returning the base address of
/// the new segment (the old program break), or `None` if the underlying
/// primitive failed.
pub fn extend(nbytes: usize) -> Option<*mut u8> {
    let raw = unsafe { sbrk(nbytes as intptr_t) };
    if raw == usize::MAX as *mut c_void {
        None
    } else {
        Some(raw as *mut u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Other tests in this crate also extend the same process-global
    // break concurrently; the kernel serializes each individual `sbrk`
    // syscall, so returned ranges never overlap, but two calls here are
    // not atomic with each other -- assert ordering, not exact deltas.
    #[test]
    fn extend_reports_monotonic_growth() {
        let before = current_break();
        let got = extend(64).expect("sbrk should succeed for a small request");
        assert!(got as usize >= before as usize);
        let after = current_break();
        assert!(after as usize >= got as usize + 64);
    }
}
