//! Internal error vocabulary for the two failure kinds this allocator
//! distinguishes: region-extension exhaustion, and caller precondition
//! violations detected defensively.
//!
//! The public, libc-shaped surface (`initialize`/`allocate`/`release`/
//! `reallocate`) still degrades these to `NULL`/`-1`/a silent no-op; this
//! type exists for [`crate::Allocator::check`] and for tests that want to
//! assert on *why* an operation failed rather than just that it did.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The region-extension primitive reported failure.
    Exhausted,
    /// A block's header and footer disagree, or another structural
    /// invariant does not hold, at the given address.
    Corrupt { at: usize },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::Exhausted => write!(f, "heap extension failed"),
            AllocError::Corrupt { at } => write!(f, "corrupt block metadata at {at:#x}"),
        }
    }
}

impl Error for AllocError {}
