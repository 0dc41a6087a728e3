//! User Address Types
//!
//! A type-safe wrapper for addresses that come from user mode, so raw
//! register values are never confused with kernel pointers.
//!
//! # Security Properties
//! - A `UserAddr` is an offset into one context's address space, never a
//!   kernel pointer; it can only be dereferenced through an
//!   [`AddressSpace`](super::AddressSpace)
//! - Range checks use two comparisons and checked arithmetic

use core::fmt;

/// Page size (4 KiB)
pub const PAGE_SIZE: u64 = 4096;
/// Page size mask
pub const PAGE_MASK: u64 = PAGE_SIZE - 1;
/// Stack pointer alignment required by the calling convention
pub const STACK_ALIGN: u64 = 16;
/// Largest user address space (Sv39 user half)
pub const MAX_USER_SIZE: u64 = 1 << 38;

/// Round an address up to the nearest page boundary, or `None` if that
/// would overflow.
#[inline]
pub const fn page_round_up(addr: u64) -> Option<u64> {
    match addr.checked_add(PAGE_MASK) {
        Some(end) => Some(end & !PAGE_MASK),
        None => None,
    }
}

/// An address in a user address space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct UserAddr(u64);

impl UserAddr {
    /// Wrap a raw register value.
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Check if the address is null.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Check that `[self, self + len)` lies inside an address space of
    /// `size` bytes.
    ///
    /// The start is tested on its own before the end, so a huge `len`
    /// cannot wrap `self + len` back into range.
    #[inline]
    pub const fn range_fits(self, len: u64, size: u64) -> bool {
        if self.0 >= size {
            return false;
        }
        match self.0.checked_add(len) {
            Some(end) => end <= size,
            None => false,
        }
    }

    /// Align the address down to `align` (a power of two).
    #[inline]
    pub const fn align_down(self, align: u64) -> Self {
        Self(self.0 & !(align - 1))
    }
}

impl fmt::Debug for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserAddr({:#x})", self.0)
    }
}

impl fmt::Display for UserAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
