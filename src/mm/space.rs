//! User Address Spaces
//!
//! The bounded copy-in/copy-out contract every syscall uses to touch user
//! memory, plus [`UserSpace`], a flat in-memory implementation used by
//! hosted builds and tests.
//!
//! # Security Checks
//! 1. The start address is below the address space size
//! 2. The end address (start + length, overflow-checked) is not past it
//! 3. String copies never read past the caller's buffer length
//!
//! An address space is shared by every thread cloned from the same
//! process, so implementations use interior mutability and are
//! `Send + Sync`. No ordering between threads is provided beyond what the
//! implementation's own locking gives a single copy.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use spin::RwLock;

use super::address::{page_round_up, UserAddr, MAX_USER_SIZE};

/// Size in bytes of a machine word fetched from user memory.
pub const WORD_SIZE: u64 = core::mem::size_of::<u64>() as u64;

/// A user memory access that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFault {
    /// Some byte of the range lies outside the address space.
    OutOfRange,
    /// No nul terminator within the permitted length.
    Unterminated,
}

impl fmt::Display for MemoryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "address out of range"),
            Self::Unterminated => write!(f, "string not terminated"),
        }
    }
}

/// Bounds-checked access to one user address space.
pub trait AddressSpace: Send + Sync {
    /// Current size of the address space in bytes. Valid addresses are
    /// `0..size`.
    fn size(&self) -> u64;

    /// Copy `dst.len()` bytes starting at user address `src`.
    fn copy_in(&self, dst: &mut [u8], src: UserAddr) -> Result<(), MemoryFault>;

    /// Copy `src` into user memory starting at `dst`.
    fn copy_out(&self, dst: UserAddr, src: &[u8]) -> Result<(), MemoryFault>;

    /// Copy a nul-terminated string from `src` into `dst`, reading at most
    /// `dst.len()` bytes.
    ///
    /// Returns the string length excluding the terminator, which is also
    /// copied into `dst`.
    fn copy_in_str(&self, dst: &mut [u8], src: UserAddr) -> Result<usize, MemoryFault>;

    /// Fetch the word at `addr`.
    ///
    /// This is the only place a pointer argument is dereferenced as a
    /// scalar; the range is checked before the copy.
    fn fetch_word(&self, addr: UserAddr) -> Result<u64, MemoryFault> {
        if !addr.range_fits(WORD_SIZE, self.size()) {
            return Err(MemoryFault::OutOfRange);
        }
        let mut word = [0u8; WORD_SIZE as usize];
        self.copy_in(&mut word, addr)?;
        Ok(u64::from_le_bytes(word))
    }

    /// Store a word at `addr`.
    fn store_word(&self, addr: UserAddr, value: u64) -> Result<(), MemoryFault> {
        if !addr.range_fits(WORD_SIZE, self.size()) {
            return Err(MemoryFault::OutOfRange);
        }
        self.copy_out(addr, &value.to_le_bytes())
    }
}

/// A flat user address space backed by kernel heap memory.
///
/// Addresses are offsets into a single contiguous image. The image only
/// grows, so an address validated against an older size stays valid.
#[derive(Debug)]
pub struct UserSpace {
    image: RwLock<Vec<u8>>,
}

impl UserSpace {
    /// Create a zero-filled address space of `size` bytes.
    pub fn new(size: u64) -> Self {
        Self {
            image: RwLock::new(vec![0; size as usize]),
        }
    }

    /// Create an address space holding a copy of `image`.
    pub fn from_image(image: &[u8]) -> Self {
        Self {
            image: RwLock::new(image.to_vec()),
        }
    }

    /// Grow the address space by `bytes`, rounded up to whole pages.
    ///
    /// # Returns
    /// * `Ok(base)` - The previous size, which is the base of the new region
    /// * `Err(MemoryFault::OutOfRange)` - The new size would overflow or
    ///   exceed `MAX_USER_SIZE`; the image is left unchanged
    pub fn grow(&self, bytes: u64) -> Result<u64, MemoryFault> {
        let mut image = self.image.write();
        let old = image.len() as u64;
        let new = old
            .checked_add(bytes)
            .and_then(page_round_up)
            .filter(|&new| new <= MAX_USER_SIZE)
            .and_then(|new| usize::try_from(new).ok())
            .ok_or(MemoryFault::OutOfRange)?;
        image.resize(new, 0);
        Ok(old)
    }
}

impl AddressSpace for UserSpace {
    fn size(&self) -> u64 {
        self.image.read().len() as u64
    }

    fn copy_in(&self, dst: &mut [u8], src: UserAddr) -> Result<(), MemoryFault> {
        let image = self.image.read();
        if !src.range_fits(dst.len() as u64, image.len() as u64) {
            return Err(MemoryFault::OutOfRange);
        }
        let start = src.as_u64() as usize;
        dst.copy_from_slice(&image[start..start + dst.len()]);
        Ok(())
    }

    fn copy_out(&self, dst: UserAddr, src: &[u8]) -> Result<(), MemoryFault> {
        let mut image = self.image.write();
        if !dst.range_fits(src.len() as u64, image.len() as u64) {
            return Err(MemoryFault::OutOfRange);
        }
        let start = dst.as_u64() as usize;
        image[start..start + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn copy_in_str(&self, dst: &mut [u8], src: UserAddr) -> Result<usize, MemoryFault> {
        let image = self.image.read();
        let size = image.len() as u64;
        if src.as_u64() >= size {
            return Err(MemoryFault::OutOfRange);
        }
        let tail = &image[src.as_u64() as usize..];
        let limit = dst.len().min(tail.len());

        match tail[..limit].iter().position(|&b| b == 0) {
            Some(len) => {
                dst[..=len].copy_from_slice(&tail[..=len]);
                Ok(len)
            }
            // Ran off the end of the image before the buffer filled up.
            None if limit < dst.len() => Err(MemoryFault::OutOfRange),
            None => Err(MemoryFault::Unterminated),
        }
    }
}
