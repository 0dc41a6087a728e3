//! System Call Argument Fetch
//!
//! Typed access to the arguments of the syscall a context is making.
//!
//! # Security Principles
//! - Fetching a raw integer or address never validates it; a pointer is
//!   only checked when it is dereferenced, against the caller's own
//!   address space
//! - Strings are copied into kernel buffers, never borrowed from user
//!   memory, so user threads cannot change them after the check
//! - An argument index outside a0-a5 is a kernel bug and panics

use crate::mm::{MemoryFault, UserAddr};
use crate::task::Context;

/// Argument accessor bound to the calling context.
#[derive(Clone, Copy)]
pub struct Args<'a> {
    ctx: &'a Context,
}

impl<'a> Args<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Raw value of argument register `n`.
    ///
    /// # Panics
    /// If `n` is not a valid argument slot. Handlers pass constant
    /// indices, so this cannot be reached from user input.
    fn raw(&self, n: usize) -> u64 {
        match self.ctx.trapframe.a.get(n) {
            Some(&value) => value,
            None => panic!("syscall argument index {} out of range", n),
        }
    }

    /// The `n`th argument as a 32-bit integer.
    #[inline]
    pub fn int(&self, n: usize) -> i32 {
        self.raw(n) as i32
    }

    /// The `n`th argument as a user address.
    ///
    /// Not checked here; `copy_in`/`copy_out` check it on use.
    #[inline]
    pub fn addr(&self, n: usize) -> UserAddr {
        UserAddr::new(self.raw(n))
    }

    /// Copy the nul-terminated string addressed by the `n`th argument
    /// into `buf`, reading at most `buf.len()` bytes.
    ///
    /// Returns the string length, not including the nul.
    pub fn str(&self, n: usize, buf: &mut [u8]) -> Result<usize, MemoryFault> {
        self.fetch_str(self.addr(n), buf)
    }

    /// Fetch the word at user address `addr`.
    pub fn fetch_addr(&self, addr: UserAddr) -> Result<u64, MemoryFault> {
        self.ctx.space().fetch_word(addr).map_err(|fault| {
            log::trace!("pid {}: fetch {}: {}", self.ctx.pid(), addr, fault);
            fault
        })
    }

    /// Copy the nul-terminated string at `addr` into `buf`, reading at
    /// most `buf.len()` bytes.
    ///
    /// The whole window `[addr, addr + buf.len())` must lie inside the
    /// address space, even if the terminator comes earlier.
    pub fn fetch_str(&self, addr: UserAddr, buf: &mut [u8]) -> Result<usize, MemoryFault> {
        let result = if addr.range_fits(buf.len() as u64, self.ctx.size()) {
            self.ctx.space().copy_in_str(buf, addr)
        } else {
            Err(MemoryFault::OutOfRange)
        };
        if let Err(fault) = result {
            log::trace!("pid {}: fetch string {}: {}", self.ctx.pid(), addr, fault);
        }
        result
    }
}
