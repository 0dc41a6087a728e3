//! System Call Table
//!
//! Maps syscall numbers to handlers. The table is built once during
//! boot and only read afterwards.

use core::fmt;

use crate::task::{Context, Scheduler};

use super::args::Args;
use super::numbers::{self, NSYSCALL, SYS_CLONE};

/// The calling context and kernel services, passed to every handler.
pub struct Caller<'a> {
    /// The context making the syscall.
    pub ctx: &'a mut Context,
    /// Process table, for handlers that create contexts.
    pub sched: &'a dyn Scheduler,
}

impl Caller<'_> {
    /// Argument accessor for the calling context.
    #[inline]
    pub fn args(&self) -> Args<'_> {
        Args::new(&*self.ctx)
    }
}

/// A syscall handler. Returns the value stored in the caller's return
/// register; `-1` signals a generic failure.
pub type Handler = fn(&mut Caller<'_>) -> i64;

/// Dense syscall table indexed by syscall number.
#[derive(Clone)]
pub struct SyscallTable {
    slots: [Option<Handler>; NSYSCALL],
}

impl SyscallTable {
    /// A table with no handlers.
    pub const fn empty() -> Self {
        Self {
            slots: [None; NSYSCALL],
        }
    }

    /// A table with the handlers implemented by this crate installed.
    pub fn new() -> Self {
        Self::empty().with(SYS_CLONE, super::clone::sys_clone)
    }

    /// Install `handler` for syscall `num`, replacing any previous one.
    ///
    /// # Panics
    /// If `num` is 0 or not below `NSYSCALL`.
    pub fn with(mut self, num: usize, handler: Handler) -> Self {
        assert!(num > 0 && num < NSYSCALL, "syscall number {} outside table", num);
        self.slots[num] = Some(handler);
        self
    }

    /// Look up the handler for syscall `num`.
    ///
    /// Returns `None` for 0, negative numbers, numbers past the end of
    /// the table and empty slots.
    #[inline]
    pub fn lookup(&self, num: i64) -> Option<Handler> {
        if num <= 0 {
            return None;
        }
        let index = usize::try_from(num).ok()?;
        self.slots.get(index).copied().flatten()
    }

    /// Number of slots, including the unused slot 0.
    #[inline]
    pub const fn len(&self) -> usize {
        NSYSCALL
    }
}

impl Default for SyscallTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyscallTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (num, slot) in self.slots.iter().enumerate() {
            if slot.is_some() {
                list.entry(&numbers::name(num as i64).unwrap_or("?"));
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syscall::numbers::{SYS_EXEC, SYS_GETPID};

    fn forty_two(_: &mut Caller<'_>) -> i64 {
        42
    }

    #[test]
    fn test_lookup_bounds() {
        let table = SyscallTable::empty().with(SYS_GETPID, forty_two);
        assert!(table.lookup(SYS_GETPID as i64).is_some());
        assert!(table.lookup(SYS_EXEC as i64).is_none());
        assert!(table.lookup(0).is_none());
        assert!(table.lookup(-1).is_none());
        assert!(table.lookup(table.len() as i64).is_none());
        assert!(table.lookup(i64::MAX).is_none());
    }

    #[test]
    fn test_new_installs_clone() {
        let table = SyscallTable::new();
        assert!(table.lookup(SYS_CLONE as i64).is_some());
        assert_eq!(alloc::format!("{:?}", table), "[\"clone\"]");
    }

    #[test]
    #[should_panic(expected = "outside table")]
    fn test_slot_zero_is_reserved() {
        let _ = SyscallTable::empty().with(0, forty_two);
    }
}
