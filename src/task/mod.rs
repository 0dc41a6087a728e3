//! Contexts and Scheduling
//!
//! A [`Context`] is one schedulable thread of user execution. The
//! scheduler that runs contexts lives outside this crate; the syscall
//! layer only needs to reserve identifiers and publish new contexts,
//! which is the [`Scheduler`] trait.
//!
//! # Ownership Model
//! A context is owned by whoever is currently responsible for it: the
//! scheduler while it waits to run, the CPU while it runs. A newly
//! cloned context is fully initialized by its creator and then moved into
//! the scheduler, so no other execution can observe it half-built.

mod context;
mod run_queue;

use core::fmt;

pub use context::Context;
pub use run_queue::RunQueue;

/// Context identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Pid(u32);

impl Pid {
    /// Wrap a raw identifier.
    #[inline]
    pub const fn new(pid: u32) -> Self {
        Self(pid)
    }

    /// Get the raw identifier.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The process table and run queue, as seen by syscalls that create
/// contexts.
pub trait Scheduler: Sync {
    /// Reserve an identifier for a new context.
    ///
    /// Returns `None` if the process table is full.
    fn alloc_pid(&self) -> Option<Pid>;

    /// Publish a fully initialized context as runnable.
    ///
    /// Ownership moves to the scheduler; this is the only point at which
    /// the new context becomes visible to other executions.
    fn make_runnable(&self, ctx: Context);
}
