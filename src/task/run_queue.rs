//! FIFO run queue
//!
//! A minimal process table: identifiers are handed out in increasing
//! order starting at 1 and never reused, at most `NPROC` contexts are
//! live at once, and runnable contexts wait in FIFO order. The exit path
//! hands exited contexts back through [`RunQueue::retire`].

use alloc::collections::VecDeque;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use spin::Mutex;

use crate::param::NPROC;

use super::{Context, Pid, Scheduler};

/// Run queue state.
pub struct RunQueue {
    /// Next identifier to hand out.
    next_pid: AtomicU32,
    /// Identifiers reserved and not yet retired.
    live: AtomicUsize,
    /// Contexts waiting for a CPU.
    ready: Mutex<VecDeque<Context>>,
}

impl RunQueue {
    /// Create an empty run queue.
    pub const fn new() -> Self {
        Self {
            next_pid: AtomicU32::new(1),
            live: AtomicUsize::new(0),
            ready: Mutex::new(VecDeque::new()),
        }
    }

    /// Take the next runnable context.
    pub fn pop(&self) -> Option<Context> {
        self.ready.lock().pop_front()
    }

    /// Number of contexts waiting to run.
    pub fn len(&self) -> usize {
        self.ready.lock().len()
    }

    /// Check if no context is waiting to run.
    pub fn is_empty(&self) -> bool {
        self.ready.lock().is_empty()
    }

    /// Number of identifiers currently in use.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Release the process table slot of a context that has exited.
    pub fn retire(&self, ctx: Context) {
        log::debug!("retire pid {} ({})", ctx.pid(), ctx.name());
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Default for RunQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for RunQueue {
    fn alloc_pid(&self) -> Option<Pid> {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < NPROC).then_some(live + 1)
            })
            .ok()?;
        // Identifiers are never reused, so running out is final.
        match self
            .next_pid
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |pid| pid.checked_add(1))
        {
            Ok(pid) => Some(Pid::new(pid)),
            Err(_) => {
                self.live.fetch_sub(1, Ordering::AcqRel);
                None
            }
        }
    }

    fn make_runnable(&self, ctx: Context) {
        log::trace!("pid {} runnable", ctx.pid());
        self.ready.lock().push_back(ctx);
    }
}
