//! Test kernel: a syscall table of stub handlers over one shared address
//! space and a run queue.

use alloc::sync::Arc;

use crate::mm::{AddressSpace, UserAddr, UserSpace, PAGE_SIZE};
use crate::restrict::RestrictFlags;
use crate::task::{Context, RunQueue, Scheduler};
use crate::trap::TrapFrame;

use super::numbers::*;
use super::table::{Caller, SyscallTable};
use super::{dispatch, SyscallError};

/// Size of the test address space.
pub const IMAGE_SIZE: u64 = 4 * PAGE_SIZE;

/// Page where stub handlers record that they ran.
const MARK_BASE: u64 = PAGE_SIZE;

fn mark_addr(num: usize) -> UserAddr {
    UserAddr::new(MARK_BASE + 8 * num as u64)
}

/// Record the caller's pid in the marker slot of the syscall it made.
fn mark(caller: &mut Caller<'_>) -> i64 {
    let num = caller.ctx.trapframe.a7 as usize;
    let pid = u64::from(caller.ctx.pid().as_u32());
    match caller.ctx.space().store_word(mark_addr(num), pid) {
        Ok(()) => 1,
        Err(_) => -1,
    }
}

/// Like `mark`, but reports failure.
fn mark_and_fail(caller: &mut Caller<'_>) -> i64 {
    mark(caller);
    -1
}

/// Pid recorded by the stub handler for `num`, or 0 if it never ran.
pub fn marker(ctx: &Context, num: usize) -> u64 {
    ctx.space().fetch_word(mark_addr(num)).unwrap_or(0)
}

/// Check whether the stub handler for `num` ran.
pub fn marked(ctx: &Context, num: usize) -> bool {
    marker(ctx, num) != 0
}

/// Frame for a syscall `num` with `args`.
pub fn frame(num: usize, args: &[u64]) -> TrapFrame {
    TrapFrame::syscall(num as u64, args)
}

pub struct Kernel {
    pub table: SyscallTable,
    pub queue: RunQueue,
    pub space: Arc<UserSpace>,
}

impl Kernel {
    /// Every syscall has a marking stub except `link` (no handler),
    /// `read` (fails) and `clone` (the real one).
    pub fn new() -> Self {
        let mut table = SyscallTable::new();
        for num in 1..NSYSCALL {
            table = match num {
                SYS_LINK | SYS_CLONE => table,
                SYS_READ => table.with(num, mark_and_fail),
                _ => table.with(num, mark),
            };
        }
        Self {
            table,
            queue: RunQueue::new(),
            space: Arc::new(UserSpace::new(IMAGE_SIZE)),
        }
    }

    /// A new context in the shared address space.
    pub fn context(&self, name: &str, restrict: RestrictFlags) -> Context {
        let pid = self.queue.alloc_pid().expect("process table full");
        let space: Arc<dyn AddressSpace> = self.space.clone();
        Context::new(pid, name, space, restrict)
    }

    pub fn dispatch(&self, ctx: &mut Context) -> Result<i64, SyscallError> {
        dispatch(&self.table, ctx, &self.queue)
    }
}
