//! Thread Creation
//!
//! `clone(entry, arg, stack, flags)` starts a new context in the
//! caller's address space. The new thread runs `entry(arg)` on the
//! caller-supplied stack page, and may not invoke the syscalls selected
//! by `flags`.
//!
//! # Security
//! - The stack page and entry point are checked against the shared
//!   address space before anything is allocated
//! - Unknown flag bits are rejected rather than ignored
//! - The new thread's restrictions are exactly `flags`; nothing is
//!   inherited from the creator. A supervisor that must keep a thread
//!   from creating less-restricted threads restricts `clone` as well.
//! - The new context is built completely before it is handed to the
//!   scheduler, so no other CPU sees it partially initialized

use core::fmt;

use crate::mm::address::STACK_ALIGN;
use crate::mm::{UserAddr, PAGE_SIZE};
use crate::restrict::RestrictFlags;
use crate::task::{Context, Pid, Scheduler};
use crate::trap::TrapFrame;

use super::table::Caller;

/// Reasons a clone request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneError {
    /// The stack page is null or not inside the address space.
    BadStack,
    /// The entry point is not inside the address space.
    BadEntry,
    /// The flags contain bits that name no restrictable syscall.
    BadFlags,
    /// The process table is full.
    NoPid,
}

impl fmt::Display for CloneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadStack => write!(f, "invalid stack page"),
            Self::BadEntry => write!(f, "invalid entry point"),
            Self::BadFlags => write!(f, "unknown restriction flags"),
            Self::NoPid => write!(f, "process table full"),
        }
    }
}

/// `clone(entry, arg, stack, flags)` syscall handler.
///
/// # Arguments
/// * `caller` - The creating context; a0 holds the entry point, a1 the
///   thread argument, a2 the stack page and a3 the restriction flags
///
/// # Returns
/// The new thread's pid, or -1 if the request is refused.
pub fn sys_clone(caller: &mut Caller<'_>) -> i64 {
    let args = caller.args();
    let entry = args.addr(0);
    let arg = args.addr(1).as_u64();
    let stack = args.addr(2);
    let flags = args.int(3) as u32;

    match clone(&*caller.ctx, caller.sched, entry, arg, stack, flags) {
        Ok(pid) => i64::from(pid.as_u32()),
        Err(err) => {
            log::debug!(
                "{} {}: clone failed: {}",
                caller.ctx.pid(),
                caller.ctx.name(),
                err
            );
            -1
        }
    }
}

/// Create a thread of `creator` that starts at `entry` with `arg` in
/// its first argument register.
///
/// # Arguments
/// * `creator` - Context whose address space the thread shares
/// * `sched` - Process table the thread is published to
/// * `entry` - First instruction of the thread
/// * `arg` - Value placed in the thread's a0
/// * `stack` - Lowest address of a page the thread uses as its
///   downward-growing stack
/// * `flags` - Restriction flags of the thread
///
/// # Returns
/// The new thread's pid. On error nothing has been allocated or
/// published.
pub fn clone(
    creator: &Context,
    sched: &dyn Scheduler,
    entry: UserAddr,
    arg: u64,
    stack: UserAddr,
    flags: u32,
) -> Result<Pid, CloneError> {
    let restrict = RestrictFlags::from_bits(flags).ok_or(CloneError::BadFlags)?;

    let size = creator.size();
    if stack.is_null() || !stack.range_fits(PAGE_SIZE, size) {
        return Err(CloneError::BadStack);
    }
    if entry.as_u64() >= size {
        return Err(CloneError::BadEntry);
    }

    let pid = sched.alloc_pid().ok_or(CloneError::NoPid)?;

    let mut thread = Context::new(pid, creator.name(), creator.space().clone(), restrict);
    thread.trapframe = thread_frame(entry, arg, stack);

    log::info!(
        "{} {}: clone pid {} entry {} stack {} restrict {:#x}",
        creator.pid(),
        creator.name(),
        pid,
        entry,
        stack,
        restrict.bits()
    );
    sched.make_runnable(thread);
    Ok(pid)
}

/// Initial registers of a new thread.
///
/// `ra` is zero: a thread function that returns instead of calling
/// `exit` faults.
fn thread_frame(entry: UserAddr, arg: u64, stack: UserAddr) -> TrapFrame {
    // The caller checked that the whole stack page is in range.
    let top = UserAddr::new(stack.as_u64() + PAGE_SIZE).align_down(STACK_ALIGN);
    let mut frame = TrapFrame {
        epc: entry.as_u64(),
        sp: top.as_u64(),
        ..TrapFrame::default()
    };
    frame.a[0] = arg;
    frame
}
