//! System Call Dispatch
//!
//! One pass per trap: read the syscall number, check it against the
//! caller's restriction flags, look up the handler, run it, and store
//! the result in the caller's return register.
//!
//! # Security
//! - A restricted syscall never reaches its handler
//! - Unknown numbers (0, negative, past the table, empty slot) are
//!   rejected without touching the table out of bounds
//! - Both rejections are reported to the caller as ordinary negative
//!   return values; neither is fatal

use core::fmt;

use crate::restrict;
use crate::task::{Context, Scheduler};

use super::table::{Caller, SyscallTable};

/// Syscall rejection codes, as seen in the return register.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    /// Unknown syscall number
    Unknown = -1,
    /// Syscall forbidden by the caller's restriction flags
    Unauthorized = -401,
}

impl SyscallError {
    /// The value stored in the return register.
    #[inline]
    pub const fn as_ret(self) -> i64 {
        self as i64
    }

    /// Diagnostic line for this rejection.
    pub fn report(self, ctx: &Context, num: i64) -> Report<'_> {
        Report {
            error: self,
            ctx,
            num,
        }
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown sys call"),
            Self::Unauthorized => write!(f, "unauthorized syscall"),
        }
    }
}

/// A rejected syscall, formatted as `<pid> <name>: <reason> <num>`.
pub struct Report<'a> {
    error: SyscallError,
    ctx: &'a Context,
    num: i64,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} {}",
            self.ctx.pid(),
            self.ctx.name(),
            self.error,
            self.num
        )
    }
}

/// Dispatch the syscall `ctx` is making.
///
/// # Arguments
/// * `table` - Installed syscall handlers
/// * `ctx` - The calling context; its trap frame holds the number (a7)
///   and arguments (a0-a5)
/// * `sched` - Process table, passed through to handlers
///
/// # Returns
/// The handler's result, or the rejection. Either way the value is also
/// stored in the return register (a0) before returning.
///
/// # Security
/// - Restricted syscalls are rejected before lookup and reported on the
///   console
/// - Unknown numbers are rejected without indexing past the table
pub fn dispatch(
    table: &SyscallTable,
    ctx: &mut Context,
    sched: &dyn Scheduler,
) -> Result<i64, SyscallError> {
    let num = ctx.trapframe.syscall_num();
    let result = invoke(table, ctx, sched, num);
    let ret = match result {
        Ok(value) => value,
        Err(error) => {
            crate::kprintln!("{}", error.report(ctx, num));
            error.as_ret()
        }
    };
    ctx.trapframe.set_ret(ret);
    result
}

fn invoke(
    table: &SyscallTable,
    ctx: &mut Context,
    sched: &dyn Scheduler,
    num: i64,
) -> Result<i64, SyscallError> {
    if !ctx.restrict().is_empty() && restrict::is_unauthorized(ctx, num) {
        return Err(SyscallError::Unauthorized);
    }

    let handler = table.lookup(num).ok_or(SyscallError::Unknown)?;
    let mut caller = Caller { ctx, sched };
    Ok(handler(&mut caller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restrict::RestrictFlags;
    use crate::syscall::numbers::*;
    use crate::syscall::testing::{self, marked, Kernel};

    #[test]
    fn test_unrestricted_dispatch() {
        let kernel = Kernel::new();
        let mut ctx = kernel.context("init", RestrictFlags::empty());

        ctx.trapframe = testing::frame(SYS_GETPID, &[]);
        assert_eq!(kernel.dispatch(&mut ctx), Ok(1));
        assert_eq!(ctx.trapframe.ret(), 1);
        assert!(marked(&ctx, SYS_GETPID));
    }

    #[test]
    fn test_zero_mask_matches_unrestricted_table() {
        // Dispatch with an empty mask must behave exactly like calling the
        // table entry directly.
        let gated = Kernel::new();
        let direct = Kernel::new();
        for num in 0..=NSYSCALL {
            let mut ctx = gated.context("plain", RestrictFlags::empty());
            ctx.trapframe = testing::frame(num, &[]);
            let via_gate = gated.dispatch(&mut ctx);

            let mut twin = direct.context("plain", RestrictFlags::empty());
            twin.trapframe = testing::frame(num, &[]);
            let via_table = match direct.table.lookup(num as i64) {
                Some(handler) => Ok(handler(&mut Caller {
                    ctx: &mut twin,
                    sched: &direct.queue,
                })),
                None => Err(SyscallError::Unknown),
            };

            assert_eq!(via_gate, via_table, "syscall {num}");
            assert_eq!(marked(&ctx, num), marked(&twin, num), "syscall {num}");
        }
    }

    #[test]
    fn test_restricted_syscall_never_runs() {
        let kernel = Kernel::new();
        let mut ctx = kernel.context("jail", RestrictFlags::EXEC);

        ctx.trapframe = testing::frame(SYS_EXEC, &[]);
        assert_eq!(kernel.dispatch(&mut ctx), Err(SyscallError::Unauthorized));
        assert_eq!(ctx.trapframe.ret(), -401);
        assert!(!marked(&ctx, SYS_EXEC));

        ctx.trapframe = testing::frame(SYS_KILL, &[]);
        assert_eq!(kernel.dispatch(&mut ctx), Ok(1));
        assert!(marked(&ctx, SYS_KILL));
    }

    #[test]
    fn test_unknown_numbers() {
        let kernel = Kernel::new();
        let mut ctx = kernel.context("init", RestrictFlags::all());

        // Slot 0, past the end, negative, and a known number with no handler.
        for num in [0, NSYSCALL as u64, 9999, u64::MAX, SYS_LINK as u64] {
            ctx.trapframe.a7 = num;
            let expected = if num == SYS_LINK as u64 {
                SyscallError::Unauthorized
            } else {
                SyscallError::Unknown
            };
            assert_eq!(kernel.dispatch(&mut ctx), Err(expected), "syscall {num}");
            assert_eq!(ctx.trapframe.ret(), expected.as_ret());
        }

        let mut open = kernel.context("open", RestrictFlags::empty());
        open.trapframe.a7 = SYS_LINK as u64;
        assert_eq!(kernel.dispatch(&mut open), Err(SyscallError::Unknown));
    }

    #[test]
    fn test_handler_failure_is_a_plain_result() {
        let kernel = Kernel::new();
        let mut ctx = kernel.context("init", RestrictFlags::empty());
        ctx.trapframe = testing::frame(SYS_READ, &[]);
        assert_eq!(kernel.dispatch(&mut ctx), Ok(-1));
        assert_eq!(ctx.trapframe.ret(), -1);
    }

    #[test]
    fn test_rejections_reach_the_console() {
        crate::console::capture::install();
        let kernel = Kernel::new();
        let mut ctx = kernel.context("diagjail", RestrictFlags::EXEC);
        let pid = ctx.pid();

        ctx.trapframe = testing::frame(SYS_EXEC, &[]);
        let _ = kernel.dispatch(&mut ctx);
        ctx.trapframe = testing::frame(99, &[]);
        let _ = kernel.dispatch(&mut ctx);

        // Printed bare, not as a decorated log record.
        let output = crate::console::capture::output();
        let denied = alloc::format!("{} diagjail: unauthorized syscall 7", pid);
        let unknown = alloc::format!("{} diagjail: unknown sys call 99", pid);
        assert!(output.lines().any(|line| line == denied));
        assert!(output.lines().any(|line| line == unknown));
    }

    #[test]
    fn test_report_format() {
        let kernel = Kernel::new();
        let ctx = kernel.context("rkttest", RestrictFlags::EXEC);
        let pid = ctx.pid();
        assert_eq!(
            alloc::format!("{}", SyscallError::Unauthorized.report(&ctx, 7)),
            alloc::format!("{} rkttest: unauthorized syscall 7", pid)
        );
        assert_eq!(
            alloc::format!("{}", SyscallError::Unknown.report(&ctx, 99)),
            alloc::format!("{} rkttest: unknown sys call 99", pid)
        );
    }
}
