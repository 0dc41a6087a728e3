//! Syscall Restriction Flags
//!
//! Each context carries a bitmask of syscalls it may not invoke. The
//! bit for each restrictable syscall is fixed at build time and is part
//! of the user ABI (it is what `clone` takes as its flags argument), so
//! existing bits must never be renumbered.
//!
//! # Security Properties
//! - A zero mask restricts nothing and skips the check entirely
//! - Syscalls with no bit (exit, wait, sleep) are always authorized
//! - The check is a single mask test; there is no policy language

use bitflags::bitflags;

use crate::syscall::numbers::*;
use crate::task::Context;

bitflags! {
    /// Syscalls a context is forbidden to invoke.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RestrictFlags: u32 {
        const FORK   = 1 << 0;
        const PIPE   = 1 << 1;
        const READ   = 1 << 2;
        const KILL   = 1 << 3;
        const EXEC   = 1 << 4;
        const FSTAT  = 1 << 5;
        const CHDIR  = 1 << 6;
        const DUP    = 1 << 7;
        const GETPID = 1 << 8;
        const SBRK   = 1 << 9;
        const UPTIME = 1 << 10;
        const OPEN   = 1 << 11;
        const WRITE  = 1 << 12;
        const MKNOD  = 1 << 13;
        const UNLINK = 1 << 14;
        const LINK   = 1 << 15;
        const MKDIR  = 1 << 16;
        const CLOSE  = 1 << 17;
        const SBRKX  = 1 << 18;
        const CLONE  = 1 << 19;
    }
}

impl RestrictFlags {
    /// The restriction bit guarding syscall `num`, if it has one.
    pub const fn for_syscall(num: usize) -> Option<Self> {
        let flag = match num {
            SYS_FORK => Self::FORK,
            SYS_PIPE => Self::PIPE,
            SYS_READ => Self::READ,
            SYS_KILL => Self::KILL,
            SYS_EXEC => Self::EXEC,
            SYS_FSTAT => Self::FSTAT,
            SYS_CHDIR => Self::CHDIR,
            SYS_DUP => Self::DUP,
            SYS_GETPID => Self::GETPID,
            SYS_SBRK => Self::SBRK,
            SYS_UPTIME => Self::UPTIME,
            SYS_OPEN => Self::OPEN,
            SYS_WRITE => Self::WRITE,
            SYS_MKNOD => Self::MKNOD,
            SYS_UNLINK => Self::UNLINK,
            SYS_LINK => Self::LINK,
            SYS_MKDIR => Self::MKDIR,
            SYS_CLOSE => Self::CLOSE,
            SYS_SBRKX => Self::SBRKX,
            SYS_CLONE => Self::CLONE,
            _ => return None,
        };
        Some(flag)
    }

    /// Check whether these flags forbid syscall `num`.
    #[inline]
    pub fn denies(self, num: i64) -> bool {
        usize::try_from(num)
            .ok()
            .and_then(Self::for_syscall)
            .is_some_and(|flag| self.intersects(flag))
    }
}

/// Check whether `ctx` is forbidden to invoke syscall `num`.
#[inline]
pub fn is_unauthorized(ctx: &Context, num: i64) -> bool {
    ctx.restrict().denies(num)
}
