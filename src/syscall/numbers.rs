//! System call numbers
//!
//! Assigned at build time and shared with user space. Number 0 is never
//! a valid syscall.

pub const SYS_FORK: usize = 1;
pub const SYS_EXIT: usize = 2;
pub const SYS_WAIT: usize = 3;
pub const SYS_PIPE: usize = 4;
pub const SYS_READ: usize = 5;
pub const SYS_KILL: usize = 6;
pub const SYS_EXEC: usize = 7;
pub const SYS_FSTAT: usize = 8;
pub const SYS_CHDIR: usize = 9;
pub const SYS_DUP: usize = 10;
pub const SYS_GETPID: usize = 11;
pub const SYS_SBRK: usize = 12;
pub const SYS_SLEEP: usize = 13;
pub const SYS_UPTIME: usize = 14;
pub const SYS_OPEN: usize = 15;
pub const SYS_WRITE: usize = 16;
pub const SYS_MKNOD: usize = 17;
pub const SYS_UNLINK: usize = 18;
pub const SYS_LINK: usize = 19;
pub const SYS_MKDIR: usize = 20;
pub const SYS_CLOSE: usize = 21;
pub const SYS_SBRKX: usize = 22;
pub const SYS_CLONE: usize = 23;

/// One past the highest syscall number; the dispatch table length.
pub const NSYSCALL: usize = SYS_CLONE + 1;

const NAMES: [&str; NSYSCALL] = [
    "", "fork", "exit", "wait", "pipe", "read", "kill", "exec", "fstat", "chdir", "dup",
    "getpid", "sbrk", "sleep", "uptime", "open", "write", "mknod", "unlink", "link", "mkdir",
    "close", "sbrkx", "clone",
];

/// Symbolic name of syscall `num`, for log lines.
pub fn name(num: i64) -> Option<&'static str> {
    usize::try_from(num)
        .ok()
        .filter(|&n| n > 0)
        .and_then(|n| NAMES.get(n).copied())
}
