//! RKT Kernel Core - Syscall Gate and Restricted Threads
//!
//! The trust boundary between user-mode contexts and the kernel:
//! every syscall is authorized against the caller's restriction mask
//! before its handler runs, and new threads are cloned into the caller's
//! address space with their own, explicitly chosen, restriction mask.
//!
//! # Components
//! - [`trap::TrapFrame`]: register snapshot filled by trap entry
//! - [`mm::AddressSpace`]: bounded copy-in/copy-out over user memory
//! - [`syscall::Args`]: typed argument fetch (int, addr, string)
//! - [`syscall::SyscallTable`]: identity to handler mapping
//! - [`restrict::RestrictFlags`]: per-context syscall restriction mask
//! - [`syscall::dispatch()`]: authorize, look up, invoke, store result
//! - [`syscall::sys_clone`]: spawn a thread sharing the address space
//!
//! # Security Properties
//! - Every user pointer is checked against the address space size with
//!   two separate comparisons, so `addr + len` cannot wrap past the check
//! - A denied syscall never reaches its handler
//! - Restriction masks are fixed at context creation and never inherited

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod console;
pub mod mm;
pub mod param;
pub mod restrict;
pub mod syscall;
pub mod task;
pub mod trap;

pub use restrict::RestrictFlags;
pub use syscall::{dispatch, SyscallError, SyscallTable};
pub use task::{Context, Pid, RunQueue, Scheduler};
pub use trap::TrapFrame;
