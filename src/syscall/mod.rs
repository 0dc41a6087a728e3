//! System Call Interface
//!
//! The gate between user-mode contexts and kernel handlers.
//!
//! # Security Model
//! - Per-context restriction flags are checked before lookup
//! - Only numbers with an installed handler are dispatched
//! - Handlers fetch their own arguments and validate pointers on use
//! - Rejections are negative return values, never panics
//!
//! # Return Conventions
//! - -401: syscall forbidden by the caller's restriction flags
//! - -1: unknown syscall, or generic handler failure
//! - anything else: handler-defined

mod args;
mod clone;
mod dispatch;
pub mod numbers;
mod table;

#[cfg(test)]
mod testing;

pub use args::Args;
pub use clone::{clone, sys_clone, CloneError};
pub use dispatch::{dispatch, Report, SyscallError};
pub use table::{Caller, Handler, SyscallTable};
