//! Kernel configuration constants
//!
//! Fixed at build time. The log level is the only value read from the
//! build environment (`LOG=debug cargo build`).

/// Maximum number of live contexts (processes and threads).
pub const NPROC: usize = 64;

/// Number of general argument slots in the register snapshot.
pub const NARGS: usize = 6;

/// Maximum length of a context's display name.
pub const NAME_LEN: usize = 16;

/// Console log level requested at build time.
pub const LOG_LEVEL: Option<&str> = option_env!("LOG");
