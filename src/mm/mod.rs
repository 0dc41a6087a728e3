//! User memory access for the syscall layer
//!
//! Provides:
//! - `UserAddr`, a typed user-space address
//! - The `AddressSpace` copy-in/copy-out contract
//! - `UserSpace`, a flat shared address space
//!
//! # Security Principles
//! - Every access is bounds-checked against the address space size
//! - User addresses are never turned into kernel pointers

pub mod address;
mod space;

pub use address::{UserAddr, PAGE_SIZE};
pub use space::{AddressSpace, MemoryFault, UserSpace, WORD_SIZE};
