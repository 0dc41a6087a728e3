//! Trap Frame
//!
//! The user register state saved by trap entry and restored by trap exit.
//! The syscall layer only reads the argument and identity slots and
//! writes the return slot; the clone primitive additionally seeds the
//! program counter, stack pointer and return address of a new thread.
//!
//! # Register Convention (RISC-V)
//! - a0-a5: syscall arguments
//! - a7: syscall number
//! - a0: return value (overwrites argument 0)

use crate::param::NARGS;

/// Saved user registers for one context.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapFrame {
    /// User program counter to resume at.
    pub epc: u64,
    /// Return address register.
    pub ra: u64,
    /// User stack pointer.
    pub sp: u64,
    /// Argument registers a0-a5. a0 doubles as the return value.
    pub a: [u64; NARGS],
    /// Syscall number register.
    pub a7: u64,
}

impl TrapFrame {
    /// Build a frame for a syscall with the given number and arguments.
    pub fn syscall(num: u64, args: &[u64]) -> Self {
        let mut frame = Self {
            a7: num,
            ..Self::default()
        };
        for (slot, &value) in frame.a.iter_mut().zip(args) {
            *slot = value;
        }
        frame
    }

    /// The syscall number, as a signed value so negative identities stay
    /// recognizably invalid.
    #[inline]
    pub fn syscall_num(&self) -> i64 {
        self.a7 as i64
    }

    /// Store a syscall result into the return slot.
    #[inline]
    pub fn set_ret(&mut self, value: i64) {
        self.a[0] = value as u64;
    }

    /// The value last stored into the return slot.
    #[inline]
    pub fn ret(&self) -> i64 {
        self.a[0] as i64
    }
}
