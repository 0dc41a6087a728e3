//! Execution contexts

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::mm::AddressSpace;
use crate::param::NAME_LEN;
use crate::restrict::RestrictFlags;
use crate::trap::TrapFrame;

use super::Pid;

/// One schedulable thread of user execution.
///
/// The restriction flags are fixed when the context is created; there
/// is no setter.
pub struct Context {
    pid: Pid,
    name: String,
    space: Arc<dyn AddressSpace>,
    /// Saved user registers.
    pub trapframe: TrapFrame,
    restrict: RestrictFlags,
}

impl Context {
    /// Create a context running in `space` with the given restrictions.
    ///
    /// Names longer than `NAME_LEN - 1` bytes are truncated.
    pub fn new(
        pid: Pid,
        name: &str,
        space: Arc<dyn AddressSpace>,
        restrict: RestrictFlags,
    ) -> Self {
        Self {
            pid,
            name: String::from(truncate_name(name)),
            space,
            trapframe: TrapFrame::default(),
            restrict,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The address space this context runs in.
    #[inline]
    pub fn space(&self) -> &Arc<dyn AddressSpace> {
        &self.space
    }

    /// Current size of the context's address space in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.space.size()
    }

    /// Syscalls this context may not invoke.
    #[inline]
    pub fn restrict(&self) -> RestrictFlags {
        self.restrict
    }

    /// Check whether two contexts run in the same address space.
    pub fn shares_space_with(&self, other: &Context) -> bool {
        core::ptr::eq(
            Arc::as_ptr(&self.space) as *const (),
            Arc::as_ptr(&other.space) as *const (),
        )
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("size", &self.size())
            .field("restrict", &self.restrict)
            .finish()
    }
}

fn truncate_name(name: &str) -> &str {
    let mut end = name.len().min(NAME_LEN - 1);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mm::UserSpace;

    #[test]
    fn test_name_truncation() {
        let space: Arc<dyn AddressSpace> = Arc::new(UserSpace::new(0));
        let name = "a-very-long-process-name";
        let ctx = Context::new(Pid::new(1), name, space, RestrictFlags::empty());
        assert_eq!(ctx.name(), "a-very-long-pro");
        // Cut falls inside a two-byte character and backs off to its start.
        assert_eq!(truncate_name("éééééééééé"), "ééééééé");
    }

    #[test]
    fn test_shared_space_identity() {
        let space: Arc<dyn AddressSpace> = Arc::new(UserSpace::new(4096));
        let a = Context::new(Pid::new(1), "a", space.clone(), RestrictFlags::empty());
        let b = Context::new(Pid::new(2), "b", space, RestrictFlags::EXEC);
        let c = Context::new(
            Pid::new(3),
            "c",
            Arc::new(UserSpace::new(4096)),
            RestrictFlags::empty(),
        );
        assert!(a.shares_space_with(&b));
        assert!(!a.shares_space_with(&c));
    }
}
