//! Memory-mapped register access for the GEM and SLCR blocks
//!
//! Register blocks are reached through the [`RegisterBlock`] trait rather than
//! raw address casts. On hardware the [`Mmio`] implementation performs
//! volatile 32-bit accesses followed by a full barrier on writes; host tests
//! substitute a mock register file.

pub mod gem;
pub mod slcr;

use core::sync::atomic::{Ordering, fence};

/// 32-bit register block addressed by byte offset.
///
/// Only [`read`](Self::read) and [`write`](Self::write) are required; the
/// read-modify-write helpers are provided.
pub trait RegisterBlock {
    /// Read the register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write `value` to the register at `offset`
    fn write(&self, offset: usize, value: u32);

    /// Read-modify-write the register at `offset`
    #[inline(always)]
    fn modify<F>(&self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(offset);
        self.write(offset, f(value));
    }

    /// Set bits in the register at `offset`
    #[inline(always)]
    fn set_bits(&self, offset: usize, bits: u32) {
        self.modify(offset, |v| v | bits);
    }

    /// Clear bits in the register at `offset`
    #[inline(always)]
    fn clear_bits(&self, offset: usize, bits: u32) {
        self.modify(offset, |v| v & !bits);
    }
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &T {
    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    #[inline(always)]
    fn write(&self, offset: usize, value: u32) {
        (**self).write(offset, value);
    }
}

/// Memory-mapped register block at a fixed physical base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of a mapped peripheral whose registers are
    /// 32-bit aligned and valid for volatile access for the lifetime of the
    /// returned value.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the block
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBlock for Mmio {
    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: base validity is a precondition of `Mmio::new`
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    #[inline(always)]
    fn write(&self, offset: usize, value: u32) {
        // SAFETY: base validity is a precondition of `Mmio::new`
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) };
        fence(Ordering::SeqCst);
    }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register of a typed view.
///
/// The view must have a `bus` field implementing [`RegisterBlock`].
///
/// # Example
/// ```ignore
/// impl<B: RegisterBlock> GemRegs<B> {
///     reg_rw!(net_config, set_net_config, NWCFG_OFFSET, "Network Configuration register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.bus.read($offset)
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            self.bus.write($offset, value);
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.bus.read($offset)
        }
    };
}

/// Generate a write-only accessor method for a register.
macro_rules! reg_wo {
    ($write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            self.bus.write($offset, value);
        }
    };
}

/// Generate set/clear bit operation methods for a register.
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $offset:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn(&self) {
            self.bus.set_bits($offset, $bit);
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn(&self) {
            self.bus.clear_bits($offset, $bit);
        }
    };
}

/// Generate a bit check method (true when the bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn(&self) -> bool {
            (self.bus.read($offset) & $bit) != 0
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_bit_ops;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
pub(crate) use reg_wo;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegisters;

    #[test]
    fn modify_preserves_other_bits() {
        let regs = MockRegisters::new();
        regs.set(0x10, 0xF0F0);
        regs.modify(0x10, |v| v | 0x000F);
        assert_eq!(regs.get(0x10), 0xF0FF);
    }

    #[test]
    fn set_and_clear_bits() {
        let regs = MockRegisters::new();
        regs.set_bits(0x04, 0x0000_0401);
        assert_eq!(regs.get(0x04), 0x0000_0401);
        regs.clear_bits(0x04, 0x0000_0001);
        assert_eq!(regs.get(0x04), 0x0000_0400);
    }

    #[test]
    fn shared_reference_forwards_to_block() {
        let regs = MockRegisters::new();
        let view = &regs;
        view.write(0x20, 7);
        assert_eq!(RegisterBlock::read(&view, 0x20), 7);
        assert_eq!(regs.writes_to(0x20), 1);
    }

    #[test]
    fn mmio_keeps_base() {
        // SAFETY: never dereferenced
        let mmio = unsafe { Mmio::new(0xE000_B000) };
        assert_eq!(mmio.base(), 0xE000_B000);
    }
}
