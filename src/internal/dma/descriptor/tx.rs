//! TX buffer descriptor.

use super::bits::tx_word1;
use super::{Descriptor, VolatileCell};

/// TX buffer descriptor (8 bytes).
#[repr(C, align(8))]
pub struct TxDescriptor {
    /// Word 0: buffer address
    addr: VolatileCell<u32>,
    /// Word 1: USED, WRAP, error bits, LAST and length
    status: VolatileCell<u32>,
}

impl TxDescriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = 8;

    /// Create a new zeroed TX descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            addr: VolatileCell::new(0),
            status: VolatileCell::new(0),
        }
    }

    /// Template marking a descriptor software-owned.
    #[must_use]
    pub const fn template() -> Self {
        Self {
            addr: VolatileCell::new(0),
            status: VolatileCell::new(tx_word1::USED),
        }
    }

    /// Set the buffer address
    #[inline(always)]
    pub fn set_buffer_address(&self, address: u32) {
        self.addr.set(address);
    }

    /// Buffer address programmed in the descriptor
    #[inline(always)]
    #[must_use]
    pub fn buffer_address(&self) -> u32 {
        self.addr.get()
    }

    /// Check if software owns the descriptor (hardware has finished with it).
    #[inline(always)]
    #[must_use]
    pub fn is_used(&self) -> bool {
        (self.status.get() & tx_word1::USED) != 0
    }

    /// Mark the descriptor software-owned.
    #[inline(always)]
    pub fn set_used(&self) {
        self.status.update(|v| v | tx_word1::USED);
    }

    /// Hand the descriptor to hardware.
    #[inline(always)]
    pub fn clear_used(&self) {
        self.status.update(|v| v & !tx_word1::USED);
    }

    /// Prepare a single-buffer frame: length, LAST set, error bits cleared.
    ///
    /// WRAP and USED are preserved; ownership is transferred separately.
    pub fn prepare(&self, len: usize) {
        self.status.update(|v| {
            (v & (tx_word1::USED | tx_word1::WRAP))
                | tx_word1::LAST
                | (len as u32 & tx_word1::LENGTH_MASK)
        });
    }

    /// Programmed buffer length
    #[must_use]
    pub fn length(&self) -> usize {
        (self.status.get() & tx_word1::LENGTH_MASK) as usize
    }

    /// Check the last-buffer bit
    #[must_use]
    pub fn is_last(&self) -> bool {
        (self.status.get() & tx_word1::LAST) != 0
    }

    /// Error bits written back by hardware
    #[must_use]
    pub fn error_bits(&self) -> u32 {
        self.status.get() & tx_word1::ERRORS
    }
}

impl Descriptor for TxDescriptor {
    fn clear(&self) {
        self.addr.set(0);
        self.status.set(0);
    }

    fn status(&self) -> u32 {
        self.status.get()
    }

    fn set_status(&self, status: u32) {
        self.status.set(status);
    }

    fn is_wrap(&self) -> bool {
        (self.status.get() & tx_word1::WRAP) != 0
    }

    fn set_wrap(&self, wrap: bool) {
        if wrap {
            self.status.update(|v| v | tx_word1::WRAP);
        } else {
            self.status.update(|v| v & !tx_word1::WRAP);
        }
    }
}

impl Default for TxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}
