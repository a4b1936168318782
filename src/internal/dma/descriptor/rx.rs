//! RX buffer descriptor.

use super::bits::{rx_word0, rx_word1};
use super::{Descriptor, VolatileCell};

/// RX buffer descriptor (8 bytes).
#[repr(C, align(8))]
pub struct RxDescriptor {
    /// Word 0: buffer address, WRAP and NEW bits
    addr: VolatileCell<u32>,
    /// Word 1: SOF, EOF and frame length
    status: VolatileCell<u32>,
}

impl RxDescriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = 8;

    /// Create a new zeroed RX descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            addr: VolatileCell::new(0),
            status: VolatileCell::new(0),
        }
    }

    /// Install a buffer address, preserving WRAP and handing the slot to hardware.
    pub fn set_buffer_address(&self, address: u32) {
        self.addr
            .update(|v| (address & rx_word0::ADDR_MASK) | (v & rx_word0::WRAP));
    }

    /// Buffer address programmed in the descriptor
    #[inline(always)]
    #[must_use]
    pub fn buffer_address(&self) -> u32 {
        self.addr.get() & rx_word0::ADDR_MASK
    }

    /// Check if hardware has deposited a frame (software owns the slot).
    #[inline(always)]
    #[must_use]
    pub fn is_new(&self) -> bool {
        (self.addr.get() & rx_word0::NEW) != 0
    }

    /// Return the slot to hardware.
    #[inline(always)]
    pub fn clear_new(&self) {
        self.addr.update(|v| v & !rx_word0::NEW);
    }

    /// Check the start-of-frame bit
    #[inline(always)]
    #[must_use]
    pub fn is_sof(&self) -> bool {
        (self.status.get() & rx_word1::SOF) != 0
    }

    /// Check the end-of-frame bit
    #[inline(always)]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        (self.status.get() & rx_word1::EOF) != 0
    }

    /// Received frame length in bytes
    #[inline(always)]
    #[must_use]
    pub fn frame_length(&self) -> usize {
        (self.status.get() & rx_word1::LENGTH_MASK) as usize
    }

    /// Raw address word
    #[must_use]
    pub fn raw_addr(&self) -> u32 {
        self.addr.get()
    }

    /// Overwrite the raw address word
    pub fn set_raw_addr(&self, value: u32) {
        self.addr.set(value);
    }
}

impl Descriptor for RxDescriptor {
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
        (self.addr.get() & rx_word0::WRAP) != 0
    }

    fn set_wrap(&self, wrap: bool) {
        if wrap {
            self.addr.update(|v| v | rx_word0::WRAP);
        } else {
            self.addr.update(|v| v & !rx_word0::WRAP);
        }
    }
}

impl Default for RxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_descriptor_size() {
        assert_eq!(core::mem::size_of::<RxDescriptor>(), RxDescriptor::SIZE);
    }

    #[test]
    fn set_buffer_address_preserves_wrap_and_clears_new() {
        let desc = RxDescriptor::new();
        desc.set_raw_addr(rx_word0::WRAP | rx_word0::NEW);
        desc.set_buffer_address(0x0010_0040);
        assert_eq!(desc.buffer_address(), 0x0010_0040);
        assert!(desc.is_wrap());
        assert!(!desc.is_new());
    }

    #[test]
    fn status_fields() {
        let desc = RxDescriptor::new();
        desc.set_status(rx_word1::SOF | rx_word1::EOF | 1514);
        assert!(desc.is_sof());
        assert!(desc.is_eof());
        assert_eq!(desc.frame_length(), 1514);
    }

    #[test]
    fn clear_new_keeps_address() {
        let desc = RxDescriptor::new();
        desc.set_raw_addr(0x2000 | rx_word0::NEW);
        assert!(desc.is_new());
        desc.clear_new();
        assert!(!desc.is_new());
        assert_eq!(desc.buffer_address(), 0x2000);
    }
}
