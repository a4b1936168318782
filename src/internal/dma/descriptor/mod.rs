//! RX and TX buffer descriptors and DMA buffers.
//!
//! A GEM descriptor is two 32-bit words: a buffer address word and a status
//! word. Ownership of each descriptor alternates between software and the DMA
//! engine through the NEW bit (RX) or the USED bit (TX).

pub mod bits;
pub mod rx;
pub mod tx;

pub use rx::RxDescriptor;
pub use tx::TxDescriptor;

use core::cell::UnsafeCell;

use crate::internal::constants::DMA_BUFFER_SIZE;

/// Volatile cell wrapper for descriptor fields
///
/// Ensures all accesses are volatile to prevent compiler optimization
/// from reordering or caching descriptor field accesses.
#[repr(transparent)]
pub(crate) struct VolatileCell<T: Copy> {
    value: UnsafeCell<T>,
}

// Safety: VolatileCell is safe to share between threads because all access
// is through volatile operations which are single-copy atomic for u32 on
// Cortex-A9.
unsafe impl<T: Copy> Sync for VolatileCell<T> {}

impl<T: Copy> VolatileCell<T> {
    /// Create a new volatile cell with the given initial value
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    /// Read the value (volatile read)
    #[inline(always)]
    pub fn get(&self) -> T {
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Write a value (volatile write)
    #[inline(always)]
    pub fn set(&self, value: T) {
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }

    /// Update the value using a function (read-modify-write)
    #[inline(always)]
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let old = self.get();
        self.set(f(old));
    }
}

impl<T: Copy + Default> Default for VolatileCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Ring direction, selecting which queue base register a ring programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Receive queue (RXQBASE)
    Rx,
    /// Transmit queue (TXQBASE)
    Tx,
}

/// Operations shared by RX and TX descriptors, used by the generic ring.
pub trait Descriptor {
    /// Zero both descriptor words
    fn clear(&self);

    /// Read the status word
    fn status(&self) -> u32;

    /// Overwrite the status word
    fn set_status(&self, status: u32);

    /// Check whether the wrap marker is set
    fn is_wrap(&self) -> bool;

    /// Set or clear the wrap marker
    fn set_wrap(&self, wrap: bool);
}

/// One DMA data buffer, sized for a full frame.
///
/// The DMA engine writes receive buffers and reads transmit buffers behind
/// the compiler's back, so the storage is interior-mutable. Software only
/// touches a buffer while it owns the matching descriptor.
#[repr(C, align(32))]
pub struct DmaBuffer {
    bytes: UnsafeCell<[u8; DMA_BUFFER_SIZE]>,
}

// Safety: access is serialized by the descriptor ownership handshake
unsafe impl Sync for DmaBuffer {}

impl DmaBuffer {
    /// Buffer capacity in bytes
    pub const SIZE: usize = DMA_BUFFER_SIZE;

    /// Create a zeroed buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; DMA_BUFFER_SIZE]),
        }
    }

    /// Bus address of the buffer as programmed into a descriptor
    #[inline(always)]
    pub fn address(&self) -> u32 {
        self.bytes.get() as usize as u32
    }

    /// Zero the whole buffer
    pub fn zero(&self) {
        // SAFETY: caller owns the descriptor bound to this buffer
        unsafe { core::ptr::write_bytes(self.bytes.get().cast::<u8>(), 0, DMA_BUFFER_SIZE) };
    }

    /// Copy `dst.len()` bytes out of the buffer.
    ///
    /// Returns the number of bytes copied, clamped to the buffer size.
    pub fn read_into(&self, dst: &mut [u8]) -> usize {
        let len = dst.len().min(DMA_BUFFER_SIZE);
        // Descriptor status was read before this copy
        core::sync::atomic::fence(core::sync::atomic::Ordering::Acquire);
        // SAFETY: caller owns the descriptor bound to this buffer; len is in bounds
        unsafe {
            core::ptr::copy_nonoverlapping(self.bytes.get().cast::<u8>(), dst.as_mut_ptr(), len);
        }
        len
    }

    /// Copy `src` into the start of the buffer.
    ///
    /// Returns the number of bytes copied, clamped to the buffer size.
    pub fn write_from(&self, src: &[u8]) -> usize {
        let len = src.len().min(DMA_BUFFER_SIZE);
        // SAFETY: caller owns the descriptor bound to this buffer; len is in bounds
        unsafe {
            core::ptr::copy_nonoverlapping(src.as_ptr(), self.bytes.get().cast::<u8>(), len);
        }
        // Buffer contents must be visible before ownership is handed over
        core::sync::atomic::fence(core::sync::atomic::Ordering::Release);
        len
    }
}

impl Default for DmaBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volatile_cell_update() {
        let cell = VolatileCell::new(0x10u32);
        cell.update(|v| v | 0x01);
        assert_eq!(cell.get(), 0x11);
    }

    #[test]
    fn dma_buffer_write_then_read() {
        let buffer = DmaBuffer::new();
        assert_eq!(buffer.write_from(&[1, 2, 3, 4]), 4);
        let mut out = [0u8; 3];
        assert_eq!(buffer.read_into(&mut out), 3);
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn dma_buffer_clamps_to_capacity() {
        let buffer = DmaBuffer::new();
        let big = [0xAAu8; DMA_BUFFER_SIZE + 10];
        assert_eq!(buffer.write_from(&big), DMA_BUFFER_SIZE);
    }

    #[test]
    fn dma_buffer_zero() {
        let buffer = DmaBuffer::new();
        buffer.write_from(&[0xFF; 16]);
        buffer.zero();
        let mut out = [0xAAu8; 16];
        buffer.read_into(&mut out);
        assert_eq!(out, [0u8; 16]);
    }

    #[test]
    fn dma_buffer_alignment() {
        assert_eq!(core::mem::align_of::<DmaBuffer>(), 32);
    }
}
