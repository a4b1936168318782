//! Receive queue: RX descriptor ring plus its pool buffers.
//!
//! Hardware sets NEW in a descriptor's address word once it has written a
//! frame into the bound buffer. Software copies the frame out and returns
//! the slot by clearing NEW again. A start-of-frame slot is only returned
//! once its end-of-frame slot has been seen.

use super::descriptor::{Descriptor, DmaBuffer, Direction, RxDescriptor};
use super::ring::DescriptorRing;
use crate::driver::error::{ConfigError, FrameError, Result};
use crate::internal::register::RegisterBlock;
use crate::internal::register::gem::GemRegs;

/// Status word written into a slot handed back to hardware
const RECYCLED_STATUS: u32 = 0;

/// Receive descriptor ring and the buffers bound to its slots.
pub struct RxQueue<'a> {
    ring: DescriptorRing<'a, RxDescriptor>,
    buffers: &'a [DmaBuffer],
    /// Start-of-frame slot whose release waits for end-of-frame
    first_buf: Option<usize>,
}

impl<'a> RxQueue<'a> {
    /// Build the ring over `descriptors` and bind one zeroed buffer per slot.
    ///
    /// The queue base register is programmed and the last slot carries the
    /// wrap marker.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `slot_count` is zero or exceeds the descriptor
    /// storage, or if fewer buffers than slots are supplied (including none).
    pub fn create<B: RegisterBlock>(
        descriptors: &'a [RxDescriptor],
        buffers: &'a [DmaBuffer],
        slot_count: usize,
        regs: &GemRegs<B>,
    ) -> Result<Self> {
        let ring = DescriptorRing::create(descriptors, slot_count, regs, Direction::Rx)?;
        if buffers.is_empty() || buffers.len() < ring.len() {
            return Err(ConfigError::InvalidConfig.into());
        }

        for (desc, buffer) in ring.iter().zip(buffers) {
            buffer.zero();
            desc.set_buffer_address(buffer.address());
            desc.set_status(RECYCLED_STATUS);
        }
        ring.set_wrap(ring.len() - 1)?;

        Ok(Self {
            ring,
            buffers: &buffers[..slot_count],
            first_buf: None,
        })
    }

    /// Number of slots
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Never true for a created queue
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Index of the next slot to inspect
    #[inline(always)]
    pub fn current_index(&self) -> usize {
        self.ring.current_index()
    }

    /// Check whether hardware has handed the current slot to software
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.ring.current().is_new()
    }

    /// Number of slots carrying the wrap marker
    pub fn wrap_count(&self) -> usize {
        self.ring.wrap_count()
    }

    /// Whether a start-of-frame slot is still held by software
    pub fn has_pending(&self) -> bool {
        self.first_buf.is_some()
    }

    /// Slot descriptor at `index`
    pub fn descriptor(&self, index: usize) -> &'a RxDescriptor {
        self.ring.get(index)
    }

    /// Pool buffer bound to slot `index`
    pub fn buffer(&self, index: usize) -> &'a DmaBuffer {
        &self.buffers[index % self.buffers.len()]
    }

    /// Consume the current slot if hardware has released it.
    ///
    /// Returns `None` when the slot is still hardware-owned. A valid frame
    /// is copied into `dst` and its length returned; a malformed descriptor
    /// is recycled and the violation returned. A frame longer than `dst` is
    /// recycled uncopied and reported as `Oversized`. Either way the cursor
    /// moves on by one slot.
    pub fn process_next(&mut self, dst: &mut [u8]) -> Option<core::result::Result<usize, FrameError>> {
        if !self.is_ready() {
            return None;
        }

        let index = self.ring.current_index();
        let desc = self.ring.current();
        match Self::validate(desc) {
            Ok(len) if len > dst.len() => {
                self.discard();
                Some(Err(FrameError::Oversized))
            }
            Ok(len) => {
                let copied = self.buffer(index).read_into(&mut dst[..len]);
                self.advance();
                Some(Ok(copied))
            }
            Err(e) => {
                self.discard();
                Some(Err(e))
            }
        }
    }

    /// Check the frame boundary, length and buffer of a released slot
    fn validate(desc: &RxDescriptor) -> core::result::Result<usize, FrameError> {
        if !desc.is_sof() {
            return Err(FrameError::MissingSof);
        }
        if !desc.is_eof() {
            return Err(FrameError::MissingEof);
        }
        let len = desc.frame_length();
        if len == 0 {
            return Err(FrameError::ZeroLength);
        }
        if len > DmaBuffer::SIZE {
            return Err(FrameError::Oversized);
        }
        if desc.buffer_address() == 0 {
            return Err(FrameError::DanglingBuffer);
        }
        Ok(len)
    }

    /// Recycle the current slot and move the cursor.
    ///
    /// A start-of-frame slot is remembered instead of released; any other
    /// slot is released immediately. On end-of-frame the remembered slot is
    /// released too.
    pub fn advance(&mut self) {
        let index = self.ring.current_index();
        let desc = self.ring.current();
        // Releasing clears the status word
        let sof = desc.is_sof();
        let eof = desc.is_eof();

        if sof {
            self.first_buf = Some(index);
        } else {
            self.release(index);
        }

        if eof {
            if let Some(first) = self.first_buf.take() {
                self.release(first);
            }
        }

        self.ring.advance();
    }

    /// Release the current slot unconditionally, with any pending
    /// start-of-frame slot, and move the cursor.
    pub fn discard(&mut self) {
        let index = self.ring.current_index();
        self.release(index);
        if let Some(first) = self.first_buf.take() {
            self.release(first);
        }
        self.ring.advance();
    }

    fn release(&self, index: usize) {
        let desc = self.ring.get(index);
        desc.set_status(RECYCLED_STATUS);
        desc.clear_new();
    }
}
