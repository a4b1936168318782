//! Transmit queue: TX descriptor ring with two-phase ownership.
//!
//! Descriptors move through four groups in ring order:
//!
//! ```text
//! free --alloc--> pre-work --to_hw--> hardware --from_hw--> post-work --free--> free
//! ```
//!
//! Each group is a contiguous run starting at its head index. A descriptor
//! leaves the hardware group only once hardware has set its USED bit.

use super::descriptor::{Descriptor, DmaBuffer, Direction, TxDescriptor};
use super::ring::DescriptorRing;
use crate::driver::error::{ConfigError, DmaError, Result};
use crate::internal::register::RegisterBlock;
use crate::internal::register::gem::GemRegs;

/// Contiguous run of descriptors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Group {
    head: usize,
    count: usize,
}

/// Transmit descriptor ring and the buffers bound to its slots.
pub struct TxQueue<'a> {
    ring: DescriptorRing<'a, TxDescriptor>,
    buffers: &'a [DmaBuffer],
    free: Group,
    pre: Group,
    hw: Group,
    post: Group,
}

impl<'a> TxQueue<'a> {
    /// Build the ring over `descriptors`, every slot software-owned.
    ///
    /// The queue base register is programmed and the last slot carries the
    /// wrap marker.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `slot_count` is zero or exceeds the descriptor
    /// storage, or if fewer buffers than slots are supplied.
    pub fn create<B: RegisterBlock>(
        descriptors: &'a [TxDescriptor],
        buffers: &'a [DmaBuffer],
        slot_count: usize,
        regs: &GemRegs<B>,
    ) -> Result<Self> {
        let ring = DescriptorRing::create(descriptors, slot_count, regs, Direction::Tx)?;
        if buffers.len() < ring.len() {
            return Err(ConfigError::InvalidConfig.into());
        }
        ring.clone_template(&TxDescriptor::template());
        ring.set_wrap(ring.len() - 1)?;

        let len = ring.len();
        Ok(Self {
            ring,
            buffers: &buffers[..len],
            free: Group { head: 0, count: len },
            pre: Group::default(),
            hw: Group::default(),
            post: Group::default(),
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

    /// Descriptors available to [`alloc`](Self::alloc)
    #[inline(always)]
    pub fn free_count(&self) -> usize {
        self.free.count
    }

    /// Descriptors committed to hardware and not yet reclaimed
    #[inline(always)]
    pub fn hw_count(&self) -> usize {
        self.hw.count
    }

    /// Number of slots carrying the wrap marker
    pub fn wrap_count(&self) -> usize {
        self.ring.wrap_count()
    }

    /// Slot descriptor at `index`
    pub fn descriptor(&self, index: usize) -> &'a TxDescriptor {
        self.ring.get(index)
    }

    /// Pool buffer bound to slot `index`
    pub fn buffer(&self, index: usize) -> &'a DmaBuffer {
        &self.buffers[index % self.buffers.len()]
    }

    // =========================================================================
    // Ring Bookkeeping
    // =========================================================================

    /// Take one descriptor from the free group into pre-work.
    ///
    /// # Errors
    ///
    /// `RingExhausted` when no descriptor is free.
    pub fn alloc(&mut self) -> Result<usize> {
        if self.free.count == 0 {
            return Err(DmaError::RingExhausted.into());
        }
        let index = self.free.head;
        self.free.head = self.ring.next_index(index);
        self.free.count -= 1;
        if self.pre.count == 0 {
            self.pre.head = index;
        }
        self.pre.count += 1;
        Ok(index)
    }

    /// Commit the oldest pre-work descriptor to hardware.
    ///
    /// # Errors
    ///
    /// `RingConsistency` unless `index` is that descriptor.
    pub fn to_hw(&mut self, index: usize) -> Result<()> {
        if self.pre.count == 0 || self.pre.head != index {
            return Err(DmaError::RingConsistency.into());
        }
        self.pre.head = self.ring.next_index(index);
        self.pre.count -= 1;
        if self.hw.count == 0 {
            self.hw.head = index;
        }
        self.hw.count += 1;
        Ok(())
    }

    /// Move the oldest hardware descriptor to post-work once hardware has
    /// set its USED bit.
    pub fn from_hw(&mut self) -> Option<usize> {
        if self.hw.count == 0 {
            return None;
        }
        let index = self.hw.head;
        if !self.ring.get(index).is_used() {
            return None;
        }
        self.hw.head = self.ring.next_index(index);
        self.hw.count -= 1;
        if self.post.count == 0 {
            self.post.head = index;
        }
        self.post.count += 1;
        Some(index)
    }

    /// Return the oldest post-work descriptor to the free group.
    ///
    /// # Errors
    ///
    /// `RingConsistency` unless `index` is that descriptor.
    pub fn free(&mut self, index: usize) -> Result<()> {
        if self.post.count == 0 || self.post.head != index {
            return Err(DmaError::RingConsistency.into());
        }
        self.post.head = self.ring.next_index(index);
        self.post.count -= 1;
        self.free.count += 1;
        Ok(())
    }

    // =========================================================================
    // Frame Operations
    // =========================================================================

    /// Reclaim every descriptor hardware has finished with.
    ///
    /// Returns the number reclaimed.
    pub fn reclaim(&mut self) -> usize {
        let mut reclaimed = 0;
        while let Some(index) = self.from_hw() {
            if self.free(index).is_err() {
                break;
            }
            reclaimed += 1;
        }
        reclaimed
    }

    /// Copy `frame` into a free slot and commit it to hardware.
    ///
    /// Returns the committed slot index. The caller has checked that the
    /// frame is non-empty and fits a buffer.
    pub fn stage(&mut self, frame: &[u8]) -> Result<usize> {
        let index = self.alloc()?;
        let desc = self.ring.get(index);
        let buffer = self.buffer(index);

        let len = buffer.write_from(frame);
        desc.set_buffer_address(buffer.address());
        desc.prepare(len);
        desc.clear_used();
        self.to_hw(index)?;
        Ok(index)
    }

    /// Retire the descriptor committed by [`stage`](Self::stage) after
    /// hardware reported completion.
    ///
    /// Older descriptors still queued from a timed-out send are retired on
    /// the way, in ring order.
    ///
    /// # Errors
    ///
    /// `RingConsistency` if hardware has not returned `committed`.
    pub fn complete(&mut self, committed: usize) -> Result<()> {
        while let Some(index) = self.from_hw() {
            self.free(index)?;
            if index == committed {
                return Ok(());
            }
        }
        Err(DmaError::RingConsistency.into())
    }
}
