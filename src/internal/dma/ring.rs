//! Generic circular ring of buffer descriptors.

use super::descriptor::{Descriptor, Direction};
use crate::driver::error::{ConfigError, Result};
use crate::internal::register::RegisterBlock;
use crate::internal::register::gem::GemRegs;

/// Circular descriptor ring with wraparound index.
///
/// The ring borrows its slots from statically allocated storage; the storage
/// length is the compiled maximum ring size.
pub struct DescriptorRing<'a, D> {
    /// Active descriptor slots
    descriptors: &'a [D],
    /// Current index for processing
    current: usize,
}

impl<'a, D: Descriptor> DescriptorRing<'a, D> {
    /// Lay out `slot_count` descriptors at the start of `storage`.
    ///
    /// Every slot is cleared and the ring base address is written to the
    /// queue base register selected by `direction`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `slot_count` is zero or exceeds the storage size.
    pub fn create<B: RegisterBlock>(
        storage: &'a [D],
        slot_count: usize,
        regs: &GemRegs<B>,
        direction: Direction,
    ) -> Result<Self> {
        if slot_count == 0 || slot_count > storage.len() {
            return Err(ConfigError::InvalidConfig.into());
        }

        let ring = Self {
            descriptors: &storage[..slot_count],
            current: 0,
        };
        for desc in ring.descriptors {
            desc.clear();
        }

        let base = ring.base_addr_u32();
        match direction {
            Direction::Rx => regs.set_rx_queue_base(base),
            Direction::Tx => regs.set_tx_queue_base(base),
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("GEM: {} ring of {} slots at {:#010x}", direction, slot_count, base);
        #[cfg(feature = "log")]
        log::debug!("GEM: {direction:?} ring of {slot_count} slots at {base:#010x}");

        Ok(ring)
    }

    /// Copy the template's status word into every slot.
    pub fn clone_template(&self, template: &D) {
        let status = template.status();
        for desc in self.descriptors {
            desc.set_status(status);
        }
    }

    /// Mark `last_index` as the slot after which hardware wraps to index 0.
    ///
    /// Any previous wrap marker is removed, so the ring always carries
    /// exactly one.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `last_index` is outside the ring.
    pub fn set_wrap(&self, last_index: usize) -> Result<()> {
        if last_index >= self.descriptors.len() {
            return Err(ConfigError::InvalidConfig.into());
        }
        for (i, desc) in self.descriptors.iter().enumerate() {
            desc.set_wrap(i == last_index);
        }
        Ok(())
    }

    /// Number of slots carrying the wrap marker
    pub fn wrap_count(&self) -> usize {
        self.descriptors.iter().filter(|d| d.is_wrap()).count()
    }
}

impl<'a, D> DescriptorRing<'a, D> {
    /// Get the number of descriptors in the ring
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the ring is empty (never true for a created ring)
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Get the current index
    #[inline(always)]
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Advance the current index by one, wrapping around
    #[inline(always)]
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.descriptors.len();
    }

    /// Get a reference to the current descriptor
    #[inline(always)]
    pub fn current(&self) -> &'a D {
        &self.descriptors[self.current]
    }

    /// Get a reference to a descriptor at a specific index
    #[inline(always)]
    pub fn get(&self, index: usize) -> &'a D {
        &self.descriptors[index % self.descriptors.len()]
    }

    /// Index following `index`, wrapping around
    #[inline(always)]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.descriptors.len()
    }

    /// Get the base address as u32 (for the queue base register)
    #[inline(always)]
    pub fn base_addr_u32(&self) -> u32 {
        self.descriptors.as_ptr() as usize as u32
    }

    /// Iterate over all descriptors
    pub fn iter(&self) -> impl Iterator<Item = &'a D> {
        self.descriptors.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
