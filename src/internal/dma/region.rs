//! Statically allocated DMA memory.

use super::descriptor::{DmaBuffer, RxDescriptor, TxDescriptor};

/// Descriptor rings and frame buffers for one GEM instance.
///
/// All memory is sized at compile time and lives wherever the user puts the
/// region, normally a `static` in uncached or coherent memory. The driver
/// only borrows it.
///
/// # Type Parameters
/// * `RX` - Maximum number of receive descriptors/buffers
/// * `TX` - Maximum number of transmit descriptors/buffers
///
/// # Example
///
/// ```ignore
/// use zynq_gem::DmaRegion;
///
/// #[unsafe(link_section = ".uncached")]
/// static DMA: DmaRegion<8, 8> = DmaRegion::new();
/// ```
#[repr(C)]
pub struct DmaRegion<const RX: usize, const TX: usize> {
    rx_descriptors: [RxDescriptor; RX],
    tx_descriptors: [TxDescriptor; TX],
    rx_buffers: [DmaBuffer; RX],
    tx_buffers: [DmaBuffer; TX],
}

/// Borrowed view of a [`DmaRegion`], independent of its sizes.
#[derive(Clone, Copy)]
pub struct DmaParts<'a> {
    /// Receive descriptor storage
    pub rx_descriptors: &'a [RxDescriptor],
    /// Transmit descriptor storage
    pub tx_descriptors: &'a [TxDescriptor],
    /// Receive buffer pool
    pub rx_buffers: &'a [DmaBuffer],
    /// Transmit buffers
    pub tx_buffers: &'a [DmaBuffer],
}

impl<const RX: usize, const TX: usize> DmaRegion<RX, TX> {
    /// Create a zeroed region. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rx_descriptors: [const { RxDescriptor::new() }; RX],
            tx_descriptors: [const { TxDescriptor::new() }; TX],
            rx_buffers: [const { DmaBuffer::new() }; RX],
            tx_buffers: [const { DmaBuffer::new() }; TX],
        }
    }

    /// Total memory usage in bytes.
    #[must_use]
    pub const fn memory_usage() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Receive ring capacity
    #[must_use]
    pub const fn rx_capacity(&self) -> usize {
        RX
    }

    /// Transmit ring capacity
    #[must_use]
    pub const fn tx_capacity(&self) -> usize {
        TX
    }

    /// Borrow the region as slices
    pub fn parts(&self) -> DmaParts<'_> {
        DmaParts {
            rx_descriptors: &self.rx_descriptors,
            tx_descriptors: &self.tx_descriptors,
            rx_buffers: &self.rx_buffers,
            tx_buffers: &self.tx_buffers,
        }
    }
}

impl<const RX: usize, const TX: usize> Default for DmaRegion<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}
