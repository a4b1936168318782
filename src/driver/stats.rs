//! Per-device traffic counters.

/// Counters kept by a [`Gem`](super::gem::Gem) instance.
///
/// Every error that is logged is also counted here, so a build without a
/// logging backend still sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    /// Frames delivered to the receive sink
    pub rx_frames: u32,
    /// Bytes delivered to the receive sink
    pub rx_bytes: u64,
    /// Receive descriptors rejected (missing SOF/EOF, bad length or buffer)
    pub rx_protocol_violations: u32,
    /// Frames whose transmission completed
    pub tx_frames: u32,
    /// Bytes whose transmission completed
    pub tx_bytes: u64,
    /// Transmissions that reported an error bit in TXSR
    pub tx_hardware_faults: u32,
    /// Transmissions whose completion was never observed
    pub tx_timeouts: u32,
}

impl Statistics {
    /// All counters zero
    pub const fn new() -> Self {
        Self {
            rx_frames: 0,
            rx_bytes: 0,
            rx_protocol_violations: 0,
            tx_frames: 0,
            tx_bytes: 0,
            tx_hardware_faults: 0,
            tx_timeouts: 0,
        }
    }

    pub(crate) fn record_rx(&mut self, len: usize) {
        self.rx_frames = self.rx_frames.wrapping_add(1);
        self.rx_bytes = self.rx_bytes.wrapping_add(len as u64);
    }

    pub(crate) fn record_tx(&mut self, len: usize) {
        self.tx_frames = self.tx_frames.wrapping_add(1);
        self.tx_bytes = self.tx_bytes.wrapping_add(len as u64);
    }

    /// Reset every counter
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
