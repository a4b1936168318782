//! Buffer descriptor bit field constants.
//!
//! Based on the Zynq-7000 TRM, section 16.3 (buffer descriptors).

// =============================================================================
// RX Descriptor Word 0 - Address
// =============================================================================

/// RX descriptor word 0 bit field constants
pub mod rx_word0 {
    /// Buffer address mask (word aligned)
    pub const ADDR_MASK: u32 = 0xFFFF_FFFC;
    /// Wrap - last descriptor in the ring
    pub const WRAP: u32 = 1 << 1;
    /// New - set by hardware when the buffer holds received data
    pub const NEW: u32 = 1 << 0;
}

// =============================================================================
// RX Descriptor Word 1 - Status
// =============================================================================

/// RX descriptor word 1 bit field constants
pub mod rx_word1 {
    /// End of frame - buffer holds the last part of a frame
    pub const EOF: u32 = 1 << 15;
    /// Start of frame - buffer holds the first part of a frame
    pub const SOF: u32 = 1 << 14;
    /// Frame length mask
    pub const LENGTH_MASK: u32 = 0x1FFF;
}

// =============================================================================
// TX Descriptor Word 1 - Status
// =============================================================================

/// TX descriptor word 1 bit field constants
pub mod tx_word1 {
    /// Used - set when software owns the descriptor
    pub const USED: u32 = 1 << 31;
    /// Wrap - last descriptor in the ring
    pub const WRAP: u32 = 1 << 30;
    /// Retry limit exceeded
    pub const RETRY_EXCEEDED: u32 = 1 << 29;
    /// Transmit underrun
    pub const URUN: u32 = 1 << 28;
    /// Buffers exhausted mid-frame
    pub const EXHAUSTED: u32 = 1 << 27;
    /// Last buffer of the frame
    pub const LAST: u32 = 1 << 15;
    /// Buffer length mask
    pub const LENGTH_MASK: u32 = 0x3FFF;

    /// Status bits written back by hardware on error
    pub const ERRORS: u32 = RETRY_EXCEEDED | URUN | EXHAUSTED;
}
