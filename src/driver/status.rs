//! Transmit status reporting.
//!
//! This module provides [`TxFaults`], the error bits parsed from the
//! Transmit Status register, and [`TxReport`], the outcome of one send.

use crate::internal::register::gem::txsr;

// =============================================================================
// Transmit Faults
// =============================================================================

/// Transmit error flags parsed from the Transmit Status register.
///
/// Faults are reported, not fatal: the frame may still have been sent.
///
/// # Example
///
/// ```ignore
/// let report = gem.send(&frame)?;
/// if report.faults.underrun {
///     // DMA could not keep up with the transmitter
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxFaults {
    /// AHB bus returned a response other than OK
    pub hresp_not_ok: bool,
    /// Transmit underrun
    pub underrun: bool,
    /// Buffers exhausted mid-frame
    pub buffers_exhausted: bool,
}

impl TxFaults {
    /// Create from a raw Transmit Status register value
    #[inline]
    pub const fn from_status(status: u32) -> Self {
        Self {
            hresp_not_ok: (status & txsr::HRESPNOK) != 0,
            underrun: (status & txsr::URUN) != 0,
            buffers_exhausted: (status & txsr::BUFEXH) != 0,
        }
    }

    /// Convert back to register bits (write-1-to-clear)
    #[inline]
    pub const fn to_status(&self) -> u32 {
        let mut val = 0u32;
        if self.hresp_not_ok {
            val |= txsr::HRESPNOK;
        }
        if self.underrun {
            val |= txsr::URUN;
        }
        if self.buffers_exhausted {
            val |= txsr::BUFEXH;
        }
        val
    }

    /// No fault observed
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !(self.hresp_not_ok || self.underrun || self.buffers_exhausted)
    }

    /// Union of two fault sets
    #[inline]
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            hresp_not_ok: self.hresp_not_ok || other.hresp_not_ok,
            underrun: self.underrun || other.underrun,
            buffers_exhausted: self.buffers_exhausted || other.buffers_exhausted,
        }
    }
}

// =============================================================================
// Transmit Report
// =============================================================================

/// Outcome of a completed transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxReport {
    /// Bytes handed to hardware
    pub length: usize,
    /// Faults seen while waiting for completion
    pub faults: TxFaults,
}
