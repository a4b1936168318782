//! GEM (Cadence Gigabit Ethernet MAC) register definitions
//!
//! Offsets and bit fields follow the Zynq-7000 TRM (UG585), appendix B.18.

use super::{RegisterBlock, reg_bit_check, reg_bit_ops, reg_ro, reg_rw, reg_wo};
use crate::driver::error::{ConfigError, ConfigResult};

// =============================================================================
// Base Addresses
// =============================================================================

/// GEM0 register block base address
pub const GEM0_BASE: usize = 0xE000_B000;

/// GEM1 register block base address
pub const GEM1_BASE: usize = 0xE000_C000;

// =============================================================================
// Register Offsets
// =============================================================================

/// Network Control register offset
pub const NWCTRL_OFFSET: usize = 0x000;
/// Network Configuration register offset
pub const NWCFG_OFFSET: usize = 0x004;
/// Network Status register offset
pub const NWSR_OFFSET: usize = 0x008;
/// DMA Configuration register offset
pub const DMACR_OFFSET: usize = 0x010;
/// Transmit Status register offset
pub const TXSR_OFFSET: usize = 0x014;
/// Receive Queue Base Address register offset
pub const RXQBASE_OFFSET: usize = 0x018;
/// Transmit Queue Base Address register offset
pub const TXQBASE_OFFSET: usize = 0x01C;
/// Receive Status register offset
pub const RXSR_OFFSET: usize = 0x020;
/// Interrupt Status register offset
pub const ISR_OFFSET: usize = 0x024;
/// Interrupt Enable register offset
pub const IER_OFFSET: usize = 0x028;
/// Interrupt Disable register offset
pub const IDR_OFFSET: usize = 0x02C;
/// PHY Maintenance register offset
pub const PHYMNTNC_OFFSET: usize = 0x034;
/// Specific Address 1 Bottom register offset
pub const LADDR1L_OFFSET: usize = 0x088;
/// Specific Address 1 Top register offset
pub const LADDR1H_OFFSET: usize = 0x08C;

/// Stride between consecutive specific-address filter slots
pub const LADDR_STRIDE: usize = 0x08;

/// Number of specific-address filter slots (1..=4)
pub const LADDR_SLOT_COUNT: u8 = 4;

// =============================================================================
// Network Control Register Bits
// =============================================================================

/// NWCTRL bit definitions
pub mod nwctrl {
    /// Start transmission
    pub const STARTTX: u32 = 1 << 9;
    /// Clear statistics registers
    pub const STATCLR: u32 = 1 << 5;
    /// Management port enable
    pub const MDEN: u32 = 1 << 4;
    /// Transmit enable
    pub const TXEN: u32 = 1 << 3;
    /// Receive enable
    pub const RXEN: u32 = 1 << 2;
}

// =============================================================================
// Network Configuration Register Bits
// =============================================================================

/// NWCFG bit definitions
pub mod nwcfg {
    /// MDC clock divisor shift (bits 20:18)
    pub const MDC_DIV_SHIFT: u32 = 18;
    /// MDC clock divisor field mask
    pub const MDC_DIV_MASK: u32 = 0x7 << MDC_DIV_SHIFT;
    /// MDC = pclk / 48
    pub const MDC_DIV_48: u32 = 3 << MDC_DIV_SHIFT;
    /// Remove FCS from received frames
    pub const FCS_REMOVE: u32 = 1 << 17;
    /// Gigabit mode enable
    pub const GIGE: u32 = 1 << 10;
    /// Copy all frames (promiscuous)
    pub const COPY_ALL: u32 = 1 << 4;
    /// Full duplex
    pub const FULL_DUPLEX: u32 = 1 << 1;
    /// 100 Mbps (also set together with GIGE)
    pub const SPEED: u32 = 1 << 0;

    /// Configuration written at one-time bring-up
    pub const BRINGUP: u32 = MDC_DIV_48 | FCS_REMOVE | GIGE | COPY_ALL | FULL_DUPLEX;
}

// =============================================================================
// Network Status Register Bits
// =============================================================================

/// NWSR bit definitions
pub mod nwsr {
    /// PHY management logic is idle
    pub const MDIO_IDLE: u32 = 1 << 2;
}

// =============================================================================
// DMA Configuration
// =============================================================================

/// DMACR bit definitions
pub mod dmacr {
    /// RX buffer size field shift (units of 64 bytes)
    pub const RX_BUF_SIZE_SHIFT: u32 = 16;
    /// RX buffer size field mask
    pub const RX_BUF_SIZE_MASK: u32 = 0xFF << RX_BUF_SIZE_SHIFT;
    /// Full RX packet buffer memory (8 KB)
    pub const RX_PKTBUF_FULL: u32 = 0x3 << 8;
    /// Full TX packet buffer memory (4 KB)
    pub const TX_PKTBUF_FULL: u32 = 1 << 10;
    /// AHB burst length of 4
    pub const BLENGTH_INCR4: u32 = 0x04;

    /// DMA configuration for 1536 byte receive buffers
    pub const DEFAULT: u32 = (0x18 << RX_BUF_SIZE_SHIFT) | TX_PKTBUF_FULL | RX_PKTBUF_FULL | BLENGTH_INCR4;
}

// =============================================================================
// Transmit Status Register Bits
// =============================================================================

/// TXSR bit definitions (write one to clear)
pub mod txsr {
    /// HRESP not OK
    pub const HRESPNOK: u32 = 1 << 8;
    /// Transmit underrun
    pub const URUN: u32 = 1 << 6;
    /// Transmit complete
    pub const TXCOMPL: u32 = 1 << 5;
    /// Buffers exhausted mid-frame
    pub const BUFEXH: u32 = 1 << 4;
    /// Transmit go
    pub const TXGO: u32 = 1 << 3;
    /// Retry limit exceeded
    pub const RETRY_EXCEEDED: u32 = 1 << 2;
    /// Collision occurred
    pub const COLLISION: u32 = 1 << 1;
    /// Used bit read
    pub const USEDREAD: u32 = 1 << 0;

    /// Error bits reported as hardware faults
    pub const ERRORS: u32 = HRESPNOK | URUN | BUFEXH;
}

// =============================================================================
// Receive Status Register Bits
// =============================================================================

/// RXSR bit definitions (write one to clear)
pub mod rxsr {
    /// HRESP not OK
    pub const HRESPNOK: u32 = 1 << 3;
    /// Receive overrun
    pub const RXOVR: u32 = 1 << 2;
    /// Frame received
    pub const FRAMERX: u32 = 1 << 1;
    /// Buffer not available
    pub const BUFFNA: u32 = 1 << 0;
}

// =============================================================================
// PHY Maintenance Register Fields
// =============================================================================

/// PHYMNTNC field definitions
pub mod phymntnc {
    /// Clause 22 start bits and must-be-10 field
    pub const OP_MASK: u32 = 0x4002_0000;
    /// Read operation
    pub const OP_READ: u32 = 0x2000_0000;
    /// Write operation
    pub const OP_WRITE: u32 = 0x1000_0000;
    /// PHY address shift
    pub const PHYAD_SHIFT: u32 = 23;
    /// PHY register shift
    pub const PHREG_SHIFT: u32 = 18;
    /// Data field mask
    pub const DATA_MASK: u32 = 0xFFFF;

    /// Encode a maintenance frame
    #[inline(always)]
    pub const fn frame(op: u32, phy_addr: u8, reg: u8, data: u16) -> u32 {
        OP_MASK
            | op
            | ((phy_addr as u32) << PHYAD_SHIFT)
            | ((reg as u32) << PHREG_SHIFT)
            | data as u32
    }
}

/// Mask selecting every interrupt source
pub const IXR_ALL_MASK: u32 = 0xFFFF_FFFF;

// =============================================================================
// Typed Register View
// =============================================================================

/// GEM register block.
#[derive(Debug, Clone, Copy)]
pub struct GemRegs<B> {
    bus: B,
}

impl<B: RegisterBlock> GemRegs<B> {
    /// Wrap a register block
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Underlying register block
    pub fn bus(&self) -> &B {
        &self.bus
    }

    reg_rw!(net_control, set_net_control, NWCTRL_OFFSET, "Network Control register");
    reg_rw!(net_config, set_net_config, NWCFG_OFFSET, "Network Configuration register");
    reg_ro!(net_status, NWSR_OFFSET, "Network Status register");
    reg_rw!(dma_config, set_dma_config, DMACR_OFFSET, "DMA Configuration register");
    reg_rw!(tx_status, set_tx_status, TXSR_OFFSET, "Transmit Status register");
    reg_rw!(rx_queue_base, set_rx_queue_base, RXQBASE_OFFSET, "Receive Queue Base register");
    reg_rw!(tx_queue_base, set_tx_queue_base, TXQBASE_OFFSET, "Transmit Queue Base register");
    reg_rw!(rx_status, set_rx_status, RXSR_OFFSET, "Receive Status register");
    reg_wo!(set_interrupt_disable, IDR_OFFSET, "Interrupt Disable register");
    reg_rw!(phy_maintenance, set_phy_maintenance, PHYMNTNC_OFFSET, "PHY Maintenance register");

    reg_bit_ops!(enable_mdio, disable_mdio, NWCTRL_OFFSET, nwctrl::MDEN, "management port", "Enable", "Disable");
    reg_bit_ops!(enable_rx_tx, disable_rx_tx, NWCTRL_OFFSET, nwctrl::RXEN | nwctrl::TXEN, "receiver and transmitter", "Enable", "Disable");
    reg_bit_check!(is_mdio_idle, NWSR_OFFSET, nwsr::MDIO_IDLE, "Check if the PHY management logic is idle");

    /// Start transmission of committed descriptors
    #[inline(always)]
    pub fn start_tx(&self) {
        self.bus.set_bits(NWCTRL_OFFSET, nwctrl::STARTTX);
    }

    /// Program specific-address filter `slot` (1..=4) with a MAC address
    pub fn set_filter_address(&self, slot: u8, addr: &[u8; 6]) -> ConfigResult<()> {
        let base = filter_offset(slot)?;
        let bottom = u32::from_le_bytes([addr[0], addr[1], addr[2], addr[3]]);
        let top = u32::from(addr[4]) | (u32::from(addr[5]) << 8);
        // Bottom then top: writing the top half activates the filter
        self.bus.write(base, bottom);
        self.bus.write(base + 4, top);
        Ok(())
    }

    /// Read back the MAC address programmed in filter `slot` (1..=4)
    pub fn filter_address(&self, slot: u8) -> ConfigResult<[u8; 6]> {
        let base = filter_offset(slot)?;
        let bottom = self.bus.read(base).to_le_bytes();
        let top = self.bus.read(base + 4);
        Ok([
            bottom[0],
            bottom[1],
            bottom[2],
            bottom[3],
            (top & 0xFF) as u8,
            ((top >> 8) & 0xFF) as u8,
        ])
    }
}

/// Offset of the bottom register of filter `slot`
fn filter_offset(slot: u8) -> ConfigResult<usize> {
    if slot == 0 || slot > LADDR_SLOT_COUNT {
        return Err(ConfigError::InvalidFilterSlot);
    }
    Ok(LADDR1L_OFFSET + (slot as usize - 1) * LADDR_STRIDE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegisters;

    #[test]
    fn dma_default_matches_bringup_value() {
        assert_eq!(dmacr::DEFAULT, 0x0018_0704);
    }

    #[test]
    fn bringup_config_value() {
        assert_eq!(nwcfg::BRINGUP, 0x000E_0412);
    }

    #[test]
    fn phy_maintenance_read_frame() {
        // Read of PHY 7 register 1
        let frame = phymntnc::frame(phymntnc::OP_READ, 7, 1, 0);
        assert_eq!(frame, 0x4002_0000 | 0x2000_0000 | (7 << 23) | (1 << 18));
    }

    #[test]
    fn phy_maintenance_write_frame_carries_data() {
        let frame = phymntnc::frame(phymntnc::OP_WRITE, 0, 0, 0x8000);
        assert_eq!(frame & phymntnc::DATA_MASK, 0x8000);
        assert_ne!(frame & phymntnc::OP_WRITE, 0);
    }

    #[test]
    fn filter_slot_one_layout() {
        let mock = MockRegisters::new();
        let regs = GemRegs::new(&mock);
        regs.set_filter_address(1, &[0x00, 0x0A, 0x35, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(mock.get(LADDR1L_OFFSET), 0x0135_0A00);
        assert_eq!(mock.get(LADDR1H_OFFSET), 0x0000_0302);
        assert_eq!(regs.filter_address(1), Ok([0x00, 0x0A, 0x35, 0x01, 0x02, 0x03]));
    }

    #[test]
    fn filter_slot_three_offset() {
        let mock = MockRegisters::new();
        let regs = GemRegs::new(&mock);
        regs.set_filter_address(3, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(mock.get(0x098), 0x0403_0201);
        assert_eq!(mock.get(0x09C), 0x0000_0605);
    }

    #[test]
    fn filter_slot_out_of_range() {
        let mock = MockRegisters::new();
        let regs = GemRegs::new(&mock);
        assert_eq!(
            regs.set_filter_address(0, &[0; 6]),
            Err(ConfigError::InvalidFilterSlot)
        );
        assert_eq!(regs.filter_address(5), Err(ConfigError::InvalidFilterSlot));
        assert!(mock.write_log().is_empty());
    }

    #[test]
    fn start_tx_sets_bit_only() {
        let mock = MockRegisters::new();
        mock.set(NWCTRL_OFFSET, nwctrl::RXEN | nwctrl::TXEN);
        GemRegs::new(&mock).start_tx();
        assert_eq!(mock.get(NWCTRL_OFFSET), nwctrl::RXEN | nwctrl::TXEN | nwctrl::STARTTX);
    }
}
