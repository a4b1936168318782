//! Testing utilities and mock implementations
//!
//! Mock register blocks, management bus and delay for exercising the driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

use core::cell::{Cell, RefCell};
use std::boxed::Box;
use std::collections::{HashMap, HashSet};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::driver::error::Result;
use crate::driver::gem::FrameSink;
use crate::hal::mdio::MdioBus;
use crate::internal::dma::descriptor::Descriptor;
use crate::internal::dma::descriptor::bits::{rx_word0, rx_word1};
use crate::internal::dma::{DmaBuffer, DmaRegion, RxDescriptor, TxDescriptor};
use crate::internal::phy_regs::standard::{anar, anlpar, bmcr, bmsr, phy_reg};
use crate::internal::register::RegisterBlock;
use crate::internal::register::gem::{NWCTRL_OFFSET, TXSR_OFFSET, nwctrl, txsr};

// =============================================================================
// Mock Register Block
// =============================================================================

type WriteHook = Box<dyn Fn(&MockRegisters, u32)>;

/// In-memory register block
///
/// Registers read as zero until set. Every write through [`RegisterBlock`]
/// is logged; [`set`](Self::set) stores silently, the way hardware updates
/// its own status bits.
///
/// # Example
///
/// ```ignore
/// let mock = MockRegisters::new();
/// mock.set(NWSR_OFFSET, nwsr::MDIO_IDLE);
/// let regs = GemRegs::new(&mock);
/// regs.enable_mdio();
/// assert_eq!(mock.writes_to(NWCTRL_OFFSET), 1);
/// ```
#[derive(Default)]
pub struct MockRegisters {
    values: RefCell<HashMap<usize, u32>>,
    log: RefCell<Vec<(usize, u32)>>,
    hooks: RefCell<Vec<(usize, WriteHook)>>,
    w1c: RefCell<HashSet<usize>>,
    /// (offset, reads remaining, value stored once they have happened)
    pending: RefCell<Vec<(usize, usize, u32)>>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value without logging it
    pub fn set(&self, offset: usize, value: u32) {
        self.values.borrow_mut().insert(offset, value);
    }

    /// Current value of a register
    pub fn get(&self, offset: usize) -> u32 {
        self.values.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// Every logged write, oldest first
    pub fn write_log(&self) -> Vec<(usize, u32)> {
        self.log.borrow().clone()
    }

    /// Number of logged writes to one register
    pub fn writes_to(&self, offset: usize) -> usize {
        self.log.borrow().iter().filter(|(o, _)| *o == offset).count()
    }

    /// Treat writes to `offset` as write-1-to-clear
    pub fn write_one_to_clear(&self, offset: usize) {
        self.w1c.borrow_mut().insert(offset);
    }

    /// Store `value` at `offset` once the register has been read `reads`
    /// times, like a status bit hardware sets after a while
    pub fn set_after_reads(&self, offset: usize, reads: usize, value: u32) {
        self.pending.borrow_mut().push((offset, reads, value));
    }

    /// Run `hook` after every write to `offset`
    pub fn on_write<F>(&self, offset: usize, hook: F)
    where
        F: Fn(&MockRegisters, u32) + 'static,
    {
        self.hooks.borrow_mut().push((offset, Box::new(hook)));
    }
}

impl RegisterBlock for MockRegisters {
    fn read(&self, offset: usize) -> u32 {
        let value = self.get(offset);
        let mut pending = self.pending.borrow_mut();
        for entry in pending.iter_mut().filter(|e| e.0 == offset) {
            entry.1 = entry.1.saturating_sub(1);
            if entry.1 == 0 {
                self.set(offset, entry.2);
            }
        }
        pending.retain(|e| e.1 > 0);
        value
    }

    fn write(&self, offset: usize, value: u32) {
        self.log.borrow_mut().push((offset, value));
        if self.w1c.borrow().contains(&offset) {
            let current = self.get(offset);
            self.set(offset, current & !value);
        } else {
            self.set(offset, value);
        }

        let hooks = self.hooks.borrow();
        for (_, hook) in hooks.iter().filter(|(o, _)| *o == offset) {
            hook(self, value);
        }
    }
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

/// Mock management bus for testing PHY drivers without hardware
///
/// Unset registers read as zero. A BMCR reset stays set for the number of
/// reads configured with [`set_reset_latency`](Self::set_reset_latency),
/// then self-clears.
///
/// # Example
///
/// ```ignore
/// let mut mdio = MockMdioBus::new();
/// mdio.simulate_link_up_100_fd(0);
///
/// let phy = GenericPhy::new(0);
/// assert!(phy.is_link_up(&mut mdio).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MockMdioBus {
    /// Register values: (phy_addr, reg_addr) -> value
    registers: RefCell<HashMap<(u8, u8), u16>>,
    /// Record of writes: (phy_addr, reg_addr, value)
    write_log: RefCell<Vec<(u8, u8, u16)>>,
    read_counts: RefCell<HashMap<(u8, u8), usize>>,
    busy: Cell<bool>,
    /// BMCR reads that still see RESET after a reset write
    reset_latency: Cell<u32>,
    reset_remaining: RefCell<HashMap<u8, u32>>,
}

impl MockMdioBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register value
    pub fn set_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);
    }

    /// Get the current value of a register (for test verification)
    pub fn get_register(&self, phy_addr: u8, reg_addr: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy_addr, reg_addr)).copied()
    }

    /// Get all writes that have been made
    pub fn get_writes(&self) -> Vec<(u8, u8, u16)> {
        self.write_log.borrow().clone()
    }

    /// Clear the write log
    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
    }

    /// Number of reads of one register
    pub fn read_count(&self, phy_addr: u8, reg_addr: u8) -> usize {
        self.read_counts
            .borrow()
            .get(&(phy_addr, reg_addr))
            .copied()
            .unwrap_or(0)
    }

    /// Set the busy flag
    pub fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    /// Reads of BMCR that still report RESET after a reset is written.
    ///
    /// `u32::MAX` means the reset never completes.
    pub fn set_reset_latency(&self, reads: u32) {
        self.reset_latency.set(reads);
    }

    /// Populate both identifier registers
    pub fn set_phy_id(&self, phy_addr: u8, id: u32) {
        self.set_register(phy_addr, phy_reg::PHYIDR1, (id >> 16) as u16);
        self.set_register(phy_addr, phy_reg::PHYIDR2, id as u16);
    }

    /// Simulate auto-negotiation completing at 100 Mbps full duplex
    pub fn simulate_link_up_100_fd(&self, phy_addr: u8) {
        let bmsr_val = self.get_register(phy_addr, phy_reg::BMSR).unwrap_or(0);
        self.set_register(
            phy_addr,
            phy_reg::BMSR,
            bmsr_val | bmsr::LINK_STATUS | bmsr::AN_COMPLETE,
        );
        self.set_register(phy_addr, phy_reg::ANAR, anar::TX_FD | anar::T10_FD);
        self.set_register(
            phy_addr,
            phy_reg::ANLPAR,
            anlpar::CAN_100_FD | anlpar::CAN_10_FD,
        );
    }

    /// Simulate cable unplugged
    pub fn simulate_link_down(&self, phy_addr: u8) {
        let bmsr_val = self.get_register(phy_addr, phy_reg::BMSR).unwrap_or(0);
        self.set_register(phy_addr, phy_reg::BMSR, bmsr_val & !bmsr::LINK_STATUS);
    }

    fn read_bmcr(&self, phy_addr: u8) -> u16 {
        let value = self.get_register(phy_addr, phy_reg::BMCR).unwrap_or(0);
        if value & bmcr::RESET == 0 {
            return value;
        }

        let mut remaining = self.reset_remaining.borrow_mut();
        let left = remaining.entry(phy_addr).or_insert(0);
        if *left == 0 {
            let cleared = value & !bmcr::RESET;
            self.set_register(phy_addr, phy_reg::BMCR, cleared);
            cleared
        } else {
            if *left != u32::MAX {
                *left -= 1;
            }
            value
        }
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        *self
            .read_counts
            .borrow_mut()
            .entry((phy_addr, reg_addr))
            .or_insert(0) += 1;

        if reg_addr == phy_reg::BMCR {
            return Ok(self.read_bmcr(phy_addr));
        }
        Ok(self.get_register(phy_addr, reg_addr).unwrap_or(0))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.write_log
            .borrow_mut()
            .push((phy_addr, reg_addr, value));

        if reg_addr == phy_reg::BMCR && value & bmcr::RESET != 0 {
            let latency = self.reset_latency.get();
            if latency == 0 {
                self.set_register(phy_addr, reg_addr, value & !bmcr::RESET);
            } else {
                self.reset_remaining.borrow_mut().insert(phy_addr, latency);
                self.set_register(phy_addr, reg_addr, value);
            }
            return Ok(());
        }

        self.set_register(phy_addr, reg_addr, value);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Delay that only accumulates the requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: RefCell<u64>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nanoseconds requested
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Total microseconds requested
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        *self.total_ns.borrow_mut() += u64::from(us) * 1_000;
    }
}

// =============================================================================
// Frame Sink
// =============================================================================

/// Sink keeping a copy of every delivered frame
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<Vec<u8>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.frames.iter().map(Vec::len).collect()
    }
}

impl FrameSink for RecordingSink {
    fn deliver(&mut self, frame: &[u8]) {
        self.frames.push(frame.to_vec());
    }
}

// =============================================================================
// DMA Simulation
// =============================================================================

/// Leak a zeroed region so rings can borrow it for `'static`
pub fn leak_region<const RX: usize, const TX: usize>() -> &'static DmaRegion<RX, TX> {
    Box::leak(Box::new(DmaRegion::new()))
}

/// Hardware writes a single-buffer frame into `buffer` and hands the slot
/// to software
pub fn simulate_rx(desc: &RxDescriptor, buffer: &DmaBuffer, payload: &[u8]) {
    let len = buffer.write_from(payload) as u32;
    simulate_rx_status(
        desc,
        rx_word1::SOF | rx_word1::EOF | (len & rx_word1::LENGTH_MASK),
    );
}

/// Hardware hands the slot to software with an arbitrary status word
pub fn simulate_rx_status(desc: &RxDescriptor, status: u32) {
    desc.set_status(status);
    desc.set_raw_addr(desc.raw_addr() | rx_word0::NEW);
}

/// Hardware finished with a TX descriptor
pub fn simulate_tx_done(desc: &TxDescriptor) {
    desc.set_used();
}

/// Complete every committed TX descriptor whenever transmission is started.
///
/// Sets USED on each hardware-owned descriptor, reports TXCOMPL plus
/// `extra_status` in TXSR, and drops the self-clearing STARTTX bit.
pub fn complete_tx_on_start(
    regs: &MockRegisters,
    descriptors: &'static [TxDescriptor],
    extra_status: u32,
) {
    regs.on_write(NWCTRL_OFFSET, move |regs, value| {
        if value & nwctrl::STARTTX == 0 {
            return;
        }
        for desc in descriptors.iter().filter(|d| !d.is_used()) {
            desc.set_used();
        }
        regs.set(TXSR_OFFSET, regs.get(TXSR_OFFSET) | txsr::TXCOMPL | extra_status);
        regs.set(NWCTRL_OFFSET, value & !nwctrl::STARTTX);
    });
}
