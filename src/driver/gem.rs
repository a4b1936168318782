//! GEM device driver.
//!
//! [`Gem`] ties together the register block, the SLCR clock controller, the
//! management bus, a PHY driver and the DMA rings. Its lifecycle follows the
//! bootloader network layer:
//!
//! 1. [`one_time_init`](Gem::one_time_init) builds the rings and programs
//!    the MAC defaults (once, at registration)
//! 2. [`init`](Gem::init) establishes the link and programs speed and
//!    clocks (before the first network command; repeats are no-ops)
//! 3. [`send`](Gem::send) / [`recv`](Gem::recv) move frames
//! 4. [`halt`](Gem::halt) after every network command

use embedded_hal::delay::DelayNs;

use super::config::{GemConfig, Speed, State};
use super::error::{ConfigError, DmaError, FrameError, IoError, Result};
use super::stats::Statistics;
use super::status::{TxFaults, TxReport};
use crate::hal::clock::{ClockController, ClockState};
use crate::hal::mdio::{GemMdio, MdioBus};
use crate::internal::constants::{DMA_BUFFER_SIZE, STATION_ADDR_SLOT};
use crate::internal::dma::{DmaParts, DmaRegion, RxQueue, TxQueue};
use crate::internal::register::gem::{GemRegs, IXR_ALL_MASK, NWCFG_OFFSET, dmacr, nwcfg, rxsr, txsr};
use crate::internal::register::slcr::SLCR_BASE;
use crate::internal::register::{Mmio, RegisterBlock};
use crate::phy::{LinkStatus, PhyDriver, establish_link};

// =============================================================================
// Frame Sink
// =============================================================================

/// Consumer of received frames.
///
/// The slice is only valid for the duration of the call. Any
/// `FnMut(&[u8])` closure is a sink.
pub trait FrameSink {
    /// Accept one received frame
    fn deliver(&mut self, frame: &[u8]);
}

impl<F: FnMut(&[u8])> FrameSink for F {
    fn deliver(&mut self, frame: &[u8]) {
        self(frame);
    }
}

// =============================================================================
// GEM Driver
// =============================================================================

/// Zynq GEM Ethernet MAC driver
///
/// # Type Parameters
/// * `B` - GEM register block
/// * `C` - SLCR register block
/// * `M` - Management bus reaching the PHY
/// * `P` - PHY driver
/// * `D` - Delay provider for bounded waits
///
/// # Example
/// ```ignore
/// #[unsafe(link_section = ".uncached")]
/// static DMA: DmaRegion<8, 8> = DmaRegion::new();
///
/// let config = GemConfig::new().with_phy_address(7);
/// let mut gem = unsafe { ZynqGem::on_hardware(config, MarvellPhy::new(7), delay, &DMA) };
/// gem.one_time_init()?;
/// gem.init()?;
/// gem.send(&frame)?;
/// gem.recv(&mut |frame: &[u8]| handle(frame))?;
/// ```
pub struct Gem<'a, B, C, M, P, D> {
    regs: GemRegs<B>,
    clock: ClockController<C>,
    mdio: M,
    phy: P,
    delay: D,
    config: GemConfig,
    state: State,
    link: Option<LinkStatus>,
    dma: DmaParts<'a>,
    rx: Option<RxQueue<'a>>,
    tx: Option<TxQueue<'a>>,
    /// Receive frames are copied here before delivery
    staging: [u8; DMA_BUFFER_SIZE],
    stats: Statistics,
}

/// GEM on real hardware: memory-mapped registers and the GEM management bus
pub type ZynqGem<'a, P, D> = Gem<'a, Mmio, Mmio, GemMdio<Mmio, D>, P, D>;

impl<'a, P: PhyDriver, D: DelayNs + Clone> ZynqGem<'a, P, D> {
    /// Create a driver for the instance named in `config`.
    ///
    /// The management bus is taken from `config.mii_instance`, which may be
    /// another controller than the one carrying traffic. The bus gets its
    /// own copy of `delay` and waits for idle under `config.mdio_policy`.
    ///
    /// # Safety
    ///
    /// The caller must be running on a Zynq-7000 with the GEM and SLCR blocks
    /// mapped at their reset addresses, and must not create a second driver
    /// for the same instance.
    pub unsafe fn on_hardware<const RX: usize, const TX: usize>(
        config: GemConfig,
        phy: P,
        delay: D,
        region: &'a DmaRegion<RX, TX>,
    ) -> Self {
        // SAFETY: addresses are the fixed Zynq-7000 peripheral bases
        let (regs, slcr, mii) = unsafe {
            (
                Mmio::new(config.instance.base_address()),
                Mmio::new(SLCR_BASE),
                Mmio::new(config.mii_instance.base_address()),
            )
        };
        let mdio = GemMdio::new(mii, delay.clone()).with_idle_policy(config.mdio_policy);
        Self::new(config, regs, slcr, mdio, phy, delay, region)
    }
}

impl<'a, B, C, M, P, D> Gem<'a, B, C, M, P, D>
where
    B: RegisterBlock,
    C: RegisterBlock,
    M: MdioBus,
    P: PhyDriver,
    D: DelayNs,
{
    /// Create a driver in the `Uninitialized` state.
    ///
    /// Nothing is written to hardware until [`one_time_init`](Self::one_time_init).
    pub fn new<const RX: usize, const TX: usize>(
        config: GemConfig,
        regs: B,
        slcr: C,
        mdio: M,
        phy: P,
        delay: D,
        region: &'a DmaRegion<RX, TX>,
    ) -> Self {
        Self {
            regs: GemRegs::new(regs),
            clock: ClockController::new(slcr),
            mdio,
            phy,
            delay,
            config,
            state: State::Uninitialized,
            link: None,
            dma: region.parts(),
            rx: None,
            tx: None,
            staging: [0; DMA_BUFFER_SIZE],
            stats: Statistics::new(),
        }
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Get the current state
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Negotiated link, once [`init`](Self::init) has succeeded
    pub fn link_status(&self) -> Option<LinkStatus> {
        self.link
    }

    /// Configuration the driver was created with
    pub fn config(&self) -> &GemConfig {
        &self.config
    }

    /// Station MAC address
    pub fn mac_address(&self) -> [u8; 6] {
        self.config.mac_address
    }

    /// PHY address on the management bus
    pub fn phy_address(&self) -> u8 {
        self.phy.address()
    }

    /// Whether the PHY is exposed through the management shim
    pub fn creates_mii(&self) -> bool {
        self.config.create_mii
    }

    /// Traffic counters
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Reset the traffic counters
    pub fn clear_statistics(&mut self) {
        self.stats.clear();
    }

    /// Last transmit clock programming
    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    /// Management bus
    pub fn mdio(&self) -> &M {
        &self.mdio
    }

    /// PHY driver
    pub fn phy(&self) -> &P {
        &self.phy
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Build the DMA rings and program the MAC bring-up defaults.
    ///
    /// Programs the queue base registers, NWCFG (MDC divisor, FCS removal,
    /// gigabit, copy-all, full duplex), the station address in filter slot 1,
    /// and enables the management port. Repeated calls are no-ops.
    ///
    /// # Errors
    /// - `InvalidConfig` - ring size zero or above the region capacity
    pub fn one_time_init(&mut self) -> Result<()> {
        if self.state != State::Uninitialized {
            return Ok(());
        }

        let rx = RxQueue::create(
            self.dma.rx_descriptors,
            self.dma.rx_buffers,
            self.config.rx_descriptors,
            &self.regs,
        )?;
        let tx = TxQueue::create(
            self.dma.tx_descriptors,
            self.dma.tx_buffers,
            self.config.tx_descriptors,
            &self.regs,
        )?;

        self.regs.set_net_config(nwcfg::BRINGUP);
        self.regs.enable_mdio();
        self.regs
            .set_filter_address(STATION_ADDR_SLOT, &self.config.mac_address)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("GEM: rings created ({} rx, {} tx)", rx.len(), tx.len());
        #[cfg(feature = "log")]
        log::debug!("GEM: rings created ({} rx, {} tx)", rx.len(), tx.len());

        self.rx = Some(rx);
        self.tx = Some(tx);
        self.state = State::Configured;

        #[cfg(feature = "defmt")]
        defmt::info!("GEM: one-time init done");
        #[cfg(feature = "log")]
        log::info!("GEM: one-time init done");

        Ok(())
    }

    /// Establish the link and program the MAC for it.
    ///
    /// Enables the DMA, masks every interrupt, enables the receiver and
    /// transmitter, identifies the PHY, runs link establishment, then
    /// programs the NWCFG speed bits and the SLCR transmit clock. Once the
    /// device is `Running`, further calls return the existing link without
    /// touching hardware.
    ///
    /// # Errors
    /// - `NotConfigured` - [`one_time_init`](Self::one_time_init) has not run
    /// - `ResetTimeout`, `AutoNegotiationTimeout`, `LinkDown` - link failed;
    ///   the speed and clock registers are left untouched and `init` may be
    ///   retried
    /// - `ManagementBusTimeout` - the management bus stayed busy
    pub fn init(&mut self) -> Result<LinkStatus> {
        match (self.state, self.link) {
            (State::Uninitialized, _) => return Err(ConfigError::NotConfigured.into()),
            (State::Running, Some(link)) => return Ok(link),
            _ => {}
        }

        self.regs.set_dma_config(dmacr::DEFAULT);
        self.regs.set_interrupt_disable(IXR_ALL_MASK);
        self.regs.enable_rx_tx();

        let id = self.phy.phy_id(&mut self.mdio)?;
        #[cfg(feature = "defmt")]
        defmt::info!("GEM: PHY {} id {:#010x}", self.phy.address(), id);
        #[cfg(feature = "log")]
        log::info!("GEM: PHY {} id {:#010x}", self.phy.address(), id);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        let _ = id;

        let link = establish_link(&mut self.mdio, &mut self.phy, &mut self.delay, &self.config)?;

        self.program_speed(link.speed);
        self.clock.configure(
            self.config.instance,
            self.config.clock_routing,
            &self.config.clock_table,
            link.speed,
        );

        self.link = Some(link);
        self.state = State::Running;

        #[cfg(feature = "defmt")]
        defmt::info!("GEM: link up at {} Mbps", link.speed.as_mbps());
        #[cfg(feature = "log")]
        log::info!("GEM: link up at {} Mbps", link.speed.as_mbps());

        Ok(link)
    }

    /// Program NWCFG speed bits: SPEED for 100 and 1000, GIGE for 1000 only
    fn program_speed(&self, speed: Speed) {
        self.regs.bus().modify(NWCFG_OFFSET, |cfg| match speed {
            Speed::Mbps10 => cfg & !(nwcfg::SPEED | nwcfg::GIGE),
            Speed::Mbps100 => (cfg | nwcfg::SPEED) & !nwcfg::GIGE,
            Speed::Mbps1000 => cfg | nwcfg::SPEED | nwcfg::GIGE,
        });
    }

    /// Stop using the device after a network command.
    ///
    /// Link state, rings and MAC programming are kept, so the next
    /// [`init`](Self::init) returns immediately.
    pub fn halt(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("GEM: halt");
        #[cfg(feature = "log")]
        log::debug!("GEM: halt");
    }

    // =========================================================================
    // TX / RX Operations
    // =========================================================================

    /// Transmit one frame and wait for completion.
    ///
    /// Descriptors left with hardware by an earlier timed-out send are
    /// reclaimed first. The Transmit Status register is polled under
    /// `config.tx_policy`; error bits are reported in the returned
    /// [`TxReport`] without aborting. The observed status bits are written
    /// back on every exit path.
    ///
    /// # Errors
    /// - `DeviceNotReady` - [`init`](Self::init) has not succeeded
    /// - `InvalidLength` - empty frame
    /// - `FrameTooLarge` - frame exceeds a DMA buffer
    /// - `RingExhausted` - every descriptor is still with hardware
    /// - `TxTimeout` - completion not observed; the descriptor stays with
    ///   hardware until a later send reclaims it
    /// - `RingConsistency` - hardware completed a descriptor other than the
    ///   committed one
    pub fn send(&mut self, frame: &[u8]) -> Result<TxReport> {
        if self.state != State::Running {
            return Err(IoError::DeviceNotReady.into());
        }
        if frame.is_empty() {
            return Err(DmaError::InvalidLength.into());
        }
        if frame.len() > DMA_BUFFER_SIZE {
            return Err(DmaError::FrameTooLarge.into());
        }
        let Some(tx) = self.tx.as_mut() else {
            return Err(ConfigError::NotConfigured.into());
        };

        tx.reclaim();
        let index = tx.stage(frame)?;
        self.regs.start_tx();

        let regs = &self.regs;
        let mut observed = 0u32;
        let polled = self.config.tx_policy.poll(&mut self.delay, || {
            observed |= regs.tx_status();
            Ok(observed & txsr::TXCOMPL != 0)
        });

        let faults = TxFaults::from_status(observed);
        let outcome = match polled {
            Ok(true) => tx.complete(index).map(|()| TxReport {
                length: frame.len(),
                faults,
            }),
            Ok(false) => Err(IoError::TxTimeout.into()),
            Err(e) => Err(e),
        };
        self.regs.set_tx_status(observed);

        if !faults.is_empty() {
            self.stats.tx_hardware_faults = self.stats.tx_hardware_faults.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("GEM: TX fault, status {:#010x}", observed);
            #[cfg(feature = "log")]
            log::warn!("GEM: TX fault, status {observed:#010x}");
        }

        match &outcome {
            Ok(report) => self.stats.record_tx(report.length),
            Err(e) if e.is_timeout() => {
                self.stats.tx_timeouts = self.stats.tx_timeouts.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("GEM: TX completion timed out");
                #[cfg(feature = "log")]
                log::warn!("GEM: TX completion timed out");
            }
            Err(_) => {}
        }
        outcome
    }

    /// Drain received frames into `sink`.
    ///
    /// Only runs when the Receive Status register reports a received frame,
    /// and inspects at most one lap of the ring. Malformed descriptors are
    /// logged, counted and recycled; processing continues past them. The
    /// observed status bits are written back.
    ///
    /// Returns the number of frames delivered.
    ///
    /// # Errors
    /// - `DeviceNotReady` - [`init`](Self::init) has not succeeded
    pub fn recv<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize> {
        if self.state != State::Running {
            return Err(IoError::DeviceNotReady.into());
        }
        let Some(rx) = self.rx.as_mut() else {
            return Err(ConfigError::NotConfigured.into());
        };

        let status = self.regs.rx_status();
        let mut delivered = 0;
        if status & rxsr::FRAMERX != 0 {
            for _ in 0..rx.len() {
                match rx.process_next(&mut self.staging) {
                    None => break,
                    Some(Ok(len)) => {
                        sink.deliver(&self.staging[..len]);
                        self.stats.record_rx(len);
                        delivered += 1;
                    }
                    Some(Err(e)) => report_violation(&mut self.stats, e),
                }
            }
        }
        self.regs.set_rx_status(status);

        Ok(delivered)
    }

    /// Copy the next received frame into `buffer`.
    ///
    /// Pull-style counterpart of [`recv`](Self::recv) that does not consult
    /// the Receive Status register. Malformed descriptors are skipped as in
    /// `recv`.
    ///
    /// # Errors
    /// - `DeviceNotReady` - [`init`](Self::init) has not succeeded
    /// - `FrameTooLarge` - `buffer` is shorter than the frame; the frame is
    ///   dropped
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<Option<usize>> {
        if self.state != State::Running {
            return Err(IoError::DeviceNotReady.into());
        }
        let Some(rx) = self.rx.as_mut() else {
            return Err(ConfigError::NotConfigured.into());
        };

        for _ in 0..rx.len() {
            match rx.process_next(&mut self.staging) {
                None => return Ok(None),
                Some(Ok(len)) => {
                    let Some(dst) = buffer.get_mut(..len) else {
                        return Err(DmaError::FrameTooLarge.into());
                    };
                    dst.copy_from_slice(&self.staging[..len]);
                    self.stats.record_rx(len);
                    return Ok(Some(len));
                }
                Some(Err(e)) => report_violation(&mut self.stats, e),
            }
        }
        Ok(None)
    }

    /// Check if hardware has handed a receive descriptor to software
    pub fn rx_available(&self) -> bool {
        self.rx.as_ref().is_some_and(RxQueue::is_ready)
    }

    /// Free transmit descriptors
    pub fn tx_free(&self) -> usize {
        self.tx.as_ref().map_or(0, TxQueue::free_count)
    }

    // =========================================================================
    // Address and Management Bus
    // =========================================================================

    /// Program the station address into specific-address filter slot 1
    pub fn write_hwaddr(&mut self, addr: &[u8; 6]) -> Result<()> {
        self.regs.set_filter_address(STATION_ADDR_SLOT, addr)?;
        self.config.mac_address = *addr;

        #[cfg(feature = "defmt")]
        defmt::debug!("GEM: filter slot {} programmed", STATION_ADDR_SLOT);
        #[cfg(feature = "log")]
        log::debug!("GEM: filter slot {STATION_ADDR_SLOT} programmed");

        Ok(())
    }

    /// Read a PHY register through the management bus
    pub fn mii_read(&mut self, phy_addr: u8, reg: u8) -> Result<u16> {
        self.mdio.read(phy_addr, reg)
    }

    /// Write a PHY register through the management bus
    pub fn mii_write(&mut self, phy_addr: u8, reg: u8, value: u16) -> Result<()> {
        self.mdio.write(phy_addr, reg, value)
    }
}

/// Log and count one rejected receive descriptor
fn report_violation(stats: &mut Statistics, e: FrameError) {
    stats.rx_protocol_violations = stats.rx_protocol_violations.wrapping_add(1);
    #[cfg(feature = "defmt")]
    defmt::warn!("GEM: RX descriptor rejected: {}", e);
    #[cfg(feature = "log")]
    log::warn!("GEM: RX descriptor rejected: {e}");
    #[cfg(not(any(feature = "defmt", feature = "log")))]
    let _ = e;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::RetryPolicy;
    use crate::driver::error::{Error, LinkError};
    use crate::hal::clock::ClockTable;
    use crate::internal::dma::descriptor::bits::rx_word1;
    use crate::internal::register::gem::{
        DMACR_OFFSET, IDR_OFFSET, LADDR1H_OFFSET, LADDR1L_OFFSET, NWCTRL_OFFSET,
        RXSR_OFFSET, TXSR_OFFSET, nwctrl,
    };
    use crate::internal::phy_regs::standard::stat1000;
    use crate::internal::register::slcr::GEM0_CLK_CTRL_OFFSET;
    use crate::phy::{GenericPhy, bmsr, phy_reg};
    use crate::testing::{
        MockDelay, MockMdioBus, MockRegisters, RecordingSink, complete_tx_on_start, leak_region,
        simulate_rx, simulate_rx_status,
    };

    type TestGem<'a> =
        Gem<'a, &'a MockRegisters, &'a MockRegisters, MockMdioBus, GenericPhy, MockDelay>;

    struct Bench {
        gem: MockRegisters,
        slcr: MockRegisters,
        region: &'static DmaRegion<4, 4>,
    }

    fn test_config() -> GemConfig {
        GemConfig::new()
            .with_descriptors(4, 4)
            .with_reset_policy(RetryPolicy::new(3, 10_000))
            .with_autoneg_policy(RetryPolicy::new(3, 10_000))
            .with_tx_policy(RetryPolicy::new(20, 1))
    }

    impl Bench {
        fn new() -> Self {
            let gem = MockRegisters::new();
            gem.write_one_to_clear(TXSR_OFFSET);
            gem.write_one_to_clear(RXSR_OFFSET);
            Self {
                gem,
                slcr: MockRegisters::new(),
                region: leak_region(),
            }
        }

        fn device(&self) -> TestGem<'_> {
            let mdio = MockMdioBus::new();
            mdio.simulate_link_up_100_fd(0);
            self.device_with(mdio, test_config())
        }

        fn device_with(&self, mdio: MockMdioBus, config: GemConfig) -> TestGem<'_> {
            Gem::new(
                config,
                &self.gem,
                &self.slcr,
                mdio,
                GenericPhy::new(0),
                MockDelay::new(),
                self.region,
            )
        }

        fn running(&self) -> TestGem<'_> {
            let mut gem = self.device();
            gem.one_time_init().unwrap();
            gem.init().unwrap();
            gem
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    #[test]
    fn new_device_is_uninitialized_and_untouched() {
        let bench = Bench::new();
        let gem = bench.device();
        assert_eq!(gem.state(), State::Uninitialized);
        assert!(bench.gem.write_log().is_empty());
        assert!(!gem.rx_available());
        assert_eq!(gem.tx_free(), 0);
    }

    #[test]
    fn init_before_one_time_init_is_rejected() {
        let bench = Bench::new();
        let mut gem = bench.device();
        assert_eq!(gem.init(), Err(Error::Config(ConfigError::NotConfigured)));
        assert!(gem.mdio().get_writes().is_empty());
    }

    #[test]
    fn one_time_init_programs_bringup_defaults() {
        let bench = Bench::new();
        let mut gem = bench.device();
        gem.one_time_init().unwrap();

        assert_eq!(gem.state(), State::Configured);
        assert_eq!(bench.gem.get(NWCFG_OFFSET), nwcfg::BRINGUP);
        assert_ne!(bench.gem.get(NWCTRL_OFFSET) & nwctrl::MDEN, 0);
        assert_eq!(bench.gem.get(LADDR1L_OFFSET), 0x0000_0002);
        assert_eq!(bench.gem.get(LADDR1H_OFFSET), 0x0000_0100);
        assert_eq!(gem.tx_free(), 4);

        let writes = bench.gem.write_log().len();
        gem.one_time_init().unwrap();
        assert_eq!(bench.gem.write_log().len(), writes);
    }

    #[test]
    fn one_time_init_rejects_oversized_ring() {
        let bench = Bench::new();
        let mdio = MockMdioBus::new();
        let mut gem = Gem::new(
            GemConfig::new().with_descriptors(5, 4),
            &bench.gem,
            &bench.slcr,
            mdio,
            GenericPhy::new(0),
            MockDelay::new(),
            bench.region,
        );
        assert_eq!(gem.one_time_init(), Err(Error::Config(ConfigError::InvalidConfig)));
        assert_eq!(gem.state(), State::Uninitialized);
    }

    #[test]
    fn init_brings_link_up_at_100() {
        let bench = Bench::new();
        let mut gem = bench.device();
        gem.one_time_init().unwrap();

        let link = gem.init().unwrap();
        assert_eq!(link, LinkStatus::fast_full());
        assert_eq!(gem.state(), State::Running);
        assert_eq!(gem.link_status(), Some(link));

        assert_eq!(bench.gem.get(DMACR_OFFSET), dmacr::DEFAULT);
        assert_eq!(bench.gem.get(IDR_OFFSET), IXR_ALL_MASK);
        let ctrl = bench.gem.get(NWCTRL_OFFSET);
        assert_ne!(ctrl & nwctrl::RXEN, 0);
        assert_ne!(ctrl & nwctrl::TXEN, 0);

        let cfg = bench.gem.get(NWCFG_OFFSET);
        assert_ne!(cfg & nwcfg::SPEED, 0);
        assert_eq!(cfg & nwcfg::GIGE, 0);
        assert_eq!(
            bench.slcr.get(GEM0_CLK_CTRL_OFFSET),
            ClockTable::IO_PLL_1000MHZ.fast.encode()
        );
        assert_eq!(gem.clock_state(), ClockState::Configured(Speed::Mbps100));
    }

    #[test]
    fn init_at_gigabit_sets_gige() {
        let bench = Bench::new();
        let mdio = MockMdioBus::new();
        mdio.simulate_link_up_100_fd(0);
        mdio.set_register(0, phy_reg::STAT1000, stat1000::LPA_1000_FD);
        let mut gem = bench.device_with(mdio, test_config().with_advertise_gigabit(true));
        gem.one_time_init().unwrap();

        assert_eq!(gem.init().unwrap().speed, Speed::Mbps1000);
        let cfg = bench.gem.get(NWCFG_OFFSET);
        assert_ne!(cfg & nwcfg::SPEED, 0);
        assert_ne!(cfg & nwcfg::GIGE, 0);
    }

    #[test]
    fn init_twice_programs_hardware_once() {
        let bench = Bench::new();
        let mut gem = bench.running();

        let reg_writes = bench.gem.write_log().len();
        let slcr_writes = bench.slcr.write_log().len();
        let phy_writes = gem.mdio().get_writes().len();

        assert_eq!(gem.init(), Ok(LinkStatus::fast_full()));
        assert_eq!(bench.gem.write_log().len(), reg_writes);
        assert_eq!(bench.slcr.write_log().len(), slcr_writes);
        assert_eq!(gem.mdio().get_writes().len(), phy_writes);
    }

    #[test]
    fn link_down_leaves_speed_and_clock_unprogrammed() {
        let bench = Bench::new();
        let mdio = MockMdioBus::new();
        mdio.set_register(0, phy_reg::BMSR, bmsr::AN_COMPLETE);
        let mut gem = bench.device_with(mdio, test_config());
        gem.one_time_init().unwrap();

        assert_eq!(gem.init(), Err(Error::Link(LinkError::LinkDown)));
        assert_eq!(gem.state(), State::Configured);
        assert_eq!(gem.link_status(), None);
        assert_eq!(bench.gem.get(NWCFG_OFFSET), nwcfg::BRINGUP);
        assert!(bench.slcr.write_log().is_empty());
        assert_eq!(gem.send(&[0; 64]), Err(Error::Io(IoError::DeviceNotReady)));
    }

    #[test]
    fn halt_keeps_link() {
        let bench = Bench::new();
        let mut gem = bench.running();
        gem.halt();
        assert_eq!(gem.state(), State::Running);
        assert_eq!(gem.link_status(), Some(LinkStatus::fast_full()));
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    #[test]
    fn send_completes_and_clears_status() {
        let bench = Bench::new();
        let mut gem = bench.running();
        complete_tx_on_start(&bench.gem, bench.region.parts().tx_descriptors, 0);

        let report = gem.send(&[0xA5; 64]).unwrap();
        assert_eq!(report.length, 64);
        assert!(report.faults.is_empty());
        assert_eq!(gem.tx_free(), 4);
        assert_eq!(gem.statistics().tx_frames, 1);
        assert_eq!(gem.statistics().tx_bytes, 64);
        assert_eq!(bench.gem.write_log().last(), Some(&(TXSR_OFFSET, txsr::TXCOMPL)));
        assert_eq!(bench.gem.get(TXSR_OFFSET), 0);
    }

    #[test]
    fn send_many_cycles_ring() {
        let bench = Bench::new();
        let mut gem = bench.running();
        complete_tx_on_start(&bench.gem, bench.region.parts().tx_descriptors, 0);

        for i in 0..10 {
            gem.send(&[i; 100]).unwrap();
        }
        assert_eq!(gem.tx_free(), 4);
        assert_eq!(gem.statistics().tx_frames, 10);
    }

    #[test]
    fn send_reports_faults_without_aborting() {
        let bench = Bench::new();
        let mut gem = bench.running();
        complete_tx_on_start(&bench.gem, bench.region.parts().tx_descriptors, txsr::URUN);

        let report = gem.send(&[1; 60]).unwrap();
        assert!(report.faults.underrun);
        assert!(!report.faults.hresp_not_ok);
        assert_eq!(gem.statistics().tx_hardware_faults, 1);
        assert_eq!(gem.statistics().tx_frames, 1);
        assert_eq!(
            bench.gem.write_log().last(),
            Some(&(TXSR_OFFSET, txsr::TXCOMPL | txsr::URUN))
        );
    }

    #[test]
    fn send_timeout_keeps_descriptor_until_reclaimed() {
        let bench = Bench::new();
        let mut gem = bench.running();

        assert_eq!(gem.send(&[2; 60]), Err(Error::Io(IoError::TxTimeout)));
        assert_eq!(gem.statistics().tx_timeouts, 1);
        assert_eq!(gem.tx_free(), 3);
        assert!(!bench.region.parts().tx_descriptors[0].is_used());

        // Hardware finishes the stalled frame and everything after it
        complete_tx_on_start(&bench.gem, bench.region.parts().tx_descriptors, 0);
        gem.send(&[3; 60]).unwrap();
        assert_eq!(gem.tx_free(), 4);
    }

    #[test]
    fn send_backpressure_when_ring_full() {
        let bench = Bench::new();
        let mut gem = bench.running();
        for _ in 0..4 {
            assert_eq!(gem.send(&[0; 60]), Err(Error::Io(IoError::TxTimeout)));
        }
        let err = gem.send(&[0; 60]).unwrap_err();
        assert_eq!(err, Error::Dma(DmaError::RingExhausted));
        assert!(err.is_backpressure());
    }

    #[test]
    fn send_rejects_bad_lengths() {
        let bench = Bench::new();
        let mut gem = bench.running();
        assert_eq!(gem.send(&[]), Err(Error::Dma(DmaError::InvalidLength)));
        assert_eq!(
            gem.send(&[0; DMA_BUFFER_SIZE + 1]),
            Err(Error::Dma(DmaError::FrameTooLarge))
        );
        assert_eq!(gem.tx_free(), 4);
    }

    // =========================================================================
    // Receive
    // =========================================================================

    fn deposit(region: &DmaRegion<4, 4>, slot: usize, payload: &[u8]) {
        let parts = region.parts();
        simulate_rx(&parts.rx_descriptors[slot], &parts.rx_buffers[slot], payload);
    }

    #[test]
    fn recv_delivers_valid_frames_and_rejects_zero_length() {
        let bench = Bench::new();
        let mut gem = bench.running();
        let parts = bench.region.parts();

        deposit(bench.region, 0, &[0x11; 64]);
        deposit(bench.region, 1, &[0x22; 1500]);
        simulate_rx_status(&parts.rx_descriptors[2], rx_word1::SOF | rx_word1::EOF);
        deposit(bench.region, 3, &[0x44; 128]);
        bench.gem.set(RXSR_OFFSET, rxsr::FRAMERX);

        let mut sink = RecordingSink::new();
        assert_eq!(gem.recv(&mut sink), Ok(3));
        assert_eq!(sink.lengths(), std::vec![64, 1500, 128]);
        assert!(sink.frames()[1].iter().all(|&b| b == 0x22));
        assert_eq!(gem.statistics().rx_protocol_violations, 1);
        assert_eq!(gem.statistics().rx_frames, 3);
        assert!(parts.rx_descriptors.iter().all(|d| !d.is_new()));
        assert_eq!(bench.gem.get(RXSR_OFFSET), 0);

        // Cursor wrapped back to slot 0
        deposit(bench.region, 0, &[0x55; 42]);
        bench.gem.set(RXSR_OFFSET, rxsr::FRAMERX);
        let mut sink = RecordingSink::new();
        assert_eq!(gem.recv(&mut sink), Ok(1));
        assert_eq!(sink.lengths(), std::vec![42]);
    }

    #[test]
    fn recv_without_framerx_does_nothing() {
        let bench = Bench::new();
        let mut gem = bench.running();
        deposit(bench.region, 0, &[1; 64]);

        let mut sink = RecordingSink::new();
        assert_eq!(gem.recv(&mut sink), Ok(0));
        assert!(sink.frames().is_empty());
        assert!(gem.rx_available());
    }

    #[test]
    fn recv_visits_at_most_one_lap() {
        let bench = Bench::new();
        let mut gem = bench.running();
        for slot in 0..4 {
            deposit(bench.region, slot, &[slot as u8; 32]);
        }
        bench.gem.set(RXSR_OFFSET, rxsr::FRAMERX);

        // Hardware refills every slot as soon as it is released
        let region = bench.region;
        let mut seen = 0usize;
        let delivered = gem
            .recv(&mut |_: &[u8]| {
                deposit(region, seen % 4, &[0xEE; 32]);
                seen += 1;
            })
            .unwrap();
        assert_eq!(delivered, 4);
        assert_eq!(seen, 4);
        assert!(gem.rx_available());
    }

    #[test]
    fn recv_requires_running() {
        let bench = Bench::new();
        let mut gem = bench.device();
        gem.one_time_init().unwrap();
        let mut sink = RecordingSink::new();
        assert_eq!(gem.recv(&mut sink), Err(Error::Io(IoError::DeviceNotReady)));
    }

    #[test]
    fn receive_copies_next_frame() {
        let bench = Bench::new();
        let mut gem = bench.running();
        deposit(bench.region, 0, &[0x77; 90]);

        assert!(gem.rx_available());
        let mut buf = [0u8; 1600];
        assert_eq!(gem.receive(&mut buf), Ok(Some(90)));
        assert!(buf[..90].iter().all(|&b| b == 0x77));
        assert_eq!(gem.receive(&mut buf), Ok(None));
        assert!(!gem.rx_available());
    }

    #[test]
    fn receive_into_short_buffer_drops_frame() {
        let bench = Bench::new();
        let mut gem = bench.running();
        deposit(bench.region, 0, &[0x77; 90]);

        let mut small = [0u8; 32];
        assert_eq!(gem.receive(&mut small), Err(Error::Dma(DmaError::FrameTooLarge)));
        assert!(!gem.rx_available());
        assert_eq!(gem.statistics().rx_frames, 0);
    }

    // =========================================================================
    // Address and Management Bus
    // =========================================================================

    #[test]
    fn write_hwaddr_programs_slot_one() {
        let bench = Bench::new();
        let mut gem = bench.device();
        let mac = [0x00, 0x0A, 0x35, 0x01, 0x02, 0x03];
        gem.write_hwaddr(&mac).unwrap();

        assert_eq!(bench.gem.get(LADDR1L_OFFSET), 0x0135_0A00);
        assert_eq!(bench.gem.get(LADDR1H_OFFSET), 0x0000_0302);
        assert_eq!(gem.mac_address(), mac);
    }

    #[test]
    fn mii_access_passes_through() {
        let bench = Bench::new();
        let mut gem = bench.device();
        gem.mii_write(5, phy_reg::ANAR, 0x01E1).unwrap();
        assert_eq!(gem.mii_read(5, phy_reg::ANAR), Ok(0x01E1));
        assert_eq!(gem.phy_address(), 0);
        assert!(gem.creates_mii());
    }
}
