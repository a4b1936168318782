//! Configuration types for the Zynq GEM driver

use embedded_hal::delay::DelayNs;

use super::error::Result;
use crate::hal::clock::{ClockRouting, ClockTable};
use crate::internal::constants::{
    AUTONEG_ATTEMPTS, DEFAULT_MAC_ADDR, DEFAULT_RX_DESCRIPTORS, DEFAULT_TX_DESCRIPTORS,
    MDIO_IDLE_ATTEMPTS, MDIO_POLL_INTERVAL_US, PHY_POLL_INTERVAL_US, PHY_RESET_ATTEMPTS,
    TX_COMPLETION_ATTEMPTS, TX_POLL_INTERVAL_US,
};
use crate::internal::register::gem::{GEM0_BASE, GEM1_BASE};
use crate::internal::register::slcr::{
    GEM0_CLK_CTRL_OFFSET, GEM0_RCLK_CTRL_OFFSET, GEM1_CLK_CTRL_OFFSET, GEM1_RCLK_CTRL_OFFSET,
};

/// Ethernet link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 10 Mbps
    #[default]
    Mbps10,
    /// 100 Mbps
    Mbps100,
    /// 1000 Mbps
    Mbps1000,
}

impl Speed {
    /// Speed in megabits per second
    #[must_use]
    pub const fn as_mbps(self) -> u32 {
        match self {
            Speed::Mbps10 => 10,
            Speed::Mbps100 => 100,
            Speed::Mbps1000 => 1000,
        }
    }
}

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// GEM controller instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GemInstance {
    /// GEM0 at 0xE000_B000
    #[default]
    Gem0,
    /// GEM1 at 0xE000_C000
    Gem1,
}

impl GemInstance {
    /// Instance for a zero-based controller index
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(GemInstance::Gem0),
            1 => Some(GemInstance::Gem1),
            _ => None,
        }
    }

    /// Register block base address
    #[must_use]
    pub const fn base_address(self) -> usize {
        match self {
            GemInstance::Gem0 => GEM0_BASE,
            GemInstance::Gem1 => GEM1_BASE,
        }
    }

    /// SLCR offset of the RX clock control register
    #[must_use]
    pub const fn rx_clock_offset(self) -> usize {
        match self {
            GemInstance::Gem0 => GEM0_RCLK_CTRL_OFFSET,
            GemInstance::Gem1 => GEM1_RCLK_CTRL_OFFSET,
        }
    }

    /// SLCR offset of the reference clock control register
    #[must_use]
    pub const fn clock_offset(self) -> usize {
        match self {
            GemInstance::Gem0 => GEM0_CLK_CTRL_OFFSET,
            GemInstance::Gem1 => GEM1_CLK_CTRL_OFFSET,
        }
    }
}

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Rings not built
    #[default]
    Uninitialized,
    /// One-time init done, link not established
    Configured,
    /// Link established and clocks programmed
    Running,
}

/// Bounded polling policy: at most `max_attempts` delays of `interval_us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Maximum number of delays before giving up
    pub max_attempts: u32,
    /// Delay between polls in microseconds
    pub interval_us: u32,
}

impl RetryPolicy {
    /// PHY reset: 1000 polls, 10 ms apart
    pub const PHY_RESET: Self = Self::new(PHY_RESET_ATTEMPTS, PHY_POLL_INTERVAL_US);

    /// Auto-negotiation: 1000 polls, 10 ms apart
    pub const AUTO_NEGOTIATION: Self = Self::new(AUTONEG_ATTEMPTS, PHY_POLL_INTERVAL_US);

    /// Management bus idle: 10 000 polls, 1 us apart
    pub const MDIO_IDLE: Self = Self::new(MDIO_IDLE_ATTEMPTS, MDIO_POLL_INTERVAL_US);

    /// Transmit completion
    pub const TX_COMPLETION: Self = Self::new(TX_COMPLETION_ATTEMPTS, TX_POLL_INTERVAL_US);

    /// Create a policy
    #[must_use]
    pub const fn new(max_attempts: u32, interval_us: u32) -> Self {
        Self {
            max_attempts,
            interval_us,
        }
    }

    /// Worst-case time spent waiting, in microseconds
    #[must_use]
    pub const fn total_us(&self) -> u64 {
        self.max_attempts as u64 * self.interval_us as u64
    }

    /// Poll `done` until it reports `true` or the policy is exhausted.
    ///
    /// The condition is checked once up front and once after every delay.
    /// Returns `Ok(false)` on exhaustion; errors from `done` propagate.
    pub fn poll<D, F>(&self, delay: &mut D, mut done: F) -> Result<bool>
    where
        D: DelayNs,
        F: FnMut() -> Result<bool>,
    {
        let mut attempts = 0;
        loop {
            if done()? {
                return Ok(true);
            }
            if attempts >= self.max_attempts {
                return Ok(false);
            }
            attempts += 1;
            delay.delay_us(self.interval_us);
        }
    }
}

/// GEM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GemConfig {
    /// Controller instance
    pub instance: GemInstance,
    /// PHY address on the management bus (0-31)
    pub phy_address: u8,
    /// Instance whose management bus reaches the PHY
    pub mii_instance: GemInstance,
    /// Expose the PHY through the management shim
    pub create_mii: bool,
    /// Station MAC address
    pub mac_address: [u8; 6],
    /// Number of RX descriptors to use (at most the DMA region capacity)
    pub rx_descriptors: usize,
    /// Number of TX descriptors to use (at most the DMA region capacity)
    pub tx_descriptors: usize,
    /// Clock routing (MIO or EMIO)
    pub clock_routing: ClockRouting,
    /// Reference clock divisors per link speed
    pub clock_table: ClockTable,
    /// PHY reset wait
    pub reset_policy: RetryPolicy,
    /// Auto-negotiation wait
    pub autoneg_policy: RetryPolicy,
    /// Transmit completion wait
    pub tx_policy: RetryPolicy,
    /// Management bus idle wait
    pub mdio_policy: RetryPolicy,
    /// Advertise 1000BASE-T before negotiating
    pub advertise_gigabit: bool,
    /// Advertise symmetric and asymmetric pause
    pub advertise_pause: bool,
}

impl Default for GemConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GemConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instance: GemInstance::Gem0,
            phy_address: 0,
            mii_instance: GemInstance::Gem0,
            create_mii: true,
            mac_address: DEFAULT_MAC_ADDR,
            rx_descriptors: DEFAULT_RX_DESCRIPTORS,
            tx_descriptors: DEFAULT_TX_DESCRIPTORS,
            clock_routing: ClockRouting::Mio,
            clock_table: ClockTable::IO_PLL_1000MHZ,
            reset_policy: RetryPolicy::PHY_RESET,
            autoneg_policy: RetryPolicy::AUTO_NEGOTIATION,
            tx_policy: RetryPolicy::TX_COMPLETION,
            mdio_policy: RetryPolicy::MDIO_IDLE,
            advertise_gigabit: false,
            advertise_pause: false,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the controller instance (the management bus follows it)
    #[must_use]
    pub const fn with_instance(mut self, instance: GemInstance) -> Self {
        self.instance = instance;
        self.mii_instance = instance;
        self
    }

    /// Set the PHY address
    #[must_use]
    pub const fn with_phy_address(mut self, addr: u8) -> Self {
        self.phy_address = addr;
        self
    }

    /// Reach the PHY through another instance's management bus
    #[must_use]
    pub const fn with_mii_instance(mut self, instance: GemInstance) -> Self {
        self.mii_instance = instance;
        self
    }

    /// Expose or hide the PHY through the management shim
    #[must_use]
    pub const fn with_create_mii(mut self, enabled: bool) -> Self {
        self.create_mii = enabled;
        self
    }

    /// Set the MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = addr;
        self
    }

    /// Set the number of descriptors in each ring
    #[must_use]
    pub const fn with_descriptors(mut self, rx: usize, tx: usize) -> Self {
        self.rx_descriptors = rx;
        self.tx_descriptors = tx;
        self
    }

    /// Set the clock routing
    #[must_use]
    pub const fn with_clock_routing(mut self, routing: ClockRouting) -> Self {
        self.clock_routing = routing;
        self
    }

    /// Set the reference clock divisor table
    #[must_use]
    pub const fn with_clock_table(mut self, table: ClockTable) -> Self {
        self.clock_table = table;
        self
    }

    /// Set the PHY reset wait
    #[must_use]
    pub const fn with_reset_policy(mut self, policy: RetryPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    /// Set the auto-negotiation wait
    #[must_use]
    pub const fn with_autoneg_policy(mut self, policy: RetryPolicy) -> Self {
        self.autoneg_policy = policy;
        self
    }

    /// Set the transmit completion wait
    #[must_use]
    pub const fn with_tx_policy(mut self, policy: RetryPolicy) -> Self {
        self.tx_policy = policy;
        self
    }

    /// Set the management bus idle wait
    #[must_use]
    pub const fn with_mdio_policy(mut self, policy: RetryPolicy) -> Self {
        self.mdio_policy = policy;
        self
    }

    /// Advertise 1000BASE-T before negotiating
    #[must_use]
    pub const fn with_advertise_gigabit(mut self, enabled: bool) -> Self {
        self.advertise_gigabit = enabled;
        self
    }

    /// Advertise pause capability before negotiating
    #[must_use]
    pub const fn with_advertise_pause(mut self, enabled: bool) -> Self {
        self.advertise_pause = enabled;
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
