//! Device registration and the management-bus shim.
//!
//! The bootloader network layer addresses interfaces by name and drives
//! them through a fixed set of entry points. [`EthDevice`] is that set;
//! [`DeviceRegistry`] owns the registered devices, names them
//! `zynq_gem0`, `zynq_gem1`, ... and routes management-bus access by name.

use core::fmt::{self, Write};

use heapless::String;

use embedded_hal::delay::DelayNs;

use super::error::{ConfigError, ConfigResult, Result};
use super::gem::{FrameSink, Gem};
use crate::hal::mdio::MdioBus;
use crate::internal::constants::{DEVICE_NAME_CAPACITY, DRIVER_NAME};
use crate::internal::register::RegisterBlock;
use crate::phy::PhyDriver;

// =============================================================================
// Device Trait
// =============================================================================

/// Entry points the network layer drives a device through.
///
/// Object safe, so heterogeneous devices can sit behind `&mut dyn EthDevice`.
pub trait EthDevice {
    /// Build rings and program MAC defaults (once, at registration)
    fn one_time_init(&mut self) -> Result<()>;

    /// Bring the link up; a no-op once the device is running
    fn init(&mut self) -> Result<()>;

    /// Called after every network command
    fn halt(&mut self);

    /// Transmit one frame, returning the number of bytes sent
    fn send(&mut self, frame: &[u8]) -> Result<usize>;

    /// Deliver pending received frames to `sink`, returning how many
    fn recv(&mut self, sink: &mut dyn FrameSink) -> Result<usize>;

    /// Program the station MAC address
    fn write_hwaddr(&mut self, addr: &[u8; 6]) -> Result<()>;

    /// PHY address on the management bus
    fn phy_address(&self) -> u8;

    /// Whether the PHY is exposed through the management shim
    fn creates_mii(&self) -> bool;

    /// Read a PHY register
    fn mii_read(&mut self, phy_addr: u8, reg: u8) -> Result<u16>;

    /// Write a PHY register
    fn mii_write(&mut self, phy_addr: u8, reg: u8, value: u16) -> Result<()>;
}

impl<T: EthDevice + ?Sized> EthDevice for &mut T {
    fn one_time_init(&mut self) -> Result<()> {
        (**self).one_time_init()
    }

    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn halt(&mut self) {
        (**self).halt();
    }

    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        (**self).send(frame)
    }

    fn recv(&mut self, sink: &mut dyn FrameSink) -> Result<usize> {
        (**self).recv(sink)
    }

    fn write_hwaddr(&mut self, addr: &[u8; 6]) -> Result<()> {
        (**self).write_hwaddr(addr)
    }

    fn phy_address(&self) -> u8 {
        (**self).phy_address()
    }

    fn creates_mii(&self) -> bool {
        (**self).creates_mii()
    }

    fn mii_read(&mut self, phy_addr: u8, reg: u8) -> Result<u16> {
        (**self).mii_read(phy_addr, reg)
    }

    fn mii_write(&mut self, phy_addr: u8, reg: u8, value: u16) -> Result<()> {
        (**self).mii_write(phy_addr, reg, value)
    }
}

impl<B, C, M, P, D> EthDevice for Gem<'_, B, C, M, P, D>
where
    B: RegisterBlock,
    C: RegisterBlock,
    M: MdioBus,
    P: PhyDriver,
    D: DelayNs,
{
    fn one_time_init(&mut self) -> Result<()> {
        Gem::one_time_init(self)
    }

    fn init(&mut self) -> Result<()> {
        Gem::init(self).map(|_| ())
    }

    fn halt(&mut self) {
        Gem::halt(self);
    }

    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        Gem::send(self, frame).map(|report| report.length)
    }

    fn recv(&mut self, sink: &mut dyn FrameSink) -> Result<usize> {
        Gem::recv(self, sink)
    }

    fn write_hwaddr(&mut self, addr: &[u8; 6]) -> Result<()> {
        Gem::write_hwaddr(self, addr)
    }

    fn phy_address(&self) -> u8 {
        Gem::phy_address(self)
    }

    fn creates_mii(&self) -> bool {
        Gem::creates_mii(self)
    }

    fn mii_read(&mut self, phy_addr: u8, reg: u8) -> Result<u16> {
        Gem::mii_read(self, phy_addr, reg)
    }

    fn mii_write(&mut self, phy_addr: u8, reg: u8, value: u16) -> Result<()> {
        Gem::mii_write(self, phy_addr, reg, value)
    }
}

// =============================================================================
// Device Name
// =============================================================================

/// Fixed-capacity device name such as `zynq_gem0`
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceName {
    text: String<DEVICE_NAME_CAPACITY>,
}

impl DeviceName {
    /// Empty name
    pub const fn empty() -> Self {
        Self { text: String::new() }
    }

    /// Name of the device registered at `index`
    ///
    /// # Errors
    /// - `InvalidConfig` - the name does not fit `DEVICE_NAME_CAPACITY` bytes
    pub fn for_index(index: usize) -> ConfigResult<Self> {
        let mut name = Self::empty();
        write!(name.text, "{DRIVER_NAME}{index}").map_err(|_| ConfigError::InvalidConfig)?;
        Ok(name)
    }

    /// Name as text
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceName {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str());
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Owned set of registered devices, addressed by name.
///
/// # Example
/// ```ignore
/// let mut registry = DeviceRegistry::new([gem0, gem1])?;
/// registry.initialize()?;
///
/// let bmsr = registry.mii_read("zynq_gem0", 7, 1)?;
/// let dev = registry.find("zynq_gem1").ok_or(ConfigError::UnknownDevice)?;
/// dev.init()?;
/// ```
pub struct DeviceRegistry<G, const N: usize> {
    devices: [G; N],
    names: [DeviceName; N],
}

impl<G: EthDevice, const N: usize> DeviceRegistry<G, N> {
    /// Register `devices`, naming them by position
    ///
    /// # Errors
    /// - `InvalidConfig` - a device name does not fit its buffer
    pub fn new(devices: [G; N]) -> ConfigResult<Self> {
        let mut names = core::array::from_fn(|_| DeviceName::empty());
        for (index, name) in names.iter_mut().enumerate() {
            *name = DeviceName::for_index(index)?;
        }
        Ok(Self { devices, names })
    }

    /// Run one-time initialization on every device, stopping at the first
    /// failure
    pub fn initialize(&mut self) -> Result<()> {
        for (device, _name) in self.devices.iter_mut().zip(&self.names) {
            device.one_time_init()?;
            #[cfg(feature = "defmt")]
            defmt::info!("GEM: registered {}", _name);
            #[cfg(feature = "log")]
            log::info!("GEM: registered {_name}");
        }
        Ok(())
    }

    /// Number of registered devices
    pub const fn len(&self) -> usize {
        N
    }

    /// True when nothing is registered
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Name of the device at `index`
    pub fn name(&self, index: usize) -> Option<&DeviceName> {
        self.names.get(index)
    }

    /// Device at `index`
    pub fn get(&mut self, index: usize) -> Option<&mut G> {
        self.devices.get_mut(index)
    }

    /// Device registered as `name`
    pub fn find(&mut self, name: &str) -> Option<&mut G> {
        let index = self.index_of(name)?;
        self.devices.get_mut(index)
    }

    /// Iterate over names and devices
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceName, &G)> {
        self.names.iter().zip(self.devices.iter())
    }

    /// PHY address of the device registered as `name`
    pub fn phy_address(&self, name: &str) -> Result<u8> {
        let index = self.index_of(name).ok_or(ConfigError::UnknownDevice)?;
        Ok(self.devices[index].phy_address())
    }

    /// Read a PHY register through the named device's management bus
    ///
    /// # Errors
    /// - `UnknownDevice` - no such device, or it does not expose MII
    pub fn mii_read(&mut self, name: &str, phy_addr: u8, reg: u8) -> Result<u16> {
        self.mii_device(name)?.mii_read(phy_addr, reg)
    }

    /// Write a PHY register through the named device's management bus
    ///
    /// # Errors
    /// - `UnknownDevice` - no such device, or it does not expose MII
    pub fn mii_write(&mut self, name: &str, phy_addr: u8, reg: u8, value: u16) -> Result<()> {
        self.mii_device(name)?.mii_write(phy_addr, reg, value)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_str() == name)
    }

    fn mii_device(&mut self, name: &str) -> Result<&mut G> {
        match self.find(name) {
            Some(device) if device.creates_mii() => Ok(device),
            _ => Err(ConfigError::UnknownDevice.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
