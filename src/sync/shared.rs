//! Critical-section protected device wrapper.
//!
//! Provides [`SharedGem`], one exclusive lock per device instance, built on
//! `critical_section::Mutex<RefCell<_>>`.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::driver::error::{IoError, Result};
use crate::driver::gem::FrameSink;
use crate::driver::registry::EthDevice;

/// Device wrapper serializing access with critical sections.
///
/// Starts empty so it can live in a `static`; the device is installed once
/// it has been built. All access goes through `critical_section::with()`,
/// so the wrapper is `Sync` whenever `G` is `Send`.
///
/// # Example
///
/// ```ignore
/// static GEM: SharedGem<ZynqGem<'static, MarvellPhy, Delay>> = SharedGem::new();
///
/// GEM.install(unsafe { ZynqGem::on_hardware(config, phy, delay, &DMA) });
/// GEM.with(|gem| gem.one_time_init());
///
/// // From another context
/// GEM.send(&frame)?;
/// ```
pub struct SharedGem<G> {
    slot: Mutex<RefCell<Option<G>>>,
}

impl<G> SharedGem<G> {
    /// Create an empty wrapper (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install `device`, returning the one previously installed
    pub fn install(&self, device: G) -> Option<G> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).replace(device))
    }

    /// Remove the installed device
    pub fn take(&self) -> Option<G> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    /// Check whether a device is installed
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }

    /// Execute a closure with exclusive access to the device.
    ///
    /// Returns `None` if no device is installed.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within `f`; use
    /// [`try_with`](Self::try_with) where nesting is possible.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut G) -> R,
    {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Like [`with`](Self::with), but also `None` if the device is already
    /// borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut G) -> R,
    {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow(cs).try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        })
    }
}

impl<G: EthDevice> SharedGem<G> {
    /// Transmit one frame under the lock
    ///
    /// # Errors
    /// - `DeviceNotReady` - no device installed
    pub fn send(&self, frame: &[u8]) -> Result<usize> {
        self.with(|gem| gem.send(frame))
            .unwrap_or(Err(IoError::DeviceNotReady.into()))
    }

    /// Drain received frames into `sink` under the lock
    ///
    /// # Errors
    /// - `DeviceNotReady` - no device installed
    pub fn recv(&self, sink: &mut dyn FrameSink) -> Result<usize> {
        self.with(|gem| gem.recv(sink))
            .unwrap_or(Err(IoError::DeviceNotReady.into()))
    }
}

impl<G> Default for SharedGem<G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::{GemConfig, RetryPolicy, State};
    use crate::driver::error::Error;
    use crate::driver::gem::Gem;
    use crate::internal::register::gem::{RXSR_OFFSET, TXSR_OFFSET};
    use crate::phy::GenericPhy;
    use crate::testing::{
        MockDelay, MockMdioBus, MockRegisters, complete_tx_on_start, leak_region,
    };

    type TestGem<'a> =
        Gem<'a, &'a MockRegisters, &'a MockRegisters, MockMdioBus, GenericPhy, MockDelay>;

    fn device<'a>(gem: &'a MockRegisters, slcr: &'a MockRegisters) -> TestGem<'a> {
        gem.write_one_to_clear(TXSR_OFFSET);
        gem.write_one_to_clear(RXSR_OFFSET);
        let mdio = MockMdioBus::new();
        mdio.simulate_link_up_100_fd(0);
        let region = leak_region::<2, 2>();
        complete_tx_on_start(gem, region.parts().tx_descriptors, 0);
        Gem::new(
            GemConfig::new()
                .with_descriptors(2, 2)
                .with_tx_policy(RetryPolicy::new(5, 1)),
            gem,
            slcr,
            mdio,
            GenericPhy::new(0),
            MockDelay::new(),
            region,
        )
    }

    #[test]
    fn shared_gem_starts_empty() {
        let shared: SharedGem<u32> = SharedGem::new();
        assert!(!shared.is_installed());
        assert_eq!(shared.with(|v| *v), None);
    }

    #[test]
    fn shared_gem_static_usage() {
        static SHARED: SharedGem<u32> = SharedGem::new();
        assert_eq!(SHARED.install(7), None);
        assert_eq!(SHARED.with(|v| *v + 1), Some(8));
        assert_eq!(SHARED.take(), Some(7));
        assert!(!SHARED.is_installed());
    }

    #[test]
    fn shared_gem_install_replaces() {
        let shared = SharedGem::default();
        shared.install(1u8);
        assert_eq!(shared.install(2), Some(1));
        assert_eq!(shared.try_with(|v| *v), Some(2));
    }

    #[test]
    fn shared_gem_try_with_while_borrowed() {
        let shared = SharedGem::new();
        shared.install(0u32);
        let nested = shared.with(|_| shared.try_with(|v| *v));
        assert_eq!(nested, Some(None));
    }

    #[test]
    fn shared_gem_send_without_device() {
        let shared: SharedGem<TestGem<'static>> = SharedGem::new();
        assert_eq!(shared.send(&[0; 64]), Err(Error::Io(IoError::DeviceNotReady)));
    }

    #[test]
    fn shared_gem_drives_device() {
        let regs = MockRegisters::new();
        let slcr = MockRegisters::new();
        let shared = SharedGem::new();
        shared.install(device(&regs, &slcr));

        shared
            .with(|gem| {
                gem.one_time_init()?;
                gem.init()
            })
            .unwrap()
            .unwrap();
        assert_eq!(shared.with(|gem| gem.state()), Some(State::Running));
        assert_eq!(shared.send(&[0x5A; 128]), Ok(128));

        let mut frames = 0usize;
        assert_eq!(shared.recv(&mut |_: &[u8]| frames += 1), Ok(0));
        assert_eq!(frames, 0);
    }
}
