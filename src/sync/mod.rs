//! Synchronization Support
//!
//! Serialized access to a device instance from several contexts (main loop
//! and interrupt handlers, or several cores) through [`SharedGem`], one
//! exclusive lock per device instance.
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use zynq_gem::sync::SharedGem;
//!
//! static GEM: SharedGem<ZynqGem<'static, MarvellPhy, Delay>> = SharedGem::new();
//!
//! fn main() {
//!     GEM.install(unsafe { ZynqGem::on_hardware(config, phy, delay, &DMA) });
//!     GEM.with(|gem| {
//!         gem.one_time_init().unwrap();
//!         gem.init().unwrap();
//!     });
//! }
//! ```

mod shared;

pub use shared::SharedGem;
