//! Error types for the Zynq GEM driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Bring-up and configuration failures
//! - [`DmaError`]: Descriptor ring and buffer issues
//! - [`LinkError`]: PHY link establishment failures
//! - [`IoError`]: Runtime and hardware faults
//! - [`FrameError`]: Receive descriptor protocol violations
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and bring-up errors
///
/// These errors are fatal to the setup step that reported them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid configuration parameter (ring size, buffer assignment)
    InvalidConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// Address filter slot outside 1..=4
    InvalidFilterSlot,
    /// No device registered under the requested name
    UnknownDevice,
    /// One-time initialization has not run
    NotConfigured,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidFilterSlot => "invalid address filter slot",
            ConfigError::UnknownDevice => "unknown device",
            ConfigError::NotConfigured => "device not configured",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Descriptor ring and buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// No free TX descriptor (backpressure, retry later)
    RingExhausted,
    /// Hardware returned a different descriptor than the one committed
    RingConsistency,
    /// Frame too large for a DMA buffer
    FrameTooLarge,
    /// Invalid frame length (zero)
    InvalidLength,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::RingExhausted => "no free descriptors",
            DmaError::RingConsistency => "descriptor ring inconsistent",
            DmaError::FrameTooLarge => "frame too large for buffers",
            DmaError::InvalidLength => "invalid frame length",
        }
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// PHY link establishment errors
///
/// The device stays un-initialized; `init` may be retried from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// PHY reset bit did not self-clear in time
    ResetTimeout,
    /// Auto-negotiation did not complete in time
    AutoNegotiationTimeout,
    /// Link is down after auto-negotiation
    LinkDown,
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LinkError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LinkError::ResetTimeout => "PHY reset timed out",
            LinkError::AutoNegotiationTimeout => "auto-negotiation timed out",
            LinkError::LinkDown => "link down",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime errors and hardware faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Link establishment has not completed
    DeviceNotReady,
    /// PHY management bus stayed busy past its bound
    ManagementBusTimeout,
    /// Transmit completion not observed within the retry policy
    TxTimeout,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::DeviceNotReady => "device not ready",
            IoError::ManagementBusTimeout => "management bus timed out",
            IoError::TxTimeout => "transmit completion timed out",
        }
    }
}

// =============================================================================
// Frame Errors
// =============================================================================

/// Receive descriptor protocol violations
///
/// Reported per frame; the descriptor is recycled and reception continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Descriptor lacks the start-of-frame bit
    MissingSof,
    /// Descriptor lacks the end-of-frame bit
    MissingEof,
    /// Descriptor reports a zero-length frame
    ZeroLength,
    /// Descriptor carries no buffer address
    DanglingBuffer,
    /// Reported length exceeds the DMA buffer
    Oversized,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FrameError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FrameError::MissingSof => "missing SOF",
            FrameError::MissingEof => "missing EOF",
            FrameError::ZeroLength => "zero-length frame",
            FrameError::DanglingBuffer => "dangling buffer",
            FrameError::Oversized => "frame exceeds buffer",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match gem.send(&frame) {
///     Err(Error::Dma(DmaError::RingExhausted)) => { /* retry later */ }
///     Err(Error::Link(LinkError::LinkDown)) => { /* check cable */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// Link error
    Link(LinkError),
    /// I/O error
    Io(IoError),
    /// Protocol violation
    Frame(FrameError),
}

impl Error {
    /// Reset, auto-negotiation, management bus or TX completion timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Link(LinkError::ResetTimeout | LinkError::AutoNegotiationTimeout)
                | Error::Io(IoError::ManagementBusTimeout | IoError::TxTimeout)
        )
    }

    /// Hardware did not respond within its bound
    #[must_use]
    pub const fn is_hardware_fault(&self) -> bool {
        matches!(self, Error::Io(IoError::ManagementBusTimeout | IoError::TxTimeout))
    }

    /// Transient resource shortage; the caller should retry after a delay
    #[must_use]
    pub const fn is_backpressure(&self) -> bool {
        matches!(self, Error::Dma(DmaError::RingExhausted))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Link(e) => write!(f, "link: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
            Error::Frame(e) => write!(f, "frame: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Error::Link(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

/// Result type alias for GEM operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
