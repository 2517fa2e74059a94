//! I2C bus abstractions
//!
//! Provides the packet-level I2C master operations the bus wrapper needs.
//! Chip-specific HALs implement this on top of their blocking drivers.

/// I2C bus master
///
/// Each packet call is a complete transaction (START, address, data, STOP).
/// A failed packet is expected to be retried by the caller: on the WINC the
/// most common failure is the slave NACKing while it is busy.
pub trait I2cMaster {
    /// Error type for I2C operations
    type Error: core::fmt::Debug;

    /// Apply configuration to the controller
    ///
    /// Called once during bring-up, before [`enable`](Self::enable).
    fn configure(&mut self, config: &I2cConfig) -> Result<(), Self::Error>;

    /// Enable the controller
    fn enable(&mut self);

    /// Disable the controller
    fn disable(&mut self);

    /// Write a packet to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write_packet(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read a packet from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read_packet(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Bus inactivity timeout, in controller-specific ticks
    pub buffer_timeout: u16,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        buffer_timeout: 65_535,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency: 400_000,
        buffer_timeout: 65_535,
    };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
        buffer_timeout: 65_535,
    };

    /// Same configuration with a different buffer timeout
    pub const fn with_buffer_timeout(self, buffer_timeout: u16) -> Self {
        Self {
            frequency: self.frequency,
            buffer_timeout,
        }
    }
}
