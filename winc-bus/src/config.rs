//! Bus configuration
//!
//! All configuration is fixed at build time: boards pick a preset or build
//! one of these structs as a `const` and hand it to `init`. Nothing is
//! parsed at runtime.

use winc_hal::i2c::I2cConfig;
use winc_hal::spi::{Mode, SpiConfig};

/// WINC1500 I2C slave address
pub const WINC_I2C_ADDRESS: u8 = 0x60;

/// Number of times a failed I2C packet is re-sent before giving up
pub const I2C_RETRY_LIMIT: u16 = 100;

/// Controller buffer timeout used for the WINC (longer than the default)
pub const I2C_BUFFER_TIMEOUT: u16 = 1000;

/// Transfers of at least this many bytes go through DMA when available
pub const DMA_THRESHOLD: usize = 8;

/// Upper bound on waiting for both DMA completion flags
pub const DMA_TIMEOUT_US: u32 = 100_000;

/// I2C mode configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WincI2cConfig {
    /// Controller configuration
    pub i2c: I2cConfig,
    /// 7-bit address of the companion chip
    pub slave_address: u8,
    /// Re-sends after the first failed attempt
    pub retry_limit: u16,
}

impl Default for WincI2cConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WincI2cConfig {
    /// Standard-mode controller, WINC address, default retry ceiling
    pub const fn new() -> Self {
        Self {
            i2c: I2cConfig::STANDARD.with_buffer_timeout(I2C_BUFFER_TIMEOUT),
            slave_address: WINC_I2C_ADDRESS,
            retry_limit: I2C_RETRY_LIMIT,
        }
    }

    /// Same configuration with a different controller clock
    pub const fn with_frequency(mut self, frequency: u32) -> Self {
        self.i2c.frequency = frequency;
        self
    }

    /// Total packet attempts, first try included
    pub const fn max_attempts(&self) -> u32 {
        self.retry_limit as u32 + 1
    }
}

/// Reset pulse applied to the companion chip during SPI bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetTiming {
    /// Time the reset line is held low
    pub assert_ms: u32,
    /// Time allowed for the chip to come out of reset
    pub enable_ms: u32,
    /// Sleep after reset before the first transaction
    pub settle_ms: u32,
}

impl Default for ResetTiming {
    fn default() -> Self {
        Self {
            assert_ms: 1,
            enable_ms: 10,
            settle_ms: 1,
        }
    }
}

/// SPI mode configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WincSpiConfig {
    /// Master clock and mode
    pub spi: SpiConfig,
    /// Minimum transfer size handed to DMA
    pub dma_threshold: usize,
    /// Bound on the DMA completion wait
    pub dma_timeout_us: u32,
    /// Companion chip reset pulse
    pub reset: ResetTiming,
}

impl Default for WincSpiConfig {
    fn default() -> Self {
        Self {
            spi: SpiConfig::from_mode(12_000_000, Mode::Mode0),
            dma_threshold: DMA_THRESHOLD,
            dma_timeout_us: DMA_TIMEOUT_US,
            reset: ResetTiming::default(),
        }
    }
}

impl WincSpiConfig {
    /// Same configuration with a different master clock
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.spi.frequency = frequency;
        self
    }

    /// Whether a transfer of `len` bytes qualifies for DMA
    pub fn uses_dma(&self, len: usize) -> bool {
        len >= self.dma_threshold
    }
}
