//! SPI bus abstractions
//!
//! Provides a byte-level SPI master interface. The bus wrapper drives the
//! data register one byte at a time for short transfers and hands the data
//! register address to a DMA engine for long ones, so the trait exposes the
//! status flags rather than whole-buffer transfers.

/// SPI bus master
///
/// Chip select is not part of this trait: the WINC chip select is a plain
/// GPIO driven by the transport.
pub trait SpiMaster {
    /// Error type for SPI operations
    type Error: core::fmt::Debug;

    /// Apply clock and mode configuration
    ///
    /// Called once during bring-up, before [`enable`](Self::enable).
    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error>;

    /// Enable the master
    fn enable(&mut self);

    /// Disable the master
    fn disable(&mut self);

    /// Transmit data register can accept a byte
    fn is_ready_to_write(&self) -> bool;

    /// Receive data register holds a byte
    fn is_ready_to_read(&self) -> bool;

    /// Shift register is empty and the last byte has left the pin
    fn is_write_complete(&self) -> bool;

    /// Load one byte into the transmit data register
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Take one byte from the receive data register
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Address of the data register, used as the fixed DMA endpoint
    fn data_register(&self) -> usize;
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::from_mode(1_000_000, Mode::Mode0)
    }
}

impl SpiConfig {
    /// Build a configuration from a frequency and a combined SPI mode
    pub const fn from_mode(frequency: u32, mode: Mode) -> Self {
        let (polarity, phase) = mode.split();
        Self {
            frequency,
            polarity,
            phase,
        }
    }

    /// Combined SPI mode of this configuration
    pub const fn mode(&self) -> Mode {
        match (self.polarity, self.phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => Mode::Mode0,
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => Mode::Mode1,
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => Mode::Mode2,
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => Mode::Mode3,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    const fn split(self) -> (Polarity, Phase) {
        match self {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        mode.split()
    }
}
