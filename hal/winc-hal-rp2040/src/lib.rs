//! RP2040 backend for the WINC1500 host bus
//!
//! Implements the `winc-hal` traits on top of embassy-rp:
//!
//! - Blocking I2C master ([`Rp2040I2c`])
//! - Byte-level SPI master ([`Rp2040Spi`])
//! - DREQ-paced DMA channels for long SPI transfers ([`Rp2040DmaChannel`])
//! - Chip select / reset outputs and releasable bus pins
//!
//! ```ignore
//! let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, Config::default());
//! let parts = spi_parts(
//!     Rp2040Spi::new(spi, SpiPort::Spi0),
//!     Rp2040Output::new(Output::new(p.PIN_17, Level::High)),
//!     Rp2040Output::new(Output::new(p.PIN_22, Level::Low)),
//!     BusPins::new([/* Flex pins for SCK/MOSI/MISO */]),
//! );
//! let dma = DmaPair {
//!     tx: Rp2040DmaChannel::new(p.DMA_CH0.into(), SpiPort::Spi0),
//!     rx: Rp2040DmaChannel::new(p.DMA_CH1.into(), SpiPort::Spi0),
//! };
//! let mut bus = SpiBus::with_dma(parts, dma);
//! bus.init(&WincSpiConfig::default())?;
//! ```

#![no_std]

pub mod dma;
pub mod gpio;
pub mod i2c;
pub mod spi;

pub use dma::{DmaError, Rp2040DmaChannel};
pub use gpio::{BusPins, Rp2040Output};
pub use i2c::{I2cBusError, Rp2040I2c};
pub use spi::{Rp2040Spi, SpiBusError, SpiPort};

use embassy_time::Delay;
use winc_bus::spi::SpiParts;
use winc_bus::{I2cBus, SpiBus};

/// WINC bus over an RP2040 I2C block
pub type Rp2040I2cBus<'d, T, const N: usize> = I2cBus<Rp2040I2c<'d, T>, BusPins<'d, N>>;

/// Polled WINC bus over an RP2040 SPI block
pub type Rp2040SpiBus<'d, T, const N: usize> =
    SpiBus<Rp2040Spi<'d, T>, Rp2040Output<'d>, Rp2040Output<'d>, BusPins<'d, N>, Delay>;

/// WINC bus over an RP2040 SPI block with DMA for long transfers
pub type Rp2040SpiDmaBus<'d, T, const N: usize> = SpiBus<
    Rp2040Spi<'d, T>,
    Rp2040Output<'d>,
    Rp2040Output<'d>,
    BusPins<'d, N>,
    Delay,
    Rp2040DmaChannel<'d>,
>;

/// Collect the SPI bus peripherals, timed by the embassy time driver
pub fn spi_parts<'d, T: embassy_rp::spi::Instance, const N: usize>(
    spi: Rp2040Spi<'d, T>,
    cs: Rp2040Output<'d>,
    reset: Rp2040Output<'d>,
    pins: BusPins<'d, N>,
) -> SpiParts<Rp2040Spi<'d, T>, Rp2040Output<'d>, Rp2040Output<'d>, BusPins<'d, N>, Delay> {
    SpiParts {
        spi,
        cs,
        reset,
        pins,
        delay: Delay,
    }
}
