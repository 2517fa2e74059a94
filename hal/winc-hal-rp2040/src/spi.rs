//! SPI master on the RP2040 PL022 blocks
//!
//! Byte-level access on top of embassy-rp's blocking driver. Each
//! `write_byte` clocks one full-duplex byte and latches the byte received
//! alongside it until `read_byte` collects it. Long transfers bypass this
//! path through [`crate::dma`], against [`SpiPort::data_register`].

use embassy_rp::pac;
use embassy_rp::spi::{Blocking, Config, Instance, Phase as RpPhase, Polarity as RpPolarity, Spi};
use winc_hal::spi::{Phase, Polarity, SpiConfig};
use winc_hal::SpiMaster;

/// SSPDR offset within a PL022 register block
const SSPDR_OFFSET: usize = 0x008;

/// Which of the two SPI blocks a driver sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiPort {
    Spi0,
    Spi1,
}

impl SpiPort {
    const fn base(self) -> usize {
        match self {
            SpiPort::Spi0 => 0x4003_C000,
            SpiPort::Spi1 => 0x4004_0000,
        }
    }

    /// Address of the block's data register
    pub const fn data_register(self) -> usize {
        self.base() + SSPDR_OFFSET
    }

    fn regs(self) -> pac::spi::Spi {
        match self {
            SpiPort::Spi0 => pac::SPI0,
            SpiPort::Spi1 => pac::SPI1,
        }
    }

    /// Gate the block's TX/RX data requests to the DMA engine
    fn set_dma_requests(self, enabled: bool) {
        self.regs().dmacr().write(|w| {
            w.set_txdmae(enabled);
            w.set_rxdmae(enabled);
        });
    }
}

/// Error from SPI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiBusError {
    /// Byte written while the previous answer was still latched
    Overrun,
    /// Read with nothing latched
    Empty,
    /// Access while the master is disabled
    Disabled,
    /// Transfer rejected by the driver
    Transfer,
}

/// Build the embassy-rp configuration for a bus configuration
pub fn embassy_config(config: &SpiConfig) -> Config {
    let mut cfg = Config::default();
    cfg.frequency = config.frequency;
    cfg.polarity = match config.polarity {
        Polarity::IdleLow => RpPolarity::IdleLow,
        Polarity::IdleHigh => RpPolarity::IdleHigh,
    };
    cfg.phase = match config.phase {
        Phase::CaptureOnFirstTransition => RpPhase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => RpPhase::CaptureOnSecondTransition,
    };
    cfg
}

/// Blocking byte-level SPI master
pub struct Rp2040Spi<'d, T: Instance> {
    spi: Spi<'d, T, Blocking>,
    port: SpiPort,
    enabled: bool,
    rx_latch: Option<u8>,
}

impl<'d, T: Instance> Rp2040Spi<'d, T> {
    /// Wrap a blocking embassy-rp SPI driver sitting on `port`
    pub fn new(spi: Spi<'d, T, Blocking>, port: SpiPort) -> Self {
        Self {
            spi,
            port,
            enabled: false,
            rx_latch: None,
        }
    }
}

impl<'d, T: Instance> SpiMaster for Rp2040Spi<'d, T> {
    type Error = SpiBusError;

    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        self.spi.set_config(&embassy_config(config));
        Ok(())
    }

    fn enable(&mut self) {
        self.port.set_dma_requests(true);
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.port.set_dma_requests(false);
        self.enabled = false;
        self.rx_latch = None;
    }

    fn is_ready_to_write(&self) -> bool {
        self.rx_latch.is_none()
    }

    fn is_ready_to_read(&self) -> bool {
        self.rx_latch.is_some()
    }

    fn is_write_complete(&self) -> bool {
        // blocking_transfer returns after the byte is fully shifted
        true
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        if !self.enabled {
            return Err(SpiBusError::Disabled);
        }
        if self.rx_latch.is_some() {
            return Err(SpiBusError::Overrun);
        }

        let mut rx = [0u8; 1];
        self.spi
            .blocking_transfer(&mut rx, &[byte])
            .map_err(|_| SpiBusError::Transfer)?;
        self.rx_latch = Some(rx[0]);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.rx_latch.take().ok_or(SpiBusError::Empty)
    }

    fn data_register(&self) -> usize {
        self.port.data_register()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winc_hal::spi::Mode;

    #[test]
    fn test_data_registers() {
        assert_eq!(SpiPort::Spi0.data_register(), 0x4003_C008);
        assert_eq!(SpiPort::Spi1.data_register(), 0x4004_0008);
    }

    #[test]
    fn test_config_conversion() {
        let cfg = embassy_config(&SpiConfig::from_mode(12_000_000, Mode::Mode3));
        assert_eq!(cfg.frequency, 12_000_000);
        assert!(matches!(cfg.polarity, RpPolarity::IdleHigh));
        assert!(matches!(cfg.phase, RpPhase::CaptureOnSecondTransition));
    }
}
