//! Host driver contract
//!
//! The WINC host driver talks to its bus through four calls: `init`,
//! `ioctl`, `deinit` and `reinit`, plus a read-only capability descriptor.
//! [`HostBus`] is that contract; [`transact`](HostBus::transact) is the
//! typed entry point the ioctl adapter forwards to.

use crate::capabilities::{BusCapabilities, CAPABILITIES};
use crate::error::{to_status, BusError};
use crate::ioctl::{self, IoctlParam};
use crate::request::TransferRequest;

/// Bus flavour, fixed when the bus value is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// I2C packets to a fixed slave address
    I2c,
    /// SPI, every byte moved by the CPU
    SpiPolled,
    /// SPI, long transfers moved by a DMA channel pair
    SpiDma,
}

impl BusMode {
    /// Check if this is one of the SPI modes
    pub fn is_spi(self) -> bool {
        matches!(self, BusMode::SpiPolled | BusMode::SpiDma)
    }
}

/// The bus contract consumed by the WINC host driver
pub trait HostBus {
    /// Static configuration handed to `init`
    type Config;

    /// Bring the peripheral up
    ///
    /// Calling this on a bus that is already up succeeds without touching
    /// the hardware and keeps the configuration it was brought up with;
    /// `deinit` first to apply a new one.
    fn init(&mut self, config: &Self::Config) -> Result<(), BusError>;

    /// Run one blocking transaction
    fn transact(&mut self, request: TransferRequest<'_>) -> Result<(), BusError>;

    /// Tear the peripheral down and release the bus pins
    fn deinit(&mut self) -> Result<(), BusError>;

    /// Re-initialize after a chip power cycle
    ///
    /// Nothing in the wrapper needs redoing, so this always succeeds.
    fn reinit(&mut self, _config: &Self::Config) -> Result<(), BusError> {
        Ok(())
    }

    /// Mode this bus was built for
    fn mode(&self) -> BusMode;

    /// Limits the host driver must respect when chunking payloads
    fn capabilities(&self) -> BusCapabilities {
        CAPABILITIES
    }

    /// Command-code entry point used by the host driver
    ///
    /// Returns `0` on success, `-1` for an unrecognized command and the
    /// error's status code otherwise.
    fn ioctl(&mut self, command: u8, param: IoctlParam<'_>) -> i8
    where
        Self: Sized,
    {
        to_status(ioctl::dispatch(self, command, param))
    }
}
