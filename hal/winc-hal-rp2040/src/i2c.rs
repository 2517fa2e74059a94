//! I2C master on the RP2040 I2C block
//!
//! Wraps embassy-rp's blocking driver. Each packet is one complete
//! START..STOP transaction, which is what the WINC retry loop expects.

use embassy_rp::i2c::{AbortReason, Blocking, Config, Error as I2cError, I2c, Instance};
use winc_hal::i2c::I2cConfig;
use winc_hal::I2cMaster;

/// Highest SCL clock the RP2040 block supports (Fast-mode Plus)
pub const MAX_FREQUENCY: u32 = 1_000_000;

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Address or data byte not acknowledged
    Nack,
    /// Arbitration lost
    ArbitrationLost,
    /// Requested clock out of range
    InvalidFrequency,
    /// Buffer length not supported by the block
    InvalidLength,
    /// Address out of range or reserved
    InvalidAddress,
    /// Other error
    Other,
}

impl From<I2cError> for I2cBusError {
    fn from(e: I2cError) -> Self {
        match e {
            I2cError::Abort(AbortReason::NoAcknowledge) => I2cBusError::Nack,
            I2cError::Abort(AbortReason::ArbitrationLoss) => I2cBusError::ArbitrationLost,
            I2cError::InvalidReadBufferLength | I2cError::InvalidWriteBufferLength => {
                I2cBusError::InvalidLength
            }
            I2cError::AddressOutOfRange(_) | I2cError::AddressReserved(_) => {
                I2cBusError::InvalidAddress
            }
            _ => I2cBusError::Other,
        }
    }
}

/// Check a requested SCL clock against what the block can generate
pub fn check_frequency(frequency: u32) -> Result<(), I2cBusError> {
    if frequency == 0 || frequency > MAX_FREQUENCY {
        return Err(I2cBusError::InvalidFrequency);
    }
    Ok(())
}

/// Build the embassy-rp configuration for a bus configuration
///
/// The RP2040 block has no buffer timeout; the WINC retry loop bounds
/// stalls instead.
pub fn embassy_config(config: &I2cConfig) -> Config {
    let mut cfg = Config::default();
    cfg.frequency = config.frequency;
    cfg
}

/// Blocking I2C master
pub struct Rp2040I2c<'d, T: Instance> {
    i2c: I2c<'d, T, Blocking>,
    enabled: bool,
}

impl<'d, T: Instance> Rp2040I2c<'d, T> {
    /// Wrap a blocking embassy-rp I2C driver
    pub fn new(i2c: I2c<'d, T, Blocking>) -> Self {
        Self {
            i2c,
            enabled: false,
        }
    }

    fn check_enabled(&self) -> Result<(), I2cBusError> {
        if self.enabled {
            Ok(())
        } else {
            Err(I2cBusError::Other)
        }
    }
}

impl<'d, T: Instance> I2cMaster for Rp2040I2c<'d, T> {
    type Error = I2cBusError;

    fn configure(&mut self, config: &I2cConfig) -> Result<(), Self::Error> {
        check_frequency(config.frequency)?;
        self.i2c
            .set_config(&embassy_config(config))
            .map_err(|_| I2cBusError::InvalidFrequency)
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn write_packet(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.check_enabled()?;
        self.i2c.blocking_write(address, data)?;
        Ok(())
    }

    fn read_packet(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.check_enabled()?;
        self.i2c.blocking_read(address, buf)?;
        Ok(())
    }
}
