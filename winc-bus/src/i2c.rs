//! I2C transport
//!
//! Every transaction is a single packet to the WINC's fixed slave address.
//! The chip NACKs while it is busy, so a failed packet is re-sent up to the
//! configured retry ceiling; running out of retries is reported as
//! [`BusError::Timeout`].

use heapless::Vec;
use winc_hal::{FloatingPins, I2cMaster};

use crate::capabilities::MAX_TRX_SIZE;
use crate::config::WincI2cConfig;
use crate::error::BusError;
use crate::host::{BusMode, HostBus};
use crate::request::TransferRequest;
use crate::state::LinkState;

/// Run `op` until it succeeds, at most `attempts` times
fn with_retries<E>(attempts: u32, mut op: impl FnMut() -> Result<(), E>) -> Result<(), BusError> {
    for _ in 0..attempts {
        if op().is_ok() {
            return Ok(());
        }
    }

    #[cfg(feature = "defmt")]
    defmt::warn!("i2c: gave up after {} attempts", attempts);
    Err(BusError::Timeout)
}

/// WINC bus over an I2C master
pub struct I2cBus<I, P> {
    i2c: I,
    pins: P,
    config: WincI2cConfig,
    state: LinkState,
}

impl<I: I2cMaster, P: FloatingPins> I2cBus<I, P> {
    /// Wrap an I2C master and its SCL/SDA pins
    ///
    /// The controller is not touched until [`HostBus::init`].
    pub fn new(i2c: I, pins: P) -> Self {
        Self {
            i2c,
            pins,
            config: WincI2cConfig::new(),
            state: LinkState::Uninitialized,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Give back the peripheral and pins
    pub fn release(self) -> (I, P) {
        (self.i2c, self.pins)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        let address = self.config.slave_address;
        let i2c = &mut self.i2c;
        with_retries(self.config.max_attempts(), || i2c.write_packet(address, data))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        let address = self.config.slave_address;
        let i2c = &mut self.i2c;
        with_retries(self.config.max_attempts(), || i2c.read_packet(address, &mut *buf))
    }

    /// Header and payload sent as one packet
    fn write_special(&mut self, first: &[u8], second: &[u8]) -> Result<(), BusError> {
        let mut scratch: Vec<u8, MAX_TRX_SIZE> = Vec::new();
        scratch
            .extend_from_slice(first)
            .map_err(|_| BusError::InvalidArgument)?;
        scratch
            .extend_from_slice(second)
            .map_err(|_| BusError::InvalidArgument)?;
        self.write(&scratch)
    }
}

impl<I: I2cMaster, P: FloatingPins> HostBus for I2cBus<I, P> {
    type Config = WincI2cConfig;

    fn init(&mut self, config: &WincI2cConfig) -> Result<(), BusError> {
        if self.state.is_ready() {
            #[cfg(feature = "defmt")]
            if *config != self.config {
                defmt::warn!("i2c: already initialized, new configuration ignored");
            }
            return Ok(());
        }

        self.i2c.configure(&config.i2c).map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("i2c: configuration rejected: {}", defmt::Debug2Format(&_e));
            BusError::InitFailed
        })?;
        self.i2c.enable();

        self.config = *config;
        self.state = LinkState::Ready;
        Ok(())
    }

    fn transact(&mut self, request: TransferRequest<'_>) -> Result<(), BusError> {
        self.state.require_ready()?;
        request.validate()?;
        if request.len() > MAX_TRX_SIZE {
            return Err(BusError::InvalidArgument);
        }

        match request {
            TransferRequest::Write { buf } => self.write(buf),
            TransferRequest::Read { buf } => self.read(buf),
            TransferRequest::WriteWrite { first, second } => self.write_special(first, second),
            TransferRequest::ReadWrite { .. } => Err(BusError::InvalidArgument),
        }
    }

    fn deinit(&mut self) -> Result<(), BusError> {
        if !self.state.is_ready() {
            return Ok(());
        }

        self.i2c.disable();
        self.pins.float();
        self.state = LinkState::Uninitialized;
        Ok(())
    }

    fn mode(&self) -> BusMode {
        BusMode::I2c
    }
}
