//! SPI transport
//!
//! All traffic is a full-duplex exchange framed by a GPIO chip select.
//! Short exchanges are shifted one byte at a time by the CPU; exchanges of
//! at least [`WincSpiConfig::dma_threshold`] bytes are handed to a pair of
//! DMA channels (one per direction) when the bus was built with them.
//!
//! An absent side of the exchange is replaced by a dummy: zeros are sent
//! when there is nothing to transmit, and received bytes are dropped when
//! there is nowhere to put them.

use core::hint::spin_loop;
use core::sync::atomic::{compiler_fence, Ordering};

use winc_hal::dma::{ChannelConfig, Descriptor, Endpoint, Trigger};
use winc_hal::{DelayNs, DmaChannel, FloatingPins, NoDma, OutputPin, SpiMaster};

use crate::config::WincSpiConfig;
use crate::error::BusError;
use crate::host::{BusMode, HostBus};
use crate::request::TransferRequest;
use crate::state::LinkState;

/// Byte clocked out when the caller gave no transmit buffer
pub const DUMMY_BYTE: u8 = 0x00;

/// Peripherals owned by an SPI bus
pub struct SpiParts<S, CS, RST, P, D> {
    /// SPI master
    pub spi: S,
    /// Chip select, active low
    pub cs: CS,
    /// Companion chip reset line, active low
    pub reset: RST,
    /// MOSI/MISO/SCK/SS, released on deinit
    pub pins: P,
    /// Delay source for the reset pulse and the DMA wait
    pub delay: D,
}

/// One DMA channel per direction
pub struct DmaPair<C> {
    /// Memory to data register
    pub tx: C,
    /// Data register to memory
    pub rx: C,
}

impl<C: DmaChannel> DmaPair<C> {
    /// Check if either channel still holds hardware
    pub fn is_allocated(&self) -> bool {
        self.tx.is_allocated() || self.rx.is_allocated()
    }

    fn allocate(&mut self) -> Result<(), BusError> {
        self.rx
            .allocate(&ChannelConfig::beat(Trigger::SpiRx))
            .map_err(|_| BusError::InitFailed)?;

        if self
            .tx
            .allocate(&ChannelConfig::beat(Trigger::SpiTx))
            .is_err()
        {
            self.rx.free();
            return Err(BusError::InitFailed);
        }

        Ok(())
    }

    fn free(&mut self) {
        self.tx.free();
        self.rx.free();
    }

    fn abort(&mut self) {
        self.tx.abort();
        self.rx.abort();
    }

    fn is_done(&self) -> bool {
        self.tx.is_done() && self.rx.is_done()
    }
}

/// WINC bus over an SPI master, optionally DMA assisted
pub struct SpiBus<S, CS, RST, P, D, C = NoDma> {
    spi: S,
    cs: CS,
    reset: RST,
    pins: P,
    delay: D,
    dma: Option<DmaPair<C>>,
    config: WincSpiConfig,
    state: LinkState,
}

impl<S, CS, RST, P, D> SpiBus<S, CS, RST, P, D, NoDma>
where
    S: SpiMaster,
    CS: OutputPin,
    RST: OutputPin,
    P: FloatingPins,
    D: DelayNs,
{
    /// Polled-only bus
    pub fn new(parts: SpiParts<S, CS, RST, P, D>) -> Self {
        Self::build(parts, None)
    }
}

impl<S, CS, RST, P, D, C> SpiBus<S, CS, RST, P, D, C>
where
    S: SpiMaster,
    CS: OutputPin,
    RST: OutputPin,
    P: FloatingPins,
    D: DelayNs,
    C: DmaChannel,
{
    /// Bus that moves long transfers with the given channel pair
    ///
    /// The channels are allocated by [`HostBus::init`] and freed by
    /// [`HostBus::deinit`].
    pub fn with_dma(parts: SpiParts<S, CS, RST, P, D>, dma: DmaPair<C>) -> Self {
        Self::build(parts, Some(dma))
    }

    fn build(parts: SpiParts<S, CS, RST, P, D>, dma: Option<DmaPair<C>>) -> Self {
        Self {
            spi: parts.spi,
            cs: parts.cs,
            reset: parts.reset,
            pins: parts.pins,
            delay: parts.delay,
            dma,
            config: WincSpiConfig::default(),
            state: LinkState::Uninitialized,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Give back the peripherals and the channel pair
    pub fn release(self) -> (SpiParts<S, CS, RST, P, D>, Option<DmaPair<C>>) {
        let parts = SpiParts {
            spi: self.spi,
            cs: self.cs,
            reset: self.reset,
            pins: self.pins,
            delay: self.delay,
        };
        (parts, self.dma)
    }

    fn reset_chip(&mut self) {
        let timing = self.config.reset;
        self.reset.set_low();
        self.delay.delay_ms(timing.assert_ms);
        self.reset.set_high();
        self.delay.delay_ms(timing.enable_ms);
        self.delay.delay_ms(timing.settle_ms);
    }

    fn exchange(
        &mut self,
        tx: Option<&[u8]>,
        rx: Option<&mut [u8]>,
        len: usize,
    ) -> Result<(), BusError> {
        if self.dma.is_some() && self.config.uses_dma(len) {
            self.exchange_dma(tx, rx, len)
        } else {
            self.exchange_polled(tx, rx, len)
        }
    }

    /// Byte-at-a-time exchange
    ///
    /// Only one side may be real on this path: a request carrying both a
    /// transmit and a receive buffer is refused with `BusFailure`.
    fn exchange_polled(
        &mut self,
        tx: Option<&[u8]>,
        mut rx: Option<&mut [u8]>,
        len: usize,
    ) -> Result<(), BusError> {
        if tx.is_some() && rx.is_some() {
            return Err(BusError::BusFailure);
        }

        self.cs.set_low();

        let mut result = Ok(());
        for i in 0..len {
            let out = tx.map_or(DUMMY_BYTE, |buf| buf[i]);
            match self.shift(out) {
                Ok(byte) => {
                    if let Some(buf) = rx.as_deref_mut() {
                        buf[i] = byte;
                    }
                }
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        while !self.spi.is_write_complete() {
            spin_loop();
        }
        self.cs.set_high();

        result
    }

    fn shift(&mut self, out: u8) -> Result<u8, BusError> {
        while !self.spi.is_ready_to_write() {
            spin_loop();
        }
        self.spi.write_byte(out).map_err(|_| BusError::BusFailure)?;

        while !self.spi.is_ready_to_read() {
            spin_loop();
        }
        self.spi.read_byte().map_err(|_| BusError::BusFailure)
    }

    /// DMA exchange, bounded by `dma_timeout_us`
    fn exchange_dma(
        &mut self,
        tx: Option<&[u8]>,
        rx: Option<&mut [u8]>,
        len: usize,
    ) -> Result<(), BusError> {
        let count = u16::try_from(len).map_err(|_| BusError::InvalidArgument)?;
        let timeout_us = self.config.dma_timeout_us;
        let data_register = self.spi.data_register();
        let Some(dma) = self.dma.as_mut() else {
            return Err(BusError::BusFailure);
        };

        // Stands in for the absent side; must outlive both jobs.
        let mut dummy: u32 = 0;
        let dummy_addr = core::ptr::addr_of_mut!(dummy) as usize;

        let tx_desc = Descriptor {
            source: match tx {
                Some(buf) => Endpoint::Incrementing(buf.as_ptr() as usize),
                None => Endpoint::Fixed(dummy_addr),
            },
            destination: Endpoint::Fixed(data_register),
            count,
        };
        let rx_desc = Descriptor {
            source: Endpoint::Fixed(data_register),
            destination: match rx {
                Some(buf) => Endpoint::Incrementing(buf.as_mut_ptr() as usize),
                None => Endpoint::Fixed(dummy_addr),
            },
            count,
        };

        dma.tx
            .set_descriptor(&tx_desc)
            .map_err(|_| BusError::BusFailure)?;
        dma.rx
            .set_descriptor(&rx_desc)
            .map_err(|_| BusError::BusFailure)?;

        compiler_fence(Ordering::SeqCst);
        self.cs.set_low();

        if dma.rx.start().is_err() {
            self.cs.set_high();
            return Err(BusError::BusFailure);
        }
        if dma.tx.start().is_err() {
            dma.rx.abort();
            self.cs.set_high();
            return Err(BusError::BusFailure);
        }

        let mut waited_us = 0;
        let done = loop {
            if dma.is_done() {
                break true;
            }
            if waited_us >= timeout_us {
                break false;
            }
            self.delay.delay_us(1);
            waited_us += 1;
        };

        if !done {
            dma.abort();
        }
        compiler_fence(Ordering::SeqCst);
        self.cs.set_high();

        if done {
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::error!("spi: dma not complete after {} us", timeout_us);
            Err(BusError::Timeout)
        }
    }
}

impl<S, CS, RST, P, D, C> HostBus for SpiBus<S, CS, RST, P, D, C>
where
    S: SpiMaster,
    CS: OutputPin,
    RST: OutputPin,
    P: FloatingPins,
    D: DelayNs,
    C: DmaChannel,
{
    type Config = WincSpiConfig;

    fn init(&mut self, config: &WincSpiConfig) -> Result<(), BusError> {
        if self.state.is_ready() {
            #[cfg(feature = "defmt")]
            if *config != self.config {
                defmt::warn!("spi: already initialized, new configuration ignored");
            }
            return Ok(());
        }

        // Deselect before the master starts driving SCK
        self.cs.set_high();

        self.spi.configure(&config.spi).map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("spi: configuration rejected: {}", defmt::Debug2Format(&_e));
            BusError::InitFailed
        })?;
        self.spi.enable();

        if let Some(dma) = self.dma.as_mut() {
            if let Err(e) = dma.allocate() {
                #[cfg(feature = "defmt")]
                defmt::error!("spi: dma channel allocation failed");
                self.spi.disable();
                return Err(e);
            }
        }

        self.config = *config;
        self.reset_chip();
        self.state = LinkState::Ready;
        Ok(())
    }

    fn transact(&mut self, request: TransferRequest<'_>) -> Result<(), BusError> {
        self.state.require_ready()?;
        request.validate()?;
        if request.len() > usize::from(u16::MAX) {
            return Err(BusError::InvalidArgument);
        }

        match request {
            TransferRequest::ReadWrite { tx, rx, len } => self.exchange(tx, rx, len),
            TransferRequest::Write { buf } => self.exchange(Some(buf), None, buf.len()),
            TransferRequest::Read { buf } => {
                let len = buf.len();
                self.exchange(None, Some(buf), len)
            }
            TransferRequest::WriteWrite { .. } => Err(BusError::InvalidArgument),
        }
    }

    fn deinit(&mut self) -> Result<(), BusError> {
        if !self.state.is_ready() {
            return Ok(());
        }

        // Hold the chip in reset while its bus floats
        self.reset.set_low();

        self.spi.disable();
        self.pins.float();
        if let Some(dma) = self.dma.as_mut() {
            dma.free();
        }

        self.state = LinkState::Uninitialized;
        Ok(())
    }

    fn mode(&self) -> BusMode {
        if self.dma.is_some() {
            BusMode::SpiDma
        } else {
            BusMode::SpiPolled
        }
    }
}
