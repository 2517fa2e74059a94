//! DMA channels paced by the SPI blocks
//!
//! Each channel owns one embassy-rp DMA channel and programs it directly:
//! byte-wide beats, paced by the SPI block's TX or RX data request, with
//! completion read back from the channel's busy flag. The channel raises no
//! interrupt (`irq_quiet`), so the embassy-rp DMA handler never sees it.

use core::sync::atomic::{compiler_fence, Ordering};

use embassy_rp::dma::{AnyChannel, Channel};
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::Peri;
use winc_hal::dma::{ChannelConfig, Descriptor, Trigger, TriggerAction};
use winc_hal::DmaChannel;

use crate::spi::SpiPort;

/// Error from DMA operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Trigger action the RP2040 DREQ pacing cannot express
    UnsupportedAction,
    /// Descriptor or start before `allocate`
    NotAllocated,
    /// Start before a descriptor was loaded
    NoDescriptor,
    /// Channel still moving the previous job
    Busy,
}

/// Data request line pacing `trigger` on `port`
pub fn dreq(port: SpiPort, trigger: Trigger) -> TreqSel {
    match (port, trigger) {
        (SpiPort::Spi0, Trigger::SpiTx) => TreqSel::SPI0_TX,
        (SpiPort::Spi0, Trigger::SpiRx) => TreqSel::SPI0_RX,
        (SpiPort::Spi1, Trigger::SpiTx) => TreqSel::SPI1_TX,
        (SpiPort::Spi1, Trigger::SpiRx) => TreqSel::SPI1_RX,
    }
}

/// Check a channel configuration against what DREQ pacing supports
///
/// A DREQ releases one beat at a time, so only `Beat` actions map onto it.
pub fn check_config(config: &ChannelConfig) -> Result<(), DmaError> {
    match config.action {
        TriggerAction::Beat => Ok(()),
        TriggerAction::Block | TriggerAction::Transaction => Err(DmaError::UnsupportedAction),
    }
}

/// One DMA channel bound to an SPI block
pub struct Rp2040DmaChannel<'d> {
    _channel: Peri<'d, AnyChannel>,
    number: u8,
    port: SpiPort,
    treq: Option<TreqSel>,
    descriptor: Option<Descriptor>,
    started: bool,
}

impl<'d> Rp2040DmaChannel<'d> {
    /// Take a DMA channel for use with the SPI block on `port`
    ///
    /// The channel is idle until [`DmaChannel::allocate`] binds it to a
    /// data request.
    pub fn new(channel: Peri<'d, AnyChannel>, port: SpiPort) -> Self {
        let number = channel.number();
        Self {
            _channel: channel,
            number,
            port,
            treq: None,
            descriptor: None,
            started: false,
        }
    }

    fn regs(&self) -> pac::dma::Channel {
        pac::DMA.ch(usize::from(self.number))
    }

    fn is_busy(&self) -> bool {
        self.regs().ctrl_trig().read().busy()
    }
}

impl<'d> DmaChannel for Rp2040DmaChannel<'d> {
    type Error = DmaError;

    fn allocate(&mut self, config: &ChannelConfig) -> Result<(), Self::Error> {
        check_config(config)?;
        self.treq = Some(dreq(self.port, config.trigger));
        self.descriptor = None;
        self.started = false;
        Ok(())
    }

    fn free(&mut self) {
        if self.started {
            self.abort();
        }
        self.treq = None;
        self.descriptor = None;
    }

    fn is_allocated(&self) -> bool {
        self.treq.is_some()
    }

    fn set_descriptor(&mut self, descriptor: &Descriptor) -> Result<(), Self::Error> {
        if self.treq.is_none() {
            return Err(DmaError::NotAllocated);
        }
        if self.started && self.is_busy() {
            return Err(DmaError::Busy);
        }
        self.descriptor = Some(*descriptor);
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        let treq = self.treq.ok_or(DmaError::NotAllocated)?;
        let desc = self.descriptor.ok_or(DmaError::NoDescriptor)?;
        let number = self.number;
        let regs = self.regs();

        regs.read_addr().write_value(desc.source.address() as u32);
        regs.write_addr().write_value(desc.destination.address() as u32);
        regs.trans_count().write(|w| *w = u32::from(desc.count));

        compiler_fence(Ordering::SeqCst);
        regs.ctrl_trig().write(|w| {
            w.set_treq_sel(treq);
            w.set_data_size(DataSize::SIZE_BYTE);
            w.set_incr_read(desc.source.increments());
            w.set_incr_write(desc.destination.increments());
            // Chaining to itself disables chaining
            w.set_chain_to(number);
            w.set_irq_quiet(true);
            w.set_en(true);
        });
        compiler_fence(Ordering::SeqCst);

        self.started = true;
        Ok(())
    }

    fn abort(&mut self) {
        pac::DMA
            .chan_abort()
            .modify(|m| m.set_chan_abort(1 << self.number));
        while self.is_busy() {}
        self.started = false;
    }

    fn is_done(&self) -> bool {
        self.started && !self.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dreq_per_port() {
        assert_eq!(dreq(SpiPort::Spi0, Trigger::SpiTx), TreqSel::SPI0_TX);
        assert_eq!(dreq(SpiPort::Spi0, Trigger::SpiRx), TreqSel::SPI0_RX);
        assert_eq!(dreq(SpiPort::Spi1, Trigger::SpiTx), TreqSel::SPI1_TX);
        assert_eq!(dreq(SpiPort::Spi1, Trigger::SpiRx), TreqSel::SPI1_RX);
    }

    #[test]
    fn test_only_beat_pacing() {
        assert!(check_config(&ChannelConfig::beat(Trigger::SpiRx)).is_ok());

        let block = ChannelConfig {
            trigger: Trigger::SpiTx,
            action: TriggerAction::Block,
        };
        assert_eq!(check_config(&block), Err(DmaError::UnsupportedAction));
    }
}
