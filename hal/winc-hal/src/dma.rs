//! DMA channel abstractions
//!
//! Provides a descriptor-based view of a peripheral-triggered DMA channel.
//! The bus wrapper allocates one channel per SPI direction, points them at
//! the SPI data register, and waits on their completion flags.
//!
//! Addresses are plain `usize` values: the descriptor only describes the
//! transfer, nothing here dereferences them. Keeping the memory behind an
//! address alive until the channel reports done (or is aborted) is the
//! caller's job.

/// Peripheral request line that paces the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// SPI transmit data register empty
    SpiTx,
    /// SPI receive data register full
    SpiRx,
}

/// How much is moved per trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerAction {
    /// One beat (one byte here) per request
    Beat,
    /// One block per request
    Block,
    /// The whole transaction per request
    Transaction,
}

/// Channel allocation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Peripheral trigger source
    pub trigger: Trigger,
    /// Action taken on each trigger
    pub action: TriggerAction,
}

impl ChannelConfig {
    /// Beat-paced channel on the given trigger
    pub const fn beat(trigger: Trigger) -> Self {
        Self {
            trigger,
            action: TriggerAction::Beat,
        }
    }
}

/// One side of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Buffer starting at the address, advanced after every beat
    Incrementing(usize),
    /// Single location read or written on every beat (data register, dummy word)
    Fixed(usize),
}

impl Endpoint {
    /// Start address of the endpoint
    pub fn address(&self) -> usize {
        match *self {
            Endpoint::Incrementing(addr) | Endpoint::Fixed(addr) => addr,
        }
    }

    /// Whether the address advances after every beat
    pub fn increments(&self) -> bool {
        matches!(self, Endpoint::Incrementing(_))
    }
}

/// Transfer descriptor
///
/// Chips whose DMA engine wants the end address of an incrementing range
/// (the SAMD DMAC, for one) convert in their backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Where beats are read from
    pub source: Endpoint,
    /// Where beats are written to
    pub destination: Endpoint,
    /// Number of beats
    pub count: u16,
}

/// Peripheral-triggered DMA channel
pub trait DmaChannel {
    /// Error type for channel operations
    type Error: core::fmt::Debug;

    /// Claim a hardware channel and bind it to a trigger
    ///
    /// The transfer-complete interrupt must be enabled by the implementation
    /// so that [`is_done`](Self::is_done) can observe it.
    fn allocate(&mut self, config: &ChannelConfig) -> Result<(), Self::Error>;

    /// Release the hardware channel
    fn free(&mut self);

    /// Check whether a hardware channel is currently held
    fn is_allocated(&self) -> bool;

    /// Install the descriptor for the next job
    fn set_descriptor(&mut self, descriptor: &Descriptor) -> Result<(), Self::Error>;

    /// Start the installed job and clear the completion flag
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Stop a running job
    fn abort(&mut self);

    /// Completion flag, set from the transfer-complete interrupt
    fn is_done(&self) -> bool;
}

/// Channel type for builds without DMA
///
/// Uninhabited: a bus built with `NoDma` can never hold a channel, so every
/// transfer takes the polled path.
#[derive(Debug)]
pub enum NoDma {}

impl DmaChannel for NoDma {
    type Error = core::convert::Infallible;

    fn allocate(&mut self, _config: &ChannelConfig) -> Result<(), Self::Error> {
        match *self {}
    }

    fn free(&mut self) {
        match *self {}
    }

    fn is_allocated(&self) -> bool {
        match *self {}
    }

    fn set_descriptor(&mut self, _descriptor: &Descriptor) -> Result<(), Self::Error> {
        match *self {}
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    fn abort(&mut self) {
        match *self {}
    }

    fn is_done(&self) -> bool {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_accessors() {
        let buf = Endpoint::Incrementing(0x2000_0100);
        assert_eq!(buf.address(), 0x2000_0100);
        assert!(buf.increments());

        let reg = Endpoint::Fixed(0x4200_0828);
        assert_eq!(reg.address(), 0x4200_0828);
        assert!(!reg.increments());
    }

    #[test]
    fn test_beat_config() {
        let config = ChannelConfig::beat(Trigger::SpiRx);
        assert_eq!(config.trigger, Trigger::SpiRx);
        assert_eq!(config.action, TriggerAction::Beat);
    }
}
