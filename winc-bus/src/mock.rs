//! Simulated peripherals for host tests
//!
//! Every mock keeps its state behind an `Rc<RefCell<..>>` so a test can
//! hand the mock to a bus and keep a clone to inspect what happened on the
//! wire afterwards.

#![allow(unsafe_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use winc_hal::dma::{ChannelConfig, Descriptor, Endpoint, Trigger};
use winc_hal::i2c::I2cConfig;
use winc_hal::spi::SpiConfig;
use winc_hal::{DelayNs, DmaChannel, FloatingPins, I2cMaster, OutputPin, SpiMaster};

/// Error returned by every mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Fake SPI data register address, never dereferenced
pub const DATA_REGISTER: usize = 0x4200_0828;

// ---------------------------------------------------------------------------
// I2C
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct I2cState {
    pub config: Option<I2cConfig>,
    pub enabled: bool,
    pub reject_config: bool,
    /// Packets to NACK before the slave starts answering
    pub busy_for: u32,
    /// Every packet call, failed or not
    pub attempts: u32,
    /// Successful writes as (address, bytes)
    pub written: Vec<(u8, Vec<u8>)>,
    /// Bytes served to successful reads
    pub read_data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct MockI2c(pub Rc<RefCell<I2cState>>);

impl MockI2c {
    pub fn state(&self) -> std::cell::Ref<'_, I2cState> {
        self.0.borrow()
    }

    pub fn set_busy_for(&self, n: u32) {
        self.0.borrow_mut().busy_for = n;
    }

    fn take_attempt(&self) -> Result<(), MockError> {
        let mut s = self.0.borrow_mut();
        s.attempts += 1;
        if s.busy_for > 0 {
            s.busy_for -= 1;
            return Err(MockError);
        }
        Ok(())
    }
}

impl I2cMaster for MockI2c {
    type Error = MockError;

    fn configure(&mut self, config: &I2cConfig) -> Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        if s.reject_config {
            return Err(MockError);
        }
        s.config = Some(*config);
        Ok(())
    }

    fn enable(&mut self) {
        self.0.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.0.borrow_mut().enabled = false;
    }

    fn write_packet(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.take_attempt()?;
        self.0.borrow_mut().written.push((address, data.to_vec()));
        Ok(())
    }

    fn read_packet(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.take_attempt()?;
        let s = self.0.borrow();
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = s.read_data.get(i).copied().unwrap_or(0);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GPIO
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PinState {
    pub high: bool,
    /// Every level written, in order
    pub history: Vec<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MockPin(pub Rc<RefCell<PinState>>);

impl MockPin {
    pub fn history(&self) -> Vec<bool> {
        self.0.borrow().history.clone()
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        let mut s = self.0.borrow_mut();
        s.high = true;
        s.history.push(true);
    }

    fn set_low(&mut self) {
        let mut s = self.0.borrow_mut();
        s.high = false;
        s.history.push(false);
    }

    fn toggle(&mut self) {
        let high = self.0.borrow().high;
        self.set_state(!high);
    }

    fn is_set_high(&self) -> bool {
        self.0.borrow().high
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockBusPins(pub Rc<RefCell<u32>>);

impl MockBusPins {
    pub fn float_count(&self) -> u32 {
        *self.0.borrow()
    }
}

impl FloatingPins for MockBusPins {
    fn float(&mut self) {
        *self.0.borrow_mut() += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockDelay(pub Rc<RefCell<u64>>);

impl MockDelay {
    pub fn total_ns(&self) -> u64 {
        *self.0.borrow()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.0.borrow_mut() += u64::from(ns);
    }
}

// ---------------------------------------------------------------------------
// SPI
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SpiState {
    pub config: Option<SpiConfig>,
    pub enabled: bool,
    pub reject_config: bool,
    /// Bytes clocked out on MOSI (polled and DMA)
    pub mosi: Vec<u8>,
    /// Bytes the chip answers with on MISO; zero once exhausted
    pub miso: VecDeque<u8>,
    /// Byte latched in the receive register
    pub rx_latch: Option<u8>,
    /// Bytes shifted while chip select was high
    pub unselected_bytes: u32,
    /// Order in which DMA jobs were started
    pub dma_starts: Vec<Trigger>,
    /// Chip select line, sampled on every byte
    pub cs: Option<MockPin>,
}

impl SpiState {
    fn shift(&mut self, out: u8) -> u8 {
        if self.cs.as_ref().is_some_and(|cs| cs.is_set_high()) {
            self.unselected_bytes += 1;
        }
        self.mosi.push(out);
        self.miso.pop_front().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockSpi(pub Rc<RefCell<SpiState>>);

impl MockSpi {
    pub fn state(&self) -> std::cell::Ref<'_, SpiState> {
        self.0.borrow()
    }

    pub fn answer_with(&self, bytes: &[u8]) {
        self.0.borrow_mut().miso.extend(bytes.iter().copied());
    }
}

impl SpiMaster for MockSpi {
    type Error = MockError;

    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        if s.reject_config {
            return Err(MockError);
        }
        s.config = Some(*config);
        Ok(())
    }

    fn enable(&mut self) {
        self.0.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.0.borrow_mut().enabled = false;
    }

    fn is_ready_to_write(&self) -> bool {
        self.0.borrow().rx_latch.is_none()
    }

    fn is_ready_to_read(&self) -> bool {
        self.0.borrow().rx_latch.is_some()
    }

    fn is_write_complete(&self) -> bool {
        true
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        if s.rx_latch.is_some() {
            return Err(MockError);
        }
        let answer = s.shift(byte);
        s.rx_latch = Some(answer);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.0.borrow_mut().rx_latch.take().ok_or(MockError)
    }

    fn data_register(&self) -> usize {
        DATA_REGISTER
    }
}

// ---------------------------------------------------------------------------
// DMA
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DmaState {
    pub config: Option<ChannelConfig>,
    pub allocated: bool,
    pub reject_allocate: bool,
    pub descriptor: Option<Descriptor>,
    pub running: bool,
    pub aborts: u32,
    /// `is_done` polls needed after `start` before the job reports done
    pub latency: u32,
    pub never_completes: bool,
    pub polls: u32,
    pub completed: bool,
}

/// One DMA channel moving bytes between memory and the mock SPI wire
#[derive(Debug, Clone)]
pub struct MockDma {
    pub state: Rc<RefCell<DmaState>>,
    wire: MockSpi,
}

impl MockDma {
    pub fn new(wire: &MockSpi) -> Self {
        Self {
            state: Rc::default(),
            wire: wire.clone(),
        }
    }

    pub fn with_latency(self, latency: u32) -> Self {
        self.state.borrow_mut().latency = latency;
        self
    }

    pub fn state(&self) -> std::cell::Ref<'_, DmaState> {
        self.state.borrow()
    }

    /// Move the job's bytes; the wire side (data register) is never touched
    fn run(&self, trigger: Trigger, desc: &Descriptor) {
        let mut wire = self.wire.0.borrow_mut();
        for i in 0..usize::from(desc.count) {
            match trigger {
                Trigger::SpiTx => {
                    let addr = offset(&desc.source, i);
                    // SAFETY: the transport keeps the source alive until done
                    let byte = unsafe { core::ptr::read_volatile(addr as *const u8) };
                    wire.mosi.push(byte);
                }
                Trigger::SpiRx => {
                    let byte = wire.miso.pop_front().unwrap_or(0);
                    let addr = offset(&desc.destination, i);
                    // SAFETY: the transport keeps the destination alive until done
                    unsafe { core::ptr::write_volatile(addr as *mut u8, byte) };
                }
            }
        }
    }
}

fn offset(endpoint: &Endpoint, i: usize) -> usize {
    match *endpoint {
        Endpoint::Incrementing(addr) => addr + i,
        Endpoint::Fixed(addr) => addr,
    }
}

impl DmaChannel for MockDma {
    type Error = MockError;

    fn allocate(&mut self, config: &ChannelConfig) -> Result<(), Self::Error> {
        let mut s = self.state.borrow_mut();
        if s.reject_allocate {
            return Err(MockError);
        }
        s.allocated = true;
        s.config = Some(*config);
        Ok(())
    }

    fn free(&mut self) {
        let mut s = self.state.borrow_mut();
        s.allocated = false;
        s.config = None;
    }

    fn is_allocated(&self) -> bool {
        self.state.borrow().allocated
    }

    fn set_descriptor(&mut self, descriptor: &Descriptor) -> Result<(), Self::Error> {
        let mut s = self.state.borrow_mut();
        if !s.allocated {
            return Err(MockError);
        }
        s.descriptor = Some(*descriptor);
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        let (trigger, desc) = {
            let mut s = self.state.borrow_mut();
            let trigger = s.config.ok_or(MockError)?.trigger;
            let desc = s.descriptor.ok_or(MockError)?;
            s.running = true;
            s.completed = false;
            s.polls = 0;
            (trigger, desc)
        };
        self.wire.0.borrow_mut().dma_starts.push(trigger);
        self.run(trigger, &desc);
        Ok(())
    }

    fn abort(&mut self) {
        let mut s = self.state.borrow_mut();
        s.running = false;
        s.aborts += 1;
    }

    fn is_done(&self) -> bool {
        let mut s = self.state.borrow_mut();
        if !s.running || s.never_completes {
            return s.completed;
        }
        s.polls += 1;
        if s.polls > s.latency {
            s.completed = true;
            s.running = false;
        }
        s.completed
    }
}
