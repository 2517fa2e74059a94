//! GPIO lines used by the WINC bus
//!
//! Chip select and reset are plain push-pull outputs. The bus pins are held
//! as `Flex` so they can be handed back as floating inputs on teardown.

use embassy_rp::gpio::{Flex, Output, Pull};
use winc_hal::{FloatingPins, OutputPin};

/// Push-pull output (chip select, reset)
pub struct Rp2040Output<'d>(Output<'d>);

impl<'d> Rp2040Output<'d> {
    /// Wrap an output already driven to its idle level
    pub fn new(pin: Output<'d>) -> Self {
        Self(pin)
    }
}

impl<'d> OutputPin for Rp2040Output<'d> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn toggle(&mut self) {
        self.0.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Bus pins released together on deinit
///
/// The pins keep their peripheral function while the bus is up; `float`
/// turns them into inputs with no pull.
pub struct BusPins<'d, const N: usize> {
    pins: [Flex<'d>; N],
}

impl<'d, const N: usize> BusPins<'d, N> {
    /// Group the pins routed to the bus peripheral
    ///
    /// Build the `Flex` handles from reborrowed pins so the peripheral
    /// driver keeps its own.
    pub fn new(pins: [Flex<'d>; N]) -> Self {
        Self { pins }
    }
}

impl<'d, const N: usize> FloatingPins for BusPins<'d, N> {
    fn float(&mut self) {
        for pin in self.pins.iter_mut() {
            pin.set_as_input();
            pin.set_pull(Pull::None);
        }
    }
}
