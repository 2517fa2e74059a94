//! GPIO pin abstractions
//!
//! Provides traits for the few discrete lines the bus wrapper touches:
//! the SPI chip select, the companion chip's reset line, and the bus pins
//! that are released when the bus is torn down.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// A group of bus pins that can be released
///
/// After the peripheral is disabled the pins must stop driving the lines,
/// otherwise a powered-down companion chip gets back-fed through its I/O.
pub trait FloatingPins {
    /// Reconfigure every pin in the group as an input with no pull
    fn float(&mut self);
}
