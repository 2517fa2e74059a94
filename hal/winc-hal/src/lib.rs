//! WINC bus Hardware Abstraction Layer
//!
//! This crate defines the peripheral traits the WINC bus wrapper is written
//! against. Chip-specific HALs (RP2040, ...) implement them so the same
//! transport code can drive the WiFi companion chip on different
//! microcontrollers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  WINC host driver (ioctl contract)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  winc-bus (I2C / SPI / SPI+DMA)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  winc-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  winc-hal-    │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::FloatingPins`] - Chip select, reset and bus pins
//! - [`i2c::I2cMaster`] - Packet level I2C master
//! - [`spi::SpiMaster`] - Byte level SPI master
//! - [`dma::DmaChannel`] - Peripheral-triggered DMA channel
//! - [`DelayNs`] - Blocking delays (from `embedded-hal`)

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod gpio;
pub mod i2c;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use dma::{DmaChannel, NoDma};
pub use embedded_hal::delay::DelayNs;
pub use gpio::{FloatingPins, OutputPin};
pub use i2c::I2cMaster;
pub use spi::SpiMaster;
