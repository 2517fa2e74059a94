//! WINC1500 host bus wrapper
//!
//! Moves raw bytes between the WINC host driver and the companion chip over
//! one statically selected bus:
//!
//! - [`I2cBus`] - packet transfers to the chip's fixed slave address, with
//!   bounded retries and the header+payload "special" write
//! - [`SpiBus`] - full-duplex transfers, byte-polled for short frames and
//!   DMA driven (when built with channels) at or above the threshold
//!
//! Both implement [`HostBus`], the four-function contract (`init`, `ioctl`,
//! `deinit`, `reinit`) the host driver calls. Every operation blocks until
//! the transaction completes; callers serialize access.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod capabilities;
pub mod config;
pub mod error;
pub mod host;
pub mod i2c;
pub mod ioctl;
pub mod request;
pub mod spi;
pub mod state;

#[cfg(test)]
mod mock;

pub use capabilities::{BusCapabilities, CAPABILITIES, MAX_TRX_SIZE};
pub use config::{ResetTiming, WincI2cConfig, WincSpiConfig};
pub use error::BusError;
pub use host::{BusMode, HostBus};
pub use i2c::I2cBus;
pub use ioctl::{IoctlCommand, IoctlParam};
pub use request::TransferRequest;
pub use spi::SpiBus;
pub use state::LinkState;
