//! Bus capability descriptor

/// Largest transaction the wrapper accepts, in bytes
///
/// Also the size of the I2C scratch buffer used by the header+payload write.
pub const MAX_TRX_SIZE: usize = 256;

/// Static bus limits published to the host driver
///
/// The host driver chunks larger payloads into transactions of at most
/// `max_trx_size` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusCapabilities {
    /// Maximum bytes per transaction
    pub max_trx_size: u16,
}

/// Capabilities of every bus built by this crate
pub const CAPABILITIES: BusCapabilities = BusCapabilities {
    max_trx_size: MAX_TRX_SIZE as u16,
};
