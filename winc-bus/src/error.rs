//! Bus error taxonomy

/// Errors reported by bus operations
///
/// Every error is final for the call that produced it; retry/abort policy
/// belongs to the host driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Malformed request (no buffer, zero length, short buffer, oversize,
    /// or a request kind the bus mode does not carry)
    InvalidArgument,
    /// Peripheral rejected the operation, or full duplex was requested on
    /// the polled SPI path
    BusFailure,
    /// Peripheral bring-up rejected by the hardware driver
    InitFailed,
    /// ioctl command code not handled by this bus mode
    UnrecognizedCommand,
    /// Operation issued before `init` or after `deinit`
    NotInitialized,
    /// I2C retry ceiling exhausted or DMA completion not observed in time
    Timeout,
}

/// Host driver status for a successful call
pub const STATUS_OK: i8 = 0;

impl BusError {
    /// Signed status code understood by the WINC host driver
    pub const fn status_code(self) -> i8 {
        match self {
            BusError::UnrecognizedCommand => -1,
            BusError::Timeout => -4,
            BusError::InitFailed => -5,
            BusError::BusFailure => -6,
            BusError::NotInitialized => -12,
            BusError::InvalidArgument => -15,
        }
    }
}

/// Collapse a bus result into a host driver status code
pub fn to_status(result: Result<(), BusError>) -> i8 {
    match result {
        Ok(()) => STATUS_OK,
        Err(e) => e.status_code(),
    }
}
