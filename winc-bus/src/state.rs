//! Bus lifecycle state
//!
//! `Uninitialized --init--> Ready --transact*--> Ready --deinit--> Uninitialized`

use crate::error::BusError;

/// Lifecycle of the peripheral behind a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Peripheral down, pins released
    #[default]
    Uninitialized,
    /// Peripheral configured and enabled
    Ready,
}

impl LinkState {
    /// Check if transactions may be issued
    pub fn is_ready(self) -> bool {
        self == LinkState::Ready
    }

    /// Precondition for every transaction
    pub fn require_ready(self) -> Result<(), BusError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(BusError::NotInitialized)
        }
    }
}
