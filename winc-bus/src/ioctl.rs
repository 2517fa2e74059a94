//! ioctl adapter
//!
//! Translates the host driver's command code + parameter blob calling
//! convention into [`TransferRequest`]s. Only the commands of the bus mode
//! in use are accepted: I2C builds carry read, write and the special
//! header+payload write; SPI builds carry the full-duplex exchange.

use crate::error::BusError;
use crate::host::{BusMode, HostBus};
use crate::request::TransferRequest;

/// Read a packet (I2C)
pub const NM_BUS_IOCTL_R: u8 = 0;
/// Write a packet (I2C)
pub const NM_BUS_IOCTL_W: u8 = 1;
/// Write two buffers as one packet (I2C)
pub const NM_BUS_IOCTL_W_SPECIAL: u8 = 2;
/// Full-duplex exchange (SPI)
pub const NM_BUS_IOCTL_RW: u8 = 3;

/// Decoded ioctl command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoctlCommand {
    Read,
    Write,
    WriteSpecial,
    ReadWrite,
}

impl IoctlCommand {
    /// Decode a raw command code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            NM_BUS_IOCTL_R => Some(IoctlCommand::Read),
            NM_BUS_IOCTL_W => Some(IoctlCommand::Write),
            NM_BUS_IOCTL_W_SPECIAL => Some(IoctlCommand::WriteSpecial),
            NM_BUS_IOCTL_RW => Some(IoctlCommand::ReadWrite),
            _ => None,
        }
    }

    /// Raw command code
    pub fn code(self) -> u8 {
        match self {
            IoctlCommand::Read => NM_BUS_IOCTL_R,
            IoctlCommand::Write => NM_BUS_IOCTL_W,
            IoctlCommand::WriteSpecial => NM_BUS_IOCTL_W_SPECIAL,
            IoctlCommand::ReadWrite => NM_BUS_IOCTL_RW,
        }
    }

    /// Check if a bus of the given mode handles this command
    pub fn supported_by(self, mode: BusMode) -> bool {
        match self {
            IoctlCommand::Read | IoctlCommand::Write | IoctlCommand::WriteSpecial => {
                mode == BusMode::I2c
            }
            IoctlCommand::ReadWrite => mode.is_spi(),
        }
    }
}

/// Parameter blob accompanying a command
#[derive(Debug)]
pub enum IoctlParam<'a> {
    /// Destination of a packet read
    I2cRead { buf: &'a mut [u8] },
    /// Source of a packet write
    I2cWrite { buf: &'a [u8] },
    /// Header and payload of a special write
    I2cSpecial { buf1: &'a [u8], buf2: &'a [u8] },
    /// Duplex exchange; either buffer may be absent
    SpiRw {
        tx: Option<&'a [u8]>,
        rx: Option<&'a mut [u8]>,
        len: u16,
    },
}

/// Decode a command and forward it to the bus
///
/// Unknown codes and codes of the other bus mode are rejected before the
/// bus is touched.
pub fn dispatch<B: HostBus>(
    bus: &mut B,
    command: u8,
    param: IoctlParam<'_>,
) -> Result<(), BusError> {
    let cmd = match IoctlCommand::from_code(command) {
        Some(cmd) if cmd.supported_by(bus.mode()) => cmd,
        _ => {
            #[cfg(feature = "defmt")]
            defmt::warn!("invalid ioctl cmd {}", command);
            return Err(BusError::UnrecognizedCommand);
        }
    };

    let request = match (cmd, param) {
        (IoctlCommand::Read, IoctlParam::I2cRead { buf }) => TransferRequest::Read { buf },
        (IoctlCommand::Write, IoctlParam::I2cWrite { buf }) => TransferRequest::Write { buf },
        (IoctlCommand::WriteSpecial, IoctlParam::I2cSpecial { buf1, buf2 }) => {
            TransferRequest::WriteWrite {
                first: buf1,
                second: buf2,
            }
        }
        (IoctlCommand::ReadWrite, IoctlParam::SpiRw { tx, rx, len }) => {
            TransferRequest::ReadWrite {
                tx,
                rx,
                len: usize::from(len),
            }
        }
        _ => return Err(BusError::InvalidArgument),
    };

    bus.transact(request)
}
