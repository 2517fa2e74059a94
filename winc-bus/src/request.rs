//! Transfer requests
//!
//! A [`TransferRequest`] describes one transaction. It borrows the caller's
//! buffers for the duration of the call and is never stored.

use crate::error::BusError;

/// One bus transaction
#[derive(Debug)]
pub enum TransferRequest<'a> {
    /// Fill `buf` from the chip
    Read { buf: &'a mut [u8] },
    /// Send `buf` to the chip
    Write { buf: &'a [u8] },
    /// Send `first` immediately followed by `second` as one write
    ///
    /// Used by the host driver for command header + payload framing.
    WriteWrite { first: &'a [u8], second: &'a [u8] },
    /// Exchange `len` bytes; an absent side is replaced by a dummy
    ReadWrite {
        tx: Option<&'a [u8]>,
        rx: Option<&'a mut [u8]>,
        len: usize,
    },
}

impl<'a> TransferRequest<'a> {
    /// Half-duplex transmit expressed as a duplex request
    pub fn transmit(tx: &'a [u8]) -> Self {
        TransferRequest::ReadWrite {
            len: tx.len(),
            tx: Some(tx),
            rx: None,
        }
    }

    /// Half-duplex receive expressed as a duplex request
    pub fn receive(rx: &'a mut [u8]) -> Self {
        TransferRequest::ReadWrite {
            len: rx.len(),
            tx: None,
            rx: Some(rx),
        }
    }

    /// Bytes moved on the wire
    pub fn len(&self) -> usize {
        match self {
            TransferRequest::Read { buf } => buf.len(),
            TransferRequest::Write { buf } => buf.len(),
            TransferRequest::WriteWrite { first, second } => first.len() + second.len(),
            TransferRequest::ReadWrite { len, .. } => *len,
        }
    }

    /// Check if the request moves no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the request shape
    ///
    /// A request must move at least one byte and must name at least one
    /// buffer; every buffer it names must hold `len` bytes.
    pub fn validate(&self) -> Result<(), BusError> {
        if self.is_empty() {
            return Err(BusError::InvalidArgument);
        }

        if let TransferRequest::ReadWrite { tx, rx, len } = self {
            if tx.is_none() && rx.is_none() {
                return Err(BusError::InvalidArgument);
            }
            if tx.is_some_and(|b| b.len() < *len) {
                return Err(BusError::InvalidArgument);
            }
            if rx.as_ref().is_some_and(|b| b.len() < *len) {
                return Err(BusError::InvalidArgument);
            }
        }

        Ok(())
    }
}
