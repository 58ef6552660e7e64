//! Half-duplex byte link contract.

use duolink_core::error::Result;

/// Discrete notification from the serial hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Receive data available or character timeout.
    ByteReceived,
    /// Transmitter holding register is empty.
    TransmitterReady,
    /// Line status error.
    LineError(LineErrorKind),
}

/// Line status error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineErrorKind {
    Overrun,
    Parity,
    Framing,
    Break,
    FifoError,
}

impl LineErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LineErrorKind::Overrun => "overrun",
            LineErrorKind::Parity => "parity",
            LineErrorKind::Framing => "framing",
            LineErrorKind::Break => "break",
            LineErrorKind::FifoError => "fifo_error",
        }
    }

    /// Data still in the receive FIFO is unrecoverable after these.
    pub fn requires_flush(self) -> bool {
        matches!(self, LineErrorKind::Overrun | LineErrorKind::FifoError)
    }
}

/// Result of handing one byte to the transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Sent,
    /// Holding register still full; try again.
    Busy,
}

/// Register-level view of a serial port.
///
/// `Err` means the hardware could not be accessed at all; a full transmitter
/// is `Ok(TxStatus::Busy)`.
pub trait ByteLink {
    /// Write one byte to the transmitter.
    fn transmit(&mut self, byte: u8) -> Result<TxStatus>;

    /// Transmitter holding register is empty.
    fn transmitter_empty(&mut self) -> Result<bool>;

    /// Receive buffer holds at least one byte.
    fn data_ready(&mut self) -> Result<bool>;

    /// Read one byte from the receive buffer, `None` if it is empty.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}
