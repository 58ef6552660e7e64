//! 16550-style UART register model.
//!
//! `Uart` drives a port through `PortIo` (whatever performs the actual
//! `inb`/`outb`), configures it from `LineConfig`, and turns IIR/LSR readings
//! into `LinkEvent`s for the dispatcher.

use duolink_core::error::Result;

use crate::config::LineConfig;
use crate::transport::link::{ByteLink, LineErrorKind, LinkEvent, TxStatus};

/// COM1 base address.
pub const COM1_BASE: u16 = 0x3F8;
/// COM1 IRQ line.
pub const COM1_IRQ: u8 = 4;

pub const REG_RBR: u16 = 0;
pub const REG_THR: u16 = 0;
pub const REG_DLL: u16 = 0;
pub const REG_IER: u16 = 1;
pub const REG_DLM: u16 = 1;
pub const REG_IIR: u16 = 2;
pub const REG_FCR: u16 = 2;
pub const REG_LCR: u16 = 3;
pub const REG_LSR: u16 = 5;

pub const LCR_DLAB: u8 = 1 << 7;

pub const IER_RDA: u8 = 1 << 0;
pub const IER_THRE: u8 = 1 << 1;
pub const IER_RLS: u8 = 1 << 2;

pub const IIR_NO_PENDING: u8 = 1 << 0;
const IIR_CAUSE_MASK: u8 = 0b0000_1110;
const IIR_MODEM_STATUS: u8 = 0b000;
const IIR_THR_EMPTY: u8 = 0b001;
const IIR_RX_DATA: u8 = 0b010;
const IIR_LINE_STATUS: u8 = 0b011;
const IIR_CHAR_TIMEOUT: u8 = 0b110;

pub const LSR_DATA_READY: u8 = 1 << 0;
pub const LSR_OVERRUN: u8 = 1 << 1;
pub const LSR_PARITY: u8 = 1 << 2;
pub const LSR_FRAMING: u8 = 1 << 3;
pub const LSR_BREAK: u8 = 1 << 4;
pub const LSR_THR_EMPTY: u8 = 1 << 5;
pub const LSR_FIFO_ERROR: u8 = 1 << 7;

/// Error bits of an LSR value, in register order.
pub fn line_errors(lsr: u8) -> Vec<LineErrorKind> {
    [
        (LSR_OVERRUN, LineErrorKind::Overrun),
        (LSR_PARITY, LineErrorKind::Parity),
        (LSR_FRAMING, LineErrorKind::Framing),
        (LSR_BREAK, LineErrorKind::Break),
        (LSR_FIFO_ERROR, LineErrorKind::FifoError),
    ]
    .into_iter()
    .filter(|(bit, _)| lsr & bit != 0)
    .map(|(_, kind)| kind)
    .collect()
}

/// Translate an interrupt identification (plus the LSR for line-status causes).
pub fn decode_interrupt(iir: u8, lsr: u8) -> Vec<LinkEvent> {
    if iir & IIR_NO_PENDING != 0 {
        return Vec::new();
    }
    match (iir & IIR_CAUSE_MASK) >> 1 {
        IIR_THR_EMPTY => vec![LinkEvent::TransmitterReady],
        IIR_RX_DATA | IIR_CHAR_TIMEOUT => vec![LinkEvent::ByteReceived],
        IIR_LINE_STATUS => line_errors(lsr)
            .into_iter()
            .map(LinkEvent::LineError)
            .collect(),
        IIR_MODEM_STATUS => {
            tracing::debug!(iir, "modem status interrupt ignored");
            Vec::new()
        }
        _ => {
            tracing::warn!(iir, "unknown uart interrupt");
            Vec::new()
        }
    }
}

/// Raw port access.
pub trait PortIo {
    fn inb(&mut self, port: u16) -> Result<u8>;
    fn outb(&mut self, port: u16, value: u8) -> Result<()>;
}

/// One UART behind a `PortIo`.
pub struct Uart<P> {
    io: P,
    base: u16,
}

impl<P: PortIo> Uart<P> {
    pub fn new(io: P, base: u16) -> Self {
        Self { io, base }
    }

    pub fn com1(io: P) -> Self {
        Self::new(io, COM1_BASE)
    }

    pub fn io(&self) -> &P {
        &self.io
    }

    /// Program rate, word format, FIFO and interrupt enables.
    pub fn configure(&mut self, line: &LineConfig) -> Result<()> {
        let (dll, dlm) = line.divisor();
        let lcr = line.lcr();

        self.io.outb(self.base + REG_LCR, lcr | LCR_DLAB)?;
        self.io.outb(self.base + REG_DLL, dll)?;
        self.io.outb(self.base + REG_DLM, dlm)?;
        self.io.outb(self.base + REG_LCR, lcr)?;
        self.io.outb(self.base + REG_FCR, line.fcr())?;
        self.io.outb(self.base + REG_IER, IER_RDA | IER_THRE | IER_RLS)?;

        tracing::info!(baud = line.baud, lcr, fcr = line.fcr(), "uart configured");
        Ok(())
    }

    /// Read IIR (and LSR) after an IRQ and report what happened.
    pub fn pending_events(&mut self) -> Result<Vec<LinkEvent>> {
        let iir = self.io.inb(self.base + REG_IIR)?;
        if iir & IIR_NO_PENDING != 0 {
            return Ok(Vec::new());
        }
        let lsr = self.io.inb(self.base + REG_LSR)?;
        Ok(decode_interrupt(iir, lsr))
    }

    fn lsr(&mut self) -> Result<u8> {
        self.io.inb(self.base + REG_LSR)
    }
}

impl<P: PortIo> ByteLink for Uart<P> {
    fn transmit(&mut self, byte: u8) -> Result<TxStatus> {
        if self.lsr()? & LSR_THR_EMPTY == 0 {
            return Ok(TxStatus::Busy);
        }
        self.io.outb(self.base + REG_THR, byte)?;
        Ok(TxStatus::Sent)
    }

    fn transmitter_empty(&mut self) -> Result<bool> {
        Ok(self.lsr()? & LSR_THR_EMPTY != 0)
    }

    fn data_ready(&mut self) -> Result<bool> {
        Ok(self.lsr()? & LSR_DATA_READY != 0)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.lsr()? & LSR_DATA_READY == 0 {
            return Ok(None);
        }
        Ok(Some(self.io.inb(self.base + REG_RBR)?))
    }
}
