//! In-memory null modem.
//!
//! Two `LoopbackLink` endpoints share one wire. A transmitted byte lands in the
//! other side's receive FIFO immediately, but the sender's transmitter stays
//! busy until its next `clock()` (one character time), which then raises
//! `TransmitterReady`. Clocking once per tick gives roughly the throughput of
//! a 1200 baud line at 60 Hz.
//!
//! Interrupts are queued per side and handed out one at a time by
//! `InterruptLine::poll`, the way the OS serializes IRQ delivery.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use duolink_core::error::{DuolinkError, Result};

use crate::transport::link::{ByteLink, LineErrorKind, LinkEvent, TxStatus};

/// Receive FIFO depth of a 16550.
pub const RX_FIFO_DEPTH: usize = 16;

#[derive(Debug, Default)]
struct Endpoint {
    rx: VecDeque<u8>,
    irq: VecDeque<LinkEvent>,
    tx_busy: bool,
}

impl Endpoint {
    fn raise(&mut self, evt: LinkEvent) {
        if !self.irq.contains(&evt) {
            self.irq.push_back(evt);
        }
    }

    fn deliver(&mut self, byte: u8) {
        if self.rx.len() >= RX_FIFO_DEPTH {
            self.raise(LinkEvent::LineError(LineErrorKind::Overrun));
            return;
        }
        self.rx.push_back(byte);
        self.raise(LinkEvent::ByteReceived);
    }
}

#[derive(Debug, Default)]
struct Wire {
    ends: [Endpoint; 2],
}

/// Factory for a connected endpoint pair.
pub struct NullModem;

impl NullModem {
    pub fn pair() -> (LoopbackLink, LoopbackLink) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        (
            LoopbackLink {
                wire: Arc::clone(&wire),
                side: 0,
            },
            LoopbackLink { wire, side: 1 },
        )
    }
}

/// One end of the null modem. Clones share the same endpoint.
#[derive(Debug, Clone)]
pub struct LoopbackLink {
    wire: Arc<Mutex<Wire>>,
    side: usize,
}

impl LoopbackLink {
    fn lock(&self) -> Result<MutexGuard<'_, Wire>> {
        self.wire
            .lock()
            .map_err(|_| DuolinkError::Link("null modem wire poisoned".into()))
    }

    /// Interrupt source for this endpoint.
    pub fn interrupts(&self) -> InterruptLine {
        InterruptLine {
            wire: Arc::clone(&self.wire),
            side: self.side,
        }
    }

    /// One character time: a busy transmitter finishes its byte.
    pub fn clock(&self) -> Result<()> {
        let mut wire = self.lock()?;
        let me = &mut wire.ends[self.side];
        if me.tx_busy {
            me.tx_busy = false;
            me.raise(LinkEvent::TransmitterReady);
        }
        Ok(())
    }

    /// Raise a line status error on this endpoint.
    pub fn inject_line_error(&self, kind: LineErrorKind) -> Result<()> {
        self.lock()?.ends[self.side].raise(LinkEvent::LineError(kind));
        Ok(())
    }

    /// Put raw bytes into this endpoint's receive FIFO as if they came off the line.
    pub fn inject_rx(&self, bytes: &[u8]) -> Result<()> {
        let mut wire = self.lock()?;
        for &b in bytes {
            wire.ends[self.side].deliver(b);
        }
        Ok(())
    }

    /// Bytes waiting in this endpoint's receive FIFO.
    pub fn rx_pending(&self) -> usize {
        self.lock().map(|w| w.ends[self.side].rx.len()).unwrap_or(0)
    }
}

impl ByteLink for LoopbackLink {
    fn transmit(&mut self, byte: u8) -> Result<TxStatus> {
        let mut wire = self.lock()?;
        if wire.ends[self.side].tx_busy {
            return Ok(TxStatus::Busy);
        }
        wire.ends[self.side].tx_busy = true;
        wire.ends[1 - self.side].deliver(byte);
        Ok(TxStatus::Sent)
    }

    fn transmitter_empty(&mut self) -> Result<bool> {
        Ok(!self.lock()?.ends[self.side].tx_busy)
    }

    fn data_ready(&mut self) -> Result<bool> {
        Ok(!self.lock()?.ends[self.side].rx.is_empty())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.lock()?.ends[self.side].rx.pop_front())
    }
}

/// Pending-interrupt queue of one endpoint.
#[derive(Debug, Clone)]
pub struct InterruptLine {
    wire: Arc<Mutex<Wire>>,
    side: usize,
}

impl InterruptLine {
    /// Next pending interrupt, if any.
    pub fn poll(&self) -> Option<LinkEvent> {
        // A poisoned wire raises nothing further.
        let mut wire = self.wire.lock().ok()?;
        wire.ends[self.side].irq.pop_front()
    }
}
