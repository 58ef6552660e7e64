//! Interrupt-driven serial transport.
//!
//! Responsibilities:
//! - Frame outbound messages and pump them one byte per transmitter-ready
//!   interrupt, kicking the pump directly when the line is idle.
//! - Drain the receiver on every receive interrupt and surface completed
//!   frames as decoded `Message`s.
//! - Recover locally from line errors (flush on overrun/FIFO error).
//!
//! Receiving always wins over starting a send: a kick is skipped while the
//! receiver holds data, so the receive side is never pushed into an overrun.
//!
//! A failed hardware access never loses data: queued bytes stay queued, and
//! frames decoded before the failure wait in `take_received`.

use duolink_core::error::Result;
use duolink_core::protocol::{FrameQueue, Message};

use crate::config::TransportConfig;
use crate::transport::codec;
use crate::transport::link::{ByteLink, LineErrorKind, LinkEvent, TxStatus};

/// Plain transport counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransportStats {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub frames_queued: u64,
    pub frames_received: u64,
    pub line_errors: u64,
    pub bytes_flushed: u64,
}

pub struct SerialTransport<L> {
    link: L,
    outbound: FrameQueue,
    inbound: FrameQueue,
    /// Decoded frames not yet handed to the caller.
    received: Vec<Message>,
    /// Set by a transmitter-ready interrupt that found nothing to send.
    line_idle: bool,
    transmit_attempts: u32,
    stats: TransportStats,
}

impl<L: ByteLink> SerialTransport<L> {
    pub fn new(link: L, cfg: &TransportConfig) -> Self {
        Self {
            link,
            outbound: FrameQueue::new(),
            inbound: FrameQueue::new(),
            received: Vec::new(),
            line_idle: false,
            transmit_attempts: cfg.transmit_attempts.max(1),
            stats: TransportStats::default(),
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    pub fn is_line_idle(&self) -> bool {
        self.line_idle
    }

    /// Frame and queue a message; start the pump if the line allows it.
    pub fn enqueue(&mut self, msg: &Message) -> Result<()> {
        self.queue(msg);
        self.pump()
    }

    /// Frame and queue a message without touching the hardware.
    pub fn queue(&mut self, msg: &Message) {
        codec::encode_into(&mut self.outbound, msg);
        self.stats.frames_queued += 1;
        tracing::trace!(kind = msg.kind(), queued = self.outbound.len(), "frame queued");
    }

    /// Start sending queued bytes if the line allows it.
    pub fn pump(&mut self) -> Result<()> {
        self.kick()
    }

    /// Handle one hardware notification. Returns the messages it completed.
    ///
    /// On error, frames completed before the failure stay in `take_received`.
    pub fn on_link_event(&mut self, evt: LinkEvent) -> Result<Vec<Message>> {
        match evt {
            LinkEvent::TransmitterReady => {
                if self.outbound.is_empty() {
                    self.line_idle = true;
                } else {
                    self.send_next()?;
                }
            }
            LinkEvent::ByteReceived => {
                self.receive()?;
                self.kick()?;
            }
            LinkEvent::LineError(kind) => self.line_error(kind)?,
        }
        Ok(self.take_received())
    }

    /// Decoded frames not returned yet.
    pub fn take_received(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.received)
    }

    /// Drop both queues (link unsubscribed).
    pub fn reset(&mut self) {
        let dropped = self.outbound.clear() + self.inbound.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "transport queues cleared");
        }
        self.line_idle = false;
    }

    fn kick(&mut self) -> Result<()> {
        if self.outbound.is_empty() {
            return Ok(());
        }
        if !(self.line_idle || self.link.transmitter_empty()?) {
            return Ok(());
        }
        if self.link.data_ready()? {
            tracing::trace!("receiver holds data, send deferred");
            return Ok(());
        }
        self.send_next()
    }

    fn send_next(&mut self) -> Result<()> {
        let Some(byte) = self.outbound.pop_byte() else {
            self.line_idle = true;
            return Ok(());
        };
        self.line_idle = false;

        for attempt in 1..=self.transmit_attempts {
            match self.link.transmit(byte) {
                Ok(TxStatus::Sent) => {
                    self.stats.bytes_sent += 1;
                    return Ok(());
                }
                Ok(TxStatus::Busy) => {
                    tracing::trace!(attempt, "transmitter busy");
                }
                Err(e) => {
                    self.outbound.push_front(byte);
                    return Err(e);
                }
            }
        }

        // Resume on the next transmitter-ready interrupt.
        self.outbound.push_front(byte);
        tracing::debug!(
            attempts = self.transmit_attempts,
            "transmitter stayed busy, byte requeued"
        );
        Ok(())
    }

    fn receive(&mut self) -> Result<()> {
        while let Some(b) = self.link.read_byte()? {
            self.stats.bytes_received += 1;
            if !self.inbound.push(b) {
                continue;
            }
            if let Some(payload) = self.inbound.pop_frame() {
                self.stats.frames_received += 1;
                self.received.push(codec::decode(payload));
            }
        }
        Ok(())
    }

    fn line_error(&mut self, kind: LineErrorKind) -> Result<()> {
        self.stats.line_errors += 1;
        if !kind.requires_flush() {
            tracing::warn!(kind = kind.as_str(), "line error");
            return Ok(());
        }

        let mut flushed = 0u64;
        while self.link.read_byte()?.is_some() {
            flushed += 1;
        }
        self.stats.bytes_flushed += flushed;
        tracing::warn!(kind = kind.as_str(), flushed, "line error, receiver flushed");
        Ok(())
    }
}
