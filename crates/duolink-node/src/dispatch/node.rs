//! One side of the link: transport + session, driven by discrete events.
//!
//! Every entry point finishes by moving the session's outbox into the
//! transport, so whatever a call decided to send is queued before the call
//! returns (termination messages included). Frames completed by a link event
//! are dispatched to the session inside that same call, which keeps the
//! "everything received is processed before the next tick" ordering as long
//! as the caller drains its interrupts before ticking.

use duolink_core::error::Result;
use duolink_core::protocol::Message;

use crate::config::NodeConfig;
use crate::session::{station_id, Disposition, GameLayer, LocalEvent, PeerSession, SessionState};
use crate::transport::{ByteLink, InterruptLine, LinkEvent, SerialTransport};

pub struct Node<L> {
    name: String,
    transport: SerialTransport<L>,
    session: PeerSession,
    end_reported: bool,
}

impl<L: ByteLink> Node<L> {
    pub fn new(name: impl Into<String>, link: L, cfg: &NodeConfig) -> Self {
        let name = name.into();
        let session = PeerSession::new(cfg.session.clone()).with_station(station_id(&name));
        Self {
            name,
            transport: SerialTransport::new(link, &cfg.transport),
            session,
            end_reported: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> &PeerSession {
        &self.session
    }

    pub fn transport(&self) -> &SerialTransport<L> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut SerialTransport<L> {
        &mut self.transport
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn request_multiplayer(&mut self) -> Result<Disposition> {
        let d = self.session.request_multiplayer();
        self.end_reported = false;
        self.flush()?;
        Ok(d)
    }

    pub fn leave<G: GameLayer>(&mut self, game: &mut G) -> Result<Disposition> {
        let d = self.session.leave(game);
        self.flush()?;
        Ok(d)
    }

    /// Local irrecoverable condition.
    pub fn abort<G: GameLayer>(&mut self, reason: &str, game: &mut G) -> Result<Disposition> {
        let d = self.session.abort(reason, game);
        self.flush()?;
        Ok(d)
    }

    pub fn on_tick<G: GameLayer>(&mut self, game: &mut G) -> Result<()> {
        self.session.on_tick(game);
        self.flush()
    }

    /// Handle one serial interrupt. Returns how many messages it delivered.
    ///
    /// Frames decoded before a link error are still delivered, then the error
    /// is returned.
    pub fn on_link_event<G: GameLayer>(
        &mut self,
        evt: LinkEvent,
        game: &mut G,
    ) -> Result<usize> {
        let (msgs, failure) = match self.transport.on_link_event(evt) {
            Ok(msgs) => (msgs, None),
            Err(e) => (self.transport.take_received(), Some(e)),
        };
        let n = msgs.len();
        for msg in msgs {
            self.deliver(msg, game);
        }
        self.flush()?;
        match failure {
            Some(e) => Err(e),
            None => Ok(n),
        }
    }

    /// Handle every interrupt pending on `line`.
    pub fn drain<G: GameLayer>(&mut self, line: &InterruptLine, game: &mut G) -> Result<usize> {
        let mut delivered = 0;
        while let Some(evt) = line.poll() {
            delivered += self.on_link_event(evt, game)?;
        }
        Ok(delivered)
    }

    pub fn local_event<G: GameLayer>(
        &mut self,
        evt: LocalEvent,
        game: &mut G,
    ) -> Result<Disposition> {
        let d = self.session.local_event(evt, game);
        self.flush()?;
        Ok(d)
    }

    /// Session back to `Idle`. Queued outbound bytes keep draining.
    pub fn reset(&mut self) {
        self.session.reset();
        self.end_reported = false;
        tracing::debug!(node = %self.name, "session reset");
    }

    /// Drop the session and both transport queues (link unsubscribed).
    pub fn shutdown(&mut self) {
        self.session.reset();
        self.session.take_outbound();
        self.transport.reset();
        tracing::info!(node = %self.name, "node shut down");
    }

    fn deliver<G: GameLayer>(&mut self, msg: Message, game: &mut G) {
        tracing::trace!(node = %self.name, kind = msg.kind(), "message received");
        if let Disposition::Ignored(e) = self.session.on_message(msg, game) {
            tracing::debug!(node = %self.name, error = %e, "message dropped");
        }
    }

    fn flush(&mut self) -> Result<()> {
        // Queue the whole batch before touching the hardware.
        for msg in self.session.take_outbound() {
            tracing::trace!(node = %self.name, kind = msg.kind(), "message sent");
            self.transport.queue(&msg);
        }
        if !self.end_reported {
            if let Some(outcome) = self.session.outcome() {
                self.end_reported = true;
                let stats = self.transport.stats();
                tracing::info!(
                    node = %self.name,
                    outcome = outcome.as_str(),
                    bytes_sent = stats.bytes_sent,
                    bytes_received = stats.bytes_received,
                    frames_received = stats.frames_received,
                    line_errors = stats.line_errors,
                    bytes_flushed = stats.bytes_flushed,
                    "session finished"
                );
            }
        }
        self.transport.pump()
    }
}
