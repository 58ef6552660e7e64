//! Handshake, clock sync and rendezvous state machine.
//!
//! Flow:
//! - `Discovering`: after a grace delay, beacon `Search` every heartbeat.
//!   A `Search` heard here moves us to `Acknowledging`, where we answer with
//!   `Reply` every heartbeat instead.
//! - Both sides answering each other (a `Reply` heard while `Acknowledging`)
//!   means the beacons crossed. Both fall back to `Discovering` with a grace
//!   delay picked from the station id, so the sides beacon in different slots.
//! - The side whose beacon is answered (`Reply`) becomes Host and sends one
//!   `Ack`; the side that receives that `Ack` becomes Peer.
//! - `ClockSyncing`: Host broadcasts `Sync(local_tick)` every sync interval.
//!   Peer adopts any differing value and, after enough consecutive matches,
//!   answers `Synced`. Host then fixes a start tick and sends `Start`.
//! - `Rendezvous`: both sides count ticks until the agreed start, then play.
//!
//! State alone decides transitions. Anything a state does not expect is
//! logged and dropped.

use duolink_core::error::DuolinkError;
use duolink_core::protocol::Message;

use crate::config::SessionTiming;

use super::relay::{EventRelay, LocalEvent, RemoteEffect};
use super::{Disposition, GameLayer, Role, SessionOutcome, SessionState};

/// Backoff slots after a discovery collision (3 bits of the station id).
const BACKOFF_SLOTS: u64 = 8;

/// Stable station id for a node name (FNV-1a).
pub fn station_id(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

pub struct PeerSession {
    timing: SessionTiming,
    station: u64,
    role: Role,
    state: SessionState,
    /// Ticks of silence before beaconing starts.
    grace_ticks: u32,
    /// Crossed-beacon fallbacks in this discovery.
    collisions: u32,
    /// Grace delay elapsed; `Search` is being broadcast.
    beaconing: bool,
    local_tick: u64,
    /// Heartbeat scheduler; counts ticks spent in the current phase.
    msg_delay_ticks: u32,
    sync_streak: u32,
    synced_sent: bool,
    agreed_start_tick: Option<u64>,
    relay: EventRelay,
    outbox: Vec<Message>,
}

impl PeerSession {
    pub fn new(timing: SessionTiming) -> Self {
        let grace_ticks = timing.discovery_grace_ticks;
        Self {
            timing,
            station: 0,
            role: Role::Undetermined,
            state: SessionState::Idle,
            grace_ticks,
            collisions: 0,
            beaconing: false,
            local_tick: 0,
            msg_delay_ticks: 0,
            sync_streak: 0,
            synced_sent: false,
            agreed_start_tick: None,
            relay: EventRelay::new(),
            outbox: Vec::new(),
        }
    }

    /// Identify this side; picks its backoff slots after a collision.
    pub fn with_station(mut self, station: u64) -> Self {
        self.station = station;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn local_tick(&self) -> u64 {
        self.local_tick
    }

    pub fn sync_streak(&self) -> u32 {
        self.sync_streak
    }

    pub fn agreed_start_tick(&self) -> Option<u64> {
        self.agreed_start_tick
    }

    pub fn relay(&self) -> &EventRelay {
        &self.relay
    }

    pub fn is_beaconing(&self) -> bool {
        self.beaconing
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.state {
            SessionState::Ended(o) => Some(o),
            _ => None,
        }
    }

    /// Messages produced since the last call, in send order.
    pub fn take_outbound(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_outbound(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// User asked for a two-player game.
    pub fn request_multiplayer(&mut self) -> Disposition {
        if self.state != SessionState::Idle {
            return self.ignore("request_multiplayer");
        }
        self.state = SessionState::Discovering;
        self.msg_delay_ticks = 0;
        self.beaconing = false;
        self.grace_ticks = self.timing.discovery_grace_ticks;
        self.collisions = 0;
        tracing::info!("multiplayer requested, discovering peer");
        Disposition::Applied
    }

    /// One game tick.
    pub fn on_tick<G: GameLayer>(&mut self, _game: &mut G) {
        match self.state {
            SessionState::Discovering => {
                self.msg_delay_ticks = self.msg_delay_ticks.saturating_add(1);
                if !self.beaconing && self.msg_delay_ticks >= self.grace_ticks {
                    self.beaconing = true;
                    tracing::debug!(after_ticks = self.msg_delay_ticks, "beaconing search");
                }
                let beacon_ticks = self.msg_delay_ticks.saturating_sub(self.grace_ticks);
                if self.beaconing && beacon_ticks % self.timing.heartbeat_ticks.max(1) == 0 {
                    self.outbox.push(Message::Search);
                }
            }
            SessionState::Acknowledging => {
                self.msg_delay_ticks = self.msg_delay_ticks.saturating_add(1);
                if self.msg_delay_ticks % self.timing.heartbeat_ticks.max(1) == 0 {
                    self.outbox.push(Message::Reply);
                }
            }
            SessionState::ClockSyncing => {
                if self.role == Role::Host {
                    if self.msg_delay_ticks % self.timing.sync_interval_ticks.max(1) == 0 {
                        self.outbox.push(Message::Sync(self.local_tick));
                    }
                    self.msg_delay_ticks = self.msg_delay_ticks.saturating_add(1);
                }
                // Ticks come off the wire unchecked; never wrap.
                self.local_tick = self.local_tick.saturating_add(1);
            }
            SessionState::Rendezvous => {
                self.local_tick = self.local_tick.saturating_add(1);
                if let Some(start) = self.agreed_start_tick {
                    // `>=`: a Peer whose clock was moved past the start still plays.
                    if self.local_tick >= start {
                        self.state = SessionState::InGame;
                        tracing::info!(
                            role = self.role.as_str(),
                            tick = self.local_tick,
                            "game started"
                        );
                    }
                }
            }
            SessionState::InGame => {
                self.local_tick = self.local_tick.saturating_add(1);
            }
            SessionState::Idle | SessionState::Ended(_) => {}
        }
    }

    /// One decoded inbound message.
    pub fn on_message<G: GameLayer>(&mut self, msg: Message, game: &mut G) -> Disposition {
        if self.state.is_active() && msg.is_terminal() {
            let outcome = match msg {
                Message::Abort => SessionOutcome::Aborted,
                _ => SessionOutcome::PeerLeft,
            };
            tracing::info!(kind = msg.kind(), "peer ended the session");
            self.end(outcome, game);
            return Disposition::Applied;
        }

        match (self.state, msg) {
            (SessionState::Discovering, Message::Search) => {
                self.state = SessionState::Acknowledging;
                tracing::debug!("search heard, replying");
                Disposition::Applied
            }
            (SessionState::Discovering, Message::Reply) if self.beaconing => {
                self.assign_role(Role::Host);
                self.outbox.push(Message::Ack);
                self.enter_clock_sync();
                Disposition::Applied
            }
            (SessionState::Acknowledging, Message::Reply) => {
                self.back_off();
                Disposition::Applied
            }
            (SessionState::Acknowledging, Message::Ack) => {
                self.assign_role(Role::Peer);
                self.enter_clock_sync();
                Disposition::Applied
            }
            (SessionState::ClockSyncing, Message::Sync(t)) if self.role == Role::Peer => {
                self.adopt_clock(t);
                Disposition::Applied
            }
            (SessionState::ClockSyncing, Message::Synced) if self.role == Role::Host => {
                let start = self
                    .local_tick
                    .saturating_add(self.timing.start_margin_ticks);
                self.agreed_start_tick = Some(start);
                self.outbox.push(Message::Start(start));
                tracing::info!(tick = self.local_tick, start, "peer synced, start announced");
                self.enter_rendezvous(game);
                Disposition::Applied
            }
            (SessionState::ClockSyncing, Message::Start(t)) if self.role == Role::Peer => {
                self.agreed_start_tick = Some(t);
                tracing::info!(tick = self.local_tick, start = t, "start received");
                self.enter_rendezvous(game);
                Disposition::Applied
            }
            (SessionState::InGame, msg) => self.on_remote_milestone(msg, game),
            (_, msg) => self.ignore(msg.kind()),
        }
    }

    /// Local milestone from the game simulation.
    pub fn local_event<G: GameLayer>(
        &mut self,
        evt: LocalEvent,
        game: &mut G,
    ) -> Disposition {
        if self.state != SessionState::InGame {
            return self.ignore("local_event");
        }
        let step = self.relay.on_local(evt);
        if let Some(msg) = step.outbound {
            self.outbox.push(msg);
        }
        if let Some(outcome) = step.outcome {
            self.end(outcome, game);
        }
        Disposition::Applied
    }

    /// Local user cancels. `PlayerLeaving` is queued before any teardown.
    pub fn leave<G: GameLayer>(&mut self, game: &mut G) -> Disposition {
        if !self.state.is_active() {
            return self.ignore("leave");
        }
        self.outbox.push(Message::PlayerLeaving);
        self.end(SessionOutcome::LocalLeft, game);
        Disposition::Applied
    }

    /// Local irrecoverable condition: tell the other side and end.
    pub fn abort<G: GameLayer>(&mut self, reason: &str, game: &mut G) -> Disposition {
        if !self.state.is_active() {
            return self.ignore("abort");
        }
        tracing::warn!(reason, "aborting session");
        self.outbox.push(Message::Abort);
        self.end(SessionOutcome::Aborted, game);
        Disposition::Applied
    }

    /// Back to `Idle` for the next multiplayer request. Queued messages are kept.
    pub fn reset(&mut self) {
        let outbox = std::mem::take(&mut self.outbox);
        *self = Self::new(self.timing.clone()).with_station(self.station);
        self.outbox = outbox;
    }

    /// Beacons crossed: go quiet for a slot-sized delay, then beacon again.
    fn back_off(&mut self) {
        let shift = 3 * (self.collisions % 21);
        let slot = (self.station >> shift) % BACKOFF_SLOTS;
        let slot_ticks = self.timing.heartbeat_ticks.max(1).saturating_mul(2);
        self.grace_ticks = slot_ticks.saturating_mul(slot as u32 + 1);
        self.collisions = self.collisions.saturating_add(1);
        self.state = SessionState::Discovering;
        self.beaconing = false;
        self.msg_delay_ticks = 0;
        tracing::info!(
            collisions = self.collisions,
            grace_ticks = self.grace_ticks,
            "discovery collision, backing off"
        );
    }

    fn assign_role(&mut self, role: Role) {
        if self.role != Role::Undetermined {
            // Unreachable through the transitions above.
            tracing::error!(
                current = self.role.as_str(),
                requested = role.as_str(),
                "role already set"
            );
            return;
        }
        self.role = role;
        tracing::info!(role = role.as_str(), "role assigned");
    }

    fn enter_clock_sync(&mut self) {
        self.state = SessionState::ClockSyncing;
        self.msg_delay_ticks = 0;
        self.sync_streak = 0;
        self.synced_sent = false;
    }

    fn adopt_clock(&mut self, t: u64) {
        if t == self.local_tick {
            self.sync_streak = self.sync_streak.saturating_add(1);
        } else {
            tracing::debug!(local = self.local_tick, host = t, "clock adopted");
            self.local_tick = t;
            self.sync_streak = 0;
            self.synced_sent = false;
        }
        if self.sync_streak >= self.timing.sync_streak_required && !self.synced_sent {
            self.synced_sent = true;
            self.outbox.push(Message::Synced);
            tracing::info!(tick = self.local_tick, streak = self.sync_streak, "clock synced");
        }
    }

    fn enter_rendezvous<G: GameLayer>(&mut self, game: &mut G) {
        self.relay = EventRelay::new();
        if let Err(e) = game.load_level(self.role) {
            let err = DuolinkError::SessionAbort(format!("level load failed: {e}"));
            tracing::error!(
                error = %err,
                code = err.code().as_str(),
                role = self.role.as_str(),
                "aborting session"
            );
            self.outbox.push(Message::Abort);
            self.end(SessionOutcome::Aborted, game);
            return;
        }
        self.state = SessionState::Rendezvous;
    }

    fn on_remote_milestone<G: GameLayer>(
        &mut self,
        msg: Message,
        game: &mut G,
    ) -> Disposition {
        match self.relay.on_remote(&msg) {
            RemoteEffect::CoinTaken => game.remote_coin_taken(),
            RemoteEffect::TreasureTaken => game.remote_treasure_taken(),
            RemoteEffect::PeerAtExit => {
                tracing::debug!("peer waiting at exit");
            }
            RemoteEffect::End(outcome) => self.end(outcome, game),
            RemoteEffect::Ignored => return self.ignore(msg.kind()),
        }
        Disposition::Applied
    }

    fn end<G: GameLayer>(&mut self, outcome: SessionOutcome, game: &mut G) {
        if self.state.has_level() {
            game.unload_level();
        }
        self.state = SessionState::Ended(outcome);
        tracing::info!(
            outcome = outcome.as_str(),
            role = self.role.as_str(),
            tick = self.local_tick,
            "session ended"
        );
        game.session_ended(outcome);
    }

    fn ignore(&self, what: &str) -> Disposition {
        tracing::debug!(what, state = self.state.as_str(), "ignored");
        Disposition::Ignored(DuolinkError::UnexpectedMessage {
            message: what.to_string(),
            state: self.state.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use duolink_core::error::Result;

    #[derive(Default)]
    struct Recorder {
        loaded: Vec<Role>,
        unloaded: u32,
        ended: Vec<SessionOutcome>,
        fail_load: bool,
    }

    impl GameLayer for Recorder {
        fn load_level(&mut self, role: Role) -> Result<()> {
            if self.fail_load {
                return Err(DuolinkError::Internal("missing level".into()));
            }
            self.loaded.push(role);
            Ok(())
        }
        fn unload_level(&mut self) {
            self.unloaded += 1;
        }
        fn session_ended(&mut self, outcome: SessionOutcome) {
            self.ended.push(outcome);
        }
    }

    fn peer_in_sync(game: &mut Recorder) -> PeerSession {
        let mut s = PeerSession::new(SessionTiming::default());
        s.request_multiplayer();
        s.on_message(Message::Search, game);
        assert_eq!(s.state(), SessionState::Acknowledging);
        s.on_message(Message::Ack, game);
        assert_eq!(s.role(), Role::Peer);
        s.take_outbound();
        s
    }

    #[test]
    fn search_is_silent_during_grace() {
        let mut g = Recorder::default();
        let mut s = PeerSession::new(SessionTiming::default());
        s.request_multiplayer();
        for _ in 0..59 {
            s.on_tick(&mut g);
        }
        assert!(s.take_outbound().is_empty());
        s.on_tick(&mut g);
        assert_eq!(s.take_outbound(), vec![Message::Search]);
        for _ in 0..14 {
            s.on_tick(&mut g);
        }
        assert!(s.take_outbound().is_empty());
        s.on_tick(&mut g);
        assert_eq!(s.take_outbound(), vec![Message::Search]);
    }

    #[test]
    fn reply_before_beaconing_is_ignored() {
        let mut g = Recorder::default();
        let mut s = PeerSession::new(SessionTiming::default());
        s.request_multiplayer();
        assert!(!s.on_message(Message::Reply, &mut g).is_applied());
        assert_eq!(s.role(), Role::Undetermined);
    }

    #[test]
    fn answered_beacon_makes_host() {
        let mut g = Recorder::default();
        let mut s = PeerSession::new(SessionTiming::default());
        s.request_multiplayer();
        for _ in 0..60 {
            s.on_tick(&mut g);
        }
        s.take_outbound();
        assert!(s.on_message(Message::Reply, &mut g).is_applied());
        assert_eq!(s.role(), Role::Host);
        assert_eq!(s.state(), SessionState::ClockSyncing);
        assert_eq!(s.take_outbound(), vec![Message::Ack]);

        // Role never changes afterwards.
        assert!(!s.on_message(Message::Ack, &mut g).is_applied());
        assert_eq!(s.role(), Role::Host);
    }

    #[test]
    fn host_syncs_every_interval() {
        let mut g = Recorder::default();
        let mut s = PeerSession::new(SessionTiming::default());
        s.request_multiplayer();
        for _ in 0..60 {
            s.on_tick(&mut g);
        }
        s.on_message(Message::Reply, &mut g);
        s.take_outbound();
        for _ in 0..21 {
            s.on_tick(&mut g);
        }
        assert_eq!(
            s.take_outbound(),
            vec![Message::Sync(0), Message::Sync(10), Message::Sync(20)]
        );
        assert_eq!(s.local_tick(), 21);
    }

    #[test]
    fn peer_adopts_host_clock() {
        let mut g = Recorder::default();
        let mut s = peer_in_sync(&mut g);
        s.on_tick(&mut g);
        s.on_message(Message::Sync(500), &mut g);
        assert_eq!(s.local_tick(), 500);
        assert_eq!(s.sync_streak(), 0);

        let mut host_tick = 500;
        for _ in 0..5 {
            for _ in 0..10 {
                s.on_tick(&mut g);
            }
            host_tick += 10;
            s.on_message(Message::Sync(host_tick), &mut g);
        }
        assert_eq!(s.sync_streak(), 5);
        assert!(s.take_outbound().is_empty());

        for _ in 0..10 {
            s.on_tick(&mut g);
        }
        host_tick += 10;
        s.on_message(Message::Sync(host_tick), &mut g);
        assert_eq!(s.take_outbound(), vec![Message::Synced]);

        // Further agreement does not flood.
        for _ in 0..10 {
            s.on_tick(&mut g);
        }
        host_tick += 10;
        s.on_message(Message::Sync(host_tick), &mut g);
        assert!(s.take_outbound().is_empty());

        // Desync re-arms.
        s.on_message(Message::Sync(9), &mut g);
        assert_eq!(s.local_tick(), 9);
        assert_eq!(s.sync_streak(), 0);
    }

    #[test]
    fn rendezvous_waits_for_agreed_tick() {
        let mut g = Recorder::default();
        let mut s = peer_in_sync(&mut g);
        s.on_message(Message::Start(5), &mut g);
        assert_eq!(s.state(), SessionState::Rendezvous);
        assert_eq!(g.loaded, vec![Role::Peer]);
        for _ in 0..4 {
            s.on_tick(&mut g);
        }
        assert_eq!(s.state(), SessionState::Rendezvous);
        s.on_tick(&mut g);
        assert_eq!(s.state(), SessionState::InGame);
    }

    #[test]
    fn start_already_behind_the_clock_still_plays() {
        let mut g = Recorder::default();
        let mut s = peer_in_sync(&mut g);
        s.on_message(Message::Sync(500), &mut g);
        s.on_message(Message::Start(100), &mut g);
        assert_eq!(s.state(), SessionState::Rendezvous);
        s.on_tick(&mut g);
        assert_eq!(s.state(), SessionState::InGame);
        assert_eq!(s.local_tick(), 501);
    }

    #[test]
    fn failed_load_aborts() {
        let mut g = Recorder {
            fail_load: true,
            ..Default::default()
        };
        let mut s = peer_in_sync(&mut g);
        s.on_message(Message::Start(300), &mut g);
        assert_eq!(s.outcome(), Some(SessionOutcome::Aborted));
        assert_eq!(s.take_outbound(), vec![Message::Abort]);
        assert_eq!(g.unloaded, 0);
        assert_eq!(g.ended, vec![SessionOutcome::Aborted]);
    }

    #[test]
    fn leave_queues_message_then_ends() {
        let mut g = Recorder::default();
        let mut s = peer_in_sync(&mut g);
        s.on_message(Message::Start(1), &mut g);
        s.on_tick(&mut g);
        assert!(s.leave(&mut g).is_applied());
        assert_eq!(s.take_outbound(), vec![Message::PlayerLeaving]);
        assert_eq!(s.outcome(), Some(SessionOutcome::LocalLeft));
        assert_eq!(g.unloaded, 1);
        assert!(!s.leave(&mut g).is_applied());
    }

    #[test]
    fn stray_messages_never_move_state() {
        let mut g = Recorder::default();
        let mut s = peer_in_sync(&mut g);
        for msg in [Message::Search, Message::Reply, Message::Synced, Message::CoinTaken] {
            match s.on_message(msg, &mut g) {
                Disposition::Ignored(e) => {
                    assert_eq!(e.code().as_str(), "UNEXPECTED_MESSAGE")
                }
                Disposition::Applied => panic!("stray message applied"),
            }
        }
        assert_eq!(s.state(), SessionState::ClockSyncing);
    }

    fn host_in_sync(game: &mut Recorder) -> PeerSession {
        let mut s = PeerSession::new(SessionTiming::default());
        s.request_multiplayer();
        for _ in 0..60 {
            s.on_tick(game);
        }
        s.on_message(Message::Reply, game);
        assert_eq!(s.role(), Role::Host);
        s.take_outbound();
        s
    }

    #[test]
    fn peer_clock_saturates_at_wire_maximum() {
        let mut g = Recorder::default();
        let mut s = peer_in_sync(&mut g);
        s.on_message(Message::parse(b"sk18446744073709551615"), &mut g);
        assert_eq!(s.local_tick(), u64::MAX);
        s.on_tick(&mut g);
        s.on_tick(&mut g);
        assert_eq!(s.local_tick(), u64::MAX);

        s.on_message(Message::Start(u64::MAX), &mut g);
        assert_eq!(s.state(), SessionState::Rendezvous);
        s.on_tick(&mut g);
        assert_eq!(s.state(), SessionState::InGame);
        s.on_tick(&mut g);
        assert_eq!(s.local_tick(), u64::MAX);
    }

    #[test]
    fn host_start_tick_saturates() {
        let mut g = Recorder::default();
        let mut s = PeerSession::new(SessionTiming {
            start_margin_ticks: u64::MAX,
            ..SessionTiming::default()
        });
        s.request_multiplayer();
        for _ in 0..60 {
            s.on_tick(&mut g);
        }
        s.on_message(Message::Reply, &mut g);
        s.on_tick(&mut g);
        s.on_message(Message::Synced, &mut g);
        assert_eq!(s.agreed_start_tick(), Some(u64::MAX));
    }

    #[test]
    fn host_clock_is_never_overwritten() {
        let mut g = Recorder::default();
        let mut s = host_in_sync(&mut g);
        for _ in 0..5 {
            s.on_tick(&mut g);
        }
        assert_eq!(s.local_tick(), 5);

        match s.on_message(Message::Sync(999), &mut g) {
            Disposition::Ignored(e) => assert_eq!(e.code().as_str(), "UNEXPECTED_MESSAGE"),
            Disposition::Applied => panic!("host adopted a remote clock"),
        }
        assert_eq!(s.local_tick(), 5);
        assert_eq!(s.sync_streak(), 0);
        assert_eq!(s.state(), SessionState::ClockSyncing);
    }

    #[test]
    fn crossed_beacons_back_off_by_station_slot() {
        let mut g = Recorder::default();
        // Slot 5 first (low 3 bits), slot 0 on the next collision.
        let mut s = PeerSession::new(SessionTiming::default()).with_station(0b000_101);
        s.request_multiplayer();
        s.on_message(Message::Search, &mut g);
        assert_eq!(s.state(), SessionState::Acknowledging);

        assert!(s.on_message(Message::Reply, &mut g).is_applied());
        assert_eq!(s.state(), SessionState::Discovering);
        assert_eq!(s.collisions(), 1);
        assert_eq!(s.role(), Role::Undetermined);
        assert!(!s.is_beaconing());

        for _ in 0..179 {
            s.on_tick(&mut g);
        }
        assert!(s.take_outbound().is_empty());
        s.on_tick(&mut g);
        assert_eq!(s.take_outbound(), vec![Message::Search]);

        s.on_message(Message::Search, &mut g);
        s.on_message(Message::Reply, &mut g);
        assert_eq!(s.collisions(), 2);
        for _ in 0..29 {
            s.on_tick(&mut g);
        }
        assert!(s.take_outbound().is_empty());
        s.on_tick(&mut g);
        assert_eq!(s.take_outbound(), vec![Message::Search]);

        // A fresh request starts from the configured grace again.
        s.reset();
        s.request_multiplayer();
        assert_eq!(s.collisions(), 0);
        for _ in 0..60 {
            s.on_tick(&mut g);
        }
        assert_eq!(s.take_outbound(), vec![Message::Search]);
    }

    #[test]
    fn station_ids_differ_per_name() {
        assert_ne!(station_id("a"), station_id("b"));
        assert_eq!(station_id("a"), station_id("a"));
        assert_eq!(station_id(""), 0xcbf2_9ce4_8422_2325);
    }

    #[test]
    fn abort_ends_any_active_state() {
        let mut g = Recorder::default();
        let mut s = PeerSession::new(SessionTiming::default());
        s.request_multiplayer();
        s.on_message(Message::Abort, &mut g);
        assert_eq!(s.outcome(), Some(SessionOutcome::Aborted));

        s.reset();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.on_message(Message::Abort, &mut g).is_applied());
    }
}
