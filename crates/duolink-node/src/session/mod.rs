//! Two-player session over the serial link.
//!
//! `PeerSession` runs discovery, role assignment, clock sync and the
//! rendezvous countdown; once in game it hands milestone traffic to
//! `EventRelay`. The game itself stays behind the `GameLayer` trait.

mod peer;
mod relay;

use duolink_core::error::{DuolinkError, Result};

pub use peer::{station_id, PeerSession};
pub use relay::{EventRelay, LocalEvent, RelayStep, RemoteEffect};

/// Role fixed once by discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Undetermined,
    /// Kept beaconing and got a reply; announces the start tick.
    Host,
    /// Answered a beacon; follows Host's clock.
    Peer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Undetermined => "undetermined",
            Role::Host => "host",
            Role::Peer => "peer",
        }
    }

    /// Multiplayer level each side plays (levels differ per side).
    pub fn level(self) -> Option<u8> {
        match self {
            Role::Host => Some(1),
            Role::Peer => Some(2),
            Role::Undetermined => None,
        }
    }
}

/// How a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Both players reached the exit.
    Victory,
    /// A player was caught.
    Defeat,
    /// The other side left.
    PeerLeft,
    /// The local user left.
    LocalLeft,
    /// Irrecoverable error on either side.
    Aborted,
}

impl SessionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionOutcome::Victory => "victory",
            SessionOutcome::Defeat => "defeat",
            SessionOutcome::PeerLeft => "peer_left",
            SessionOutcome::LocalLeft => "local_left",
            SessionOutcome::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Discovering,
    Acknowledging,
    ClockSyncing,
    Rendezvous,
    InGame,
    Ended(SessionOutcome),
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Discovering => "discovering",
            SessionState::Acknowledging => "acknowledging",
            SessionState::ClockSyncing => "clock_syncing",
            SessionState::Rendezvous => "rendezvous",
            SessionState::InGame => "in_game",
            SessionState::Ended(_) => "ended",
        }
    }

    /// Between the multiplayer request and the end of the session.
    pub fn is_active(self) -> bool {
        !matches!(self, SessionState::Idle | SessionState::Ended(_))
    }

    /// A level is loaded in these states.
    pub fn has_level(self) -> bool {
        matches!(self, SessionState::Rendezvous | SessionState::InGame)
    }
}

/// What a session did with an input.
#[derive(Debug)]
pub enum Disposition {
    Applied,
    /// Not meaningful in the current state; logged and dropped.
    Ignored(DuolinkError),
}

impl Disposition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Disposition::Applied)
    }
}

/// Game/level collaborator driven by the session.
pub trait GameLayer {
    /// Load this side's level on entering rendezvous.
    fn load_level(&mut self, role: Role) -> Result<()>;

    /// Release the level when the session ends.
    fn unload_level(&mut self) {}

    /// The other player picked up the treasure (exit unlocks).
    fn remote_treasure_taken(&mut self) {}

    /// The other player picked up a coin.
    fn remote_coin_taken(&mut self) {}

    fn session_ended(&mut self, _outcome: SessionOutcome) {}
}
