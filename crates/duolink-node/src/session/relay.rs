//! In-game milestone replication.
//!
//! Each side simulates its own player and broadcasts milestones as single
//! messages. Tallies fold identically on both sides. Reaching the exit is
//! arbitrated without a referee: the side that arrives second (it has already
//! seen `AtExit`) declares victory and tells the other with `BothAtExit`.

use duolink_core::protocol::Message;

use super::SessionOutcome;

/// Milestones produced by the local simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalEvent {
    CoinTaken,
    TreasureTaken,
    /// Player is standing on the exit (may repeat every tick).
    ReachedExit,
    /// Player collided with a guard.
    Lost,
}

/// Result of a local milestone.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayStep {
    pub outbound: Option<Message>,
    pub outcome: Option<SessionOutcome>,
}

/// Result of a remote milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEffect {
    CoinTaken,
    TreasureTaken,
    PeerAtExit,
    End(SessionOutcome),
    Ignored,
}

#[derive(Debug, Default, Clone)]
pub struct EventRelay {
    coins: u32,
    treasure_taken: bool,
    peer_at_exit: bool,
    sent_at_exit: bool,
    both_at_exit_sent: bool,
}

impl EventRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coins picked up by both players.
    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn treasure_taken(&self) -> bool {
        self.treasure_taken
    }

    pub fn peer_at_exit(&self) -> bool {
        self.peer_at_exit
    }

    pub fn sent_at_exit(&self) -> bool {
        self.sent_at_exit
    }

    pub fn on_local(&mut self, evt: LocalEvent) -> RelayStep {
        match evt {
            LocalEvent::CoinTaken => {
                self.coins += 1;
                RelayStep {
                    outbound: Some(Message::CoinTaken),
                    outcome: None,
                }
            }
            LocalEvent::TreasureTaken => {
                self.treasure_taken = true;
                RelayStep {
                    outbound: Some(Message::TreasureTaken),
                    outcome: None,
                }
            }
            LocalEvent::ReachedExit => self.reached_exit(),
            LocalEvent::Lost => RelayStep {
                outbound: Some(Message::PlayerLost),
                outcome: Some(SessionOutcome::Defeat),
            },
        }
    }

    pub fn on_remote(&mut self, msg: &Message) -> RemoteEffect {
        match msg {
            Message::CoinTaken => {
                self.coins += 1;
                RemoteEffect::CoinTaken
            }
            Message::TreasureTaken => {
                self.treasure_taken = true;
                RemoteEffect::TreasureTaken
            }
            Message::AtExit => {
                self.peer_at_exit = true;
                RemoteEffect::PeerAtExit
            }
            Message::BothAtExit => RemoteEffect::End(SessionOutcome::Victory),
            Message::PlayerLost => RemoteEffect::End(SessionOutcome::Defeat),
            Message::PlayerLeaving => RemoteEffect::End(SessionOutcome::PeerLeft),
            Message::Abort => RemoteEffect::End(SessionOutcome::Aborted),
            _ => RemoteEffect::Ignored,
        }
    }

    fn reached_exit(&mut self) -> RelayStep {
        if self.peer_at_exit {
            let outbound = if self.both_at_exit_sent {
                None
            } else {
                self.both_at_exit_sent = true;
                Some(Message::BothAtExit)
            };
            return RelayStep {
                outbound,
                outcome: Some(SessionOutcome::Victory),
            };
        }
        if self.sent_at_exit {
            return RelayStep::default();
        }
        self.sent_at_exit = true;
        RelayStep {
            outbound: Some(Message::AtExit),
            outcome: None,
        }
    }
}
