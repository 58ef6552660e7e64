//! Message vocabulary carried inside frames.
//!
//! Payloads are ASCII and matched by prefix, so trailing bytes after a fixed
//! token are tolerated. `Sync` and `Start` carry a decimal `u64` straight after
//! their prefix; a missing or malformed number makes the payload `Unknown`.

use bytes::Bytes;

pub const SEARCH: &str = "any1there";
pub const REPLY: &str = "im here";
pub const ACK: &str = "gotcha";
pub const SYNC_PREFIX: &str = "sk";
pub const SYNCED: &str = "nsync";
pub const START_PREFIX: &str = "when i say go";
pub const TREASURE_TAKEN: &str = "gottem";
pub const COIN_TAKEN: &str = "ding";
pub const AT_EXIT: &str = "im at soup";
pub const BOTH_AT_EXIT: &str = "winning";
pub const PLAYER_LOST: &str = "i died";
pub const PLAYER_LEAVING: &str = "im out";
pub const ABORT: &str = "cancela";

/// A parsed frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Discovery beacon.
    Search,
    /// Answer to a beacon.
    Reply,
    /// Closes discovery; the sender becomes Host.
    Ack,
    /// Host's clock value.
    Sync(u64),
    /// Peer has matched Host's clock often enough.
    Synced,
    /// Agreed absolute tick to begin play on.
    Start(u64),
    TreasureTaken,
    CoinTaken,
    AtExit,
    BothAtExit,
    PlayerLost,
    PlayerLeaving,
    Abort,
    /// Anything else (kept for logging).
    Unknown(String),
}

impl Message {
    /// Parse a frame payload. Never fails; noise becomes `Unknown`.
    pub fn parse(payload: &[u8]) -> Message {
        let s = String::from_utf8_lossy(payload);
        let s = s.as_ref();

        let fixed = [
            (SEARCH, Message::Search),
            (REPLY, Message::Reply),
            (ACK, Message::Ack),
            (SYNCED, Message::Synced),
            (TREASURE_TAKEN, Message::TreasureTaken),
            (COIN_TAKEN, Message::CoinTaken),
            (AT_EXIT, Message::AtExit),
            (BOTH_AT_EXIT, Message::BothAtExit),
            (PLAYER_LOST, Message::PlayerLost),
            (PLAYER_LEAVING, Message::PlayerLeaving),
            (ABORT, Message::Abort),
        ];
        for (token, msg) in fixed {
            if s.starts_with(token) {
                return msg;
            }
        }

        if let Some(tick) = s.strip_prefix(START_PREFIX).and_then(parse_tick) {
            return Message::Start(tick);
        }
        if let Some(tick) = s.strip_prefix(SYNC_PREFIX).and_then(parse_tick) {
            return Message::Sync(tick);
        }

        Message::Unknown(s.to_owned())
    }

    /// Payload text as sent on the wire (without frame markers).
    pub fn payload(&self) -> String {
        match self {
            Message::Search => SEARCH.into(),
            Message::Reply => REPLY.into(),
            Message::Ack => ACK.into(),
            Message::Sync(t) => format!("{SYNC_PREFIX}{t}"),
            Message::Synced => SYNCED.into(),
            Message::Start(t) => format!("{START_PREFIX}{t}"),
            Message::TreasureTaken => TREASURE_TAKEN.into(),
            Message::CoinTaken => COIN_TAKEN.into(),
            Message::AtExit => AT_EXIT.into(),
            Message::BothAtExit => BOTH_AT_EXIT.into(),
            Message::PlayerLost => PLAYER_LOST.into(),
            Message::PlayerLeaving => PLAYER_LEAVING.into(),
            Message::Abort => ABORT.into(),
            Message::Unknown(raw) => raw.clone(),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.payload())
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Search => "search",
            Message::Reply => "reply",
            Message::Ack => "ack",
            Message::Sync(_) => "sync",
            Message::Synced => "synced",
            Message::Start(_) => "start",
            Message::TreasureTaken => "treasure_taken",
            Message::CoinTaken => "coin_taken",
            Message::AtExit => "at_exit",
            Message::BothAtExit => "both_at_exit",
            Message::PlayerLost => "player_lost",
            Message::PlayerLeaving => "player_leaving",
            Message::Abort => "abort",
            Message::Unknown(_) => "unknown",
        }
    }

    /// Ends the receiving session regardless of its state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Message::Abort | Message::PlayerLeaving)
    }
}

fn parse_tick(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
