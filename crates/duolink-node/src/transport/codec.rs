//! Decode-once codec at the transport boundary.
//!
//! - Inbound: a complete frame payload becomes a `Message` exactly once.
//! - Outbound: a `Message` is framed straight into the outbound queue.

use bytes::Bytes;
use duolink_core::protocol::{FrameQueue, Message};

pub fn decode(payload: Bytes) -> Message {
    let msg = Message::parse(&payload);
    if let Message::Unknown(raw) = &msg {
        tracing::debug!(raw = %raw, "unrecognized frame payload");
    }
    msg
}

pub fn encode_into(queue: &mut FrameQueue, msg: &Message) {
    queue.push_frame(msg.payload().as_bytes());
}
