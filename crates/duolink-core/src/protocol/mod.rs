//! Wire protocol: byte framing and the message vocabulary.
//!
//! - Framing: `START('#')`, ASCII payload, `END('!')` over a raw byte stream.
//! - Messages: a payload is parsed exactly once into a `Message`; nothing
//!   downstream matches on raw strings again.
//!
//! Parsers never index blindly or panic: noise and partial frames come back as
//! `None` or `Message::Unknown`.

pub mod frame;
pub mod message;

pub use frame::{FrameQueue, END_BYTE, START_BYTE};
pub use message::Message;
