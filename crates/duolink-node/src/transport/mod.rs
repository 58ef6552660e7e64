//! Transport layer (serial byte link).
//!
//! `ByteLink` abstracts the UART, `uart` decodes its registers into
//! `LinkEvent`s, `loopback` is an in-memory null modem, and `SerialTransport`
//! pumps framed messages across whichever link it owns.

pub mod codec;
pub mod link;
pub mod loopback;
pub mod serial;
pub mod uart;

pub use link::{ByteLink, LineErrorKind, LinkEvent, TxStatus};
pub use loopback::{InterruptLine, LoopbackLink, NullModem};
pub use serial::{SerialTransport, TransportStats};
