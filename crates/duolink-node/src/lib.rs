//! duolink node library.
//!
//! Wires the serial transport, the peer session and the event relay into a
//! `Node` that an outer loop feeds with ticks and serial interrupts. Used by
//! the demo binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod session;
pub mod transport;
