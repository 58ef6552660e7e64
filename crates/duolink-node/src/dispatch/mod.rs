//! Node dispatch.
//!
//! `Node` is the single owner of a transport and a session and the only place
//! where hardware events, ticks and user actions meet.

pub mod node;

pub use node::Node;
