//! duolink core: link-agnostic wire primitives, error types, and the message
//! vocabulary.
//!
//! This crate defines the framing and message contracts shared by the node
//! runtime and its test tooling. It carries no runtime or hardware
//! dependencies so it can be reused over any byte link.
//!
//! # Guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Noise on the wire surfaces as `None`, `Message::Unknown` or
//! `DuolinkError`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{DuolinkError, Result};
