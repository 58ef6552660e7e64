//! Top-level facade crate for duolink.
//!
//! Re-exports the protocol core and the node library so users can depend on a single crate.

pub mod core {
    pub use duolink_core::*;
}

pub mod node {
    pub use duolink_node::*;
}
