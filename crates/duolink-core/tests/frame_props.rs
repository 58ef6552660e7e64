//! Property tests for FrameQueue extraction laws.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use duolink_core::protocol::{FrameQueue, END_BYTE, START_BYTE};
use proptest::prelude::*;

fn payload() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        any::<u8>().prop_filter("no markers", |b| *b != START_BYTE && *b != END_BYTE),
        1..64,
    )
}

proptest! {
    #[test]
    fn prop_push_then_pop_round_trips(p in payload()) {
        let mut q = FrameQueue::new();
        q.push_frame(&p);
        let out = q.pop_frame();
        prop_assert_eq!(out.as_deref(), Some(p.as_slice()));
        prop_assert!(q.is_empty());
    }

    #[test]
    fn prop_no_frame_without_end(p in payload(), with_start in any::<bool>()) {
        let mut q = FrameQueue::new();
        if with_start {
            q.push(START_BYTE);
        }
        for &b in &p {
            q.push(b);
        }
        let before = q.len();
        prop_assert!(q.pop_frame().is_none());
        prop_assert_eq!(q.len(), before);
    }

    #[test]
    fn prop_trailing_bytes_untouched(p in payload(), tail in payload()) {
        let mut q = FrameQueue::new();
        q.push_frame(&p);
        q.push(START_BYTE);
        for &b in &tail {
            q.push(b);
        }
        let popped = q.pop_frame();
        prop_assert_eq!(popped.as_deref(), Some(p.as_slice()));
        prop_assert_eq!(q.len(), tail.len() + 1);
        prop_assert_eq!(q.front(), Some(START_BYTE));
    }
}
