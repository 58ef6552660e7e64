//! Byte FIFO with message-framing helpers.
//!
//! One `FrameQueue` buffers outbound bytes waiting for the transmitter, another
//! accumulates inbound bytes until an END marker completes a frame.
//!
//! Extraction rules:
//! - Nothing is returned until an END byte is buffered (a frame may still be
//!   arriving; the queue is left untouched).
//! - The payload is everything between the first START before that END and
//!   the END itself. Bytes in front of the START are consumed and dropped.
//! - If no START precedes the END, the bytes before the END are the payload.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::error::{DuolinkError, Result};

/// Frame start marker (`#`).
pub const START_BYTE: u8 = b'#';
/// Frame end marker (`!`).
pub const END_BYTE: u8 = b'!';

/// Growable byte FIFO that counts complete frames.
#[derive(Debug, Default)]
pub struct FrameQueue {
    buf: VecDeque<u8>,
    frames: usize,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            frames: 0,
        }
    }

    /// Append one byte. Returns `true` when the byte was an END marker.
    pub fn push(&mut self, byte: u8) -> bool {
        self.grow_if_full();
        self.buf.push_back(byte);
        if byte == END_BYTE {
            self.frames += 1;
            return true;
        }
        false
    }

    /// Append `START`, the payload, then `END`.
    ///
    /// The payload must not contain START or END bytes. This is not checked.
    pub fn push_frame(&mut self, payload: &[u8]) {
        self.push(START_BYTE);
        for &b in payload {
            self.push(b);
        }
        self.push(END_BYTE);
    }

    /// Put a byte back at the front (a transmit that could not complete).
    pub fn push_front(&mut self, byte: u8) {
        self.grow_if_full();
        self.buf.push_front(byte);
        if byte == END_BYTE {
            self.frames += 1;
        }
    }

    /// Remove and return the front byte.
    pub fn pop_byte(&mut self) -> Option<u8> {
        let b = self.buf.pop_front()?;
        if b == END_BYTE {
            self.frames = self.frames.saturating_sub(1);
        }
        Some(b)
    }

    pub fn front(&self) -> Option<u8> {
        self.buf.front().copied()
    }

    pub fn has_frame(&self) -> bool {
        self.frames > 0
    }

    /// Number of complete frames currently buffered.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Extract the oldest complete frame's payload.
    pub fn pop_frame(&mut self) -> Option<Bytes> {
        let end = self.buf.iter().position(|&b| b == END_BYTE)?;
        let start = self
            .buf
            .iter()
            .take(end)
            .position(|&b| b == START_BYTE)
            .map(|s| s + 1)
            .unwrap_or(0);

        if start > 1 {
            tracing::trace!(dropped = start - 1, "bytes before frame start dropped");
        }
        let payload: Vec<u8> = self.buf.range(start..end).copied().collect();
        self.buf.drain(..=end);
        self.frames = self.frames.saturating_sub(1);
        Some(Bytes::from(payload))
    }

    /// Like `pop_frame`, for callers that cannot wait for the rest of a frame.
    pub fn require_frame(&mut self) -> Result<Bytes> {
        self.pop_frame().ok_or(DuolinkError::IncompleteFrame)
    }

    /// Drop everything. Returns how many bytes were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.buf.len();
        self.buf.clear();
        self.frames = 0;
        n
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    // Capacity doubles when full and is never given back.
    fn grow_if_full(&mut self) {
        let cap = self.buf.capacity();
        if self.buf.len() == cap {
            self.buf.reserve_exact(cap.max(1));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn capacity_never_shrinks() {
        let mut q = FrameQueue::new();
        for _ in 0..100 {
            q.push(b'x');
        }
        let cap = q.capacity();
        assert!(cap >= 100);
        q.clear();
        assert_eq!(q.capacity(), cap);
    }

    #[test]
    fn end_without_start_yields_prefix() {
        let mut q = FrameQueue::new();
        for &b in b"ab!#cd!" {
            q.push(b);
        }
        assert_eq!(q.frame_count(), 2);
        assert_eq!(q.pop_frame().unwrap().as_ref(), b"ab");
        assert_eq!(q.pop_frame().unwrap().as_ref(), b"cd");
        assert!(q.is_empty());
        assert!(!q.has_frame());
    }

    #[test]
    fn pop_byte_tracks_frames() {
        let mut q = FrameQueue::new();
        q.push_frame(b"ding");
        assert!(q.has_frame());
        while let Some(b) = q.pop_byte() {
            if b == END_BYTE {
                assert!(!q.has_frame());
            }
        }
        q.push_front(END_BYTE);
        assert_eq!(q.frame_count(), 1);
    }

    #[test]
    fn require_frame_reports_incomplete() {
        let mut q = FrameQueue::new();
        for &b in b"#dinnn" {
            q.push(b);
        }
        let err = q.require_frame().unwrap_err();
        assert_eq!(err.code().as_str(), "INCOMPLETE_FRAME");
        assert_eq!(q.len(), 6);
    }
}
