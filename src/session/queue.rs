//! Buffered application data.

use std::cmp;
use std::collections::VecDeque;

use bytes::Bytes;

/// Ordered queue of decoded payload chunks with a consumption cursor.
///
/// Chunks are appended as the decoder produces them and drained from
/// the front by the caller's reads, which may stop anywhere inside a
/// chunk. `unread` caches the total so [`available`](Self::available)
/// is O(1); it always equals the sum of unread bytes across all
/// retained chunks.
#[derive(Debug, Default)]
pub(super) struct ChunkQueue {
    chunks: VecDeque<Bytes>,
    head_consumed: usize,
    unread: usize,
}

impl ChunkQueue {
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Append a decoded chunk at the tail.
    pub fn push(&mut self, chunk: Bytes) {
        if chunk.is_empty() {
            return;
        }
        self.unread += chunk.len();
        self.chunks.push_back(chunk);
    }

    /// Unread byte count. O(1).
    #[inline]
    pub fn available(&self) -> usize { self.unread }

    /// Copy up to `buf.len()` bytes into `buf`, in order, possibly
    /// spanning several chunks. Fully-consumed chunks are dropped.
    /// Returns the count copied; 0 when the queue is empty.
    pub fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let mut copied = 0;
        while let Some(head) = self.chunks.front() {
            let left_in_head = head.len() - self.head_consumed;
            if left_in_head == 0 {
                self.chunks.pop_front();
                self.head_consumed = 0;
                continue;
            }
            if copied == buf.len() {
                break;
            }
            let step = cmp::min(left_in_head, buf.len() - copied);
            buf[copied..copied + step]
                .copy_from_slice(&head[self.head_consumed..self.head_consumed + step]);
            self.head_consumed += step;
            self.unread -= step;
            copied += step;
        }
        copied
    }

    /// Owned-buffer variant of [`read_into`](Self::read_into), sized
    /// to min(`max`, available).
    pub fn read_owned(&mut self, max: usize) -> Vec<u8> {
        let mut buf = vec![0u8; cmp::min(max, self.unread)];
        let copied = self.read_into(&mut buf);
        debug_assert_eq!(copied, buf.len());
        buf
    }
}
