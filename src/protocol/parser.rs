// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame extraction for the vision link.
//!
//! The parser works directly on the ring's read side and never consumes a partial frame: if the
//! length byte announces more bytes than are buffered, it returns and retries on the next call.
//! Anything that cannot start a valid frame (wrong sync byte, impossible length, bad checksum)
//! costs exactly one byte of advance, so the stream always resynchronizes.

use log::trace;

use crate::protocol::messages::*;
use crate::protocol::ring::Consumer;

/// Running counters, for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    pub frames: u32,
    pub checksum_failures: u32,
    pub skipped: u32,
}

#[derive(Default)]
pub struct Parser {
    stats: ParserStats,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Pull the next complete, checksum-valid frame out of `rx` into `out`.
    ///
    /// Returns the frame length, or 0 when no complete frame is buffered. Call until it returns 0
    /// to drain everything that has arrived.
    pub fn try_get_frame<const N: usize>(
        &mut self,
        rx: &mut Consumer<'_, N>,
        out: &mut [u8; MAX_FRAME_LEN],
    ) -> usize {
        let longest = MAX_FRAME_LEN.min(N - 1);

        loop {
            let buffered = rx.len();
            if buffered < MIN_FRAME_LEN {
                return 0;
            }

            if rx.peek(0) != Some(START_BYTE) {
                self.skip(rx);
                continue;
            }

            let len = rx.peek(1).unwrap_or(0) as usize;
            if !(MIN_FRAME_LEN..=longest).contains(&len) {
                trace!("bad frame length {}", len);
                self.skip(rx);
                continue;
            }

            // Partial frame: wait for the rest.
            if buffered < len {
                return 0;
            }

            let mut sum = 0u8;
            for i in 0..len - 1 {
                sum = sum.wrapping_add(rx.peek(i).unwrap_or(0));
            }
            if rx.peek(len - 1) != Some(sum) {
                trace!("checksum mismatch on {}-byte frame", len);
                self.stats.checksum_failures = self.stats.checksum_failures.wrapping_add(1);
                self.skip(rx);
                continue;
            }

            for (i, dst) in out.iter_mut().take(len).enumerate() {
                *dst = rx.peek(i).unwrap_or(0);
            }
            rx.advance(len);
            self.stats.frames = self.stats.frames.wrapping_add(1);
            return len;
        }
    }

    #[inline]
    fn skip<const N: usize>(&mut self, rx: &mut Consumer<'_, N>) {
        rx.advance(1);
        self.stats.skipped = self.stats.skipped.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ring::RingBuffer;

    fn frame(x: u16, y: u16) -> [u8; TARGET_FRAME_LEN] {
        encode_target(PixelPoint::new(x, y))
    }

    #[test]
    fn single_frame_between_noise() {
        let mut ring: RingBuffer<64> = RingBuffer::new();
        let (mut tx, mut rx) = ring.split();
        let mut parser = Parser::new();
        let mut out = [0u8; MAX_FRAME_LEN];

        tx.write(&[0x01, 0x02, 0x55]).unwrap();
        tx.write(&frame(100, 200)).unwrap();
        tx.write(&[0x13, 0x37, 0x00, 0xFF, 0x42]).unwrap();

        assert_eq!(parser.try_get_frame(&mut rx, &mut out), 7);
        assert_eq!(
            Message::parse(&out[..7]).map(|m| m.target()),
            Some(PixelPoint::new(100, 200))
        );

        assert_eq!(parser.try_get_frame(&mut rx, &mut out), 0);
        assert_eq!(parser.try_get_frame(&mut rx, &mut out), 0);
        // Only the tail shorter than a minimal frame is left behind.
        assert!(rx.len() < MIN_FRAME_LEN);
        assert_eq!(parser.stats().frames, 1);
    }

    #[test]
    fn partial_frame_waits_for_more_bytes() {
        let mut ring: RingBuffer<64> = RingBuffer::new();
        let (mut tx, mut rx) = ring.split();
        let mut parser = Parser::new();
        let mut out = [0u8; MAX_FRAME_LEN];
        let f = frame(7, 9);

        tx.write(&f[..5]).unwrap();
        assert_eq!(parser.try_get_frame(&mut rx, &mut out), 0);
        assert_eq!(rx.len(), 5);

        tx.write(&f[5..]).unwrap();
        assert_eq!(parser.try_get_frame(&mut rx, &mut out), 7);
        assert_eq!(&out[..7], &f);
        assert!(rx.is_empty());
    }

    #[test]
    fn flipped_bit_rejects_frame_one_byte_at_a_time() {
        for bit in 0..32 {
            let mut ring: RingBuffer<64> = RingBuffer::new();
            let (mut tx, mut rx) = ring.split();
            let mut parser = Parser::new();
            let mut out = [0u8; MAX_FRAME_LEN];

            let mut f = frame(0x1234, 0x0567);
            f[2 + bit / 8] ^= 1 << (bit % 8);
            tx.write(&f).unwrap();

            assert_eq!(parser.try_get_frame(&mut rx, &mut out), 0, "bit {}", bit);
            assert_eq!(parser.stats().checksum_failures, 1);
            // Whole-frame skipping would have left nothing behind.
            assert_eq!(rx.len(), MIN_FRAME_LEN - 1);
        }
    }

    #[test]
    fn frame_hidden_inside_bad_candidate_is_recovered() {
        let mut ring: RingBuffer<64> = RingBuffer::new();
        let (mut tx, mut rx) = ring.split();
        let mut parser = Parser::new();
        let mut out = [0u8; MAX_FRAME_LEN];

        // A bogus header whose "frame" overlaps the real one.
        tx.write(&[START_BYTE, 5]).unwrap();
        tx.write(&frame(33, 44)).unwrap();

        assert_eq!(parser.try_get_frame(&mut rx, &mut out), 7);
        assert_eq!(
            Message::parse(&out[..7]).map(|m| m.target()),
            Some(PixelPoint::new(33, 44))
        );
        assert!(rx.is_empty());
    }

    #[test]
    fn impossible_length_byte_is_noise() {
        let mut ring: RingBuffer<64> = RingBuffer::new();
        let (mut tx, mut rx) = ring.split();
        let mut parser = Parser::new();
        let mut out = [0u8; MAX_FRAME_LEN];

        tx.write(&[START_BYTE, START_BYTE, 0x02, START_BYTE, 0xF0]).unwrap();
        tx.write(&frame(1, 2)).unwrap();

        assert_eq!(parser.try_get_frame(&mut rx, &mut out), 7);
        assert_eq!(parser.stats().skipped, 5);
    }

    #[test]
    fn drains_back_to_back_frames() {
        let mut ring: RingBuffer<64> = RingBuffer::new();
        let (mut tx, mut rx) = ring.split();
        let mut parser = Parser::new();
        let mut out = [0u8; MAX_FRAME_LEN];

        tx.write(&frame(1, 1)).unwrap();
        tx.write(&frame(2, 2)).unwrap();
        tx.write(&frame(3, 3)).unwrap();

        let mut seen = 0;
        while parser.try_get_frame(&mut rx, &mut out) != 0 {
            seen += 1;
        }
        assert_eq!(seen, 3);
        assert_eq!(out[2..6], [0, 3, 0, 3]);
    }
}
