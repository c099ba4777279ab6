// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-capacity byte ring shared between the serial RX interrupt and the frame decoder.
//!
//! The ring holds `N` bytes of storage and can buffer at most `N - 1` of them, so that
//! `read == write` always means "empty". [`RingBuffer::split`] hands out one [`Producer`] and one
//! [`Consumer`]; the producer only ever moves the write cursor and the consumer only ever moves the
//! read cursor, which is all the synchronization the single-core target needs.
//!
//! Writes are all-or-nothing: a write that does not fit is rejected and leaves the ring untouched.

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Receive ring capacity used for the vision link.
pub const RX_CAPACITY: usize = 220;

/// Errors reported by ring writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// The write did not fit; nothing was stored.
    Overflow { requested: usize, available: usize },
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingError::Overflow {
                requested,
                available,
            } => write!(f, "ring overflow: {} bytes requested, {} free", requested, available),
        }
    }
}

/// Byte ring with `N - 1` usable bytes.
pub struct RingBuffer<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    read: AtomicUsize,
    write: AtomicUsize,
}

// The storage is only reached through a `Producer`/`Consumer` pair, and each slot is owned by
// exactly one side at a time according to the cursors.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: UnsafeCell::new([0; N]),
            read: AtomicUsize::new(0),
            write: AtomicUsize::new(0),
        }
    }

    /// Number of bytes the ring can hold at once.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Split into the interrupt-side writer and the task-side reader.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let ring: &RingBuffer<N> = self;
        (Producer { ring }, Consumer { ring })
    }

    /// Append `bytes` from a single context (no split).
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, RingError> {
        Producer { ring: &*self }.write(bytes)
    }

    /// Drain up to `out.len()` bytes from a single context (no split).
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        Consumer { ring: &*self }.read(out)
    }

    /// Buffered byte count.
    pub fn len(&self) -> usize {
        used::<N>(
            self.read.load(Ordering::Acquire),
            self.write.load(Ordering::Acquire),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        *self.read.get_mut() = 0;
        *self.write.get_mut() = 0;
    }

    #[inline]
    fn slot(&self, index: usize) -> *mut u8 {
        // `index` is always reduced modulo `N` by the callers.
        unsafe { (self.buf.get() as *mut u8).add(index) }
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn used<const N: usize>(read: usize, write: usize) -> usize {
    (write + N - read) % N
}

/// Write half. Lives in the serial RX interrupt.
pub struct Producer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<'a, const N: usize> Producer<'a, N> {
    /// Free space in bytes.
    pub fn available(&self) -> usize {
        let read = self.ring.read.load(Ordering::Acquire);
        let write = self.ring.write.load(Ordering::Relaxed);
        N - 1 - used::<N>(read, write)
    }

    /// Append all of `bytes` or nothing.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, RingError> {
        let available = self.available();
        if bytes.len() > available {
            return Err(RingError::Overflow {
                requested: bytes.len(),
                available,
            });
        }

        let write = self.ring.write.load(Ordering::Relaxed);
        for (i, &b) in bytes.iter().enumerate() {
            let slot = self.ring.slot((write + i) % N);
            // Slots between `write` and `read - 1` belong to the producer.
            unsafe { slot.write_volatile(b) };
        }
        self.ring
            .write
            .store((write + bytes.len()) % N, Ordering::Release);
        Ok(bytes.len())
    }
}

/// Read half. Owned by the decode task.
pub struct Consumer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<'a, const N: usize> Consumer<'a, N> {
    pub fn len(&self) -> usize {
        let read = self.ring.read.load(Ordering::Relaxed);
        let write = self.ring.write.load(Ordering::Acquire);
        used::<N>(read, write)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte `offset` positions past the read cursor, without consuming it.
    pub fn peek(&self, offset: usize) -> Option<u8> {
        if offset >= self.len() {
            return None;
        }
        let read = self.ring.read.load(Ordering::Relaxed);
        // Slots between `read` and `write - 1` belong to the consumer.
        Some(unsafe { self.ring.slot((read + offset) % N).read_volatile() })
    }

    /// Discard up to `n` bytes. Returns how many were discarded.
    pub fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.len());
        let read = self.ring.read.load(Ordering::Relaxed);
        self.ring.read.store((read + n) % N, Ordering::Release);
        n
    }

    /// Copy up to `out.len()` bytes out and consume them.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.len());
        for (i, dst) in out.iter_mut().take(n).enumerate() {
            // `i < len` so `peek` cannot miss.
            *dst = self.peek(i).unwrap_or(0);
        }
        self.advance(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_come_back_in_order_across_wrap() {
        let mut ring: RingBuffer<8> = RingBuffer::new();
        let mut out = [0u8; 8];

        assert_eq!(ring.write(&[1, 2, 3, 4, 5]), Ok(5));
        assert_eq!(ring.read(&mut out[..3]), 3);
        assert_eq!(&out[..3], &[1, 2, 3]);

        // Write cursor wraps past the end of storage.
        assert_eq!(ring.write(&[6, 7, 8, 9, 10]), Ok(5));
        assert_eq!(ring.len(), 7);
        assert_eq!(ring.read(&mut out), 7);
        assert_eq!(&out[..7], &[4, 5, 6, 7, 8, 9, 10]);
        assert!(ring.is_empty());
    }

    #[test]
    fn usable_capacity_is_one_less_than_storage() {
        let mut ring: RingBuffer<8> = RingBuffer::new();
        assert_eq!(ring.capacity(), 7);
        assert_eq!(ring.write(&[0; 7]), Ok(7));
        assert_eq!(
            ring.write(&[0]),
            Err(RingError::Overflow {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn oversized_write_leaves_ring_unchanged() {
        let mut ring: RingBuffer<8> = RingBuffer::new();
        ring.write(&[9, 8, 7]).unwrap();

        let err = ring.write(&[1, 2, 3, 4, 5]).unwrap_err();
        assert_eq!(
            err,
            RingError::Overflow {
                requested: 5,
                available: 4
            }
        );
        assert_eq!(ring.len(), 3);

        let mut out = [0u8; 4];
        assert_eq!(ring.read(&mut out), 3);
        assert_eq!(&out[..3], &[9, 8, 7]);
    }

    #[test]
    fn empty_write_is_accepted() {
        let mut ring: RingBuffer<4> = RingBuffer::new();
        assert_eq!(ring.write(&[]), Ok(0));
        assert!(ring.is_empty());
    }

    #[test]
    fn split_halves_share_storage() {
        let mut ring: RingBuffer<16> = RingBuffer::new();
        let (mut tx, mut rx) = ring.split();

        assert_eq!(tx.available(), 15);
        tx.write(b"abc").unwrap();
        assert_eq!(rx.len(), 3);
        assert_eq!(rx.peek(0), Some(b'a'));
        assert_eq!(rx.peek(2), Some(b'c'));
        assert_eq!(rx.peek(3), None);

        assert_eq!(rx.advance(10), 3);
        assert!(rx.is_empty());
        assert_eq!(tx.available(), 15);
    }

    #[test]
    fn clear_resets_cursors() {
        let mut ring: RingBuffer<4> = RingBuffer::new();
        ring.write(&[1, 2]).unwrap();
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.write(&[1, 2, 3]), Ok(3));
    }
}
