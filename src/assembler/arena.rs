//! A fixed-capacity bump allocator. The loaded source file lives in one
//! `Arena`; every line record and token is a `Span` view into it, so all
//! of that memory dies together when the arena is released.
//!
//! Allocation only ever moves the free offset forward. There is no
//! per-allocation free, no compaction, and no growth: running out of room
//! is a fatal `OutOfMemory`. Single-threaded use only.

use super::error::AsmError;

/// A byte range handed out by the arena, or carved out of an arena-owned
/// buffer by the lexer. Plain `(offset, len)` so it stays valid to copy
/// around; dereferencing it borrows the arena.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

pub struct Arena {
    buf: Vec<u8>,
    next_free: usize,
    count: usize,
}

impl Arena {
    /// Creates an arena of exactly `capacity` zeroed bytes. Fails with
    /// `AllocationFailure` if the reservation cannot be satisfied.
    pub fn with_capacity(capacity: usize) -> Result<Self, AsmError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| AsmError::AllocationFailure { capacity })?;
        buf.resize(capacity, 0);

        Ok(Arena {
            buf,
            next_free: 0,
            count: 0,
        })
    }

    /// Hands out the next `len` bytes, still zeroed, and advances the free
    /// offset past them.
    pub fn alloc(&mut self, len: usize) -> Result<Span, AsmError> {
        if len > self.remaining() {
            return Err(AsmError::OutOfMemory {
                requested: len,
                remaining: self.remaining(),
            });
        }

        let span = Span {
            offset: self.next_free,
            len,
        };
        self.next_free += len;
        self.count += 1;
        Ok(span)
    }

    /// Allocates `bytes.len()` bytes and copies `bytes` into them.
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> Result<Span, AsmError> {
        let span = self.alloc(bytes.len())?;
        self.buf[span.offset..span.offset + span.len].copy_from_slice(bytes);
        Ok(span)
    }

    /// Borrows the bytes behind an allocation.
    pub fn bytes(&self, span: Span) -> &[u8] {
        &self.buf[span.offset..span.offset + span.len]
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn bytes_used(&self) -> usize {
        self.next_free
    }

    /// Number of allocations handed out so far.
    pub fn allocations(&self) -> usize {
        self.count
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.next_free
    }

    /// Releases the whole backing buffer at once. The borrow checker
    /// guarantees no view into the arena survives this.
    pub fn release(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::error::AsmError;

    #[test]
    fn test_with_capacity_zeroed() {
        let mut arena = Arena::with_capacity(64).unwrap();
        assert_eq!(arena.capacity(), 64);
        assert_eq!(arena.bytes_used(), 0);
        assert_eq!(arena.allocations(), 0);

        let span = arena.alloc(64).unwrap();
        assert!(arena.bytes(span).iter().all(|b| *b == 0));
    }

    #[test]
    fn test_alloc_advances_without_overlap() {
        let mut arena = Arena::with_capacity(32).unwrap();

        let a = arena.alloc(8).unwrap();
        let b = arena.alloc(8).unwrap();
        let c = arena.alloc(16).unwrap();

        assert_eq!(a, Span { offset: 0, len: 8 });
        assert_eq!(b, Span { offset: 8, len: 8 });
        assert_eq!(c, Span { offset: 16, len: 16 });
        assert_eq!(arena.bytes_used(), 32);
        assert_eq!(arena.allocations(), 3);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn test_alloc_out_of_memory_at_boundary() {
        let mut arena = Arena::with_capacity(8).unwrap();

        // Filling the arena exactly is fine; one byte more is not.
        assert!(arena.alloc(8).is_ok());
        assert_eq!(
            arena.alloc(1),
            Err(AsmError::OutOfMemory { requested: 1, remaining: 0 })
        );

        let mut arena = Arena::with_capacity(8).unwrap();
        arena.alloc(5).unwrap();
        assert_eq!(
            arena.alloc(4),
            Err(AsmError::OutOfMemory { requested: 4, remaining: 3 })
        );
        // A failed allocation must not move the free offset.
        assert_eq!(arena.bytes_used(), 5);
        assert_eq!(arena.allocations(), 1);
    }

    #[test]
    fn test_alloc_copy_round_trip() {
        let mut arena = Arena::with_capacity(16).unwrap();

        let hello = arena.alloc_copy(b"hello").unwrap();
        let world = arena.alloc_copy(b"world").unwrap();

        assert_eq!(arena.bytes(hello), b"hello");
        assert_eq!(arena.bytes(world), b"world");
        assert_eq!(arena.bytes_used(), 10);
    }

    #[test]
    fn test_zero_length_alloc() {
        let mut arena = Arena::with_capacity(4).unwrap();
        let span = arena.alloc(0).unwrap();
        assert_eq!(span.len, 0);
        assert_eq!(arena.bytes(span), b"");
        assert_eq!(arena.allocations(), 1);
    }
}
