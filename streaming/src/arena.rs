//! Fixed-capacity bump allocator
//!
//! All asset buffers and resource paths are carved from one pre-reserved
//! byte region. Allocation is O(1), there is no individual free, and
//! [`Arena::reset`] releases everything at once.
//!
//! Allocations are described by [`Span`] handles rather than references. A
//! span is generation-scoped: `reset` bumps the arena generation, so any span
//! issued earlier is rejected on access instead of aliasing new data.

use crate::error::ArenaError;
use alloc::boxed::Box;
use alloc::vec;
use core::fmt;

/// Upper bound of the alignment an allocation is given implicitly
pub const MAX_ALIGN: usize = 16;

/// Location of an allocation inside an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Span {
    generation: u32,
    offset: usize,
    len: usize,
}

impl Span {
    /// Byte offset from the start of the arena
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get span length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the span covers no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Arena generation this span was issued in
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Span(gen={}, off={}, len={})",
            self.generation, self.offset, self.len
        )
    }
}

/// Bump allocator over an owned byte region.
///
/// Not reentrant: all allocation happens from the single frame-tick call
/// chain.
pub struct Arena {
    storage: Box<[u8]>,
    offset: usize,
    generation: u32,
}

impl Arena {
    /// Reserve a zeroed region of `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_storage(vec![0u8; capacity].into_boxed_slice())
    }

    /// Take ownership of a region supplied by the platform
    pub fn from_storage(storage: Box<[u8]>) -> Self {
        Self {
            storage,
            offset: 0,
            generation: 0,
        }
    }

    /// Get total bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes handed out since the last reset, padding included
    #[inline]
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Get bytes left for allocation
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.offset
    }

    /// Get current generation, bumped by every reset
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Alignment implied by an allocation size: the largest power of two
    /// dividing `len`, capped at [`MAX_ALIGN`]. Odd sizes are byte aligned.
    #[inline]
    pub fn alignment_class(len: usize) -> usize {
        if len == 0 {
            return 1;
        }
        (1usize << len.trailing_zeros()).min(MAX_ALIGN)
    }

    /// Allocate `len` bytes aligned to their [alignment class](Self::alignment_class)
    pub fn alloc(&mut self, len: usize) -> Result<Span, ArenaError> {
        self.alloc_aligned(len, Self::alignment_class(len))
    }

    /// Allocate `len` bytes at an explicit power-of-two alignment.
    ///
    /// Either the whole request fits or nothing changes.
    pub fn alloc_aligned(&mut self, len: usize, align: usize) -> Result<Span, ArenaError> {
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }

        let exhausted = ArenaError::Exhausted {
            requested: len,
            remaining: self.remaining(),
        };
        let start = self
            .offset
            .checked_add(align - 1)
            .map(|v| v & !(align - 1))
            .ok_or(exhausted)?;
        let end = start.checked_add(len).ok_or(exhausted)?;
        if end > self.capacity() {
            return Err(exhausted);
        }

        self.offset = end;
        Ok(Span {
            generation: self.generation,
            offset: start,
            len,
        })
    }

    /// Allocate a span and copy `bytes` into it
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> Result<Span, ArenaError> {
        let span = self.alloc(bytes.len())?;
        self.bytes_mut(span)?.copy_from_slice(bytes);
        Ok(span)
    }

    /// Contents of a live span
    pub fn bytes(&self, span: Span) -> Result<&[u8], ArenaError> {
        self.check(span)?;
        self.storage
            .get(span.offset..span.end())
            .ok_or(ArenaError::OutOfBounds {
                offset: span.offset,
                len: span.len,
            })
    }

    /// Mutable contents of a live span
    pub fn bytes_mut(&mut self, span: Span) -> Result<&mut [u8], ArenaError> {
        self.check(span)?;
        self.storage
            .get_mut(span.offset..span.end())
            .ok_or(ArenaError::OutOfBounds {
                offset: span.offset,
                len: span.len,
            })
    }

    /// Whether `span` was issued since the last reset
    #[inline]
    pub fn is_live(&self, span: Span) -> bool {
        span.generation == self.generation
    }

    fn check(&self, span: Span) -> Result<(), ArenaError> {
        if !self.is_live(span) {
            return Err(ArenaError::StaleSpan {
                span_generation: span.generation,
                arena_generation: self.generation,
            });
        }
        Ok(())
    }

    /// Rewind to empty. Every outstanding span becomes stale; storage
    /// contents are left as they are.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("arena reset (generation {})", self.generation);
    }
}
