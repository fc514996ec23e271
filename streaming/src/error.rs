//! Error types for arena, storage and asset operations

use core::fmt;

/// Arena allocation and access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// Request does not fit in the remaining capacity
    Exhausted { requested: usize, remaining: usize },
    /// Alignment is not a power of two
    InvalidAlignment { align: usize },
    /// Span was issued before the last reset
    StaleSpan {
        span_generation: u32,
        arena_generation: u32,
    },
    /// Span does not lie inside this arena
    OutOfBounds { offset: usize, len: usize },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted {
                requested,
                remaining,
            } => write!(
                f,
                "arena exhausted: requested {requested} bytes, {remaining} remaining"
            ),
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::StaleSpan {
                span_generation,
                arena_generation,
            } => write!(
                f,
                "stale span: generation {span_generation}, arena at {arena_generation}"
            ),
            Self::OutOfBounds { offset, len } => {
                write!(f, "span {offset}+{len} outside arena")
            }
        }
    }
}

impl core::error::Error for ArenaError {}

/// Failure reported by a storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// No file at the requested path
    NotFound,
    /// Device or OS level I/O failure
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for StorageError {}

/// Why an asset ended in the terminal `Undefined` state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetError {
    /// Arena could not hold the asset
    Exhausted,
    /// stat/open/read/close failed at the storage boundary
    StorageUnavailable,
    /// Asset or resource observed in a state its invariants forbid
    ProtocolViolation,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "arena exhausted"),
            Self::StorageUnavailable => write!(f, "storage unavailable"),
            Self::ProtocolViolation => write!(f, "protocol violation"),
        }
    }
}

impl core::error::Error for AssetError {}

impl From<ArenaError> for AssetError {
    fn from(err: ArenaError) -> Self {
        match err {
            ArenaError::Exhausted { .. } => Self::Exhausted,
            _ => Self::ProtocolViolation,
        }
    }
}

impl From<StorageError> for AssetError {
    fn from(_: StorageError) -> Self {
        Self::StorageUnavailable
    }
}
