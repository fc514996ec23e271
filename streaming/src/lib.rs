//! Chunked asset streaming into a bump arena
//!
//! A [`Resource`] names a file; an [`Asset`] moves its bytes from storage
//! into an [`Arena`] a bounded chunk per frame tick. The work is split in
//! two halves sharing one [`AssetState`]:
//!
//! - [`pump_core`] is platform independent and only touches the arena.
//! - [`StorageDriver::pump`] talks to a [`Storage`] backend.
//!
//! Call both once per tick, core first, and a small asset completes within
//! three ticks.

#![no_std]

extern crate alloc;

pub mod arena;
pub mod asset;
pub mod driver;
pub mod error;
pub mod memory;
pub mod path;
pub mod resource;

pub use arena::{Arena, Span};
pub use asset::{Asset, AssetState, pump_core};
pub use driver::{DEFAULT_CHUNK_SIZE, Storage, StorageDriver};
pub use error::{ArenaError, AssetError, StorageError};
pub use memory::{MemoryHandle, MemoryStorage};
pub use path::{AssetPath, PATH_CAPACITY, PATH_MAX_LEN};
pub use resource::{Resource, ResourceState};
