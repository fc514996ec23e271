//! Logical game assets

use crate::arena::{Arena, Span};
use crate::error::ArenaError;
use crate::path::truncate_path;

/// Resource lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Not loaded; an idle asset bound to it will request it
    Inactive,
    /// Bytes are in the arena and immutable until [`Resource::reset`]
    Completed,
    /// The transfer filling it failed; stays here until [`Resource::reset`]
    Undefined,
}

/// A named asset (mesh, texture, ...) whose bytes live in the arena.
///
/// The path is copied into arena memory at construction, so the resource
/// does not outlive the arena generation it was created in.
#[derive(Debug, Clone)]
pub struct Resource {
    path: Span,
    data: Option<Span>,
    size: usize,
    state: ResourceState,
}

impl Resource {
    /// Register a resource, storing its (bounded) path in `arena`
    pub fn new(path: &str, arena: &mut Arena) -> Result<Self, ArenaError> {
        let path = arena.alloc_copy(truncate_path(path).as_bytes())?;
        Ok(Self {
            path,
            data: None,
            size: 0,
            state: ResourceState::Inactive,
        })
    }

    /// Get current state
    #[inline]
    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Whether the payload is loaded
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state == ResourceState::Completed
    }

    /// Byte count of the loaded payload
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw path bytes
    pub fn path_bytes<'a>(&self, arena: &'a Arena) -> Result<&'a [u8], ArenaError> {
        arena.bytes(self.path)
    }

    /// Path as text, `None` once the arena has been reset
    pub fn path<'a>(&self, arena: &'a Arena) -> Option<&'a str> {
        core::str::from_utf8(arena.bytes(self.path).ok()?).ok()
    }

    /// Loaded payload, available only once completed
    pub fn data<'a>(&self, arena: &'a Arena) -> Option<&'a [u8]> {
        if !self.is_completed() {
            return None;
        }
        arena.bytes(self.data?).ok()
    }

    /// Span of the loaded payload
    #[inline]
    pub fn data_span(&self) -> Option<Span> {
        self.data
    }

    /// Take ownership of an uploaded buffer
    pub(crate) fn complete(&mut self, data: Span, size: usize) {
        self.data = Some(data);
        self.size = size;
        self.state = ResourceState::Completed;
    }

    /// Mark a resource that never loaded as failed. A completed payload
    /// is kept: it was handed over before anything went wrong.
    pub(crate) fn abandon(&mut self) {
        if self.state == ResourceState::Inactive {
            log::debug!("resource abandoned after failed transfer");
            self.state = ResourceState::Undefined;
        }
    }

    /// Forget the payload (or failure) so the resource can be loaded again.
    ///
    /// The payload stays in the arena until the arena itself is reset.
    pub fn reset(&mut self) {
        self.data = None;
        self.size = 0;
        self.state = ResourceState::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_copied_into_arena() {
        let mut arena = Arena::with_capacity(128);
        let res = Resource::new("models/head.obj", &mut arena).unwrap();
        assert_eq!(res.path(&arena), Some("models/head.obj"));
        assert_eq!(arena.used(), "models/head.obj".len());
        assert_eq!(res.state(), ResourceState::Inactive);
        assert_eq!(res.data(&arena), None);
    }

    #[test]
    fn path_allocation_can_exhaust() {
        let mut arena = Arena::with_capacity(4);
        assert!(matches!(
            Resource::new("models/head.obj", &mut arena),
            Err(ArenaError::Exhausted { .. })
        ));
    }

    #[test]
    fn completed_then_reset() {
        let mut arena = Arena::with_capacity(64);
        let mut res = Resource::new("a", &mut arena).unwrap();
        let data = arena.alloc_copy(b"payload").unwrap();
        res.complete(data, 7);
        assert_eq!(res.data(&arena), Some(&b"payload"[..]));
        assert_eq!(res.size(), 7);

        res.reset();
        assert_eq!(res.state(), ResourceState::Inactive);
        assert_eq!(res.data(&arena), None);
        assert_eq!(res.path(&arena), Some("a"));
    }

    #[test]
    fn abandon_only_marks_unloaded() {
        let mut arena = Arena::with_capacity(64);
        let mut res = Resource::new("a", &mut arena).unwrap();
        res.abandon();
        assert_eq!(res.state(), ResourceState::Undefined);
        assert_eq!(res.data(&arena), None);
        res.reset();
        assert_eq!(res.state(), ResourceState::Inactive);

        let data = arena.alloc_copy(b"ok").unwrap();
        res.complete(data, 2);
        res.abandon();
        assert_eq!(res.state(), ResourceState::Completed);
        assert_eq!(res.data(&arena), Some(&b"ok"[..]));
    }

    #[test]
    fn path_goes_stale_with_arena() {
        let mut arena = Arena::with_capacity(64);
        let res = Resource::new("a", &mut arena).unwrap();
        arena.reset();
        assert_eq!(res.path(&arena), None);
        assert!(res.path_bytes(&arena).is_err());
    }
}
