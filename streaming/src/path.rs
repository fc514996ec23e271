//! Bounded resource paths

use core::fmt;

/// Size of a path buffer, including the terminator slot
pub const PATH_CAPACITY: usize = 64;

/// Longest path that survives intact
pub const PATH_MAX_LEN: usize = PATH_CAPACITY - 1;

/// Cut `path` to at most [`PATH_MAX_LEN`] bytes without splitting a character
pub fn truncate_path(path: &str) -> &str {
    if path.len() <= PATH_MAX_LEN {
        return path;
    }
    let mut end = PATH_MAX_LEN;
    while !path.is_char_boundary(end) {
        end -= 1;
    }
    &path[..end]
}

/// Fixed-size, inline path buffer held by an asset.
///
/// Longer inputs are silently truncated.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AssetPath {
    buf: [u8; PATH_CAPACITY],
    len: usize,
}

impl AssetPath {
    /// Path of zero length
    pub const EMPTY: Self = Self {
        buf: [0; PATH_CAPACITY],
        len: 0,
    };

    /// Copy up to [`PATH_MAX_LEN`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut path = Self::EMPTY;
        path.set(bytes);
        path
    }

    /// Replace the contents, truncating to [`PATH_MAX_LEN`] bytes
    pub fn set(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(PATH_MAX_LEN);
        self.buf[..len].copy_from_slice(&bytes[..len]);
        self.buf[len..].fill(0);
        self.len = len;
    }

    /// Make the path empty
    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Get the stored bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Path as text, `None` if the stored bytes are not UTF-8
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// Get length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the path is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for AssetPath {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{s:?}"),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("<invalid path>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "assets/meshes/a_rather_long_directory_name/african_head_final_v2.obj";

    #[test]
    fn long_paths_are_truncated() {
        assert!(LONG.len() > PATH_MAX_LEN);
        let path = AssetPath::from_bytes(LONG.as_bytes());
        assert_eq!(path.len(), PATH_MAX_LEN);
        assert_eq!(path.as_str(), Some(&LONG[..PATH_MAX_LEN]));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut s = [b'a'; 62];
        let mut text = [0u8; 66];
        text[..62].copy_from_slice(&s);
        // 'é' is two bytes, straddling the 63-byte limit
        text[62..64].copy_from_slice("é".as_bytes());
        text[64..66].copy_from_slice(b"zz");
        let text = core::str::from_utf8(&text).unwrap();
        assert_eq!(truncate_path(text).len(), 62);
        s[0] = b'b';
        assert_eq!(truncate_path(core::str::from_utf8(&s).unwrap()).len(), 62);
    }

    #[test]
    fn set_overwrites_previous_contents() {
        let mut path = AssetPath::from_bytes(b"models/head.obj");
        path.set(b"x");
        assert_eq!(path.as_str(), Some("x"));
        path.clear();
        assert!(path.is_empty());
    }
}
