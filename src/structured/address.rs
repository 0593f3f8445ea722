//! Address codec for locations inside a value tree
//!
//! An [`Address`] is the path from a document root to one node, made of
//! mapping keys and sequence indices. Its string form is a pointer in the
//! familiar `/a/0/b` shape: key segments escape `~` as `~0` and `/` as `~1`
//! (in that order) so that keys containing separators survive the trip.
//!
//! The codec is a pure string transformation. Whether an address resolves
//! inside a particular model is decided by [`Value::get`](super::Value::get)
//! and friends, not here.

use std::fmt;

/// Display name of the synthetic root node. Never a real mapping key.
pub const ROOT_LABEL: &str = "ROOT";

/// One step of an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key (unescaped, exactly as it appears in the model)
    Key(String),
    /// Sequence index
    Index(usize),
}

impl Segment {
    /// The pointer spelling of this segment (escaped for keys).
    pub fn encode(&self) -> String {
        match self {
            Segment::Key(key) => escape_key(key),
            Segment::Index(index) => index.to_string(),
        }
    }

    /// Decode one pointer token.
    ///
    /// Canonical decimal tokens (no sign, no leading zero) become indices;
    /// everything else is an unescaped key.
    pub fn decode(token: &str) -> Self {
        if is_canonical_index(token) {
            if let Ok(index) = token.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(unescape_key(token))
    }

    /// The key text this segment would match in a mapping.
    ///
    /// Index segments match the key with the same decimal spelling, which is
    /// how numeric mapping keys come back out of a decoded pointer.
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn is_canonical_index(token: &str) -> bool {
    !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'))
}

/// Escape a mapping key for use as a pointer token.
pub fn escape_key(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Reverse of [`escape_key`]: `~1` → `/` first, then `~0` → `~`.
pub fn unescape_key(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

// ─────────────────────────────────────────────────────────────────────────────
// Address
// ─────────────────────────────────────────────────────────────────────────────

/// Path from a document root to a node. The empty address is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    segments: Vec<Segment>,
}

impl Address {
    /// The root address.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Address of a child under a mapping key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        self.child(Segment::Key(key.into()))
    }

    /// Address of a child at a sequence index.
    pub fn with_index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Split into the parent address and the final segment.
    ///
    /// Returns `None` for the root.
    pub fn split_last(&self) -> Option<(Address, &Segment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((Address::from_segments(parent.to_vec()), last))
    }

    /// Encode as a pointer string. The root encodes to `""`.
    pub fn encode(&self) -> String {
        encode(&self.segments)
    }

    /// Decode a pointer string. Both `""` and `"/"` decode to the root.
    pub fn decode(pointer: &str) -> Self {
        Self {
            segments: decode(pointer),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("/")
        } else {
            f.write_str(&self.encode())
        }
    }
}

/// Join escaped segments with `/`. An empty list encodes to the root pointer `""`.
pub fn encode(segments: &[Segment]) -> String {
    let mut pointer = String::new();
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&segment.encode());
    }
    pointer
}

/// Split a pointer on `/` and unescape each token.
pub fn decode(pointer: &str) -> Vec<Segment> {
    if pointer.is_empty() || pointer == "/" {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(Segment::decode).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Segment {
        Segment::Key(k.to_string())
    }

    #[test]
    fn test_root_encodes_empty() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").is_empty());
        assert!(decode("/").is_empty());
        assert!(Address::root().is_root());
    }

    #[test]
    fn test_escape_order() {
        assert_eq!(escape_key("a/b"), "a~1b");
        assert_eq!(escape_key("a~b"), "a~0b");
        // "~" must be escaped before "/" or "~1" would be double-escaped
        assert_eq!(escape_key("~/"), "~0~1");
        assert_eq!(unescape_key("~01"), "~1");
    }

    #[test]
    fn test_round_trip_keys_with_separators() {
        let keys = [
            "plain", "a/b", "a~b", "~", "/", "~/", "/~", "~0", "~1", "a~1b", "x~01/y", "//~~",
            "",
        ];
        for k in keys {
            let segments = vec![key("outer"), key(k), Segment::Index(3)];
            let pointer = encode(&segments);
            assert_eq!(decode(&pointer), segments, "pointer {:?}", pointer);
        }
    }

    #[test]
    fn test_decode_indices() {
        assert_eq!(
            decode("/items/0/name"),
            vec![key("items"), Segment::Index(0), key("name")]
        );
        // Leading zeros are not canonical indices
        assert_eq!(decode("/007"), vec![key("007")]);
    }

    #[test]
    fn test_address_helpers() {
        let addr = Address::root().with_key("a/b").with_index(2);
        assert_eq!(addr.encode(), "/a~1b/2");
        assert_eq!(Address::decode(&addr.encode()), addr);

        let (parent, last) = addr.split_last().unwrap();
        assert_eq!(parent, Address::root().with_key("a/b"));
        assert_eq!(last, &Segment::Index(2));
        assert!(Address::root().split_last().is_none());
    }

    #[test]
    fn test_index_segment_as_key() {
        assert_eq!(Segment::Index(12).as_key(), "12");
        assert_eq!(key("k").as_key(), "k");
    }
}
