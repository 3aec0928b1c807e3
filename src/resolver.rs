//! Turns user-supplied URLs into canonical video references.
//!
//! Two host shapes are recognized: the short-link domain (`youtu.be`), where
//! the identifier is the first path segment, and the canonical domain
//! (`youtube.com`, bare or `www`-prefixed), where the identifier is the `v`
//! query parameter. Everything else is rejected.

use std::fmt;

use url::Url;

/// Canonical identifier for a video, extracted from a user-supplied URL.
///
/// Opaque and immutable; valid iff [`resolve`] produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoRef(String);

impl VideoRef {
    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract a video reference from a URL string.
///
/// Returns `None` for unrecognized hosts and for input that does not parse
/// as a URL. Never panics.
pub fn resolve(input: &str) -> Option<VideoRef> {
    let parsed = Url::parse(input).ok()?;
    match parsed.host_str()? {
        "youtu.be" => {
            let id = parsed.path_segments()?.next()?;
            Some(VideoRef(id.to_string()))
        }
        "youtube.com" | "www.youtube.com" => parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| VideoRef(value.into_owned())),
        _ => None,
    }
}

/// Whether the URL resolves to a video reference.
pub fn is_valid(input: &str) -> bool {
    resolve(input).is_some()
}
