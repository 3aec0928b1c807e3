//! Navigation contract between the input step and the viewing step.
//!
//! The handoff is a query string carrying `mode` (video or live) and a
//! repeated `url` parameter. The viewing step tolerates any number of
//! entries and silently drops the ones the resolver rejects.

use std::fmt;

use url::form_urlencoded;

use crate::resolver::{self, VideoRef};

/// Playback mode for a viewing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    /// Regular on-demand videos
    #[default]
    Video,

    /// Live streams; suppresses the live-chat panel
    Live,
}

impl PlayMode {
    /// Parse the `mode` query parameter; anything but `live` means video.
    pub fn from_param(value: &str) -> Self {
        if value == "live" { Self::Live } else { Self::Video }
    }

    /// The query-parameter spelling of this mode.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

/// A resolved request to open a viewing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRequest {
    /// Playback mode shared by every player of the session.
    pub mode: PlayMode,

    /// Ordered video references, invalid submissions already dropped.
    pub refs: Vec<VideoRef>,
}

impl WatchRequest {
    /// Build a request from a mode and raw URL strings, dropping entries
    /// the resolver rejects.
    pub fn from_urls<S: AsRef<str>>(mode: PlayMode, urls: &[S]) -> Self {
        let refs = urls
            .iter()
            .filter_map(|url| resolver::resolve(url.as_ref()))
            .collect();
        Self { mode, refs }
    }

    /// Parse the handoff query string (`mode=...&url=...&url=...`).
    pub fn from_query(query: &str) -> Self {
        let mut mode = PlayMode::default();
        let mut refs = Vec::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "mode" => mode = PlayMode::from_param(&value),
                "url" => {
                    if let Some(video) = resolver::resolve(&value) {
                        refs.push(video);
                    }
                }
                _ => {}
            }
        }
        Self { mode, refs }
    }
}

/// Serialize the handoff query string from the raw submitted URLs.
pub fn handoff_query<S: AsRef<str>>(mode: PlayMode, urls: &[S]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("mode", mode.as_param());
    for url in urls {
        serializer.append_pair("url", url.as_ref());
    }
    serializer.finish()
}
