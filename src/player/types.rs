use std::fmt;

/// Playback state reported by an embedded player widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Widget created but playback never started
    Unstarted,

    /// Currently playing
    Playing,

    /// Paused by the user or a sibling command
    Paused,

    /// Playback reached the end of the video
    Ended,

    /// Buffering; informational only, never propagated
    Buffering,

    /// A video is cued but not started
    Cued,
}

impl PlaybackState {
    /// Decode the numeric state code used by the embedded player API.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unstarted => "unstarted",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Ended => "ended",
            Self::Buffering => "buffering",
            Self::Cued => "cued",
        };
        write!(f, "{name}")
    }
}

/// Imperative operation issued to a player handle.
///
/// Fire-and-forget: no acknowledgement beyond the widget's own event
/// emissions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    /// Start or resume playback
    Play,

    /// Pause playback, keeping the current position
    Pause,

    /// Stop playback entirely
    Stop,

    /// Jump to an absolute position in seconds
    SeekTo(f64),
}

/// Event emitted by a player adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    /// The widget finished its handshake and accepts commands
    Ready,

    /// The widget transitioned into a new playback state
    StateChanged(PlaybackState),

    /// The widget reported an opaque error code
    Error(u32),
}

/// Identifier of the container a widget is mounted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    /// Create a container identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Embed configuration handed to widget construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Start playback automatically after load
    pub autoplay: bool,

    /// Reduce widget branding to the minimum the embed allows
    pub modest_branding: bool,

    /// Offer related-video suggestions when playback ends
    pub related_videos: bool,

    /// Hide the live-chat panel next to a live stream
    pub suppress_live_chat: bool,
}

impl EmbedOptions {
    /// Options for a session slot: no autoplay, minimal branding, no
    /// related suggestions; live chat suppressed for live streams.
    pub fn for_mode(live: bool) -> Self {
        Self {
            autoplay: false,
            modest_branding: true,
            related_videos: false,
            suppress_live_chat: live,
        }
    }
}
