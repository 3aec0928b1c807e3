use crate::resolver::VideoRef;

/// Errors that can occur while managing an embedded player widget
#[derive(thiserror::Error, Debug, Clone)]
pub enum PlayerError {
    /// The third-party player script failed to load
    #[error("Player script failed to load: {0}")]
    ScriptLoad(String),

    /// Widget construction failed for a video
    #[error("Failed to create widget for video {video}: {reason}")]
    CreationFailed {
        /// Video the widget was being created for
        video: VideoRef,
        /// Backend-reported reason
        reason: String,
    },

    /// The handle was destroyed before the operation could run
    #[error("Player handle already destroyed")]
    Destroyed,
}
