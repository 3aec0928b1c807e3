//! Boundary traits for the third-party embedded player.
//!
//! The original integration is a global script exposing a widget constructor
//! and an "API ready" hook. These traits are the only place that shape is
//! allowed to appear; the rest of the crate sees [`crate::player::PlayerHandle`]
//! and [`crate::player::PlayerEvent`] instead.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::resolver::VideoRef;

use super::{ContainerId, EmbedOptions, PlayerError, PlayerEvent};

/// One live embedded widget instance.
///
/// All control methods are fire-and-forget, mirroring the embed API: the
/// widget acknowledges nothing directly, but emits events on the channel it
/// was created with.
pub trait VideoWidget: Send + Sync {
    /// Start or resume playback.
    fn play(&self);

    /// Pause playback.
    fn pause(&self);

    /// Stop playback entirely.
    fn stop(&self);

    /// Jump to an absolute position in seconds.
    fn seek_to(&self, seconds: f64);

    /// The widget's reported playback position in seconds.
    fn current_time(&self) -> f64;

    /// Tear down the widget and release its container binding.
    fn destroy(&self);
}

/// Factory for embedded widgets; the sole consumer of the third-party
/// script surface.
#[async_trait]
pub trait WidgetFactory: Send + Sync {
    /// Load the third-party player script.
    ///
    /// Callers go through [`crate::player::ScriptLoader`], which guarantees
    /// this runs at most once per process while a load is outstanding.
    ///
    /// # Errors
    /// Returns `PlayerError::ScriptLoad` if the script cannot be fetched or
    /// evaluated.
    async fn load_script(&self) -> Result<(), PlayerError>;

    /// Instantiate a widget scoped to `container`, bound to one video.
    ///
    /// Lifecycle events (ready, state changes, errors) are delivered on
    /// `events`. Construction returns without waiting for readiness.
    ///
    /// # Errors
    /// Returns `PlayerError::CreationFailed` if the widget cannot be built.
    async fn create_widget(
        &self,
        container: &ContainerId,
        video: &VideoRef,
        options: &EmbedOptions,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Result<Box<dyn VideoWidget>, PlayerError>;
}
