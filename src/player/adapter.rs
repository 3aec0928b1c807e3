use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::resolver::VideoRef;

use super::{
    ContainerId, EmbedOptions, PlayerError, PlayerEvent, PlayerHandle, ScriptLoader, WidgetFactory,
};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Owns exactly one embedded widget bound to one video reference.
///
/// Translates the widget's lifecycle into the crate's uniform event stream
/// and keeps the associated [`PlayerHandle`] current. Creation is
/// non-blocking: the adapter returns before the widget signals readiness,
/// which arrives later as [`PlayerEvent::Ready`].
pub struct PlayerAdapter {
    ordinal: usize,
    video: VideoRef,
    live: bool,
    handle: Arc<PlayerHandle>,
    events_tx: broadcast::Sender<PlayerEvent>,
    pump: Option<JoinHandle<()>>,
}

impl PlayerAdapter {
    /// Create a widget for `video` inside `container` and start pumping its
    /// events.
    ///
    /// Ensures the player script singleton is loaded first; concurrent
    /// creations share one load.
    ///
    /// # Errors
    /// Returns `PlayerError::ScriptLoad` or `PlayerError::CreationFailed`
    /// when the backend cannot produce a widget.
    pub async fn create(
        factory: &Arc<dyn WidgetFactory>,
        loader: &ScriptLoader,
        container: ContainerId,
        ordinal: usize,
        video: VideoRef,
        live: bool,
    ) -> Result<Self, PlayerError> {
        loader.ensure_loaded(factory.as_ref()).await?;

        let (widget_tx, widget_rx) = mpsc::unbounded_channel();
        let widget = factory
            .create_widget(&container, &video, &EmbedOptions::for_mode(live), widget_tx)
            .await?;

        let handle = PlayerHandle::new(ordinal);
        handle.attach(widget);

        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let pump = tokio::spawn(Self::pump_events(
            Arc::clone(&handle),
            widget_rx,
            events_tx.clone(),
        ));

        debug!(ordinal, video = %video, live, container = %container, "Created player adapter");

        Ok(Self {
            ordinal,
            video,
            live,
            handle,
            events_tx,
            pump: Some(pump),
        })
    }

    async fn pump_events(
        handle: Arc<PlayerHandle>,
        mut widget_rx: mpsc::UnboundedReceiver<PlayerEvent>,
        events_tx: broadcast::Sender<PlayerEvent>,
    ) {
        while let Some(event) = widget_rx.recv().await {
            match event {
                PlayerEvent::Ready => handle.mark_ready(),
                PlayerEvent::StateChanged(state) => handle.record_state(state),
                PlayerEvent::Error(code) => {
                    warn!(ordinal = handle.ordinal(), code, "Player widget error");
                }
            }
            let _ = events_tx.send(event);
        }
    }

    /// Subscribe to this adapter's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events_tx.subscribe()
    }

    /// Shared handle observed and commanded by the sync coordinator.
    pub fn handle(&self) -> Arc<PlayerHandle> {
        Arc::clone(&self.handle)
    }

    /// Slot position of this adapter within the session.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The video reference this adapter is bound to.
    pub fn video(&self) -> &VideoRef {
        &self.video
    }

    /// Whether the slot was mounted in live mode.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Re-creation policy: an adapter survives a slot update iff neither the
    /// video reference nor the live flag changed.
    pub fn matches(&self, video: &VideoRef, live: bool) -> bool {
        self.video == *video && self.live == live
    }

    /// Tear down the widget and stop the event pump. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        self.handle.destroy();
    }
}

impl Drop for PlayerAdapter {
    fn drop(&mut self) {
        self.destroy();
    }
}
