use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::{PlaybackState, PlayerCommand, VideoWidget};

struct HandleInner {
    widget: Option<Box<dyn VideoWidget>>,
    ready: bool,
    destroyed: bool,
    last_state: PlaybackState,
    last_position: f64,
}

/// One live embedded player at an ordinal slot position.
///
/// Owned by the session view through its adapter; the sync coordinator holds
/// shared references keyed by ordinal. Commands issued before readiness or
/// after destruction are silent no-ops.
pub struct PlayerHandle {
    ordinal: usize,
    inner: Mutex<HandleInner>,
}

impl PlayerHandle {
    pub(crate) fn new(ordinal: usize) -> Arc<Self> {
        Arc::new(Self {
            ordinal,
            inner: Mutex::new(HandleInner {
                widget: None,
                ready: false,
                destroyed: false,
                last_state: PlaybackState::Unstarted,
                last_position: 0.0,
            }),
        })
    }

    /// Slot position of this player within the session (0..N-1).
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Whether the widget finished its handshake and accepts commands.
    pub fn is_ready(&self) -> bool {
        let inner = self.lock();
        inner.ready && !inner.destroyed
    }

    /// Last playback state reported by the widget.
    pub fn state(&self) -> PlaybackState {
        self.lock().last_state
    }

    /// Current playback position in seconds.
    ///
    /// Reads the widget when it is ready; otherwise returns the last-known
    /// value (0.0 before any read).
    pub fn position(&self) -> f64 {
        let mut inner = self.lock();
        if inner.ready && !inner.destroyed {
            if let Some(widget) = inner.widget.as_ref() {
                let position = widget.current_time();
                inner.last_position = position;
                return position;
            }
        }
        inner.last_position
    }

    /// Issue a fire-and-forget command to the widget.
    ///
    /// Silently dropped when the widget has not signalled readiness or was
    /// already destroyed.
    pub fn command(&self, command: PlayerCommand) {
        let inner = self.lock();
        if !inner.ready || inner.destroyed {
            debug!(
                ordinal = self.ordinal,
                ?command,
                "Dropping command for player that is not ready"
            );
            return;
        }
        let Some(widget) = inner.widget.as_ref() else {
            return;
        };
        match command {
            PlayerCommand::Play => widget.play(),
            PlayerCommand::Pause => widget.pause(),
            PlayerCommand::Stop => widget.stop(),
            PlayerCommand::SeekTo(seconds) => widget.seek_to(seconds),
        }
    }

    /// Tear down the widget. Idempotent, and safe to call before the widget
    /// ever reached readiness.
    pub fn destroy(&self) {
        let widget = {
            let mut inner = self.lock();
            inner.destroyed = true;
            inner.ready = false;
            inner.widget.take()
        };
        if let Some(widget) = widget {
            widget.destroy();
        }
    }

    pub(crate) fn attach(&self, widget: Box<dyn VideoWidget>) {
        let mut inner = self.lock();
        if inner.destroyed {
            // The slot was torn down while the widget was being built.
            widget.destroy();
            return;
        }
        inner.widget = Some(widget);
    }

    pub(crate) fn mark_ready(&self) {
        let mut inner = self.lock();
        if !inner.destroyed {
            inner.ready = true;
        }
    }

    pub(crate) fn record_state(&self, state: PlaybackState) {
        self.lock().last_state = state;
    }

    fn lock(&self) -> MutexGuard<'_, HandleInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
