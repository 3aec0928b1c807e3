//! Deterministic in-process widget backend.
//!
//! Stands in for the real embedded player during development and in tests:
//! playback position advances with the (tokio) clock, and control calls emit
//! the same state-change echoes the real widget would, which is what the
//! sync coordinator's debounce has to absorb.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::resolver::VideoRef;

use super::{
    ContainerId, EmbedOptions, PlaybackState, PlayerError, PlayerEvent, VideoWidget, WidgetFactory,
};

struct SimState {
    playback: PlaybackState,
    position: f64,
    anchor: Option<Instant>,
    destroyed: bool,
}

struct SimInner {
    video: VideoRef,
    options: EmbedOptions,
    state: Mutex<SimState>,
    events: mpsc::UnboundedSender<PlayerEvent>,
}

/// A simulated widget instance. Cheap to clone; all clones share state, so
/// tests can keep one while the adapter owns another.
#[derive(Clone)]
pub struct SimulatedWidget {
    inner: Arc<SimInner>,
}

impl SimulatedWidget {
    fn new(
        video: VideoRef,
        options: EmbedOptions,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(SimInner {
                video,
                options,
                state: Mutex::new(SimState {
                    playback: PlaybackState::Unstarted,
                    position: 0.0,
                    anchor: None,
                    destroyed: false,
                }),
                events,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.inner.events.send(event);
    }

    fn freeze_position(state: &mut SimState) {
        if let Some(anchor) = state.anchor.take() {
            state.position += anchor.elapsed().as_secs_f64();
        }
    }

    /// The video this widget was created for.
    pub fn video(&self) -> VideoRef {
        self.inner.video.clone()
    }

    /// The embed options the widget was created with.
    pub fn options(&self) -> EmbedOptions {
        self.inner.options
    }

    /// Current simulated playback state.
    pub fn playback_state(&self) -> PlaybackState {
        self.lock().playback
    }

    /// Whether `destroy` has been called.
    pub fn is_destroyed(&self) -> bool {
        self.lock().destroyed
    }

    /// Simulate the video reaching its end.
    pub fn finish(&self) {
        let mut state = self.lock();
        if state.destroyed {
            return;
        }
        Self::freeze_position(&mut state);
        state.playback = PlaybackState::Ended;
        drop(state);
        self.emit(PlayerEvent::StateChanged(PlaybackState::Ended));
    }

    /// Simulate an asynchronous widget error with an opaque code.
    pub fn raise_error(&self, code: u32) {
        self.emit(PlayerEvent::Error(code));
    }
}

impl VideoWidget for SimulatedWidget {
    fn play(&self) {
        let mut state = self.lock();
        if state.destroyed || state.playback == PlaybackState::Playing {
            return;
        }
        state.playback = PlaybackState::Playing;
        state.anchor = Some(Instant::now());
        drop(state);
        self.emit(PlayerEvent::StateChanged(PlaybackState::Playing));
    }

    fn pause(&self) {
        let mut state = self.lock();
        if state.destroyed || state.playback != PlaybackState::Playing {
            return;
        }
        Self::freeze_position(&mut state);
        state.playback = PlaybackState::Paused;
        drop(state);
        self.emit(PlayerEvent::StateChanged(PlaybackState::Paused));
    }

    fn stop(&self) {
        let mut state = self.lock();
        if state.destroyed || state.playback == PlaybackState::Unstarted {
            return;
        }
        Self::freeze_position(&mut state);
        state.position = 0.0;
        state.playback = PlaybackState::Cued;
        drop(state);
        self.emit(PlayerEvent::StateChanged(PlaybackState::Cued));
    }

    fn seek_to(&self, seconds: f64) {
        let mut state = self.lock();
        if state.destroyed {
            return;
        }
        state.position = seconds;
        if state.playback == PlaybackState::Playing {
            state.anchor = Some(Instant::now());
        }
        let echo = match state.playback {
            // A started widget re-announces its state after a seek; that
            // echo is exactly what the coordinator's debounce suppresses.
            PlaybackState::Playing | PlaybackState::Paused => Some(state.playback),
            _ => None,
        };
        drop(state);
        if let Some(echo) = echo {
            self.emit(PlayerEvent::StateChanged(echo));
        }
    }

    fn current_time(&self) -> f64 {
        let state = self.lock();
        match state.anchor {
            Some(anchor) if state.playback == PlaybackState::Playing => {
                state.position + anchor.elapsed().as_secs_f64()
            }
            _ => state.position,
        }
    }

    fn destroy(&self) {
        let mut state = self.lock();
        Self::freeze_position(&mut state);
        state.destroyed = true;
    }
}

/// Factory producing [`SimulatedWidget`] instances.
///
/// Keeps a registry of every widget it created so tests and the demo binary
/// can drive them as "the user".
pub struct SimulatedFactory {
    ready_delay: Duration,
    fail_script: bool,
    script_loads: AtomicUsize,
    created: Mutex<Vec<SimulatedWidget>>,
}

impl SimulatedFactory {
    /// Factory whose widgets signal readiness almost immediately.
    pub fn new() -> Self {
        Self::with_ready_delay(Duration::from_millis(1))
    }

    /// Factory whose widgets signal readiness after `delay`.
    pub fn with_ready_delay(delay: Duration) -> Self {
        Self {
            ready_delay: delay,
            fail_script: false,
            script_loads: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Factory whose script load always fails.
    pub fn failing_script() -> Self {
        Self {
            fail_script: true,
            ..Self::new()
        }
    }

    /// How many times `load_script` has run.
    pub fn script_loads(&self) -> usize {
        self.script_loads.load(Ordering::SeqCst)
    }

    /// Widgets created so far, in creation order.
    pub fn created(&self) -> Vec<SimulatedWidget> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The `index`-th created widget, if any.
    pub fn widget(&self, index: usize) -> Option<SimulatedWidget> {
        self.created().get(index).cloned()
    }
}

impl Default for SimulatedFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WidgetFactory for SimulatedFactory {
    async fn load_script(&self) -> Result<(), PlayerError> {
        self.script_loads.fetch_add(1, Ordering::SeqCst);
        // Yield once so concurrent requests really do observe the Loading
        // phase rather than racing a synchronous completion.
        tokio::task::yield_now().await;
        if self.fail_script {
            return Err(PlayerError::ScriptLoad("simulated failure".to_string()));
        }
        Ok(())
    }

    async fn create_widget(
        &self,
        _container: &ContainerId,
        video: &VideoRef,
        options: &EmbedOptions,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Result<Box<dyn VideoWidget>, PlayerError> {
        let widget = SimulatedWidget::new(video.clone(), *options, events.clone());
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(widget.clone());

        let delay = self.ready_delay;
        let ready_widget = widget.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !ready_widget.is_destroyed() {
                ready_widget.emit(PlayerEvent::Ready);
            }
        });

        Ok(Box::new(widget))
    }
}
