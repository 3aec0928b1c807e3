//! Composes N player adapters under one sync coordinator.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::Stream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::common::Property;
use crate::config::TandemConfig;
use crate::core::{Result, TandemError};
use crate::player::{ContainerId, PlayerAdapter, PlayerEvent, ScriptLoader, WidgetFactory};
use crate::resolver::VideoRef;
use crate::sync::SyncCoordinator;

use super::{PlayMode, WatchRequest};

/// A mounted viewing session: one adapter per video reference, all feeding
/// a single coordinator task.
///
/// Every adapter event is tagged with its ordinal and funneled through one
/// queue, so coordinator state is mutated by exactly one task and each
/// event is handled to completion before the next.
pub struct SessionView {
    mode: PlayMode,
    adapters: Vec<PlayerAdapter>,
    coordinator: Arc<Mutex<SyncCoordinator>>,
    enabled: Property<bool>,
    events_tx: mpsc::UnboundedSender<(usize, PlayerEvent)>,
    forwarders: Vec<JoinHandle<()>>,
    dispatcher: JoinHandle<()>,
    factory: Arc<dyn WidgetFactory>,
    loader: Arc<ScriptLoader>,
}

impl SessionView {
    /// Mount a session for the given request.
    ///
    /// References beyond the configured player limit are dropped. Creation
    /// returns before any widget signals readiness.
    ///
    /// # Errors
    /// Returns the underlying `PlayerError` if the script load or a widget
    /// creation fails.
    pub async fn mount(
        factory: Arc<dyn WidgetFactory>,
        request: WatchRequest,
        config: &TandemConfig,
    ) -> Result<Self> {
        let mode = request.mode;
        let live = mode == PlayMode::Live;
        let mut refs = request.refs;
        if refs.len() > config.players.max {
            warn!(
                submitted = refs.len(),
                max = config.players.max,
                "Dropping references beyond the player limit"
            );
            refs.truncate(config.players.max);
        }

        let loader = Arc::new(ScriptLoader::new());
        let mut adapters = Vec::with_capacity(refs.len());
        for (ordinal, video) in refs.into_iter().enumerate() {
            let adapter = PlayerAdapter::create(
                &factory,
                &loader,
                ContainerId::new(format!("player-{ordinal}")),
                ordinal,
                video,
                live,
            )
            .await?;
            adapters.push(adapter);
        }

        let handles = adapters.iter().map(PlayerAdapter::handle).collect();
        let coordinator = SyncCoordinator::new(handles, &config.sync);
        let enabled = coordinator.enabled_property();
        let coordinator = Arc::new(Mutex::new(coordinator));

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let forwarders = adapters
            .iter()
            .map(|adapter| spawn_forwarder(adapter, events_tx.clone()))
            .collect();
        let dispatcher = spawn_dispatcher(Arc::clone(&coordinator), events_rx);

        info!(players = adapters.len(), %mode, "Mounted viewing session");

        Ok(Self {
            mode,
            adapters,
            coordinator,
            enabled,
            events_tx,
            forwarders,
            dispatcher,
            factory,
            loader,
        })
    }

    /// Number of mounted players; the viewing layout sizes its columns to
    /// this.
    pub fn player_count(&self) -> usize {
        self.adapters.len()
    }

    /// Playback mode of the session.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Whether synchronization is currently enabled.
    pub fn sync_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Toggle synchronization across the session's players.
    pub fn set_sync_enabled(&self, enabled: bool) {
        self.lock_coordinator().set_enabled(enabled);
    }

    /// Stream of toggle changes, for binding the sync control.
    pub fn sync_enabled_monitored(&self) -> impl Stream<Item = bool> + Send {
        self.enabled.watch()
    }

    /// The adapter mounted at `ordinal`, if any.
    pub fn adapter(&self, ordinal: usize) -> Option<&PlayerAdapter> {
        self.adapters.get(ordinal)
    }

    /// Point a slot at a different video.
    ///
    /// Re-creates the widget only when the reference actually changed
    /// (the live flag is fixed per session); volatile surrounding state
    /// never recreates a widget. Returns whether a re-creation happened.
    ///
    /// # Errors
    /// Returns `TandemError::Config` for an unknown ordinal, or the
    /// underlying `PlayerError` if the replacement widget cannot be built.
    pub async fn update_slot(&mut self, ordinal: usize, video: VideoRef) -> Result<bool> {
        let live = self.mode == PlayMode::Live;
        let Some(current) = self.adapters.get_mut(ordinal) else {
            return Err(TandemError::Config(format!("no player slot {ordinal}")));
        };
        if current.matches(&video, live) {
            return Ok(false);
        }

        debug!(ordinal, video = %video, "Re-creating player slot");
        current.destroy();
        if let Some(forwarder) = self.forwarders.get(ordinal) {
            forwarder.abort();
        }

        let replacement = PlayerAdapter::create(
            &self.factory,
            &self.loader,
            ContainerId::new(format!("player-{ordinal}")),
            ordinal,
            video,
            live,
        )
        .await?;

        self.lock_coordinator()
            .replace_player(ordinal, replacement.handle());
        self.forwarders[ordinal] = spawn_forwarder(&replacement, self.events_tx.clone());
        self.adapters[ordinal] = replacement;
        Ok(true)
    }

    /// Tear the session down, destroying every player.
    pub fn unmount(self) {
        drop(self);
    }

    fn lock_coordinator(&self) -> MutexGuard<'_, SyncCoordinator> {
        self.coordinator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SessionView {
    fn drop(&mut self) {
        self.dispatcher.abort();
        for forwarder in &self.forwarders {
            forwarder.abort();
        }
        for adapter in &mut self.adapters {
            adapter.destroy();
        }
    }
}

fn spawn_forwarder(
    adapter: &PlayerAdapter,
    tx: mpsc::UnboundedSender<(usize, PlayerEvent)>,
) -> JoinHandle<()> {
    let ordinal = adapter.ordinal();
    let mut events = adapter.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if tx.send((ordinal, event)).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(ordinal, skipped, "Dropped lagged player events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn spawn_dispatcher(
    coordinator: Arc<Mutex<SyncCoordinator>>,
    mut events_rx: mpsc::UnboundedReceiver<(usize, PlayerEvent)>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some((ordinal, event)) = events_rx.recv().await {
            coordinator
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handle_event(ordinal, event);
        }
    })
}

#[cfg(test)]
#[cfg_attr(test, allow(clippy::unwrap_used))]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;

    use crate::player::sim::SimulatedFactory;

    use super::*;

    fn request(ids: &[&str], mode: PlayMode) -> WatchRequest {
        let urls: Vec<String> = ids
            .iter()
            .map(|id| format!("https://youtu.be/{id}"))
            .collect();
        WatchRequest::from_urls(mode, &urls)
    }

    async fn mount(
        ids: &[&str],
        mode: PlayMode,
    ) -> (SessionView, Arc<SimulatedFactory>) {
        let sim = Arc::new(SimulatedFactory::new());
        let factory: Arc<dyn WidgetFactory> = sim.clone();
        let session = SessionView::mount(factory, request(ids, mode), &TandemConfig::default())
            .await
            .unwrap();
        (session, sim)
    }

    #[tokio::test(start_paused = true)]
    async fn mounts_one_player_per_valid_reference() {
        let (session, sim) = mount(&["aaa111", "bbb222"], PlayMode::Video).await;
        assert_eq!(session.player_count(), 2);
        assert_eq!(sim.created().len(), 2);
        assert_eq!(sim.script_loads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drops_references_beyond_the_player_limit() {
        let (session, _sim) = mount(&["a1", "b2", "c3", "d4"], PlayMode::Video).await;
        assert_eq!(session.player_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn live_mode_reaches_the_widgets() {
        let (_session, sim) = mount(&["aaa111"], PlayMode::Live).await;
        assert!(sim.widget(0).unwrap().options().suppress_live_chat);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_is_observable_through_the_watch_stream() {
        let (session, _sim) = mount(&["aaa111", "bbb222"], PlayMode::Video).await;
        let mut watched = Box::pin(session.sync_enabled_monitored());

        assert!(watched.next().await.unwrap());
        session.set_sync_enabled(false);
        assert!(!watched.next().await.unwrap());
        assert!(!session.sync_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn update_slot_recreates_only_on_a_changed_reference() {
        let (mut session, sim) = mount(&["aaa111", "bbb222"], PlayMode::Video).await;

        let same = crate::resolver::resolve("https://youtu.be/aaa111").unwrap();
        assert!(!session.update_slot(0, same).await.unwrap());
        assert_eq!(sim.created().len(), 2);

        let changed = crate::resolver::resolve("https://youtu.be/zzz999").unwrap();
        assert!(session.update_slot(0, changed).await.unwrap());
        assert_eq!(sim.created().len(), 3);
        assert!(sim.widget(0).unwrap().is_destroyed());
    }

    #[tokio::test(start_paused = true)]
    async fn update_slot_rejects_unknown_ordinals() {
        let (mut session, _sim) = mount(&["aaa111"], PlayMode::Video).await;
        let video = crate::resolver::resolve("https://youtu.be/zzz999").unwrap();
        assert!(session.update_slot(5, video).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_destroys_every_widget() {
        let (session, sim) = mount(&["aaa111", "bbb222"], PlayMode::Video).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        session.unmount();
        for widget in sim.created() {
            assert!(widget.is_destroyed());
        }
    }
}
