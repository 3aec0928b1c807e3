//! The cross-player synchronization state machine.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::Property;
use crate::config::SyncTuning;
use crate::player::{PlaybackState, PlayerCommand, PlayerEvent, PlayerHandle};

use super::{SeekClassifier, SeekDecision};

/// Owns the per-session sync state and decides which commands replay to
/// sibling players.
///
/// Two states, toggled only by the user: `Enabled` propagates semantic
/// transitions and re-based seeks; `Disabled` records activity but issues
/// nothing. Entering `Disabled` snapshots every player's position as its
/// baseline, so intentional position differences established while sync is
/// off survive re-enabling: an accepted seek moves every sibling by the
/// *offset* from its own baseline rather than copying an absolute position.
pub struct SyncCoordinator {
    enabled: Property<bool>,
    players: Vec<Arc<PlayerHandle>>,
    active: Option<usize>,
    baselines: Vec<f64>,
    classifier: SeekClassifier,
}

impl SyncCoordinator {
    /// Create a coordinator over the session's player handles, starting
    /// enabled with all baselines at zero.
    pub fn new(players: Vec<Arc<PlayerHandle>>, tuning: &SyncTuning) -> Self {
        let baselines = vec![0.0; players.len()];
        Self {
            enabled: Property::new(true),
            players,
            active: None,
            baselines,
            classifier: SeekClassifier::new(tuning.debounce_window()),
        }
    }

    /// Whether synchronization is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Watchable view of the enabled flag, for binding a toggle control.
    pub fn enabled_property(&self) -> Property<bool> {
        self.enabled.clone()
    }

    /// Ordinal of the last player the user interacted with, if any.
    pub fn active_ordinal(&self) -> Option<usize> {
        self.active
    }

    /// Per-player baseline positions used for offset re-basing.
    pub fn baselines(&self) -> &[f64] {
        &self.baselines
    }

    /// Toggle synchronization. Disabling snapshots every player's current
    /// position into its baseline slot.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled.get() == enabled {
            return;
        }
        if !enabled {
            self.snapshot_baselines();
        }
        debug!(enabled, "Sync mode toggled");
        self.enabled.set(enabled);
    }

    fn snapshot_baselines(&mut self) {
        for (ordinal, player) in self.players.iter().enumerate() {
            self.baselines[ordinal] = player.position();
        }
        debug!(baselines = ?self.baselines, "Snapshotted sync baselines");
    }

    /// Swap the handle at `ordinal` after a slot re-creation, resetting its
    /// baseline.
    pub(crate) fn replace_player(&mut self, ordinal: usize, handle: Arc<PlayerHandle>) {
        if let Some(slot) = self.players.get_mut(ordinal) {
            *slot = handle;
            self.baselines[ordinal] = 0.0;
        }
    }

    /// Process one event from the player at `ordinal`.
    pub fn handle_event(&mut self, ordinal: usize, event: PlayerEvent) {
        match event {
            PlayerEvent::Ready => {
                debug!(ordinal, "Player became ready");
            }
            PlayerEvent::Error(code) => {
                // Logged and dropped: one failing player must not take the
                // session down, and siblings are unaffected.
                warn!(ordinal, code, "Player reported an error");
            }
            PlayerEvent::StateChanged(state) => self.on_state_changed(ordinal, state),
        }
    }

    fn on_state_changed(&mut self, ordinal: usize, state: PlaybackState) {
        if ordinal >= self.players.len() {
            warn!(ordinal, "State change from unknown player ordinal");
            return;
        }
        self.active = Some(ordinal);
        if !self.enabled.get() {
            return;
        }

        if let Some(command) = propagated_command(state) {
            debug!(ordinal, %state, ?command, "Propagating state change to siblings");
            self.command_siblings(ordinal, command);
        }

        if self.classifier.classify(state) == SeekDecision::Accepted {
            self.rebase_siblings(ordinal);
        }
    }

    fn rebase_siblings(&mut self, ordinal: usize) {
        let offset = self.players[ordinal].position() - self.baselines[ordinal];
        debug!(ordinal, offset, "Accepted seek; re-basing siblings");
        for (sibling, player) in self.players.iter().enumerate() {
            if sibling == ordinal || !player.is_ready() {
                continue;
            }
            player.command(PlayerCommand::SeekTo(self.baselines[sibling] + offset));
        }
    }

    fn command_siblings(&self, ordinal: usize, command: PlayerCommand) {
        for (sibling, player) in self.players.iter().enumerate() {
            if sibling == ordinal || !player.is_ready() {
                continue;
            }
            player.command(command);
        }
    }
}

/// The semantic transition replayed to siblings for a state, if any.
/// Buffering, cued and unstarted are informational only.
fn propagated_command(state: PlaybackState) -> Option<PlayerCommand> {
    match state {
        PlaybackState::Playing => Some(PlayerCommand::Play),
        PlaybackState::Paused => Some(PlayerCommand::Pause),
        PlaybackState::Ended => Some(PlayerCommand::Stop),
        PlaybackState::Unstarted | PlaybackState::Buffering | PlaybackState::Cued => None,
    }
}
