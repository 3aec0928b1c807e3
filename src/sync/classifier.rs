//! Seek inference over raw state-change events.
//!
//! The embedded widget has no dedicated seek signal; a seek surfaces as a
//! `playing` or `paused` state-change. Worse, commands the coordinator sends
//! to sibling players raise the same state-changes back, so without a guard
//! one seek would oscillate between players indefinitely. The classifier
//! keeps a single process-wide timestamp of the last accepted seek and
//! suppresses candidates that arrive inside the debounce window.

use std::time::Duration;

use tokio::time::Instant;

use crate::player::PlaybackState;

/// Default debounce window. Empirical, tunable through configuration.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Outcome of classifying a state-change as a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDecision {
    /// The event is an accepted seek; siblings should be re-based
    Accepted,

    /// A candidate arrived inside the debounce window
    Suppressed,

    /// The state is not a seek candidate at all
    NotCandidate,
}

/// Classifies state-change events into seek decisions.
///
/// The timestamp is shared across all players of a session on purpose: a
/// propagated command's echo arrives from a *different* ordinal than the
/// accepted seek that caused it.
#[derive(Debug)]
pub struct SeekClassifier {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl SeekClassifier {
    /// Create a classifier with the given debounce window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Classify a state-change event.
    ///
    /// Only `playing` and `paused` are seek candidates; a candidate is
    /// accepted when at least the debounce window has elapsed since the last
    /// accepted one, and acceptance refreshes the timestamp.
    pub fn classify(&mut self, state: PlaybackState) -> SeekDecision {
        if !matches!(state, PlaybackState::Playing | PlaybackState::Paused) {
            return SeekDecision::NotCandidate;
        }

        let now = Instant::now();
        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.window {
                return SeekDecision::Suppressed;
            }
        }
        self.last_accepted = Some(now);
        SeekDecision::Accepted
    }
}

impl Default for SeekClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_playing_and_paused_are_candidates() {
        let mut classifier = SeekClassifier::default();
        assert_eq!(
            classifier.classify(PlaybackState::Buffering),
            SeekDecision::NotCandidate
        );
        assert_eq!(
            classifier.classify(PlaybackState::Cued),
            SeekDecision::NotCandidate
        );
        assert_eq!(
            classifier.classify(PlaybackState::Ended),
            SeekDecision::NotCandidate
        );
        assert_eq!(
            classifier.classify(PlaybackState::Playing),
            SeekDecision::Accepted
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_candidate_inside_window_is_suppressed() {
        let mut classifier = SeekClassifier::default();
        assert_eq!(
            classifier.classify(PlaybackState::Playing),
            SeekDecision::Accepted
        );
        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(
            classifier.classify(PlaybackState::Paused),
            SeekDecision::Suppressed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn candidate_after_window_is_accepted_again() {
        let mut classifier = SeekClassifier::default();
        assert_eq!(
            classifier.classify(PlaybackState::Playing),
            SeekDecision::Accepted
        );
        tokio::time::advance(Duration::from_millis(301)).await;
        assert_eq!(
            classifier.classify(PlaybackState::Playing),
            SeekDecision::Accepted
        );
    }

    #[tokio::test(start_paused = true)]
    async fn suppressed_candidate_does_not_extend_the_window() {
        let mut classifier = SeekClassifier::new(Duration::from_millis(300));
        assert_eq!(
            classifier.classify(PlaybackState::Playing),
            SeekDecision::Accepted
        );
        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(
            classifier.classify(PlaybackState::Playing),
            SeekDecision::Suppressed
        );
        tokio::time::advance(Duration::from_millis(150)).await;
        // 350ms after the accepted seek; the suppressed one in between
        // must not have reset the clock.
        assert_eq!(
            classifier.classify(PlaybackState::Playing),
            SeekDecision::Accepted
        );
    }
}
