//! End-to-end scenarios over the public API: a session mounted on the
//! simulated widget backend, driven the way a viewer would drive the real
//! embedded players.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::sync::Arc;
use std::time::Duration;

use tandem::config::TandemConfig;
use tandem::player::sim::{SimulatedFactory, SimulatedWidget};
use tandem::player::{PlaybackState, VideoWidget, WidgetFactory};
use tandem::session::{PlayMode, SessionView, WatchRequest};

async fn mount_session(ids: &[&str]) -> (SessionView, Arc<SimulatedFactory>) {
    let sim = Arc::new(SimulatedFactory::new());
    let factory: Arc<dyn WidgetFactory> = sim.clone();
    let urls: Vec<String> = ids
        .iter()
        .map(|id| format!("https://youtu.be/{id}"))
        .collect();
    let request = WatchRequest::from_urls(PlayMode::Video, &urls);
    let session = SessionView::mount(factory, request, &TandemConfig::default())
        .await
        .unwrap();

    // Let every widget complete its ready handshake.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (session, sim)
}

/// Give the event pumps and the coordinator a beat to process a burst.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

fn widgets(sim: &SimulatedFactory) -> Vec<SimulatedWidget> {
    sim.created()
}

mod propagation {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn play_on_one_player_starts_the_sibling() {
        let (_session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        players[0].play();
        settle().await;

        assert_eq!(players[1].playback_state(), PlaybackState::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_follow_across_three_players() {
        let (_session, sim) = mount_session(&["a1", "b2", "c3"]).await;
        let players = widgets(&sim);

        players[0].play();
        settle().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        players[2].pause();
        settle().await;
        assert_eq!(players[0].playback_state(), PlaybackState::Paused);
        assert_eq!(players[1].playback_state(), PlaybackState::Paused);

        tokio::time::sleep(Duration::from_millis(400)).await;
        players[1].play();
        settle().await;
        assert_eq!(players[0].playback_state(), PlaybackState::Playing);
        assert_eq!(players[2].playback_state(), PlaybackState::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn ended_video_stops_the_sibling() {
        let (_session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        players[0].play();
        settle().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        players[0].finish();
        settle().await;
        assert_eq!(players[1].playback_state(), PlaybackState::Cued);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_sync_leaves_the_sibling_untouched() {
        let (session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        session.set_sync_enabled(false);
        players[0].play();
        settle().await;

        assert_eq!(players[1].playback_state(), PlaybackState::Unstarted);
    }

    #[tokio::test(start_paused = true)]
    async fn widget_error_does_not_disturb_the_session() {
        let (session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        players[0].raise_error(101);
        settle().await;

        assert!(session.sync_enabled());
        players[0].play();
        settle().await;
        assert_eq!(players[1].playback_state(), PlaybackState::Playing);
    }
}

mod seek_debounce {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn second_seek_within_the_window_is_suppressed() {
        let (_session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        players[0].play();
        settle().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        players[0].seek_to(100.0);
        settle().await;
        players[0].seek_to(50.0);
        settle().await;

        // The first seek propagated, the burst that followed it did not.
        assert!(players[1].current_time() > 90.0);
    }

    #[tokio::test(start_paused = true)]
    async fn propagated_commands_do_not_oscillate() {
        let (_session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        players[0].play();
        settle().await;
        players[0].seek_to(60.0);
        settle().await;

        // If echoes kept re-propagating, positions would keep jumping.
        // A quiescent pair of playing widgets advances exactly with the
        // clock instead.
        let before = (players[0].current_time(), players[1].current_time());
        tokio::time::sleep(Duration::from_secs(1)).await;
        let after = (players[0].current_time(), players[1].current_time());

        assert!((after.0 - before.0 - 1.0).abs() < 0.05);
        assert!((after.1 - before.1 - 1.0).abs() < 0.05);
    }
}

mod rebasing {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn offsets_established_while_disabled_survive_resync() {
        let (session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        // Cue up different positions before anything plays; unstarted
        // widgets emit no echoes for these.
        players[0].seek_to(10.0);
        players[1].seek_to(40.0);

        // Disabling snapshots the [10, 40] baselines.
        session.set_sync_enabled(false);
        session.set_sync_enabled(true);

        players[0].play();
        settle().await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        players[0].pause();
        settle().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        // Seek player 0 to 25: offset 15 from its baseline, so the sibling
        // must land on its own baseline plus 15.
        players[0].seek_to(25.0);
        settle().await;

        assert!((players[1].current_time() - 55.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn first_seek_with_default_baselines_copies_the_position() {
        let (_session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        let players = widgets(&sim);

        players[0].play();
        settle().await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        players[0].pause();
        settle().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        players[0].seek_to(20.0);
        settle().await;

        // Baselines default to zero, so re-basing degenerates to an
        // absolute copy.
        assert!((players[1].current_time() - 20.0).abs() < 0.05);
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn script_loads_once_for_the_whole_session() {
        let (_session, sim) = mount_session(&["a1", "b2", "c3"]).await;
        assert_eq!(sim.script_loads(), 1);
        assert_eq!(sim.created().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unmounting_destroys_every_widget() {
        let (session, sim) = mount_session(&["aaa111", "bbb222"]).await;
        session.unmount();
        for widget in widgets(&sim) {
            assert!(widget.is_destroyed());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_urls_never_become_players() {
        let sim = Arc::new(SimulatedFactory::new());
        let factory: Arc<dyn WidgetFactory> = sim.clone();
        let request = WatchRequest::from_urls(
            PlayMode::Video,
            &[
                "https://youtu.be/good01",
                "https://example.com/watch?v=bad",
                "not a url",
            ],
        );
        let session = SessionView::mount(factory, request, &TandemConfig::default())
            .await
            .unwrap();

        assert_eq!(session.player_count(), 1);
    }
}
