//! Process-wide lifecycle for the third-party player script.
//!
//! The script must be fetched exactly once no matter how many widgets are
//! created. State moves `Unloaded -> Loading -> Loaded`; requests arriving
//! while a load is in flight queue a waiter that is released exactly once on
//! the `Loaded` transition. A failed load resets to `Unloaded` so a later
//! mount can retry.

use std::mem;
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::debug;

use super::{PlayerError, WidgetFactory};

type LoadResult = Result<(), PlayerError>;

enum LoadPhase {
    Unloaded,
    Loading(Vec<oneshot::Sender<LoadResult>>),
    Loaded,
}

enum Entry {
    AlreadyLoaded,
    Wait(oneshot::Receiver<LoadResult>),
    Load,
}

/// Shared script-load gate; one instance serves every adapter in a session.
#[derive(Default)]
pub struct ScriptLoader {
    phase: Mutex<LoadPhase>,
}

impl Default for LoadPhase {
    fn default() -> Self {
        Self::Unloaded
    }
}

impl ScriptLoader {
    /// Create a loader in the `Unloaded` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the script has finished loading.
    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock(), LoadPhase::Loaded)
    }

    /// Ensure the script is loaded, initiating the load if this is the
    /// first request and otherwise waiting on the in-flight one.
    ///
    /// # Errors
    /// Returns `PlayerError::ScriptLoad` if the load fails or the loading
    /// party goes away before completing.
    pub async fn ensure_loaded(&self, factory: &dyn WidgetFactory) -> LoadResult {
        let entry = {
            let mut phase = self.lock();
            match &mut *phase {
                LoadPhase::Loaded => Entry::AlreadyLoaded,
                LoadPhase::Loading(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Entry::Wait(rx)
                }
                LoadPhase::Unloaded => {
                    *phase = LoadPhase::Loading(Vec::new());
                    Entry::Load
                }
            }
        };

        match entry {
            Entry::AlreadyLoaded => Ok(()),
            Entry::Wait(rx) => {
                debug!("Waiting on in-flight player script load");
                rx.await
                    .map_err(|_| PlayerError::ScriptLoad("loading party went away".to_string()))?
            }
            Entry::Load => {
                let result = factory.load_script().await;
                let waiters = {
                    let mut phase = self.lock();
                    let next = match result {
                        Ok(()) => LoadPhase::Loaded,
                        Err(_) => LoadPhase::Unloaded,
                    };
                    match mem::replace(&mut *phase, next) {
                        LoadPhase::Loading(waiters) => waiters,
                        _ => Vec::new(),
                    }
                };
                for waiter in waiters {
                    let _ = waiter.send(result.clone());
                }
                result
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoadPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[cfg_attr(test, allow(clippy::unwrap_used))]
mod tests {
    use std::sync::Arc;

    use crate::player::sim::SimulatedFactory;

    use super::*;

    #[tokio::test]
    async fn loads_script_once_across_concurrent_requests() {
        let factory = Arc::new(SimulatedFactory::new());
        let loader = Arc::new(ScriptLoader::new());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let factory = Arc::clone(&factory);
            let loader = Arc::clone(&loader);
            handles.push(tokio::spawn(async move {
                loader.ensure_loaded(factory.as_ref()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(loader.is_loaded());
        assert_eq!(factory.script_loads(), 1);
    }

    #[tokio::test]
    async fn repeated_requests_after_load_are_noops() {
        let factory = SimulatedFactory::new();
        let loader = ScriptLoader::new();

        loader.ensure_loaded(&factory).await.unwrap();
        loader.ensure_loaded(&factory).await.unwrap();
        loader.ensure_loaded(&factory).await.unwrap();

        assert_eq!(factory.script_loads(), 1);
    }

    #[tokio::test]
    async fn failed_load_resets_for_retry() {
        let factory = SimulatedFactory::failing_script();
        let loader = ScriptLoader::new();

        assert!(loader.ensure_loaded(&factory).await.is_err());
        assert!(!loader.is_loaded());

        let working = SimulatedFactory::new();
        loader.ensure_loaded(&working).await.unwrap();
        assert!(loader.is_loaded());
    }
}
