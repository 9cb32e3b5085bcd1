use super::{
    compute_last_n,
    Debouncer,
    LastNDecision,
};
use crate::{
    action::Action,
    engine::MediaEngine,
    Store,
};
use std::sync::Arc;
use view_policy_config::LastNConfig;

/// Pushes the computed reception limit to the media engine.
#[derive(Debug)]
pub struct LastNUpdater<E> {
    engine: E,
    config: LastNConfig,
}

impl<E: MediaEngine> LastNUpdater<E> {
    pub fn new(engine: E, config: LastNConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Recomputes last-N from the current state of `store`.
    ///
    /// The value is recorded in the store even when the engine rejects it.
    /// Returns the value that was decided, `None` outside of a conference.
    #[instrument(level = "debug", skip_all)]
    pub fn update(&self, store: &Store) -> Option<i32> {
        let LastNDecision { value, reason } = store.with_state(|state| compute_last_n(state, &self.config))?;
        store.dispatch(Action::SetLastN(value));

        let current = self.engine.last_n();
        if current == value {
            debug!(last_n = value, %reason, "Last N unchanged");
            return Some(value);
        }

        info!(last_n = value, previous = current, %reason, "Setting last N");
        if let Err(err) = self.engine.set_last_n(value) {
            error!(last_n = value, "Failed to set last N: {err}");
        }
        Some(value)
    }
}

/// Store middleware that recomputes last-N, debounced, after every action
/// that can change it.
#[derive(Debug, Clone)]
pub struct LastNMiddleware {
    debouncer: Arc<Debouncer>,
}

impl LastNMiddleware {
    /// Registers the middleware on `store`. Dispatching trigger actions
    /// requires a tokio runtime.
    pub fn install<E: MediaEngine>(store: &Store, engine: E, config: LastNConfig) -> Self {
        let window = config.debounce();
        let updater = LastNUpdater::new(engine, config);
        let weak = store.downgrade();
        let debouncer = Arc::new(Debouncer::new(window, move || match weak.upgrade() {
            Some(store) => {
                updater.update(&store);
            }
            None => trace!("Store dropped before the last N update ran"),
        }));

        store.register({
            let debouncer = debouncer.clone();
            move |_, action| {
                if action.triggers_last_n_update() {
                    trace!(%action, "Scheduling last N update");
                    debouncer.call();
                }
            }
        });

        Self { debouncer }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drops a scheduled update, e.g. when leaving the conference page.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::InMemoryEngine,
        participant::Participant,
    };
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use view_policy_config::LastNLimits;

    const WINDOW: Duration = Duration::from_millis(1000);

    fn config() -> LastNConfig {
        LastNConfig {
            channel_last_n: Some(20),
            limits: [(1, 20), (5, 15), (10, 10)].into_iter().collect::<LastNLimits>(),
            ..Default::default()
        }
    }

    fn join(store: &Store, remote: usize) {
        store.dispatch(Action::ConferenceJoined { name: "room".into() });
        store.dispatch(Action::ParticipantJoined(Participant::local("me")));
        for i in 0..remote {
            store.dispatch(Action::ParticipantJoined(Participant::remote(format!("p{i}"))));
        }
    }

    async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
        tokio::task::yield_now().await;
    }

    #[test]
    fn update_records_the_value_and_calls_the_engine() {
        let store = Store::default();
        join(&store, 6);
        let updater = LastNUpdater::new(InMemoryEngine::default(), config());

        assert_eq!(updater.update(&store), Some(15));
        assert_eq!(updater.engine().calls(), vec![15]);
        assert_eq!(store.snapshot().last_n, Some(15));
    }

    #[test]
    fn update_skips_the_engine_when_unchanged() {
        let store = Store::default();
        join(&store, 2);
        let updater = LastNUpdater::new(InMemoryEngine::with_last_n(20), config());

        assert_eq!(updater.update(&store), Some(20));
        assert!(updater.engine().calls().is_empty());
        assert_eq!(store.snapshot().last_n, Some(20));
    }

    #[test]
    fn engine_failure_keeps_the_intended_value() {
        let store = Store::default();
        join(&store, 2);
        let engine = InMemoryEngine::default();
        engine.set_failing(true);
        let updater = LastNUpdater::new(engine, config());

        assert_eq!(updater.update(&store), Some(20));
        assert_eq!(updater.engine().calls(), vec![20]);
        assert_eq!(updater.engine().last_n(), -1);
        assert_eq!(store.snapshot().last_n, Some(20));
    }

    #[test]
    fn update_without_conference_does_nothing() {
        let store = Store::default();
        let updater = LastNUpdater::new(InMemoryEngine::default(), config());

        assert_eq!(updater.update(&store), None);
        assert!(updater.engine().calls().is_empty());
        assert_eq!(store.snapshot().last_n, None);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_triggers_sets_last_n_once() {
        let store = Store::default();
        let engine = InMemoryEngine::default();
        let middleware = LastNMiddleware::install(&store, engine.clone(), config());

        join(&store, 6);
        store.dispatch(Action::SetAudioOnly(true));
        store.dispatch(Action::SetAudioOnly(false));
        assert!(middleware.is_pending());
        assert!(engine.calls().is_empty());

        advance(WINDOW + Duration::from_millis(1)).await;

        assert_eq!(engine.calls(), vec![15]);
        assert_eq!(store.snapshot().last_n, Some(15));
        assert!(!middleware.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn update_reads_state_when_it_fires() {
        let store = Store::default();
        let engine = InMemoryEngine::default();
        let _middleware = LastNMiddleware::install(&store, engine.clone(), config());
        join(&store, 2);

        advance(Duration::from_millis(500)).await;
        store.dispatch(Action::SetCarMode(true));
        advance(Duration::from_millis(900)).await;
        assert!(engine.calls().is_empty());

        advance(Duration::from_millis(200)).await;
        assert_eq!(engine.calls(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn other_actions_do_not_schedule() {
        let store = Store::default();
        let engine = InMemoryEngine::default();
        let middleware = LastNMiddleware::install(&store, engine.clone(), config());

        store.dispatch(Action::SetToolboxVisible(true));
        store.dispatch(Action::DominantSpeakerChanged { id: Some("p0".into()) });
        assert!(!middleware.is_pending());

        advance(WINDOW * 2).await;
        assert!(engine.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_update_never_runs() {
        let store = Store::default();
        let engine = InMemoryEngine::default();
        let middleware = LastNMiddleware::install(&store, engine.clone(), config());

        join(&store, 3);
        middleware.cancel();
        advance(WINDOW * 2).await;

        assert!(engine.calls().is_empty());
        assert_eq!(store.snapshot().last_n, None);
    }
}
