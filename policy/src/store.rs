use crate::{
    action::Action,
    state::ConferenceState,
};
use std::{
    fmt,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
        Weak,
    },
};

/// Hook that runs after every dispatched action has been reduced.
pub type Middleware = Arc<dyn Fn(&Store, &Action) + Send + Sync>;

#[derive(Default)]
struct StoreInner {
    state: Mutex<ConferenceState>,
    middleware: Mutex<Vec<Middleware>>,
}

/// Shared application state with redux style dispatch.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state())
            .field("middleware", &self.middleware().len())
            .finish()
    }
}

impl Store {
    pub fn new(state: ConferenceState) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(state),
                middleware: Default::default(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConferenceState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn middleware(&self) -> MutexGuard<'_, Vec<Middleware>> {
        self.inner.middleware.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, middleware: impl Fn(&Store, &Action) + Send + Sync + 'static) {
        self.middleware().push(Arc::new(middleware));
    }

    /// Reduces `action` into the state, then hands it to every middleware.
    pub fn dispatch(&self, action: Action) {
        trace!(%action, "dispatch");
        self.state().reduce(&action);

        let middleware = self.middleware().clone();
        for hook in middleware {
            hook(self, &action);
        }
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ConferenceState) -> R) -> R {
        f(&self.state())
    }

    pub fn snapshot(&self) -> ConferenceState {
        self.state().clone()
    }

    pub fn downgrade(&self) -> WeakStore {
        WeakStore(Arc::downgrade(&self.inner))
    }
}

/// Non-owning handle for callbacks that must not keep the store alive.
#[derive(Clone)]
pub struct WeakStore(Weak<StoreInner>);

impl WeakStore {
    pub fn upgrade(&self) -> Option<Store> {
        self.0.upgrade().map(|inner| Store { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    #[test]
    fn middleware_sees_reduced_state() {
        let store = Store::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        store.register({
            let seen = seen.clone();
            move |store, action| {
                let audio_only = store.with_state(|state| state.audio_only);
                seen.lock().unwrap().push((action.to_string(), audio_only));
            }
        });

        store.dispatch(Action::SetAudioOnly(true));

        assert_eq!(*seen.lock().unwrap(), vec![("set-audio-only".to_string(), true)]);
    }

    #[test]
    fn middleware_may_dispatch() {
        let store = Store::default();
        let calls = Arc::new(AtomicUsize::new(0));
        store.register({
            let calls = calls.clone();
            move |store, action| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Action::SetCarMode(true) = action {
                    store.dispatch(Action::SetLastN(0));
                }
            }
        });

        store.dispatch(Action::SetCarMode(true));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.snapshot().last_n, Some(0));
    }

    #[test]
    fn weak_store_does_not_keep_state_alive() {
        let store = Store::default();
        let weak = store.downgrade();
        assert!(weak.upgrade().is_some());
        drop(store);
        assert!(weak.upgrade().is_none());
    }
}
