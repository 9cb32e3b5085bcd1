//! Contracts of the real-time media engine the policies drive.
//!
//! The engine itself (signaling, track negotiation, bandwidth control) lives
//! elsewhere; the policies only read the current reception limit, set a new
//! one and apply effects to the local camera track.

use crate::{
    effects::VideoEffect,
    error::EngineError,
};
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

pub trait MediaEngine: Send + Sync + 'static {
    /// Currently requested number of remote video streams, `-1` for no cap.
    fn last_n(&self) -> i32;

    fn set_last_n(&self, last_n: i32) -> Result<(), EngineError>;
}

impl<E: MediaEngine> MediaEngine for Arc<E> {
    fn last_n(&self) -> i32 {
        (**self).last_n()
    }

    fn set_last_n(&self, last_n: i32) -> Result<(), EngineError> {
        (**self).set_last_n(last_n)
    }
}

#[async_trait::async_trait]
pub trait LocalVideoTrack: Send + Sync {
    /// Applies `effect` to the track, `None` removes the current effect.
    async fn set_effect(&self, effect: Option<VideoEffect>) -> Result<(), EngineError>;
}

#[derive(Debug, Default)]
struct InMemoryEngineState {
    last_n: i32,
    calls: Vec<i32>,
    failing: bool,
}

/// Engine stand-in that records every `set_last_n` call.
#[derive(Debug, Clone)]
pub struct InMemoryEngine {
    inner: Arc<Mutex<InMemoryEngineState>>,
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::with_last_n(-1)
    }
}

impl InMemoryEngine {
    pub fn with_last_n(last_n: i32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryEngineState {
                last_n,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryEngineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes subsequent `set_last_n` calls fail without changing the value.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Every value passed to `set_last_n`, including rejected ones.
    pub fn calls(&self) -> Vec<i32> {
        self.lock().calls.clone()
    }
}

impl MediaEngine for InMemoryEngine {
    fn last_n(&self) -> i32 {
        self.lock().last_n
    }

    fn set_last_n(&self, last_n: i32) -> Result<(), EngineError> {
        let mut state = self.lock();
        state.calls.push(last_n);
        if state.failing {
            return Err(EngineError::rejected("set_last_n", "engine configured to fail"));
        }
        state.last_n = last_n;
        Ok(())
    }
}
