#[macro_use]
extern crate tracing;

pub mod action;
pub mod avatar;
pub mod effects;
pub mod engine;
pub mod error;
pub mod filmstrip;
pub mod last_n;
pub mod participant;
pub mod state;
mod store;
pub mod toolbox;
pub mod track;

pub use action::Action;
pub use engine::{
    InMemoryEngine,
    LocalVideoTrack,
    MediaEngine,
};
pub use error::{
    AvatarError,
    EngineError,
    OrderingError,
};
pub use filmstrip::{
    order_remote_participants,
    FilmstripOrder,
};
pub use last_n::{
    compute_last_n,
    LastNDecision,
    LastNMiddleware,
    LastNUpdater,
};
pub use participant::{
    Participant,
    ParticipantId,
};
pub use state::ConferenceState;
pub use store::{
    Middleware,
    Store,
    WeakStore,
};
