#[macro_use]
extern crate tracing;

pub mod args;
mod logging;
pub mod replay;
pub mod scenario;

pub use args::{
    Args,
    Command,
};
pub use logging::{
    init_errors,
    init_logging,
};
pub use replay::{
    replay,
    ReplaySummary,
};
pub use scenario::Scenario;
