pub mod controller;
pub mod engine;
pub mod loop_worker;

pub use controller::{NotifierController, NotifierHandle};
pub use engine::Orchestrator;

/// Raw signal from the observed host. Mutations carry no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Mutation,
    Visibility { hidden: bool },
    Focus { focused: bool },
    PendingTeardown,
}
