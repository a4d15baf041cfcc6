//! Domain models for the dining simulation

pub mod actor;
pub mod event;
pub mod resource;
pub mod state;

// Re-exports
pub use actor::{Actor, ActorError, ActorState};
pub use event::{Event, EventLog};
pub use resource::{Resource, ResourceError};
pub use state::{SimulationState, StateError};
