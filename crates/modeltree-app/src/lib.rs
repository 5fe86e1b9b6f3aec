/// ModelTree App: owner-thread state and action queue.
///
/// Everything here lives on a single owner thread. Background work (the
/// screenshot batch) reaches that thread only through the [`owner`] queue.
/// Business logic lives in `modeltree-core`.
pub mod loader;
pub mod owner;
pub mod state;

pub use loader::{ModelInfo, ProbeLoader};
pub use owner::{OwnerHandle, OwnerQueue, MAX_ACTIONS_PER_PUMP};
pub use state::ViewerState;
