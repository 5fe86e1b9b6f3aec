/// ModelTree Core: indexing, navigation, and batch sequencing.
///
/// This crate contains all business logic with zero UI dependencies.
/// The owner-thread side (selection state, action queue) lives in
/// `modeltree-app`.
///
/// # Modules
///
/// - [`paths`]: Cleaning, filtering, and ordering of candidate root folders.
/// - [`model`]: Arena-allocated model tree and supporting types.
/// - [`indexer`]: Multi-root filesystem walk and tree construction.
/// - [`navigator`]: Sequential file selection and subtree queries.
/// - [`batch`]: Single-flight screenshot batch sequencer.
/// - [`config`]: JSON-backed runtime configuration.
/// - [`logging`]: Injectable `tracing` dispatch for components.
pub mod batch;
pub mod config;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod model;
pub mod navigator;
pub mod paths;
