//! sensord daemon library: configuration, logging, the bootstrap lifecycle
//! state machine, and the collaborator seams (persistent store, container
//! runtime) around the discovery core.

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod runtime;
pub mod store;
