//! Mesh OOB method selection
//!
//! Decides which out-of-band authentication methods a provisioner may offer
//! for a device, and tracks the user's choice until it is confirmed or
//! cancelled.
//!
//! This crate provides:
//! - `compute_available_methods` and the method/hint types
//! - `SelectionState`, the selection state machine
//! - Listener and view traits plus `SelectionFlow`, which connects a UI to the engine
//!
//! # Note
//! Nothing here renders anything or performs the OOB exchange itself. The
//! wire formats live in `mesh-oob-proto`.

pub mod flow;
pub mod method;
pub mod state;

pub use flow::*;
pub use method::*;
pub use state::*;
