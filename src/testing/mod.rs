//! Test utilities: drive components without a real host.
//!
//! - [`Pilot`] — mount a body closure and play the host's render/commit
//!   cycle programmatically.
//! - [`PilotConfig`] — knobs for the settle loop.

pub mod pilot;

pub use pilot::{Pilot, PilotConfig, PilotError};
