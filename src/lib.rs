//! # tracked-state
//!
//! Two-facet component state for hook-style UIs: a **snapshot** facet that is
//! consistent within one render pass and only changes when the host commits
//! (which is what triggers a re-render), and a **latest** facet that always
//! reflects the most recent write without triggering anything.
//!
//! The hook sits on two host primitives — a render-cycle state slot and a
//! persistent mutable cell — provided here by a minimal headless runtime, so
//! the whole crate is usable and testable without a UI host attached.
//!
//! ## Core Systems
//!
//! - **[`updater`]** — `Updater<T>`: a literal replacement or a function of a
//!   previous value
//! - **[`host`]** — headless component host: instance arena, render passes,
//!   hook slots, commit scheduling
//! - **[`tracked`]** — `use_tracked_state` and the current/latest accessor
//!   pair
//! - **[`testing`]** — `Pilot` for driving components through render/commit
//!   cycles in tests

// State primitives
pub mod host;
pub mod updater;

// The hook
pub mod tracked;

// Test harness
pub mod testing;
