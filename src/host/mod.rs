//! Headless component host: instance arena, render passes, state primitives.
//!
//! Models the slice of a UI framework that state hooks sit on, without any
//! rendering machinery, so hooks built on it are testable standalone.
//!
//! - [`create_component`] / [`dispose_component`] — instance lifecycle.
//! - [`render`] — run a component body inside a render pass; hook slots are
//!   visited in call order.
//! - [`commit`] — apply scheduled state updates (the re-render boundary).
//! - [`use_state`] — render-cycle state slot (reads are commit-consistent,
//!   writes schedule).
//! - [`use_cell`] — persistent mutable cell (writes are synchronous, never
//!   schedule).

pub mod runtime;
pub mod slot;

pub use runtime::{
    commit, create_component, dispose_component, generation, is_dirty, render, ComponentId,
    HostError,
};
pub use slot::{use_cell, use_state, CellHandle, StateHandle};
