//! Two-facet tracked state: a render-consistent snapshot plus an
//! always-fresh latest value.
//!
//! [`use_tracked_state`] returns an accessor pair over one logical value:
//!
//! - [`CurrentState`] — the snapshot facet. Reads return the value as of the
//!   most recent commit, so they are consistent within one render pass.
//!   Writing schedules a re-render.
//! - [`LatestState`] — the latest facet. Reads always see the most recent
//!   write, committed or not. Writing never triggers a re-render by itself.
//!
//! Every write through either facet lands in both slots: the latest value
//! updates synchronously, the snapshot when the host commits, at which point
//! the two facets converge.
//!
//! # Functional updates
//!
//! Both setters take an [`Updater`]: a literal replacement or a function of
//! a previous value. The two facets differ in which previous value that is:
//!
//! - the latest facet computes from the true latest value, so rapid
//!   successive functional writes compose (three `+1`s from 0 yield 3);
//! - the current facet computes from the snapshot captured when the setter
//!   pair was created — the instance's initial snapshot. Repeated functional
//!   writes through it do not compose (three `+1`s from 0 yield 1). The
//!   setters are created once per component instance and keep that base for
//!   the instance's lifetime.
//!
//! ```ignore
//! let (cur, latest) = use_tracked_state(0);
//! latest.update(|n| n + 1);
//! latest.update(|n| n + 1);
//! assert_eq!(latest.get(), 2);   // immediately visible
//! assert_eq!(cur.get(), 0);      // until the host commits
//! ```
//!
//! Neither setter validates its argument; an updater of the wrong variance
//! simply produces the value it produces.

use std::fmt;

use crate::host::{self, CellHandle, StateHandle};
use crate::updater::Updater;

/// Create tracked state seeded with `initial`.
///
/// Must be called inside a render pass. Slots are allocated on the
/// instance's first pass and re-visited on later ones; the returned handles
/// are `Copy` and compare equal across renders of the same instance.
pub fn use_tracked_state<T: Clone + 'static>(initial: T) -> (CurrentState<T>, LatestState<T>) {
    let snap = {
        let seed = initial.clone();
        host::use_state(move || seed)
    };
    let latest = {
        let seed = initial.clone();
        host::use_cell(move || seed)
    };
    // Snapshot value at setter-creation time: the base for the current
    // facet's functional updates.
    let base = host::use_cell(move || initial);
    (
        CurrentState { snap, latest, base },
        LatestState { snap, latest },
    )
}

// ---------------------------------------------------------------------------
// CurrentState
// ---------------------------------------------------------------------------

/// Snapshot facet of a tracked value. `Copy` — only stores slot coordinates.
pub struct CurrentState<T: 'static> {
    snap: StateHandle<T>,
    latest: CellHandle<T>,
    base: CellHandle<T>,
}

// Manual impls so we don't require T: Copy/Clone/PartialEq for the handle.
impl<T: 'static> Copy for CurrentState<T> {}
impl<T: 'static> Clone for CurrentState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> PartialEq for CurrentState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.snap == other.snap && self.latest == other.latest && self.base == other.base
    }
}
impl<T: 'static> Eq for CurrentState<T> {}

impl<T: 'static> fmt::Debug for CurrentState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentState")
            .field("snap", &self.snap)
            .field("latest", &self.latest)
            .finish()
    }
}

impl<T: Clone + 'static> CurrentState<T> {
    /// Read the snapshot value (as of the most recent commit).
    pub fn get(&self) -> T {
        self.snap.get()
    }

    /// Read the snapshot value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.snap.with(f)
    }

    /// Write through the snapshot facet.
    ///
    /// A computing updater is applied to the snapshot captured at setter
    /// creation. The result is scheduled into the snapshot slot and written
    /// to the latest slot synchronously.
    pub fn set(&self, updater: impl Into<Updater<T>>) {
        let base = self.base.get();
        let next = updater.into().apply(&base);
        self.snap.set(next.clone());
        self.latest.set(next);
    }

    /// Write a value computed from the captured snapshot.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.set(Updater::compute(f));
    }
}

// ---------------------------------------------------------------------------
// LatestState
// ---------------------------------------------------------------------------

/// Latest facet of a tracked value. `Copy` — only stores slot coordinates.
pub struct LatestState<T: 'static> {
    snap: StateHandle<T>,
    latest: CellHandle<T>,
}

impl<T: 'static> Copy for LatestState<T> {}
impl<T: 'static> Clone for LatestState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> PartialEq for LatestState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.snap == other.snap && self.latest == other.latest
    }
}
impl<T: 'static> Eq for LatestState<T> {}

impl<T: 'static> fmt::Debug for LatestState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatestState")
            .field("snap", &self.snap)
            .field("latest", &self.latest)
            .finish()
    }
}

impl<T: Clone + 'static> LatestState<T> {
    /// Read the latest value (as of the most recent write).
    pub fn get(&self) -> T {
        self.latest.get()
    }

    /// Read the latest value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.latest.with(f)
    }

    /// Write through the latest facet.
    ///
    /// A computing updater is applied to the true latest value, so rapid
    /// successive writes compose. The result is scheduled into the snapshot
    /// slot and written to the latest slot synchronously.
    pub fn set(&self, updater: impl Into<Updater<T>>) {
        let prev = self.latest.get();
        let next = updater.into().apply(&prev);
        self.snap.set(next.clone());
        self.latest.set(next);
    }

    /// Write a value computed from the latest value.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.set(Updater::compute(f));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
