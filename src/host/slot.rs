//! Hook slots: the two state primitives components build on.
//!
//! - [`use_state`] — a render-cycle slot: reads return the value as of the
//!   most recent commit; writes schedule a pending value and mark the
//!   component dirty (a re-render request). Pending writes coalesce —
//!   last write wins.
//! - [`use_cell`] — a persistent mutable cell: writes land synchronously and
//!   never mark the component dirty.
//!
//! Slots are identified by hook call order: the first render pass allocates
//! them, later passes re-visit them by position. Hooks must therefore run in
//! the same order on every render — a slot whose type no longer matches
//! panics, as does any hook call outside a render pass.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use crate::host::runtime::{ComponentId, RUNTIME};

// ---------------------------------------------------------------------------
// Slot storage
// ---------------------------------------------------------------------------

/// Type-erased hook slot stored on a component instance.
pub(crate) trait AnySlot: 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Apply any pending write. Returns whether the slot changed.
    fn commit(&mut self) -> bool;
}

/// Backing storage for [`StateHandle`].
struct StateCell<T> {
    /// Value as of the most recent commit.
    committed: T,
    /// Last scheduled write, if any.
    pending: Option<T>,
}

impl<T: 'static> AnySlot for StateCell<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(next) => {
                self.committed = next;
                true
            }
            None => false,
        }
    }
}

/// Backing storage for [`CellHandle`].
struct CellSlot<T> {
    value: T,
}

impl<T: 'static> AnySlot for CellSlot<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn commit(&mut self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Slot allocation
// ---------------------------------------------------------------------------

/// Visit the next hook slot for the active render pass.
///
/// Allocates (via `init`) on the first visit; on later visits verifies the
/// slot still holds an `S`. `init` runs outside the runtime borrow, so it may
/// read other handles, but it must not call hooks itself.
fn hook_slot<S: AnySlot>(init: impl FnOnce() -> S) -> (ComponentId, usize) {
    let (component, index, fresh) = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let rt = &mut *rt;
        let frame = rt
            .frame
            .as_mut()
            .expect("hook called outside a render pass");
        let component = frame.component;
        let index = frame.cursor;
        frame.cursor += 1;
        let comp = rt
            .components
            .get(component)
            .expect("render frame points at a disposed component");
        if index < comp.slots.len() {
            comp.slots[index]
                .as_any()
                .downcast_ref::<S>()
                .expect("hook slot type mismatch: hooks must run in the same order every render");
            (component, index, false)
        } else {
            (component, index, true)
        }
    });
    if fresh {
        let slot = Box::new(init());
        RUNTIME.with(|rt| {
            let mut rt = rt.borrow_mut();
            let comp = rt
                .components
                .get_mut(component)
                .expect("render frame points at a disposed component");
            debug_assert_eq!(comp.slots.len(), index);
            comp.slots.push(slot);
        });
    }
    (component, index)
}

/// Read a slot of type `S` through `f`.
fn with_slot<S: AnySlot, R>(component: ComponentId, index: usize, f: impl FnOnce(&S) -> R) -> R {
    RUNTIME.with(|rt| {
        let rt = rt.borrow();
        let comp = rt
            .components
            .get(component)
            .expect("state accessed after component disposal");
        let slot = comp.slots[index]
            .as_any()
            .downcast_ref::<S>()
            .expect("hook slot type mismatch");
        f(slot)
    })
}

/// Mutate a slot of type `S` through `f`, optionally marking the component
/// dirty.
fn with_slot_mut<S: AnySlot, R>(
    component: ComponentId,
    index: usize,
    mark_dirty: bool,
    f: impl FnOnce(&mut S) -> R,
) -> R {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let comp = rt
            .components
            .get_mut(component)
            .expect("state written after component disposal");
        let slot = comp.slots[index]
            .as_any_mut()
            .downcast_mut::<S>()
            .expect("hook slot type mismatch");
        let out = f(slot);
        if mark_dirty {
            comp.dirty = true;
        }
        out
    })
}

// ---------------------------------------------------------------------------
// StateHandle
// ---------------------------------------------------------------------------

/// Render-cycle state slot. `Copy` — only stores slot coordinates.
pub struct StateHandle<T: 'static> {
    component: ComponentId,
    slot: usize,
    _marker: PhantomData<T>,
}

// Manual impls so we don't require T: Copy/Clone/PartialEq for the handle.
impl<T: 'static> Copy for StateHandle<T> {}
impl<T: 'static> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> PartialEq for StateHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component && self.slot == other.slot
    }
}
impl<T: 'static> Eq for StateHandle<T> {}

impl<T: 'static> fmt::Debug for StateHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandle")
            .field("component", &self.component)
            .field("slot", &self.slot)
            .finish()
    }
}

impl<T: 'static> StateHandle<T> {
    /// Read the committed value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(|v| v.clone())
    }

    /// Read the committed value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        with_slot(self.component, self.slot, |cell: &StateCell<T>| {
            f(&cell.committed)
        })
    }

    /// Schedule `value` as the next committed value and mark the component
    /// dirty. The committed value is unchanged until the host commits.
    pub fn set(&self, value: T) {
        with_slot_mut(self.component, self.slot, true, |cell: &mut StateCell<T>| {
            cell.pending = Some(value);
        });
        trace!(component = ?self.component, slot = self.slot, "state update scheduled");
    }
}

/// Allocate (or re-visit) a render-cycle state slot.
///
/// `init` runs only on the first render pass of the component instance.
pub fn use_state<T: 'static>(init: impl FnOnce() -> T) -> StateHandle<T> {
    let (component, slot) = hook_slot(|| StateCell {
        committed: init(),
        pending: None,
    });
    StateHandle {
        component,
        slot,
        _marker: PhantomData,
    }
}

// ---------------------------------------------------------------------------
// CellHandle
// ---------------------------------------------------------------------------

/// Persistent mutable cell. `Copy` — only stores slot coordinates.
pub struct CellHandle<T: 'static> {
    component: ComponentId,
    slot: usize,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for CellHandle<T> {}
impl<T: 'static> Clone for CellHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> PartialEq for CellHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component && self.slot == other.slot
    }
}
impl<T: 'static> Eq for CellHandle<T> {}

impl<T: 'static> fmt::Debug for CellHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellHandle")
            .field("component", &self.component)
            .field("slot", &self.slot)
            .finish()
    }
}

impl<T: 'static> CellHandle<T> {
    /// Read the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(|v| v.clone())
    }

    /// Read the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        with_slot(self.component, self.slot, |cell: &CellSlot<T>| {
            f(&cell.value)
        })
    }

    /// Overwrite the value synchronously. Does not mark the component dirty.
    pub fn set(&self, value: T) {
        with_slot_mut(
            self.component,
            self.slot,
            false,
            |cell: &mut CellSlot<T>| {
                cell.value = value;
            },
        );
    }
}

/// Allocate (or re-visit) a persistent mutable cell.
///
/// `init` runs only on the first render pass of the component instance.
pub fn use_cell<T: 'static>(init: impl FnOnce() -> T) -> CellHandle<T> {
    let (component, slot) = hook_slot(|| CellSlot { value: init() });
    CellHandle {
        component,
        slot,
        _marker: PhantomData,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
