//! Component runtime: instance arena, render passes, commit.
//!
//! A thread-local [`Runtime`] owns every component instance on the thread.
//! Each instance holds a vector of hook slots (allocated in call order during
//! its first render pass), a dirty flag set when a state update is scheduled,
//! and a generation counter bumped on every commit that applies a change.
//! Single-threaded, synchronous — scheduling is entirely cooperative: the
//! host (or the [`crate::testing::Pilot`]) decides when to commit and when to
//! re-render.

use std::cell::RefCell;

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use crate::host::slot::AnySlot;

new_key_type! {
    /// Unique identifier for a component instance. Copy, lightweight (u64).
    pub struct ComponentId;
}

/// Errors from misusing the runtime API.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),
    #[error("render of {0:?} requested while another render pass is active")]
    NestedRender(ComponentId),
    #[error("commit requested while a render pass is active")]
    CommitDuringRender,
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

pub(crate) struct ComponentState {
    /// Hook slots, indexed by call order within a render pass.
    pub(crate) slots: Vec<Box<dyn AnySlot>>,
    /// Set when a state update has been scheduled and not yet committed.
    pub(crate) dirty: bool,
    /// Bumped on every commit that applied at least one pending update.
    pub(crate) generation: u64,
}

/// The render pass currently executing, if any.
pub(crate) struct Frame {
    pub(crate) component: ComponentId,
    /// Next hook slot to visit.
    pub(crate) cursor: usize,
}

pub(crate) struct Runtime {
    pub(crate) components: SlotMap<ComponentId, ComponentState>,
    pub(crate) frame: Option<Frame>,
}

impl Runtime {
    fn new() -> Self {
        Self {
            components: SlotMap::with_key(),
            frame: None,
        }
    }
}

thread_local! {
    pub(crate) static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

// ---------------------------------------------------------------------------
// Instance lifecycle
// ---------------------------------------------------------------------------

/// Register a new component instance and return its id.
///
/// The instance starts with no hook slots; slots are allocated by the hooks
/// the body calls during its first render pass.
pub fn create_component() -> ComponentId {
    let id = RUNTIME.with(|rt| {
        rt.borrow_mut().components.insert(ComponentState {
            slots: Vec::new(),
            dirty: false,
            generation: 0,
        })
    });
    debug!(component = ?id, "component created");
    id
}

/// Remove a component instance, dropping all of its hook slots.
///
/// Returns `false` if the id was unknown (already disposed) — a no-op then.
pub fn dispose_component(id: ComponentId) -> bool {
    let removed = RUNTIME.with(|rt| rt.borrow_mut().components.remove(id).is_some());
    if removed {
        debug!(component = ?id, "component disposed");
    }
    removed
}

// ---------------------------------------------------------------------------
// Render and commit
// ---------------------------------------------------------------------------

/// Clears the active frame when the render body returns or unwinds.
struct FrameGuard;

impl Drop for FrameGuard {
    fn drop(&mut self) {
        RUNTIME.with(|rt| rt.borrow_mut().frame = None);
    }
}

/// Run `body` inside a render pass for `id`.
///
/// Hook calls inside `body` visit the instance's slots in call order,
/// allocating on first visit. Render passes do not nest.
pub fn render<R>(id: ComponentId, body: impl FnOnce() -> R) -> Result<R, HostError> {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if rt.frame.is_some() {
            return Err(HostError::NestedRender(id));
        }
        if !rt.components.contains_key(id) {
            return Err(HostError::UnknownComponent(id));
        }
        rt.frame = Some(Frame {
            component: id,
            cursor: 0,
        });
        Ok(())
    })?;
    let _guard = FrameGuard;
    trace!(component = ?id, "render pass");
    Ok(body())
}

/// Apply every pending state update for `id`.
///
/// Pending writes become the committed values, the dirty flag clears, and the
/// generation is bumped if anything changed. Returns whether it did. Values
/// scheduled before this call are coalesced — only the last write per slot
/// survives.
pub fn commit(id: ComponentId) -> Result<bool, HostError> {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if rt.frame.is_some() {
            return Err(HostError::CommitDuringRender);
        }
        let comp = rt
            .components
            .get_mut(id)
            .ok_or(HostError::UnknownComponent(id))?;
        let mut changed = false;
        for slot in comp.slots.iter_mut() {
            if slot.commit() {
                changed = true;
            }
        }
        comp.dirty = false;
        if changed {
            comp.generation += 1;
            debug!(component = ?id, generation = comp.generation, "commit applied");
        }
        Ok(changed)
    })
}

/// Whether `id` has a scheduled update awaiting commit.
pub fn is_dirty(id: ComponentId) -> Result<bool, HostError> {
    RUNTIME.with(|rt| {
        rt.borrow()
            .components
            .get(id)
            .map(|comp| comp.dirty)
            .ok_or(HostError::UnknownComponent(id))
    })
}

/// The number of commits that have applied a change to `id`.
pub fn generation(id: ComponentId) -> Result<u64, HostError> {
    RUNTIME.with(|rt| {
        rt.borrow()
            .components
            .get(id)
            .map(|comp| comp.generation)
            .ok_or(HostError::UnknownComponent(id))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
