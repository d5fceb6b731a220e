//! Pilot: programmatic driving of a single headless component.
//!
//! The `Pilot` mounts a body closure as one component instance and plays the
//! host's part: it re-renders on demand, commits scheduled updates, and can
//! settle a pending-update cascade with a bounded loop. Intended for tests;
//! any host embedding the runtime follows the same commit-then-render cycle.

use crate::host::{self, ComponentId, HostError};

// ---------------------------------------------------------------------------
// PilotConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Pilot`].
#[derive(Debug, Clone)]
pub struct PilotConfig {
    /// Upper bound on commit+render passes in [`Pilot::process`]. A body that
    /// schedules an update on every render would otherwise never settle.
    pub max_update_passes: u32,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            max_update_passes: 64,
        }
    }
}

impl PilotConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the update-pass bound (builder).
    pub fn with_max_update_passes(mut self, passes: u32) -> Self {
        self.max_update_passes = passes;
        self
    }
}

/// Errors from driving a component.
#[derive(Debug, thiserror::Error)]
pub enum PilotError {
    #[error("update limit exceeded after {passes} passes")]
    UpdateLimitExceeded { passes: u32 },
    #[error(transparent)]
    Host(#[from] HostError),
}

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// Drives one mounted component through render/commit cycles.
///
/// The body runs once at mount and once per re-render; its return value is
/// the render output, kept readable via [`Pilot::output`]. Dropping the
/// pilot disposes the component and its hook slots.
///
/// # Examples
///
/// ```ignore
/// use tracked_state::testing::Pilot;
/// use tracked_state::tracked::use_tracked_state;
///
/// let mut pilot = Pilot::mount(|| {
///     let (cur, _latest) = use_tracked_state(0);
///     cur.get()
/// });
/// assert_eq!(pilot.output(), &0);
/// ```
pub struct Pilot<R> {
    id: ComponentId,
    body: Box<dyn FnMut() -> R>,
    config: PilotConfig,
    output: R,
}

impl<R> Pilot<R> {
    /// Mount `body` as a fresh component and run its first render pass.
    pub fn mount(body: impl FnMut() -> R + 'static) -> Self {
        Self::with_config(PilotConfig::default(), body)
    }

    /// Mount with an explicit config.
    pub fn with_config(config: PilotConfig, body: impl FnMut() -> R + 'static) -> Self {
        let id = host::create_component();
        let mut body: Box<dyn FnMut() -> R> = Box::new(body);
        let output =
            host::render(id, || body()).expect("cannot mount while a render pass is active");
        Self {
            id,
            body,
            config,
            output,
        }
    }

    /// The id of the mounted component.
    pub fn component_id(&self) -> ComponentId {
        self.id
    }

    /// Output of the most recent render pass.
    pub fn output(&self) -> &R {
        &self.output
    }

    /// Whether an update is scheduled and awaiting commit.
    pub fn is_dirty(&self) -> bool {
        host::is_dirty(self.id).expect("pilot component disposed")
    }

    /// Commits applied so far that changed state.
    pub fn generation(&self) -> u64 {
        host::generation(self.id).expect("pilot component disposed")
    }

    /// Run the body again without committing.
    pub fn rerender(&mut self) -> &R {
        let body = &mut self.body;
        let output =
            host::render(self.id, || body()).expect("cannot render while a render pass is active");
        self.output = output;
        &self.output
    }

    /// Apply scheduled updates without re-rendering. Returns whether any
    /// state changed.
    pub fn commit(&mut self) -> bool {
        host::commit(self.id).expect("cannot commit while a render pass is active")
    }

    /// Commit and re-render until no update remains scheduled.
    ///
    /// Returns the number of passes taken. Errs with
    /// [`PilotError::UpdateLimitExceeded`] once `max_update_passes` commits
    /// have run and the component is still dirty.
    pub fn process(&mut self) -> Result<u32, PilotError> {
        let mut passes = 0;
        while host::is_dirty(self.id)? {
            if passes == self.config.max_update_passes {
                return Err(PilotError::UpdateLimitExceeded { passes });
            }
            host::commit(self.id)?;
            self.rerender();
            passes += 1;
        }
        Ok(passes)
    }
}

impl<R> Drop for Pilot<R> {
    fn drop(&mut self) {
        host::dispose_component(self.id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
