//! Two-way binding between the engine camera and the model's camera field.
//!
//! Both directions run under one [`SyncGuard`]. Whichever direction takes it
//! first wins; the other is dropped, never queued. That breaks both echo
//! paths:
//!
//! - applying a model camera fires the engine's modified notification
//!   synchronously; a capture that lands while the apply holds the guard
//!   is a no-op.
//! - writing a captured camera into the model fires the model's change
//!   notification synchronously; the resulting apply is a no-op.
//!
//! Captures are debounced, so the one scheduled by an apply usually fires
//! after the guard is released. Its snapshot is compared against the state
//! the apply left on the camera and is not written back when equal.

use crate::camera::CameraState;
use crate::debounce::Debouncer;
use crate::engine::{Backend, CameraModel, EngineCamera, RenderSurface, SceneRenderer};
use crate::error::Result;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    #[default]
    Idle,
    Busy,
}

/// Non-reentrant, non-blocking lock for the single-threaded event loop.
#[derive(Debug, Default)]
pub struct SyncGuard {
    state: Cell<GuardState>,
}

impl SyncGuard {
    /// Test-and-set. `None` when another holder is active.
    pub fn try_acquire(&self) -> Option<GuardToken<'_>> {
        match self.state.replace(GuardState::Busy) {
            GuardState::Idle => Some(GuardToken { guard: self }),
            GuardState::Busy => None,
        }
    }

    #[inline]
    pub fn state(&self) -> GuardState {
        self.state.get()
    }
}

/// Releases the guard on drop, including unwinding and `?` exits.
#[must_use]
pub struct GuardToken<'a> {
    guard: &'a SyncGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.state.set(GuardState::Idle);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The model has no camera.
    Absent,
    /// A capture was in flight.
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Written,
    /// The camera still holds exactly what the last apply put there.
    Echo,
    /// An apply was in flight.
    Skipped,
}

pub struct CameraSync<B: Backend> {
    camera: Rc<B::Camera>,
    renderer: Rc<B::Renderer>,
    surface: Rc<B::Surface>,
    model: Rc<B::Model>,
    guard: SyncGuard,
    debounce: Debouncer<B::Scheduler>,
    last_applied: RefCell<Option<CameraState>>,
}

impl<B: Backend> CameraSync<B> {
    pub fn new(
        camera: Rc<B::Camera>,
        renderer: Rc<B::Renderer>,
        surface: Rc<B::Surface>,
        model: Rc<B::Model>,
        scheduler: B::Scheduler,
        debounce_ms: u32,
    ) -> Self {
        Self {
            camera,
            renderer,
            surface,
            model,
            guard: SyncGuard::default(),
            debounce: Debouncer::new(scheduler, debounce_ms),
            last_applied: RefCell::new(None),
        }
    }

    #[inline]
    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    /// Push the model's camera onto the engine camera.
    pub fn apply_model_camera(&self, state: Option<&CameraState>) -> Result<ApplyOutcome> {
        let Some(state) = state else {
            return Ok(ApplyOutcome::Absent);
        };
        let Some(_token) = self.guard.try_acquire() else {
            log::debug!("[camera] apply dropped: capture in flight");
            return Ok(ApplyOutcome::Skipped);
        };
        self.camera.apply(state)?;
        self.renderer.reset_camera_clipping_range();
        let settled = self
            .camera
            .snapshot()
            .ok()
            .and_then(|snapshot| CameraState::from_snapshot(snapshot).ok());
        self.last_applied.replace(settled);
        self.surface.render();
        Ok(ApplyOutcome::Applied)
    }

    /// Snapshot the engine camera into the model's camera field.
    pub fn capture_camera_to_model(&self) -> Result<CaptureOutcome> {
        let Some(_token) = self.guard.try_acquire() else {
            log::debug!("[camera] capture dropped: apply in flight");
            return Ok(CaptureOutcome::Skipped);
        };
        let state = CameraState::from_snapshot(self.camera.snapshot()?)?;
        let is_echo = self.last_applied.borrow().as_ref() == Some(&state);
        if is_echo {
            return Ok(CaptureOutcome::Echo);
        }
        self.last_applied.replace(None);
        self.model.write_camera(state);
        Ok(CaptureOutcome::Written)
    }

    /// Engine "camera modified" hook: capture once the burst settles.
    pub fn schedule_capture(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.debounce.call(move || {
            let Some(sync) = weak.upgrade() else {
                return;
            };
            if let Err(e) = sync.capture_camera_to_model() {
                log::warn!("[camera] capture failed: {}", e);
            }
        });
    }

    pub fn cancel_pending_capture(&self) {
        self.debounce.cancel();
    }

    /// Reset the engine camera to frame the scene. The resulting camera
    /// reaches the model through the regular capture path.
    pub fn reset_camera(&self) -> ApplyOutcome {
        let Some(_token) = self.guard.try_acquire() else {
            log::debug!("[camera] reset dropped: capture in flight");
            return ApplyOutcome::Skipped;
        };
        self.last_applied.replace(None);
        self.renderer.reset_camera();
        self.surface.render();
        ApplyOutcome::Applied
    }
}
