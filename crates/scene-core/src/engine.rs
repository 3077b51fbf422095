//! Narrow capability traits for everything the widget talks to.
//!
//! The rendering engine, the host model, the DOM and browser timers are all
//! external. Each trait exposes only the calls the managers make. Methods
//! take `&self`: engine handles are shared JS objects and several callbacks
//! (camera modified, click, timer) re-enter the managers while a call is in
//! progress.

use crate::axes::AxesSpec;
use crate::camera::{CameraPose, CameraState};
use crate::error::Result;
use serde_json::{Map, Value};

/// Handle returned by an engine subscription.
pub trait Subscription {
    /// Stop delivering notifications. Calling it twice is a no-op.
    fn unsubscribe(&self);
}

/// The engine's active camera.
pub trait EngineCamera {
    type Subscription: Subscription;

    /// Every field the engine reports, internal ones included.
    fn snapshot(&self) -> Result<Map<String, Value>>;
    /// Copy the state's fields onto the camera. May fire `on_modified`
    /// callbacks synchronously.
    fn apply(&self, state: &CameraState) -> Result<()>;
    fn pose(&self) -> CameraPose;
    fn set_pose(&self, pose: &CameraPose);
    fn on_modified(&self, callback: Box<dyn Fn()>) -> Self::Subscription;
}

pub trait SceneRenderer {
    type Actor;

    fn add_actor(&self, actor: &Self::Actor);
    fn remove_actor(&self, actor: &Self::Actor);
    fn reset_camera_clipping_range(&self);
    fn reset_camera(&self);
}

/// The render window plus its container element.
pub trait RenderSurface {
    fn resize(&self);
    fn render(&self);
    /// CSS size of the container's bounding box.
    fn css_size(&self) -> (f64, f64);
    fn device_pixel_ratio(&self) -> f64;
    fn detach_resize_listener(&self);
    fn delete(&self);
}

/// Transparent 2D canvas layered over the surface for axis labels.
pub trait TextCanvas {
    fn clear(&self, width_px: u32, height_px: u32);
    fn set_backing_size(&self, width_px: u32, height_px: u32);
}

pub trait AxesFactory {
    type Actor;
    type Canvas: TextCanvas;

    /// Build the axis lines, grid and pseudo-3D overlay, in that order.
    fn build(&self, spec: &AxesSpec, canvas: &Self::Canvas) -> Result<[Self::Actor; 3]>;
}

pub trait OrientationMarker {
    fn set_enabled(&self, enabled: bool);
    fn update_marker_orientation(&self);
}

pub trait PickingManager {
    fn enable_picking(&self);
    fn disable_picking(&self);
}

/// The engine interactor's raw key handlers, bound at document level.
pub trait KeyHandlers {
    fn attach(&self);
    fn detach(&self);
}

/// DOM side of the legend panel.
pub trait LegendSurface {
    type Panel;
    type Legend;
    type Mapper;

    fn create_panel(&self, style: &crate::legend::PanelStyle) -> Result<Self::Panel>;
    fn remove_panel(&self, panel: &Self::Panel);
    fn create_legend(&self, panel: &Self::Panel, mapper: &Self::Mapper) -> Result<Self::Legend>;
    fn attach_legend(&self, panel: &Self::Panel, legend: &Self::Legend);
    fn detach_legend(&self, panel: &Self::Panel, legend: &Self::Legend);
    fn show_placeholder(&self, panel: &Self::Panel);
    fn hide_placeholder(&self, panel: &Self::Panel);
    /// `height_px: None` means automatic height.
    fn set_size(&self, panel: &Self::Panel, width_px: u32, height_px: Option<u32>);
    fn on_click(&self, panel: &Self::Panel, handler: Box<dyn Fn()>);
}

/// The host model's camera field.
pub trait CameraModel {
    fn write_camera(&self, state: CameraState);
}

/// One-shot timers. Dropping the returned handle cancels the task.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Bundle of concrete collaborator types for one engine binding.
///
/// Implemented by a marker type (the web front-end's vtk.js binding, or the
/// in-memory doubles in tests) so the managers stay generic over a single
/// parameter.
pub trait Backend: 'static {
    type Actor: 'static;
    type Camera: EngineCamera + 'static;
    type Renderer: SceneRenderer<Actor = Self::Actor> + 'static;
    type Surface: RenderSurface + 'static;
    type Canvas: TextCanvas + 'static;
    type Axes: AxesFactory<Actor = Self::Actor, Canvas = Self::Canvas> + 'static;
    type Marker: OrientationMarker + 'static;
    type Picking: PickingManager + 'static;
    type Keys: KeyHandlers + 'static;
    type Legends: LegendSurface + 'static;
    type Model: CameraModel + 'static;
    type Scheduler: Scheduler + 'static;
}
