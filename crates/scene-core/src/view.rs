//! The widget instance: routes model changes and DOM events to the managers
//! and owns the render surface until teardown.

use crate::axes::{AxesOverlay, AxesSpec};
use crate::camera::CameraState;
use crate::constants::CAMERA_CAPTURE_DEBOUNCE_MS;
use crate::engine::{Backend, EngineCamera, LegendSurface, RenderSurface, Subscription};
use crate::error::Result;
use crate::keys::KeyBindingScope;
use crate::legend::{LegendPanel, PanelStyle};
use crate::orientation::{OrientationConfig, OrientationControl};
use crate::sync::CameraSync;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type MapperOf<B> = <<B as Backend>::Legends as LegendSurface>::Mapper;

/// One model property transition. Each is handled by exactly one manager.
#[derive(Clone, Debug)]
pub enum ModelChange<M> {
    Camera(Option<CameraState>),
    Axes(Option<AxesSpec>),
    ColorMappers(Vec<M>),
    EnableKeybindings(bool),
    OrientationWidgetVisible(bool),
    /// The model's one-time-reset flag flipped.
    OneTimeReset,
}

/// Construction-time options supplied by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetOptions {
    pub debounce_ms: u32,
    pub orientation: OrientationConfig,
    pub legend: PanelStyle,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            debounce_ms: CAMERA_CAPTURE_DEBOUNCE_MS,
            orientation: OrientationConfig::default(),
            legend: PanelStyle::default(),
        }
    }
}

/// Collaborators for one widget instance.
pub struct SceneParts<B: Backend> {
    pub camera: B::Camera,
    pub renderer: B::Renderer,
    pub surface: B::Surface,
    pub axes_factory: B::Axes,
    pub text_canvas: B::Canvas,
    pub marker: B::Marker,
    pub picking: B::Picking,
    pub keys: B::Keys,
    pub legends: B::Legends,
    pub model: B::Model,
    pub scheduler: B::Scheduler,
}

type CameraSubscription<B> = <<B as Backend>::Camera as EngineCamera>::Subscription;

pub struct SceneView<B: Backend> {
    surface: Rc<B::Surface>,
    sync: Rc<CameraSync<B>>,
    axes: AxesOverlay<B>,
    orientation: OrientationControl<B>,
    legend: Rc<LegendPanel<B::Legends>>,
    keys: KeyBindingScope<B::Keys>,
    camera_subscription: RefCell<Option<CameraSubscription<B>>>,
    torn_down: Cell<bool>,
}

impl<B: Backend> SceneView<B> {
    /// First render: unbind global keys, size the label canvas and start
    /// listening to the engine camera. Initial model values arrive through
    /// [`SceneView::handle`] like any later change.
    pub fn new(parts: SceneParts<B>, options: &WidgetOptions) -> Rc<Self> {
        let camera = Rc::new(parts.camera);
        let renderer = Rc::new(parts.renderer);
        let surface = Rc::new(parts.surface);
        let model = Rc::new(parts.model);

        let sync = Rc::new(CameraSync::new(
            Rc::clone(&camera),
            Rc::clone(&renderer),
            Rc::clone(&surface),
            model,
            parts.scheduler,
            options.debounce_ms,
        ));
        let axes = AxesOverlay::new(
            Rc::clone(&renderer),
            Rc::clone(&surface),
            parts.axes_factory,
            parts.text_canvas,
        );
        let orientation = OrientationControl::new(
            Rc::clone(&camera),
            renderer,
            Rc::clone(&surface),
            parts.marker,
            parts.picking,
        );
        let legend = Rc::new(LegendPanel::new(parts.legends, options.legend.clone()));
        let keys = KeyBindingScope::new(parts.keys, false);
        keys.install();
        axes.sync_canvas_size();

        let weak_sync = Rc::downgrade(&sync);
        let subscription = camera.on_modified(Box::new(move || {
            if let Some(sync) = weak_sync.upgrade() {
                sync.schedule_capture();
            }
        }));

        Rc::new(Self {
            surface,
            sync,
            axes,
            orientation,
            legend,
            keys,
            camera_subscription: RefCell::new(Some(subscription)),
            torn_down: Cell::new(false),
        })
    }

    pub fn handle(&self, change: ModelChange<MapperOf<B>>) -> Result<()> {
        if self.torn_down.get() {
            log::debug!("[view] change after teardown ignored");
            return Ok(());
        }
        match change {
            ModelChange::Camera(state) => {
                self.sync.apply_model_camera(state.as_ref())?;
            }
            ModelChange::Axes(spec) => {
                self.axes.set_spec(spec.as_ref())?;
                self.surface.render();
            }
            ModelChange::ColorMappers(mappers) => self.legend.set_mappers(&mappers)?,
            ModelChange::EnableKeybindings(enabled) => self.keys.set_enabled(enabled),
            ModelChange::OrientationWidgetVisible(visible) => {
                self.orientation.set_visible(visible);
                self.surface.render();
            }
            ModelChange::OneTimeReset => {
                self.sync.reset_camera();
            }
        }
        Ok(())
    }

    /// The model's axes value as plain data. An invalid value still tears
    /// down the current axes before the parse error is returned.
    pub fn set_axes_value(&self, value: serde_json::Value) -> Result<()> {
        match AxesSpec::from_model_value(value) {
            Ok(spec) => self.handle(ModelChange::Axes(spec)),
            Err(e) => {
                self.handle(ModelChange::Axes(None))?;
                Err(e)
            }
        }
    }

    pub fn resize(&self) {
        if self.torn_down.get() {
            return;
        }
        self.surface.resize();
        self.axes.sync_canvas_size();
        self.surface.render();
    }

    pub fn pointer_enter(&self) {
        self.keys.pointer_enter();
    }

    pub fn pointer_leave(&self) {
        self.keys.pointer_leave();
    }

    /// Orientation marker click.
    pub fn recenter(&self, direction: DVec3) {
        if self.torn_down.get() {
            return;
        }
        self.orientation.recenter(direction);
    }

    /// Destroy the widget. Callbacks are cut before the surface goes away;
    /// repeated calls are no-ops.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        let subscription = self.camera_subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        self.sync.cancel_pending_capture();
        self.surface.detach_resize_listener();
        self.keys.set_enabled(false);
        self.legend.teardown();
        self.axes.teardown();
        self.surface.delete();
        log::debug!("[view] torn down");
    }

    #[inline]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    pub fn sync(&self) -> &Rc<CameraSync<B>> {
        &self.sync
    }

    pub fn axes(&self) -> &AxesOverlay<B> {
        &self.axes
    }

    pub fn orientation(&self) -> &OrientationControl<B> {
        &self.orientation
    }

    pub fn legend(&self) -> &Rc<LegendPanel<B::Legends>> {
        &self.legend
    }

    pub fn keys(&self) -> &KeyBindingScope<B::Keys> {
        &self.keys
    }
}
