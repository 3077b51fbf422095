//! vtk.js bindings and the engine-side capability impls.

use crate::dom::{self, EventListener};
use crate::model::json_to_js;
use glam::DVec3;
use scene_core::{
    AxesFactory, AxesSpec, CameraPose, CameraState, Corner, EngineCamera, OrientationConfig,
    OrientationMarker, PickingManager, RenderSurface, Result, SceneError, SceneRenderer,
    Subscription, TextCanvas,
};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    pub type FullScreenRenderWindow;
    #[wasm_bindgen(
        catch,
        js_namespace = ["vtk", "Rendering", "Misc", "vtkFullScreenRenderWindow"],
        js_name = newInstance
    )]
    fn new_full_screen_render_window(options: &JsValue) -> Result<FullScreenRenderWindow, JsValue>;
    #[wasm_bindgen(method, js_name = getRenderer)]
    pub fn get_renderer(this: &FullScreenRenderWindow) -> VtkRenderer;
    #[wasm_bindgen(method, js_name = getRenderWindow)]
    fn get_render_window(this: &FullScreenRenderWindow) -> VtkRenderWindow;
    #[wasm_bindgen(method, js_name = getInteractor)]
    pub fn get_interactor(this: &FullScreenRenderWindow) -> VtkInteractor;
    #[wasm_bindgen(method)]
    fn resize(this: &FullScreenRenderWindow);
    #[wasm_bindgen(method)]
    fn delete(this: &FullScreenRenderWindow);

    pub type VtkRenderWindow;
    #[wasm_bindgen(method)]
    fn render(this: &VtkRenderWindow);

    pub type VtkRenderer;
    #[wasm_bindgen(method, js_name = getActiveCamera)]
    pub fn get_active_camera(this: &VtkRenderer) -> VtkCamera;
    #[wasm_bindgen(method, js_name = addActor)]
    fn add_actor(this: &VtkRenderer, actor: &JsValue);
    #[wasm_bindgen(method, js_name = removeActor)]
    fn remove_actor(this: &VtkRenderer, actor: &JsValue);
    #[wasm_bindgen(method, js_name = resetCameraClippingRange)]
    fn reset_camera_clipping_range(this: &VtkRenderer);
    #[wasm_bindgen(method, js_name = resetCamera)]
    fn reset_camera(this: &VtkRenderer);

    pub type VtkCamera;
    #[wasm_bindgen(method)]
    fn get(this: &VtkCamera) -> JsValue;
    #[wasm_bindgen(method, catch)]
    fn set(this: &VtkCamera, fields: &JsValue) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(method, js_name = getPosition)]
    fn get_position(this: &VtkCamera) -> js_sys::Array;
    #[wasm_bindgen(method, js_name = getFocalPoint)]
    fn get_focal_point(this: &VtkCamera) -> js_sys::Array;
    #[wasm_bindgen(method, js_name = getViewUp)]
    fn get_view_up(this: &VtkCamera) -> js_sys::Array;
    #[wasm_bindgen(method, js_name = setPosition)]
    fn set_position(this: &VtkCamera, x: f64, y: f64, z: f64);
    #[wasm_bindgen(method, js_name = setFocalPoint)]
    fn set_focal_point(this: &VtkCamera, x: f64, y: f64, z: f64);
    #[wasm_bindgen(method, js_name = setViewUp)]
    fn set_view_up(this: &VtkCamera, x: f64, y: f64, z: f64);
    #[wasm_bindgen(method, js_name = onModified)]
    fn on_modified(this: &VtkCamera, callback: &js_sys::Function) -> VtkSubscription;

    pub type VtkSubscription;
    #[wasm_bindgen(method)]
    fn unsubscribe(this: &VtkSubscription);

    pub type VtkInteractor;
    #[wasm_bindgen(method, getter = handleKeyPress)]
    pub fn handle_key_press(this: &VtkInteractor) -> js_sys::Function;
    #[wasm_bindgen(method, getter = handleKeyDown)]
    pub fn handle_key_down(this: &VtkInteractor) -> js_sys::Function;
    #[wasm_bindgen(method, getter = handleKeyUp)]
    pub fn handle_key_up(this: &VtkInteractor) -> js_sys::Function;

    type VtkAxesActor;
    #[wasm_bindgen(js_namespace = ["vtk", "Rendering", "Core", "vtkAxesActor"], js_name = newInstance)]
    fn new_axes_actor() -> VtkAxesActor;
    #[wasm_bindgen(method, js_name = getBounds)]
    fn get_bounds(this: &VtkAxesActor) -> js_sys::Array;

    type OrientationMarkerWidget;
    #[wasm_bindgen(
        js_namespace = ["vtk", "Interaction", "Widgets", "vtkOrientationMarkerWidget"],
        js_name = newInstance
    )]
    fn new_orientation_marker_widget(options: &JsValue) -> OrientationMarkerWidget;
    #[wasm_bindgen(method, js_name = setEnabled)]
    fn set_enabled(this: &OrientationMarkerWidget, enabled: bool);
    #[wasm_bindgen(method, js_name = setViewportCorner)]
    fn set_viewport_corner(this: &OrientationMarkerWidget, corner: &str);
    #[wasm_bindgen(method, js_name = setViewportSize)]
    fn set_viewport_size(this: &OrientationMarkerWidget, size: f64);
    #[wasm_bindgen(method, js_name = setMinPixelSize)]
    fn set_min_pixel_size(this: &OrientationMarkerWidget, px: u32);
    #[wasm_bindgen(method, js_name = setMaxPixelSize)]
    fn set_max_pixel_size(this: &OrientationMarkerWidget, px: u32);
    #[wasm_bindgen(method, js_name = updateMarkerOrientation)]
    fn update_marker_orientation(this: &OrientationMarkerWidget);
    #[wasm_bindgen(method, js_name = getRenderer)]
    fn get_renderer(this: &OrientationMarkerWidget) -> VtkRenderer;

    type WidgetManager;
    #[wasm_bindgen(js_namespace = ["vtk", "Widgets", "Core", "vtkWidgetManager"], js_name = newInstance)]
    fn new_widget_manager() -> WidgetManager;
    #[wasm_bindgen(method, js_name = setRenderer)]
    fn set_renderer(this: &WidgetManager, renderer: &VtkRenderer);
    #[wasm_bindgen(method, js_name = addWidget)]
    fn add_widget(this: &WidgetManager, widget: &InteractiveOrientationWidget) -> OrientationViewWidget;
    #[wasm_bindgen(method, js_name = enablePicking)]
    fn enable_picking(this: &WidgetManager);
    #[wasm_bindgen(method, js_name = disablePicking)]
    fn disable_picking(this: &WidgetManager);

    type InteractiveOrientationWidget;
    #[wasm_bindgen(
        js_namespace = ["vtk", "Widgets", "Widgets3D", "vtkInteractiveOrientationWidget"],
        js_name = newInstance
    )]
    fn new_interactive_orientation_widget() -> InteractiveOrientationWidget;
    #[wasm_bindgen(method, js_name = placeWidget)]
    fn place_widget(this: &InteractiveOrientationWidget, bounds: &js_sys::Array);
    #[wasm_bindgen(method, js_name = setBounds)]
    fn set_bounds(this: &InteractiveOrientationWidget, bounds: &js_sys::Array);
    #[wasm_bindgen(method, js_name = setPlaceFactor)]
    fn set_place_factor(this: &InteractiveOrientationWidget, factor: f64);

    pub type OrientationViewWidget;
    #[wasm_bindgen(method, js_name = onOrientationChange)]
    fn on_orientation_change(this: &OrientationViewWidget, callback: &js_sys::Function) -> VtkSubscription;

    /// Host callbacks that know how to draw axes and color bars.
    #[derive(Clone, Debug)]
    pub type WidgetHooks;
    #[wasm_bindgen(method, catch, js_name = buildAxes)]
    fn build_axes(
        this: &WidgetHooks,
        spec: &JsValue,
        label_canvas: &web::HtmlCanvasElement,
    ) -> Result<js_sys::Array, JsValue>;
    #[wasm_bindgen(method, catch, js_name = buildLegend)]
    pub fn build_legend(
        this: &WidgetHooks,
        panel: &web::HtmlElement,
        mapper: &JsValue,
    ) -> Result<web::HtmlCanvasElement, JsValue>;
}

#[inline]
fn js_error(context: &str, e: JsValue) -> SceneError {
    SceneError::Engine(format!("{}: {:?}", context, e))
}

fn vec3(array: &js_sys::Array) -> DVec3 {
    let at = |i: u32| array.get(i).as_f64().unwrap_or(0.0);
    DVec3::new(at(0), at(1), at(2))
}

/// Full-screen render window inside the widget's container.
pub fn create_render_window(container: &web::HtmlElement) -> anyhow::Result<FullScreenRenderWindow> {
    let container_style = dom::js_object(&[
        ("height", &JsValue::from_str("100%")),
        ("width", &JsValue::from_str("100%")),
        ("position", &JsValue::from_str("relative")),
        ("overflow", &JsValue::from_str("hidden")),
    ])?;
    let container_style: JsValue = container_style.into();
    let root: &JsValue = container.as_ref();
    let options = dom::js_object(&[
        ("rootContainer", root),
        ("containerStyle", &container_style),
        ("listenWindowResize", &JsValue::FALSE),
    ])?;
    new_full_screen_render_window(&options).map_err(|e| anyhow::anyhow!("render window: {:?}", e))
}

// ---------------- Camera ----------------
pub struct WebCamera {
    camera: VtkCamera,
}

impl WebCamera {
    pub fn new(camera: VtkCamera) -> Self {
        Self { camera }
    }
}

/// Owns the JS callback for as long as the engine may call it.
pub struct WebSubscription {
    handle: VtkSubscription,
    active: Cell<bool>,
    _callback: Closure<dyn FnMut(JsValue)>,
}

impl WebSubscription {
    fn new(
        subscribe: impl FnOnce(&js_sys::Function) -> VtkSubscription,
        callback: Box<dyn FnMut(JsValue)>,
    ) -> Self {
        let callback = Closure::wrap(callback);
        let handle = subscribe(callback.as_ref().unchecked_ref());
        Self {
            handle,
            active: Cell::new(true),
            _callback: callback,
        }
    }
}

impl Subscription for WebSubscription {
    fn unsubscribe(&self) {
        if self.active.replace(false) {
            self.handle.unsubscribe();
        }
    }
}

impl Drop for WebSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl EngineCamera for WebCamera {
    type Subscription = WebSubscription;

    fn snapshot(&self) -> Result<Map<String, Value>> {
        match crate::model::js_to_json(&self.camera.get())? {
            Value::Object(map) => Ok(map),
            other => Err(SceneError::Engine(format!("camera.get() returned {}", other))),
        }
    }

    fn apply(&self, state: &CameraState) -> Result<()> {
        let fields = json_to_js(&state.to_value()?)?;
        self.camera.set(&fields).map_err(|e| js_error("camera.set", e))?;
        Ok(())
    }

    fn pose(&self) -> CameraPose {
        CameraPose {
            position: vec3(&self.camera.get_position()),
            focal_point: vec3(&self.camera.get_focal_point()),
            view_up: vec3(&self.camera.get_view_up()),
        }
    }

    fn set_pose(&self, pose: &CameraPose) {
        let CameraPose {
            position: p,
            focal_point: f,
            view_up: u,
        } = *pose;
        self.camera.set_focal_point(f.x, f.y, f.z);
        self.camera.set_position(p.x, p.y, p.z);
        self.camera.set_view_up(u.x, u.y, u.z);
    }

    fn on_modified(&self, callback: Box<dyn Fn()>) -> WebSubscription {
        let camera = &self.camera;
        WebSubscription::new(
            |f| camera.on_modified(f),
            Box::new(move |_: JsValue| callback()),
        )
    }
}

// ---------------- Renderer / surface ----------------
pub struct WebRenderer {
    renderer: VtkRenderer,
}

impl WebRenderer {
    pub fn new(renderer: VtkRenderer) -> Self {
        Self { renderer }
    }
}

impl SceneRenderer for WebRenderer {
    type Actor = JsValue;

    fn add_actor(&self, actor: &JsValue) {
        self.renderer.add_actor(actor);
    }

    fn remove_actor(&self, actor: &JsValue) {
        self.renderer.remove_actor(actor);
    }

    fn reset_camera_clipping_range(&self) {
        self.renderer.reset_camera_clipping_range();
    }

    fn reset_camera(&self) {
        self.renderer.reset_camera();
    }
}

/// Slot for the window resize listener. Filled once the view exists, since
/// the listener calls back into it.
pub type ResizeSlot = Rc<RefCell<Option<EventListener>>>;

pub struct WebSurface {
    window: FullScreenRenderWindow,
    render_window: VtkRenderWindow,
    container: web::HtmlElement,
    resize_listener: ResizeSlot,
    deleted: Cell<bool>,
}

impl WebSurface {
    pub fn new(window: FullScreenRenderWindow, container: web::HtmlElement) -> Self {
        let render_window = window.get_render_window();
        Self {
            window,
            render_window,
            container,
            resize_listener: Rc::default(),
            deleted: Cell::new(false),
        }
    }

    pub fn resize_slot(&self) -> ResizeSlot {
        Rc::clone(&self.resize_listener)
    }
}

impl RenderSurface for WebSurface {
    fn resize(&self) {
        if !self.deleted.get() {
            self.window.resize();
        }
    }

    fn render(&self) {
        if !self.deleted.get() {
            self.render_window.render();
        }
    }

    fn css_size(&self) -> (f64, f64) {
        dom::css_size(&self.container)
    }

    fn device_pixel_ratio(&self) -> f64 {
        dom::device_pixel_ratio()
    }

    fn detach_resize_listener(&self) {
        let listener = self.resize_listener.borrow_mut().take();
        drop(listener);
    }

    fn delete(&self) {
        if !self.deleted.replace(true) {
            self.window.delete();
        }
    }
}

// ---------------- Axes ----------------
/// 2D canvas over the render window that the axes overlay draws labels on.
pub struct LabelCanvas {
    canvas: web::HtmlCanvasElement,
}

impl LabelCanvas {
    pub fn create(document: &web::Document, container: &web::HtmlElement) -> anyhow::Result<Self> {
        let canvas: web::HtmlCanvasElement = dom::create_element(document, "canvas")?;
        dom::set_style(&canvas, crate::style::LABEL_CANVAS_CSS);
        container
            .append_child(&canvas)
            .map_err(|e| anyhow::anyhow!("append label canvas: {:?}", e))?;
        Ok(Self { canvas })
    }

    fn context(&self) -> Option<web::CanvasRenderingContext2d> {
        self.canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<web::CanvasRenderingContext2d>().ok())
    }
}

impl TextCanvas for LabelCanvas {
    fn clear(&self, width_px: u32, height_px: u32) {
        if let Some(ctx) = self.context() {
            ctx.clear_rect(0.0, 0.0, f64::from(width_px), f64::from(height_px));
        }
    }

    fn set_backing_size(&self, width_px: u32, height_px: u32) {
        self.canvas.set_width(width_px);
        self.canvas.set_height(height_px);
    }
}

pub struct WebAxesFactory {
    hooks: WidgetHooks,
}

impl WebAxesFactory {
    pub fn new(hooks: WidgetHooks) -> Self {
        Self { hooks }
    }
}

impl AxesFactory for WebAxesFactory {
    type Actor = JsValue;
    type Canvas = LabelCanvas;

    fn build(&self, spec: &AxesSpec, canvas: &LabelCanvas) -> Result<[JsValue; 3]> {
        let spec = json_to_js(&serde_json::to_value(spec)?)?;
        let actors = self
            .hooks
            .build_axes(&spec, &canvas.canvas)
            .map_err(|e| SceneError::Factory(format!("{:?}", e)))?;
        if actors.length() != 3 {
            return Err(SceneError::Factory(format!(
                "expected 3 axes actors, got {}",
                actors.length()
            )));
        }
        Ok([actors.get(0), actors.get(1), actors.get(2)])
    }
}

// ---------------- Orientation ----------------
pub struct WebMarker {
    widget: OrientationMarkerWidget,
}

impl OrientationMarker for WebMarker {
    fn set_enabled(&self, enabled: bool) {
        self.widget.set_enabled(enabled);
    }

    fn update_marker_orientation(&self) {
        self.widget.update_marker_orientation();
    }
}

pub struct WebPicking {
    manager: WidgetManager,
}

impl PickingManager for WebPicking {
    fn enable_picking(&self) {
        self.manager.enable_picking();
    }

    fn disable_picking(&self) {
        self.manager.disable_picking();
    }
}

fn corner_name(corner: Corner) -> &'static str {
    match corner {
        Corner::BottomLeft => "BOTTOM_LEFT",
        Corner::BottomRight => "BOTTOM_RIGHT",
        Corner::TopLeft => "TOP_LEFT",
        Corner::TopRight => "TOP_RIGHT",
    }
}

pub struct OrientationParts {
    pub marker: WebMarker,
    pub picking: WebPicking,
    pub view_widget: OrientationViewWidget,
}

/// Axes marker in a viewport corner plus the clickable widget on top of it.
/// The marker is enabled while its renderer is wired up; the model's
/// visibility flag decides the final state.
pub fn build_orientation(
    interactor: &VtkInteractor,
    config: &OrientationConfig,
) -> anyhow::Result<OrientationParts> {
    let axes = new_axes_actor();
    let actor: &JsValue = axes.as_ref();
    let interactor: &JsValue = interactor.as_ref();
    let options = dom::js_object(&[("actor", actor), ("interactor", interactor)])?;
    let widget = new_orientation_marker_widget(&options);
    widget.set_enabled(true);
    widget.set_viewport_corner(corner_name(config.corner));
    widget.set_viewport_size(config.viewport_size);
    widget.set_min_pixel_size(config.min_pixel_size);
    widget.set_max_pixel_size(config.max_pixel_size);

    let manager = new_widget_manager();
    manager.set_renderer(&widget.get_renderer());

    let interactive = new_interactive_orientation_widget();
    let bounds = axes.get_bounds();
    interactive.place_widget(&bounds);
    interactive.set_bounds(&bounds);
    interactive.set_place_factor(1.0);
    let view_widget = manager.add_widget(&interactive);

    Ok(OrientationParts {
        marker: WebMarker { widget },
        picking: WebPicking { manager },
        view_widget,
    })
}

/// Deliver the clicked direction of the interactive marker.
pub fn on_orientation_change(
    view_widget: &OrientationViewWidget,
    handler: impl Fn(DVec3) + 'static,
) -> WebSubscription {
    WebSubscription::new(
        |f| view_widget.on_orientation_change(f),
        Box::new(move |event: JsValue| {
            let direction = js_sys::Reflect::get(&event, &"direction".into())
                .ok()
                .filter(|d| js_sys::Array::is_array(d))
                .map(|d| vec3(&js_sys::Array::from(&d)));
            match direction {
                Some(direction) => handler(direction),
                None => log::warn!("[orientation] change event without a direction"),
            }
        }),
    )
}
