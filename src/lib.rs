#![cfg(target_arch = "wasm32")]
//! Browser front-end: binds the scene widget core to vtk.js, the DOM and the
//! host dashboard's model.

use scene_core::{Backend, ModelChange, SceneParts, SceneView, WidgetOptions};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod dom;
mod engine;
mod keys;
mod legend;
mod model;
mod style;
mod timer;

use dom::EventListener;
use engine::{
    LabelCanvas, WebAxesFactory, WebCamera, WebMarker, WebPicking, WebRenderer,
    WebSubscription, WebSurface,
};
use keys::DocumentKeys;
use legend::DomLegends;
use model::WebModel;
use timer::BrowserTimers;

pub use engine::WidgetHooks;
pub use model::HostModel;

/// vtk.js in the browser.
pub struct Vtk;

impl Backend for Vtk {
    type Actor = JsValue;
    type Camera = WebCamera;
    type Renderer = WebRenderer;
    type Surface = WebSurface;
    type Canvas = LabelCanvas;
    type Axes = WebAxesFactory;
    type Marker = WebMarker;
    type Picking = WebPicking;
    type Keys = DocumentKeys;
    type Legends = DomLegends;
    type Model = WebModel;
    type Scheduler = BrowserTimers;
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("scene-web loaded");
    Ok(())
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// One embedded scene. The host calls the `*Changed` methods whenever the
/// matching model property changes and `remove` when the view goes away.
#[wasm_bindgen]
pub struct SceneWidget {
    view: Rc<SceneView<Vtk>>,
    model: WebModel,
    listeners: RefCell<Vec<EventListener>>,
    orientation_change: RefCell<Option<WebSubscription>>,
}

#[wasm_bindgen]
impl SceneWidget {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: web::HtmlElement,
        model: HostModel,
        hooks: WidgetHooks,
        options: JsValue,
    ) -> Result<SceneWidget, JsValue> {
        let options: WidgetOptions = match model::js_to_json(&options).map_err(to_js)? {
            serde_json::Value::Null => WidgetOptions::default(),
            value => serde_json::from_value(value).map_err(to_js)?,
        };
        let widget = build(container, model, hooks, &options).map_err(to_js)?;
        widget.sync_all()?;
        log::info!("[widget] ready (debounce={}ms)", options.debounce_ms);
        Ok(widget)
    }

    #[wasm_bindgen(js_name = cameraChanged)]
    pub fn camera_changed(&self) -> Result<(), JsValue> {
        let state = self.model.read_camera().map_err(to_js)?;
        self.route(ModelChange::Camera(state))
    }

    #[wasm_bindgen(js_name = axesChanged)]
    pub fn axes_changed(&self) -> Result<(), JsValue> {
        match self.model.axes_value() {
            Ok(value) => self.view.set_axes_value(value).map_err(to_js),
            Err(e) => {
                self.route(ModelChange::Axes(None))?;
                Err(to_js(e))
            }
        }
    }

    #[wasm_bindgen(js_name = colorMappersChanged)]
    pub fn color_mappers_changed(&self) -> Result<(), JsValue> {
        self.route(ModelChange::ColorMappers(self.model.read_color_mappers()))
    }

    #[wasm_bindgen(js_name = enableKeybindingsChanged)]
    pub fn enable_keybindings_changed(&self) -> Result<(), JsValue> {
        self.route(ModelChange::EnableKeybindings(self.model.enable_keybindings()))
    }

    #[wasm_bindgen(js_name = orientationWidgetChanged)]
    pub fn orientation_widget_changed(&self) -> Result<(), JsValue> {
        self.route(ModelChange::OrientationWidgetVisible(
            self.model.orientation_widget(),
        ))
    }

    #[wasm_bindgen(js_name = oneTimeResetChanged)]
    pub fn one_time_reset_changed(&self) -> Result<(), JsValue> {
        self.route(ModelChange::OneTimeReset)
    }

    /// Layout change of the host container.
    pub fn resize(&self) {
        self.view.resize();
    }

    pub fn remove(&self) {
        let orientation_change = self.orientation_change.borrow_mut().take();
        drop(orientation_change);
        self.listeners.borrow_mut().clear();
        self.view.teardown();
        log::info!("[widget] removed");
    }
}

impl SceneWidget {
    fn route(&self, change: ModelChange<JsValue>) -> Result<(), JsValue> {
        self.view.handle(change).map_err(to_js)
    }

    /// Initial model values go through the same paths as later changes.
    fn sync_all(&self) -> Result<(), JsValue> {
        self.orientation_widget_changed()?;
        self.enable_keybindings_changed()?;
        self.camera_changed()?;
        self.axes_changed()?;
        self.color_mappers_changed()?;
        self.resize();
        Ok(())
    }
}

fn build(
    container: web::HtmlElement,
    host: HostModel,
    hooks: WidgetHooks,
    options: &WidgetOptions,
) -> anyhow::Result<SceneWidget> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = dom::document()?;

    let render_window = engine::create_render_window(&container)?;
    let renderer = render_window.get_renderer();
    let camera = renderer.get_active_camera();
    let interactor = render_window.get_interactor();
    let text_canvas = LabelCanvas::create(&document, &container)?;
    let orientation = engine::build_orientation(&interactor, &options.orientation)?;
    let keys = DocumentKeys::new(&document, &interactor)?;
    let surface = WebSurface::new(render_window, container.clone());
    let resize_slot = surface.resize_slot();

    let parts = SceneParts::<Vtk> {
        camera: WebCamera::new(camera),
        renderer: WebRenderer::new(renderer),
        surface,
        axes_factory: WebAxesFactory::new(hooks.clone()),
        text_canvas,
        marker: orientation.marker,
        picking: orientation.picking,
        keys,
        legends: DomLegends::new(document, container.clone(), hooks),
        model: WebModel::new(host.clone()),
        scheduler: BrowserTimers,
    };
    let view = SceneView::new(parts, options);

    let weak = Rc::downgrade(&view);
    resize_slot.replace(Some(EventListener::new(&window, "resize", move |_| {
        if let Some(view) = weak.upgrade() {
            view.resize();
        }
    })));

    let weak = Rc::downgrade(&view);
    let enter = EventListener::new(&container, "mouseenter", move |_| {
        if let Some(view) = weak.upgrade() {
            view.pointer_enter();
        }
    });
    let weak = Rc::downgrade(&view);
    let leave = EventListener::new(&container, "mouseleave", move |_| {
        if let Some(view) = weak.upgrade() {
            view.pointer_leave();
        }
    });

    let weak = Rc::downgrade(&view);
    let orientation_change = engine::on_orientation_change(&orientation.view_widget, move |direction| {
        if let Some(view) = weak.upgrade() {
            view.recenter(direction);
        }
    });

    Ok(SceneWidget {
        view,
        model: WebModel::new(host),
        listeners: RefCell::new(vec![enter, leave]),
        orientation_change: RefCell::new(Some(orientation_change)),
    })
}
