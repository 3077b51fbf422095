// In-memory doubles for every engine / model / DOM capability.
// Each double is a cheap clone over shared state, so a test can keep one
// copy for assertions while the view owns another.

#![allow(dead_code)]

use scene_core::*;
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type Log = Rc<RefCell<Vec<String>>>;

fn push(log: &Log, entry: &str) {
    log.borrow_mut().push(entry.to_string());
}

// ---------------- Camera ----------------
type Subscribers = Rc<RefCell<Vec<(u32, Rc<dyn Fn()>)>>>;

#[derive(Clone)]
pub struct FakeCamera {
    pub fields: Rc<RefCell<Map<String, Value>>>,
    subscribers: Subscribers,
    next_id: Rc<Cell<u32>>,
    pub fail_next_apply: Rc<Cell<bool>>,
    pub applies: Rc<Cell<u32>>,
    log: Log,
}

impl FakeCamera {
    pub fn new(log: Log) -> Self {
        let Value::Object(fields) = json!({
            "position": [0.0, 0.0, 1.0],
            "focalPoint": [0.0, 0.0, 0.0],
            "viewUp": [0.0, 1.0, 0.0],
            "clippingRange": [0.01, 1000.01],
            "viewAngle": 30.0,
            "parallelProjection": false,
            "classHierarchy": ["vtkObject", "vtkCamera"],
            "vtkClass": "vtkCamera",
            "mtime": 1,
            "viewMatrix": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
            "physicalTranslation": [0.0, 0.0, 0.0],
            "physicalScale": 1.0
        }) else {
            unreachable!()
        };
        Self {
            fields: Rc::new(RefCell::new(fields)),
            subscribers: Rc::default(),
            next_id: Rc::default(),
            fail_next_apply: Rc::default(),
            applies: Rc::default(),
            log,
        }
    }

    fn bump_mtime(&self) {
        let mut fields = self.fields.borrow_mut();
        let mtime = fields.get("mtime").and_then(Value::as_u64).unwrap_or(0);
        fields.insert("mtime".into(), json!(mtime + 1));
    }

    pub fn fire_modified(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> =
            self.subscribers.borrow().iter().map(|(_, f)| Rc::clone(f)).collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Engine-side change, e.g. the user orbiting with the mouse.
    pub fn set_field(&self, key: &str, value: Value) {
        self.fields.borrow_mut().insert(key.into(), value);
        self.bump_mtime();
        self.fire_modified();
    }

    pub fn vec3(&self, key: &str) -> [f64; 3] {
        serde_json::from_value(self.fields.borrow()[key].clone()).unwrap()
    }

    pub fn position(&self) -> [f64; 3] {
        self.vec3("position")
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

pub struct FakeSubscription {
    id: u32,
    subscribers: Subscribers,
    log: Log,
}

impl Subscription for FakeSubscription {
    fn unsubscribe(&self) {
        self.subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
        push(&self.log, "camera:unsubscribe");
    }
}

impl EngineCamera for FakeCamera {
    type Subscription = FakeSubscription;

    fn snapshot(&self) -> scene_core::Result<Map<String, Value>> {
        Ok(self.fields.borrow().clone())
    }

    fn apply(&self, state: &CameraState) -> scene_core::Result<()> {
        if self.fail_next_apply.replace(false) {
            return Err(SceneError::Engine("camera.set threw".into()));
        }
        self.applies.set(self.applies.get() + 1);
        if let Value::Object(map) = state.to_value()? {
            let mut fields = self.fields.borrow_mut();
            for (k, v) in map {
                fields.insert(k, v);
            }
        }
        self.bump_mtime();
        self.fire_modified();
        Ok(())
    }

    fn pose(&self) -> CameraPose {
        CameraPose {
            position: glam::DVec3::from_array(self.vec3("position")),
            focal_point: glam::DVec3::from_array(self.vec3("focalPoint")),
            view_up: glam::DVec3::from_array(self.vec3("viewUp")),
        }
    }

    fn set_pose(&self, pose: &CameraPose) {
        {
            let mut fields = self.fields.borrow_mut();
            fields.insert("position".into(), json!(pose.position.to_array()));
            fields.insert("focalPoint".into(), json!(pose.focal_point.to_array()));
            fields.insert("viewUp".into(), json!(pose.view_up.to_array()));
        }
        self.bump_mtime();
        self.fire_modified();
    }

    fn on_modified(&self, callback: Box<dyn Fn()>) -> FakeSubscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::from(callback)));
        FakeSubscription {
            id,
            subscribers: Rc::clone(&self.subscribers),
            log: Rc::clone(&self.log),
        }
    }
}

// ---------------- Renderer ----------------
#[derive(Clone)]
pub struct FakeRenderer {
    camera: FakeCamera,
    pub actors: Rc<RefCell<Vec<u32>>>,
    pub removed: Rc<RefCell<Vec<u32>>>,
    pub clipping_resets: Rc<Cell<u32>>,
    pub camera_resets: Rc<Cell<u32>>,
}

impl FakeRenderer {
    pub fn new(camera: FakeCamera) -> Self {
        Self {
            camera,
            actors: Rc::default(),
            removed: Rc::default(),
            clipping_resets: Rc::default(),
            camera_resets: Rc::default(),
        }
    }
}

impl SceneRenderer for FakeRenderer {
    type Actor = u32;

    fn add_actor(&self, actor: &u32) {
        self.actors.borrow_mut().push(*actor);
    }

    fn remove_actor(&self, actor: &u32) {
        self.actors.borrow_mut().retain(|a| a != actor);
        self.removed.borrow_mut().push(*actor);
    }

    fn reset_camera_clipping_range(&self) {
        self.clipping_resets.set(self.clipping_resets.get() + 1);
        let distance = self.camera.pose().distance();
        self.camera
            .set_field("clippingRange", json!([distance * 0.5, distance * 2.0]));
    }

    fn reset_camera(&self) {
        self.camera_resets.set(self.camera_resets.get() + 1);
        self.camera.set_field("position", json!([0.0, 0.0, 7.5]));
    }
}

// ---------------- Surface / canvas ----------------
#[derive(Clone)]
pub struct FakeSurface {
    pub css: Rc<Cell<(f64, f64)>>,
    pub dpr: Rc<Cell<f64>>,
    pub renders: Rc<Cell<u32>>,
    pub resizes: Rc<Cell<u32>>,
    pub resize_listener: Rc<Cell<bool>>,
    pub deletes: Rc<Cell<u32>>,
    log: Log,
}

impl FakeSurface {
    pub fn new(log: Log) -> Self {
        Self {
            css: Rc::new(Cell::new((400.0, 300.0))),
            dpr: Rc::new(Cell::new(2.0)),
            renders: Rc::default(),
            resizes: Rc::default(),
            resize_listener: Rc::new(Cell::new(true)),
            deletes: Rc::default(),
            log,
        }
    }
}

impl RenderSurface for FakeSurface {
    fn resize(&self) {
        self.resizes.set(self.resizes.get() + 1);
    }

    fn render(&self) {
        self.renders.set(self.renders.get() + 1);
    }

    fn css_size(&self) -> (f64, f64) {
        self.css.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr.get()
    }

    fn detach_resize_listener(&self) {
        self.resize_listener.set(false);
        push(&self.log, "surface:detach_resize");
    }

    fn delete(&self) {
        self.deletes.set(self.deletes.get() + 1);
        push(&self.log, "surface:delete");
    }
}

#[derive(Clone, Default)]
pub struct FakeCanvas {
    pub clears: Rc<RefCell<Vec<(u32, u32)>>>,
    pub backing: Rc<Cell<(u32, u32)>>,
}

impl TextCanvas for FakeCanvas {
    fn clear(&self, width_px: u32, height_px: u32) {
        self.clears.borrow_mut().push((width_px, height_px));
    }

    fn set_backing_size(&self, width_px: u32, height_px: u32) {
        self.backing.set((width_px, height_px));
    }
}

// ---------------- Axes factory ----------------
#[derive(Clone, Default)]
pub struct FakeAxesFactory {
    next_id: Rc<Cell<u32>>,
    pub specs: Rc<RefCell<Vec<AxesSpec>>>,
    pub fail_next: Rc<Cell<bool>>,
}

impl AxesFactory for FakeAxesFactory {
    type Actor = u32;
    type Canvas = FakeCanvas;

    fn build(&self, spec: &AxesSpec, _canvas: &FakeCanvas) -> scene_core::Result<[u32; 3]> {
        if self.fail_next.replace(false) {
            return Err(SceneError::Factory("axes factory threw".into()));
        }
        self.specs.borrow_mut().push(spec.clone());
        let base = self.next_id.get();
        self.next_id.set(base + 3);
        Ok([base, base + 1, base + 2])
    }
}

// ---------------- Orientation ----------------
#[derive(Clone, Default)]
pub struct FakeMarker {
    pub enabled: Rc<Cell<bool>>,
    pub orientation_updates: Rc<Cell<u32>>,
}

impl OrientationMarker for FakeMarker {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn update_marker_orientation(&self) {
        self.orientation_updates.set(self.orientation_updates.get() + 1);
    }
}

#[derive(Clone, Default)]
pub struct FakePicking {
    pub enabled: Rc<Cell<bool>>,
}

impl PickingManager for FakePicking {
    fn enable_picking(&self) {
        self.enabled.set(true);
    }

    fn disable_picking(&self) {
        self.enabled.set(false);
    }
}

// ---------------- Keys ----------------
#[derive(Clone, Default)]
pub struct FakeKeys {
    pub attached: Rc<Cell<bool>>,
    pub attaches: Rc<Cell<u32>>,
    pub detaches: Rc<Cell<u32>>,
}

impl KeyHandlers for FakeKeys {
    fn attach(&self) {
        self.attached.set(true);
        self.attaches.set(self.attaches.get() + 1);
    }

    fn detach(&self) {
        self.attached.set(false);
        self.detaches.set(self.detaches.get() + 1);
    }
}

// ---------------- Legend DOM ----------------
#[derive(Clone, Debug, Default)]
pub struct PanelRecord {
    pub id: u32,
    pub removed: bool,
    pub attached: Vec<String>,
    pub placeholder: bool,
    pub size: (u32, Option<u32>),
}

type ClickHandlers = Rc<RefCell<Vec<(u32, Rc<dyn Fn()>)>>>;

#[derive(Clone, Default)]
pub struct FakeLegends {
    pub panels: Rc<RefCell<Vec<PanelRecord>>>,
    clicks: ClickHandlers,
    pub fail_on: Rc<RefCell<Option<String>>>,
}

impl FakeLegends {
    pub fn live_panels(&self) -> Vec<PanelRecord> {
        self.panels
            .borrow()
            .iter()
            .filter(|p| !p.removed)
            .cloned()
            .collect()
    }

    pub fn live_panel(&self) -> PanelRecord {
        let live = self.live_panels();
        assert_eq!(live.len(), 1, "expected exactly one live panel");
        live[0].clone()
    }

    /// Simulate a user click on the panel.
    pub fn click(&self, panel: u32) {
        let handler = self
            .clicks
            .borrow()
            .iter()
            .find(|(id, _)| *id == panel)
            .map(|(_, h)| Rc::clone(h));
        if let Some(handler) = handler {
            handler();
        }
    }

    fn with_panel(&self, panel: u32, f: impl FnOnce(&mut PanelRecord)) {
        if let Some(record) = self.panels.borrow_mut().iter_mut().find(|p| p.id == panel) {
            f(record);
        }
    }
}

impl LegendSurface for FakeLegends {
    type Panel = u32;
    type Legend = String;
    type Mapper = String;

    fn create_panel(&self, _style: &PanelStyle) -> scene_core::Result<u32> {
        let mut panels = self.panels.borrow_mut();
        let id = panels.len() as u32;
        panels.push(PanelRecord {
            id,
            ..PanelRecord::default()
        });
        Ok(id)
    }

    fn remove_panel(&self, panel: &u32) {
        self.with_panel(*panel, |p| p.removed = true);
        self.clicks.borrow_mut().retain(|(id, _)| id != panel);
    }

    fn create_legend(&self, _panel: &u32, mapper: &String) -> scene_core::Result<String> {
        if self.fail_on.borrow().as_deref() == Some(mapper.as_str()) {
            return Err(SceneError::Factory(format!("legend for {}", mapper)));
        }
        Ok(mapper.clone())
    }

    fn attach_legend(&self, panel: &u32, legend: &String) {
        self.with_panel(*panel, |p| {
            if !p.attached.contains(legend) {
                p.attached.push(legend.clone());
            }
        });
    }

    fn detach_legend(&self, panel: &u32, legend: &String) {
        self.with_panel(*panel, |p| p.attached.retain(|l| l != legend));
    }

    fn show_placeholder(&self, panel: &u32) {
        self.with_panel(*panel, |p| p.placeholder = true);
    }

    fn hide_placeholder(&self, panel: &u32) {
        self.with_panel(*panel, |p| p.placeholder = false);
    }

    fn set_size(&self, panel: &u32, width_px: u32, height_px: Option<u32>) {
        self.with_panel(*panel, |p| p.size = (width_px, height_px));
    }

    fn on_click(&self, panel: &u32, handler: Box<dyn Fn()>) {
        self.clicks.borrow_mut().push((*panel, Rc::from(handler)));
    }
}

// ---------------- Model ----------------
#[derive(Clone, Default)]
pub struct FakeModel {
    pub camera: Rc<RefCell<Option<CameraState>>>,
    pub writes: Rc<Cell<u32>>,
    on_write: Rc<RefCell<Option<Box<dyn Fn(CameraState)>>>>,
}

impl FakeModel {
    /// Route model writes back into the view, the way the host's change
    /// notification does.
    pub fn echo_into(&self, view: &Rc<SceneView<Fake>>) {
        let weak = Rc::downgrade(view);
        self.on_write.replace(Some(Box::new(move |state| {
            if let Some(view) = weak.upgrade() {
                view.handle(ModelChange::Camera(Some(state))).unwrap();
            }
        })));
    }

    /// Last camera written by the widget.
    pub fn camera(&self) -> Option<CameraState> {
        self.camera.borrow().clone()
    }
}

impl CameraModel for FakeModel {
    fn write_camera(&self, state: CameraState) {
        self.camera.replace(Some(state.clone()));
        self.writes.set(self.writes.get() + 1);
        let hook = self.on_write.borrow();
        if let Some(hook) = hook.as_ref() {
            hook(state);
        }
    }
}

// ---------------- Scheduler ----------------
struct Pending {
    due: u64,
    task: Option<Box<dyn FnOnce()>>,
    cancelled: Rc<Cell<bool>>,
}

/// Manual clock: tasks run only inside `advance`.
#[derive(Clone, Default)]
pub struct FakeScheduler {
    now: Rc<Cell<u64>>,
    queue: Rc<RefCell<Vec<Pending>>>,
}

pub struct FakeTimer {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for FakeTimer {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl Scheduler for FakeScheduler {
    type Handle = FakeTimer;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> FakeTimer {
        let cancelled = Rc::new(Cell::new(false));
        self.queue.borrow_mut().push(Pending {
            due: self.now.get() + u64::from(delay_ms),
            task: Some(task),
            cancelled: Rc::clone(&cancelled),
        });
        FakeTimer { cancelled }
    }
}

impl FakeScheduler {
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                queue.retain(|p| !p.cancelled.get() && p.task.is_some());
                queue
                    .iter_mut()
                    .filter(|p| p.due <= target)
                    .min_by_key(|p| p.due)
                    .and_then(|p| p.task.take().map(|task| (p.due, task)))
            };
            let Some((due, task)) = next else {
                break;
            };
            self.now.set(due.max(self.now.get()));
            task();
        }
        self.now.set(target);
    }

    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|p| !p.cancelled.get() && p.task.is_some())
            .count()
    }
}

// ---------------- Backend ----------------
pub struct Fake;

impl Backend for Fake {
    type Actor = u32;
    type Camera = FakeCamera;
    type Renderer = FakeRenderer;
    type Surface = FakeSurface;
    type Canvas = FakeCanvas;
    type Axes = FakeAxesFactory;
    type Marker = FakeMarker;
    type Picking = FakePicking;
    type Keys = FakeKeys;
    type Legends = FakeLegends;
    type Model = FakeModel;
    type Scheduler = FakeScheduler;
}

pub struct Harness {
    pub log: Log,
    pub camera: FakeCamera,
    pub renderer: FakeRenderer,
    pub surface: FakeSurface,
    pub canvas: FakeCanvas,
    pub axes: FakeAxesFactory,
    pub marker: FakeMarker,
    pub picking: FakePicking,
    pub keys: FakeKeys,
    pub legends: FakeLegends,
    pub model: FakeModel,
    pub scheduler: FakeScheduler,
}

impl Harness {
    pub fn new() -> Self {
        let log: Log = Rc::default();
        let camera = FakeCamera::new(Rc::clone(&log));
        Self {
            renderer: FakeRenderer::new(camera.clone()),
            surface: FakeSurface::new(Rc::clone(&log)),
            camera,
            canvas: FakeCanvas::default(),
            axes: FakeAxesFactory::default(),
            marker: FakeMarker::default(),
            picking: FakePicking::default(),
            keys: FakeKeys::default(),
            legends: FakeLegends::default(),
            model: FakeModel::default(),
            scheduler: FakeScheduler::default(),
            log,
        }
    }

    pub fn parts(&self) -> SceneParts<Fake> {
        SceneParts {
            camera: self.camera.clone(),
            renderer: self.renderer.clone(),
            surface: self.surface.clone(),
            axes_factory: self.axes.clone(),
            text_canvas: self.canvas.clone(),
            marker: self.marker.clone(),
            picking: self.picking.clone(),
            keys: self.keys.clone(),
            legends: self.legends.clone(),
            model: self.model.clone(),
            scheduler: self.scheduler.clone(),
        }
    }

    pub fn view(&self) -> Rc<SceneView<Fake>> {
        self.view_with(&WidgetOptions::default())
    }

    pub fn view_with(&self, options: &WidgetOptions) -> Rc<SceneView<Fake>> {
        SceneView::new(self.parts(), options)
    }

    pub fn log_entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

pub fn camera_state(value: Value) -> CameraState {
    CameraState::from_model_value(value).unwrap().unwrap()
}

pub fn axes_spec(ticks: &[f64]) -> AxesSpec {
    AxesSpec::from_model_value(json!({
        "xticker": {"ticks": ticks},
        "yticker": {"ticks": ticks},
        "zticker": {"ticks": ticks},
    }))
    .unwrap()
    .unwrap()
}
