//! Axes overlay: three engine actors plus 2D labels on a text canvas.
//!
//! The actor set is never patched. Any spec change removes the whole set and
//! clears the label canvas before the factory builds a new one.

use crate::constants::{
    AXES_ACTOR_COUNT, AXES_DEFAULT_AXES_OPACITY, AXES_DEFAULT_DIGITS, AXES_DEFAULT_FONTSIZE,
    AXES_DEFAULT_GRID_OPACITY,
};
use crate::engine::{AxesFactory, Backend, RenderSurface, SceneRenderer, TextCanvas};
use crate::error::{Result, SceneError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Tick positions along one axis, in scene coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub ticks: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl Ticker {
    /// Explicit labels, or the ticks printed with `digits` decimals.
    pub fn resolved_labels(&self, digits: usize) -> Vec<String> {
        match &self.labels {
            Some(labels) => labels.clone(),
            None => self
                .ticks
                .iter()
                .map(|t| format!("{:.*}", digits, t))
                .collect(),
        }
    }
}

fn default_digits() -> usize {
    AXES_DEFAULT_DIGITS
}
fn default_fontsize() -> u32 {
    AXES_DEFAULT_FONTSIZE
}
fn default_show_grid() -> bool {
    true
}
fn default_grid_opacity() -> f64 {
    AXES_DEFAULT_GRID_OPACITY
}
fn default_axes_opacity() -> f64 {
    AXES_DEFAULT_AXES_OPACITY
}

/// Axes description read from the model and handed to the axes factory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxesSpec {
    pub xticker: Ticker,
    pub yticker: Ticker,
    pub zticker: Ticker,
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default = "default_digits")]
    pub digits: usize,
    #[serde(default = "default_fontsize")]
    pub fontsize: u32,
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,
    #[serde(default = "default_grid_opacity")]
    pub grid_opacity: f64,
    #[serde(default = "default_axes_opacity")]
    pub axes_opacity: f64,
}

impl AxesSpec {
    /// Parse the model's axes field. `null` and `{}` both mean "no axes".
    pub fn from_model_value(value: Value) -> Result<Option<Self>> {
        match &value {
            Value::Null => return Ok(None),
            Value::Object(map) if map.is_empty() => return Ok(None),
            _ => {}
        }
        let spec: AxesSpec =
            serde_json::from_value(value).map_err(|e| SceneError::InvalidAxes(e.to_string()))?;
        spec.resolved().map(Some)
    }

    /// Validate and fill in inferred labels.
    pub fn resolved(mut self) -> Result<Self> {
        for (name, opacity) in [("grid_opacity", self.grid_opacity), ("axes_opacity", self.axes_opacity)] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(SceneError::InvalidAxes(format!(
                    "{} must be within [0, 1], got {}",
                    name, opacity
                )));
            }
        }
        let digits = self.digits;
        for (name, ticker) in [
            ("xticker", &mut self.xticker),
            ("yticker", &mut self.yticker),
            ("zticker", &mut self.zticker),
        ] {
            if let Some(labels) = &ticker.labels {
                if labels.len() != ticker.ticks.len() {
                    return Err(SceneError::InvalidAxes(format!(
                        "{}: {} labels for {} ticks",
                        name,
                        labels.len(),
                        ticker.ticks.len()
                    )));
                }
            }
            ticker.labels = Some(ticker.resolved_labels(digits));
        }
        Ok(self)
    }
}

/// Device pixels covered by a CSS box at the given pixel ratio.
#[inline]
pub fn pixel_size(css_size: (f64, f64), device_pixel_ratio: f64) -> (u32, u32) {
    let (w, h) = css_size;
    ((w * device_pixel_ratio) as u32, (h * device_pixel_ratio) as u32)
}

pub struct AxesOverlay<B: Backend> {
    renderer: Rc<B::Renderer>,
    surface: Rc<B::Surface>,
    factory: B::Axes,
    canvas: B::Canvas,
    actors: RefCell<SmallVec<[B::Actor; AXES_ACTOR_COUNT]>>,
}

impl<B: Backend> AxesOverlay<B> {
    pub fn new(
        renderer: Rc<B::Renderer>,
        surface: Rc<B::Surface>,
        factory: B::Axes,
        canvas: B::Canvas,
    ) -> Self {
        Self {
            renderer,
            surface,
            factory,
            canvas,
            actors: RefCell::new(SmallVec::new()),
        }
    }

    /// Tear down the current set and, for `Some(spec)`, build a new one.
    pub fn set_spec(&self, spec: Option<&AxesSpec>) -> Result<()> {
        self.teardown();
        let Some(spec) = spec else {
            return Ok(());
        };
        let built = self.factory.build(spec, &self.canvas)?;
        let mut actors = self.actors.borrow_mut();
        for actor in built {
            self.renderer.add_actor(&actor);
            actors.push(actor);
        }
        log::debug!("[axes] built {} actors", actors.len());
        Ok(())
    }

    /// Remove every actor and clear the label canvas. Safe with no axes.
    pub fn teardown(&self) {
        let previous = std::mem::take(&mut *self.actors.borrow_mut());
        for actor in &previous {
            self.renderer.remove_actor(actor);
        }
        let (w, h) = self.canvas_pixel_size();
        self.canvas.clear(w, h);
    }

    /// Match the label canvas backing store to the container.
    pub fn sync_canvas_size(&self) {
        let (w, h) = self.canvas_pixel_size();
        self.canvas.set_backing_size(w.max(1), h.max(1));
    }

    pub fn canvas_pixel_size(&self) -> (u32, u32) {
        pixel_size(self.surface.css_size(), self.surface.device_pixel_ratio())
    }

    pub fn actor_count(&self) -> usize {
        self.actors.borrow().len()
    }
}
