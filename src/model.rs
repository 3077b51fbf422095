//! The host dashboard's model object and JSON conversion across the
//! JS boundary.

use scene_core::{CameraModel, CameraState, SceneError};
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Host-side model for one widget instance. Property names follow the
    /// host's schema.
    #[derive(Clone, Debug)]
    pub type HostModel;

    #[wasm_bindgen(method, getter)]
    pub fn camera(this: &HostModel) -> JsValue;
    #[wasm_bindgen(method, setter)]
    pub fn set_camera(this: &HostModel, value: &JsValue);
    #[wasm_bindgen(method, getter)]
    pub fn axes(this: &HostModel) -> JsValue;
    #[wasm_bindgen(method, getter)]
    pub fn color_mappers(this: &HostModel) -> JsValue;
    #[wasm_bindgen(method, getter)]
    pub fn enable_keybindings(this: &HostModel) -> bool;
    #[wasm_bindgen(method, getter)]
    pub fn orientation_widget(this: &HostModel) -> bool;
}

pub fn js_to_json(value: &JsValue) -> Result<Value, SceneError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let text = js_sys::JSON::stringify(value)
        .map_err(|e| SceneError::Engine(format!("JSON.stringify: {:?}", e)))?;
    let text = String::from(text);
    Ok(serde_json::from_str(&text)?)
}

pub fn json_to_js(value: &Value) -> Result<JsValue, SceneError> {
    let text = serde_json::to_string(value)?;
    js_sys::JSON::parse(&text).map_err(|e| SceneError::Engine(format!("JSON.parse: {:?}", e)))
}

/// Camera field of the host model.
pub struct WebModel {
    model: HostModel,
}

impl WebModel {
    pub fn new(model: HostModel) -> Self {
        Self { model }
    }

    pub fn read_camera(&self) -> Result<Option<CameraState>, SceneError> {
        Ok(CameraState::from_model_value(js_to_json(&self.model.camera())?)?)
    }

    /// Raw axes value. Parsing happens in the view so a bad value still
    /// clears the old axes.
    pub fn axes_value(&self) -> Result<Value, SceneError> {
        js_to_json(&self.model.axes())
    }

    pub fn read_color_mappers(&self) -> Vec<JsValue> {
        let mappers = self.model.color_mappers();
        if mappers.is_undefined() || mappers.is_null() {
            return Vec::new();
        }
        js_sys::Array::from(&mappers).iter().collect()
    }

    #[inline]
    pub fn enable_keybindings(&self) -> bool {
        self.model.enable_keybindings()
    }

    #[inline]
    pub fn orientation_widget(&self) -> bool {
        self.model.orientation_widget()
    }
}

impl CameraModel for WebModel {
    fn write_camera(&self, state: CameraState) {
        match state
            .to_value()
            .map_err(SceneError::from)
            .and_then(|v| json_to_js(&v))
        {
            Ok(value) => self.model.set_camera(&value),
            Err(e) => log::warn!("[model] camera write failed: {}", e),
        }
    }
}
