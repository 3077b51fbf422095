//! Plain-data camera state exchanged with the host model.
//!
//! The engine camera carries bookkeeping (class tags, identity, derived
//! matrices, device-physical transforms) next to its pose. None of that may
//! reach the model, so every path that turns an engine snapshot or a model
//! value into a [`CameraState`] goes through [`strip_internal_fields`].

use glam::DVec3;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Engine-internal camera keys that never cross into the model.
pub const INTERNAL_CAMERA_KEYS: &[&str] = &[
    // identity / class hierarchy
    "classHierarchy",
    "vtkClass",
    "vtkObject",
    "vtkCamera",
    "managedInstanceId",
    "flattenedDepIds",
    // modification timestamp
    "mtime",
    // derived matrices and vectors
    "viewMatrix",
    "projectionMatrix",
    "cameraLightTransform",
    "viewPlaneNormal",
    "directionOfProjection",
    // device-physical transforms
    "physicalTranslation",
    "physicalScale",
    "physicalViewUp",
    "physicalViewNorth",
];

#[inline]
pub fn is_internal_key(key: &str) -> bool {
    INTERNAL_CAMERA_KEYS.contains(&key)
}

/// Remove every engine-internal key from a raw camera map.
pub fn strip_internal_fields(map: &mut Map<String, Value>) {
    map.retain(|k, _| !is_internal_key(k));
}

/// Serializable camera pose as stored in the model's `camera` field.
///
/// Known pose fields are typed; any other non-internal field the engine
/// reports is carried through `extra` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_point: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_up: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipping_range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_projection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_horizontal_view_angle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_center: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CameraState {
    /// Build a state from a full engine snapshot, dropping internal fields.
    pub fn from_snapshot(mut snapshot: Map<String, Value>) -> Result<Self, serde_json::Error> {
        strip_internal_fields(&mut snapshot);
        serde_json::from_value(Value::Object(snapshot))
    }

    /// Parse the model's camera field. `null` means "no camera set".
    pub fn from_model_value(value: Value) -> Result<Option<Self>, serde_json::Error> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) => Self::from_snapshot(map).map(Some),
            other => serde_json::from_value::<Self>(other).map(Some),
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// The position / focal point / view-up triple, when all three are set.
    pub fn pose(&self) -> Option<CameraPose> {
        Some(CameraPose {
            position: DVec3::from_array(self.position?),
            focal_point: DVec3::from_array(self.focal_point?),
            view_up: DVec3::from_array(self.view_up?),
        })
    }

    #[inline]
    pub fn has_internal_fields(&self) -> bool {
        self.extra.keys().any(|k| is_internal_key(k))
    }
}

/// Camera orientation used by the directional recenter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub focal_point: DVec3,
    pub view_up: DVec3,
}

impl CameraPose {
    #[inline]
    pub fn distance(&self) -> f64 {
        self.position.distance(self.focal_point)
    }

    /// Move the camera onto `direction` (from the focal point) at the current
    /// distance, snapping view-up to the dominant axis orthogonal to it.
    ///
    /// A zero direction leaves the pose unchanged.
    pub fn recentered(&self, direction: DVec3) -> CameraPose {
        let dir = direction.normalize_or_zero();
        if dir == DVec3::ZERO {
            return *self;
        }
        let position = self.focal_point + dir * self.distance();
        let mut view_up = self.view_up;
        if dir.x != 0.0 {
            view_up = major_axis(self.view_up, 1, 2);
        }
        if dir.y != 0.0 {
            view_up = major_axis(self.view_up, 0, 2);
        }
        if dir.z != 0.0 {
            view_up = major_axis(self.view_up, 0, 1);
        }
        CameraPose {
            position,
            focal_point: self.focal_point,
            view_up,
        }
    }
}

/// Unit vector along whichever of axes `a`/`b` dominates `v`, keeping its sign.
pub fn major_axis(v: DVec3, a: usize, b: usize) -> DVec3 {
    let idx = if v[a].abs() > v[b].abs() { a } else { b };
    let mut axis = DVec3::ZERO;
    axis[idx] = if v[idx] > 0.0 { 1.0 } else { -1.0 };
    axis
}
