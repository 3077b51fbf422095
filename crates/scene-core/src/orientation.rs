use crate::constants::{
    ORIENTATION_MAX_PIXEL_SIZE, ORIENTATION_MIN_PIXEL_SIZE, ORIENTATION_VIEWPORT_SIZE,
};
use crate::engine::{
    Backend, EngineCamera, OrientationMarker, PickingManager, RenderSurface, SceneRenderer,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// Placement of the orientation marker, fixed when the marker is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrientationConfig {
    pub corner: Corner,
    pub viewport_size: f64,
    pub min_pixel_size: u32,
    pub max_pixel_size: u32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            corner: Corner::BottomLeft,
            viewport_size: ORIENTATION_VIEWPORT_SIZE,
            min_pixel_size: ORIENTATION_MIN_PIXEL_SIZE,
            max_pixel_size: ORIENTATION_MAX_PIXEL_SIZE,
        }
    }
}

/// Visibility and click-to-recenter for the orientation marker.
pub struct OrientationControl<B: Backend> {
    camera: Rc<B::Camera>,
    renderer: Rc<B::Renderer>,
    surface: Rc<B::Surface>,
    marker: B::Marker,
    picking: B::Picking,
    visible: Cell<bool>,
}

impl<B: Backend> OrientationControl<B> {
    pub fn new(
        camera: Rc<B::Camera>,
        renderer: Rc<B::Renderer>,
        surface: Rc<B::Surface>,
        marker: B::Marker,
        picking: B::Picking,
    ) -> Self {
        Self {
            camera,
            renderer,
            surface,
            marker,
            picking,
            visible: Cell::new(false),
        }
    }

    /// Show or hide the marker. Picking follows so a hidden marker cannot be
    /// clicked.
    pub fn set_visible(&self, visible: bool) {
        self.marker.set_enabled(visible);
        if visible {
            self.picking.enable_picking();
        } else {
            self.picking.disable_picking();
        }
        self.visible.set(visible);
        log::debug!("[orientation] visible={}", visible);
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Look at the focal point from `direction`, keeping the current zoom.
    pub fn recenter(&self, direction: DVec3) {
        let pose = self.camera.pose().recentered(direction);
        self.camera.set_pose(&pose);
        self.marker.update_marker_orientation();
        self.renderer.reset_camera_clipping_range();
        self.surface.render();
    }
}
