// Widget tuning constants shared by the core managers and the web front-end.

// Camera sync
pub const CAMERA_CAPTURE_DEBOUNCE_MS: u32 = 50; // coalesces drag bursts into one model write

// Axes overlay
pub const AXES_ACTOR_COUNT: usize = 3; // lines, grid, pseudo-3D text overlay
pub const AXES_DEFAULT_DIGITS: usize = 1;
pub const AXES_DEFAULT_FONTSIZE: u32 = 12;
pub const AXES_DEFAULT_GRID_OPACITY: f64 = 0.1;
pub const AXES_DEFAULT_AXES_OPACITY: f64 = 1.0;

// Legend panel
pub const LEGEND_EXPANDED_WIDTH_PX: u32 = 350;
pub const LEGEND_COLLAPSED_WIDTH_PX: u32 = 30; // also the collapsed height
pub const LEGEND_MAX_HEIGHT_PX: u32 = 400;
pub const LEGEND_PLACEHOLDER: &str = "\u{2026}";

// Orientation marker
pub const ORIENTATION_VIEWPORT_SIZE: f64 = 0.15; // fraction of the render surface
pub const ORIENTATION_MIN_PIXEL_SIZE: u32 = 100;
pub const ORIENTATION_MAX_PIXEL_SIZE: u32 = 300;
