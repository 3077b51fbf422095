//! Camera state synchronization and overlay lifecycle for an embedded 3D
//! scene widget.
//!
//! Nothing here touches the browser. The rendering engine, the host model
//! and the DOM are reached through the traits in [`engine`], so the web
//! front-end binds them to vtk.js and tests bind them to in-memory doubles.

pub mod axes;
pub mod camera;
pub mod constants;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod keys;
pub mod legend;
pub mod orientation;
pub mod sync;
pub mod view;

pub use axes::*;
pub use camera::*;
pub use constants::*;
pub use debounce::*;
pub use engine::*;
pub use error::*;
pub use keys::*;
pub use legend::*;
pub use orientation::*;
pub use sync::*;
pub use view::*;
