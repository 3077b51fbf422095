use thiserror::Error;

/// Failures surfaced by the widget managers. Missing-resource teardown and
/// absent optional data are not errors and never produce one of these.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("engine call failed: {0}")]
    Engine(String),
    #[error("invalid camera state: {0}")]
    InvalidCamera(#[from] serde_json::Error),
    #[error("invalid axes spec: {0}")]
    InvalidAxes(String),
    #[error("overlay factory failed: {0}")]
    Factory(String),
}

pub type Result<T, E = SceneError> = std::result::Result<T, E>;
