use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("unrecognized field '{0}'")]
    UnknownField(String),

    #[error("unsupported input '{path}': expected a .txt or .html file")]
    UnsupportedInput { path: PathBuf },

    #[error("failed to load refinement file {path}: {reason}")]
    RefinementLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
