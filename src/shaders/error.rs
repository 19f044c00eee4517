use std::path::PathBuf;

use thiserror::Error;

use super::{Backend, ShaderStage};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no shader stage for file extension: {}", .0.display())]
    UnknownStage(PathBuf),

    #[error("failed to read shader source {}: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to launch {}: {source}", .program.display())]
    LaunchTool {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create artifact directory {}: {source}", .path.display())]
    ArtifactDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{stage} shaders are unsupported by the {backend} backend (raytracing stages have no attribute reflection)")]
    UnsupportedStage { stage: ShaderStage, backend: Backend },

    #[error("malformed reflection document: {0}")]
    ReflectionDocument(#[from] serde_json::Error),
}
