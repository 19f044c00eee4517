//! Shader interface metadata: uniforms, in/out attributes and struct layouts

pub mod build_tasks;
pub mod json;
pub mod reflection;
pub mod source;
pub mod tools;

mod error;
pub use error::ExtractError;

mod pipeline;
pub use pipeline::{Backend, Extractor};

mod stage;
pub use stage::ShaderStage;
