pub mod config;
pub mod shader_watcher;
pub mod shaders;
pub mod util;

pub use config::ToolPaths;
pub use shaders::build_tasks;
pub use shaders::json::ShaderMetadata;
pub use shaders::{Backend, ExtractError, Extractor, ShaderStage};
