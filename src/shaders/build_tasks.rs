use std::path::{Path, PathBuf};

use log::*;

use crate::config::ToolPaths;

use super::{
    Backend, Extractor, ShaderStage,
    json::ShaderMetadata,
    tools::ToolRunner,
};

pub struct Config {
    pub backend: Backend,
    /// the directory to read shader source files from
    pub shaders_source_dir: PathBuf,
    /// the directory to write metadata json (and spirv artifacts) to
    pub metadata_dir: PathBuf,
    pub tools: ToolPaths,
}

/// The outcome for one shader file of a batch
#[derive(Debug)]
pub struct WrittenMetadata {
    pub shader_path: PathBuf,
    /// None when extraction errored before a document could be written
    pub json_path: Option<PathBuf>,
    /// false when the external tool rejected the shader or extraction errored
    pub success: bool,
}

pub fn write_shader_metadata(config: &Config) -> anyhow::Result<Vec<WrittenMetadata>> {
    let extractor = Extractor::new(config.tools.clone(), config.metadata_dir.clone());
    write_shader_metadata_with(config, &extractor)
}

pub fn write_shader_metadata_with<R: ToolRunner>(
    config: &Config,
    extractor: &Extractor<R>,
) -> anyhow::Result<Vec<WrittenMetadata>> {
    let mut shader_paths: Vec<PathBuf> = std::fs::read_dir(&config.shaders_source_dir)?
        .filter_map(|entry_res| entry_res.ok())
        .map(|dir_entry| dir_entry.path())
        .filter(|path| path.is_file() && ShaderStage::from_path(path) != ShaderStage::Unknown)
        .collect();
    shader_paths.sort();

    std::fs::create_dir_all(&config.metadata_dir)?;

    let mut written = vec![];
    for shader_path in &shader_paths {
        match write_one(config, extractor, shader_path) {
            Ok(metadata) => written.push(metadata),
            Err(err) => {
                error!("{}: {err:#}", shader_path.display());
                written.push(WrittenMetadata {
                    shader_path: shader_path.clone(),
                    json_path: None,
                    success: false,
                });
            }
        }
    }

    let failures = written.iter().filter(|w| !w.success).count();
    info!(
        "wrote metadata for {} shaders ({failures} failed)",
        written.len()
    );

    Ok(written)
}

/// extracts one shader and writes `<metadata dir>/<file name>.meta.json`
pub fn write_one<R: ToolRunner>(
    config: &Config,
    extractor: &Extractor<R>,
    shader_path: &Path,
) -> anyhow::Result<WrittenMetadata> {
    let metadata = extractor.extract(shader_path, config.backend)?;
    if !metadata.is_success() {
        warn!(
            "{} failed (exit code {}):\n{}",
            shader_path.display(),
            metadata.diagnostics().exit_code,
            metadata.diagnostics().stderr
        );
    }

    let json_path = metadata_path(&config.metadata_dir, shader_path);
    std::fs::write(&json_path, metadata.to_json_string()?)?;
    debug!("wrote {}", json_path.display());

    Ok(WrittenMetadata {
        shader_path: shader_path.to_path_buf(),
        json_path: Some(json_path),
        success: metadata.is_success(),
    })
}

pub fn metadata_path(metadata_dir: &Path, shader_path: &Path) -> PathBuf {
    let mut file_name = shader_path
        .file_name()
        .unwrap_or(shader_path.as_os_str())
        .to_os_string();
    file_name.push(".meta.json");
    metadata_dir.join(file_name)
}

pub fn read_metadata(json_path: &Path) -> anyhow::Result<ShaderMetadata> {
    let json = std::fs::read_to_string(json_path)?;
    Ok(serde_json::from_str(&json)?)
}
