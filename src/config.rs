use std::path::PathBuf;

const DEFAULT_VALIDATOR: &str = "glslangValidator";
const DEFAULT_ANALYZER: &str = "vk_shader_analyze";

/// Paths to the external shader tools, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// validates glsl and compiles it to spirv
    pub compiler: PathBuf,
    /// links and prints the human-readable reflection dump
    pub linker: PathBuf,
    /// prints spirv reflection as json
    pub analyzer: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_VALIDATOR),
            linker: PathBuf::from(DEFAULT_VALIDATOR),
            analyzer: PathBuf::from(DEFAULT_ANALYZER),
        }
    }
}

impl ToolPaths {
    /// defaults, then the vulkan sdk on windows, then explicit overrides
    ///
    /// SHADER_META_COMPILER, SHADER_META_LINKER, SHADER_META_ANALYZER
    pub fn from_env() -> Self {
        let mut paths = Self::default();

        if cfg!(windows) {
            if let Some(sdk) = std::env::var_os("VULKAN_SDK") {
                let validator = PathBuf::from(sdk).join("Bin").join("glslangValidator.exe");
                paths.compiler = validator.clone();
                paths.linker = validator;
            }
        }

        if let Some(compiler) = std::env::var_os("SHADER_META_COMPILER") {
            paths.compiler = compiler.into();
        }
        if let Some(linker) = std::env::var_os("SHADER_META_LINKER") {
            paths.linker = linker.into();
        }
        if let Some(analyzer) = std::env::var_os("SHADER_META_ANALYZER") {
            paths.analyzer = analyzer.into();
        }

        paths
    }
}

/// reads a boolean flag from the environment; unset, empty and "false" are off
pub fn env_flag(name: &str) -> bool {
    match std::env::var(name).ok() {
        None => false,
        Some(s) if s.is_empty() => false,
        Some(s) if s.to_lowercase() == "false" => false,
        _ => true,
    }
}
