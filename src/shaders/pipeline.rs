use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::*;

use crate::config::ToolPaths;

use super::{
    ExtractError, ShaderStage,
    json::*,
    reflection, source,
    tools::{ProcessRunner, ToolRunner},
};

/// Where the interface metadata comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// the compiler only validates; declarations are scanned from source text
    Source,
    /// the linker's reflection dump, with locations and structs from source
    #[default]
    LinkerReflection,
    /// compiled spirv run through the json reflection analyzer
    SpirvReflection,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Source => "source",
            Self::LinkerReflection => "linker",
            Self::SpirvReflection => "spirv",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "linker" => Ok(Self::LinkerReflection),
            "spirv" => Ok(Self::SpirvReflection),
            other => {
                anyhow::bail!("unknown backend '{other}' (expected source, linker or spirv)")
            }
        }
    }
}

/// Extracts one shader file at a time; holds no state between files
#[derive(Debug, Clone)]
pub struct Extractor<R = ProcessRunner> {
    pub tools: ToolPaths,
    pub runner: R,
    /// where compiled spirv is written for the analyzer
    pub artifact_dir: PathBuf,
}

impl Extractor<ProcessRunner> {
    pub fn new(tools: ToolPaths, artifact_dir: PathBuf) -> Self {
        Self {
            tools,
            runner: ProcessRunner,
            artifact_dir,
        }
    }
}

impl<R: ToolRunner> Extractor<R> {
    pub fn extract(&self, path: &Path, backend: Backend) -> Result<ShaderMetadata, ExtractError> {
        let source = std::fs::read_to_string(path).map_err(|source| ExtractError::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;

        self.extract_text(path, &source, backend)
    }

    /// extraction for already-loaded source; `path` is what the tools are given
    pub fn extract_text(
        &self,
        path: &Path,
        source: &str,
        backend: Backend,
    ) -> Result<ShaderMetadata, ExtractError> {
        let stage = ShaderStage::from_path(path);
        if stage == ShaderStage::Unknown {
            return Err(ExtractError::UnknownStage(path.to_path_buf()));
        }
        debug!("extracting {} ({stage}) with the {backend} backend", path.display());

        let result = match backend {
            Backend::Source => self.extract_source(path, source, stage),
            Backend::LinkerReflection => self.extract_linker_reflection(path, source, stage),
            Backend::SpirvReflection => self.extract_spirv_reflection(path, stage),
        };

        let metadata = match result {
            Err(err @ ExtractError::UnsupportedStage { .. }) => {
                warn!("{}: {err}", path.display());
                unsupported(&err)
            }
            other => other?,
        };

        if let Some(interface) = metadata.interface() {
            for (list, name) in interface.duplicate_names() {
                warn!("{}: '{name}' is declared more than once in {list}", path.display());
            }
        }

        Ok(metadata)
    }

    fn extract_source(
        &self,
        path: &Path,
        source: &str,
        stage: ShaderStage,
    ) -> Result<ShaderMetadata, ExtractError> {
        let interface = source::scan(source, stage)?;

        let diagnostics = self.run(&self.tools.compiler, &[path.as_os_str()])?;
        Ok(ShaderMetadata::extracted(diagnostics, interface))
    }

    fn extract_linker_reflection(
        &self,
        path: &Path,
        source: &str,
        stage: ShaderStage,
    ) -> Result<ShaderMetadata, ExtractError> {
        if stage.is_raytracing() {
            return Err(ExtractError::UnsupportedStage {
                stage,
                backend: Backend::LinkerReflection,
            });
        }

        let args = [OsStr::new("-l"), OsStr::new("-q"), path.as_os_str()];
        let diagnostics = self.run(&self.tools.linker, &args)?;
        if diagnostics.exit_code != 0 {
            return Ok(ShaderMetadata::failed(diagnostics));
        }

        let interface = reflection::linker_reflection(&diagnostics.stdout, source, stage)?;
        Ok(ShaderMetadata::extracted(diagnostics, interface))
    }

    fn extract_spirv_reflection(
        &self,
        path: &Path,
        stage: ShaderStage,
    ) -> Result<ShaderMetadata, ExtractError> {
        std::fs::create_dir_all(&self.artifact_dir).map_err(|source| {
            ExtractError::ArtifactDir {
                path: self.artifact_dir.clone(),
                source,
            }
        })?;
        let artifact = self.artifact_path(path);

        let args = [
            OsStr::new("-V"),
            path.as_os_str(),
            OsStr::new("-o"),
            artifact.as_os_str(),
        ];
        let mut diagnostics = self.run(&self.tools.compiler, &args)?;
        if diagnostics.exit_code != 0 {
            return Ok(ShaderMetadata::failed(diagnostics));
        }

        let analysis = self.run(&self.tools.analyzer, &[artifact.as_os_str()])?;
        if analysis.exit_code != 0 {
            return Ok(ShaderMetadata::failed(analysis));
        }

        let interface = reflection::parse_analyzer_output(&analysis.stdout)?;
        if !analysis.stderr.is_empty() {
            if !diagnostics.stderr.is_empty() && !diagnostics.stderr.ends_with('\n') {
                diagnostics.stderr.push('\n');
            }
            diagnostics.stderr.push_str(&analysis.stderr);
        }
        debug!(
            "{} ({stage}): {} uniforms from spirv reflection",
            path.display(),
            interface.uniforms.len()
        );

        Ok(ShaderMetadata::extracted(diagnostics, interface))
    }

    /// `<artifact dir>/<shader file name>.spv`
    pub fn artifact_path(&self, path: &Path) -> PathBuf {
        let mut file_name = path.file_name().unwrap_or(path.as_os_str()).to_os_string();
        file_name.push(".spv");
        self.artifact_dir.join(file_name)
    }

    fn run(&self, program: &Path, args: &[&OsStr]) -> Result<Diagnostics, ExtractError> {
        trace!("running {} {args:?}", program.display());
        self.runner
            .run(program, args)
            .map_err(|source| ExtractError::LaunchTool {
                program: program.to_path_buf(),
                source,
            })
    }
}

fn unsupported(err: &ExtractError) -> ShaderMetadata {
    ShaderMetadata::failed(Diagnostics {
        stdout: String::new(),
        stderr: err.to_string(),
        exit_code: 1,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    const FRAGMENT_SOURCE: &str = "\
#version 330 core
struct Light { vec3 pos; float intensity; };
in vec2 TexCoords;
out vec4 FragColor; // in linear space
uniform sampler2D screenTexture;
uniform Light light;
void main()
{
    FragColor = texture(screenTexture, TexCoords) * light.intensity;
}";

    const FRAGMENT_DUMP: &str = "\
Uniform reflection:
screenTexture: offset -1, type 8b5e, size 1, index -1, binding -1, stages 16
light.intensity: offset -1, type 1406, size 1, index -1, binding -1, stages 16

Uniform block reflection:

Buffer variable reflection:

Buffer block reflection:

Pipeline input reflection:

Pipeline output reflection:
FragColor: offset 0, type 8b52, size 1, index 0, binding -1, stages 16
";

    fn extractor<F>(runner: F) -> Extractor<F>
    where
        F: Fn(&Path, &[&OsStr]) -> std::io::Result<Diagnostics>,
    {
        Extractor {
            tools: ToolPaths::default(),
            runner,
            artifact_dir: std::env::temp_dir().join("shader-meta-pipeline-tests"),
        }
    }

    fn succeed_with(
        stdout: &'static str,
    ) -> impl Fn(&Path, &[&OsStr]) -> std::io::Result<Diagnostics> {
        move |_program: &Path, _args: &[&OsStr]| Ok(Diagnostics::success(stdout, ""))
    }

    #[test]
    fn tool_failure_short_circuits() {
        let extractor = extractor(|_program: &Path, _args: &[&OsStr]| {
            Ok(Diagnostics {
                stdout: String::new(),
                stderr: "syntax error".to_string(),
                exit_code: 1,
            })
        });

        for backend in [
            Backend::Source,
            Backend::LinkerReflection,
            Backend::SpirvReflection,
        ] {
            let metadata = extractor
                .extract_text(Path::new("broken.frag"), FRAGMENT_SOURCE, backend)
                .unwrap();

            assert!(metadata.interface().is_none(), "{backend}");
            let json = serde_json::to_string(&metadata).unwrap();
            assert_eq!(
                json,
                r#"{"stdout":"","stderr":"syntax error","returncode":1}"#
            );
        }
    }

    #[test]
    fn source_backend() {
        let extractor = extractor(succeed_with(""));

        let metadata = extractor
            .extract_text(Path::new("post.frag"), FRAGMENT_SOURCE, Backend::Source)
            .unwrap();

        let uniform_names: Vec<_> = metadata.uniforms().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(
            uniform_names,
            vec!["screenTexture", "light.pos", "light.intensity"]
        );
        assert_eq!(
            metadata.in_attributes(),
            &[Attribute::new(TypeName::Vec2, "TexCoords")]
        );
        assert_eq!(
            metadata.out_attributes(),
            &[Attribute::new(TypeName::Vec4, "FragColor")]
        );
        assert_eq!(metadata.structs().len(), 1);
    }

    #[test]
    fn linker_backend_invocation() {
        let calls = RefCell::new(vec![]);
        let extractor = extractor(|program: &Path, args: &[&OsStr]| {
            calls.borrow_mut().push((program.to_path_buf(), args.len()));
            Ok(Diagnostics::success(FRAGMENT_DUMP, ""))
        });

        let metadata = extractor
            .extract_text(
                Path::new("post.frag"),
                FRAGMENT_SOURCE,
                Backend::LinkerReflection,
            )
            .unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![(PathBuf::from("glslangValidator"), 3)]
        );
        let uniform_names: Vec<_> = metadata.uniforms().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(uniform_names, vec!["screenTexture", "light.intensity"]);
        assert_eq!(metadata.uniforms()[0].type_name, TypeName::Sampler2D);
        assert_eq!(
            metadata.in_attributes(),
            &[Attribute::new(TypeName::Vec2, "TexCoords")]
        );
        assert_eq!(
            metadata.out_attributes(),
            &[Attribute::new(TypeName::Vec4, "FragColor")]
        );
        assert_eq!(metadata.diagnostics().stdout, FRAGMENT_DUMP);
    }

    #[test]
    fn raytracing_unsupported_by_linker_backend() {
        let calls = RefCell::new(0);
        let extractor = extractor(|_program: &Path, _args: &[&OsStr]| {
            *calls.borrow_mut() += 1;
            Ok(Diagnostics::default())
        });

        let metadata = extractor
            .extract_text(
                Path::new("shadow.rmiss"),
                "#version 460\nvoid main() {}",
                Backend::LinkerReflection,
            )
            .unwrap();

        assert_eq!(*calls.borrow(), 0);
        assert_eq!(metadata.diagnostics().exit_code, 1);
        assert!(metadata.diagnostics().stderr.contains("raytracing"));
        assert!(metadata.uniforms().is_empty());
        assert!(metadata.in_attributes().is_empty());
        assert!(metadata.out_attributes().is_empty());
        assert!(metadata.structs().is_empty());
    }

    #[test]
    fn spirv_backend_runs_compiler_then_analyzer() {
        let calls = RefCell::new(vec![]);
        let extractor = extractor(|program: &Path, args: &[&OsStr]| {
            calls.borrow_mut().push(program.to_path_buf());
            if program == Path::new("vk_shader_analyze") {
                assert!(args[0].to_string_lossy().ends_with("hit.rchit.spv"));
                let document = r#"{
                    "inputs": [],
                    "outputs": [],
                    "structs": [],
                    "uniforms": [
                        { "name": "topLevelAS", "type": 15, "type_name": "", "push_constant": false, "binding": 0 }
                    ]
                }"#;
                return Ok(Diagnostics::success(document, "warning: unused binding"));
            }
            Ok(Diagnostics::success("hit.rchit", "note: compiled"))
        });

        let metadata = extractor
            .extract_text(Path::new("hit.rchit"), "", Backend::SpirvReflection)
            .unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                PathBuf::from("glslangValidator"),
                PathBuf::from("vk_shader_analyze")
            ]
        );
        assert!(metadata.is_success());
        assert_eq!(metadata.uniforms()[0].type_name, TypeName::Undefined);
        assert_eq!(metadata.uniforms()[0].binding, Some(0));
        assert_eq!(metadata.diagnostics().stdout, "hit.rchit");
        assert_eq!(
            metadata.diagnostics().stderr,
            "note: compiled\nwarning: unused binding"
        );
    }

    #[test]
    fn malformed_analyzer_output_is_an_error() {
        let extractor = extractor(succeed_with("not json"));

        let result = extractor.extract_text(Path::new("a.vert"), "", Backend::SpirvReflection);

        assert!(matches!(result, Err(ExtractError::ReflectionDocument(_))));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let extractor = extractor(succeed_with(""));

        let result = extractor.extract_text(Path::new("notes.txt"), "", Backend::Source);

        assert!(matches!(result, Err(ExtractError::UnknownStage(_))));
    }

    #[test]
    fn launch_failure_is_an_error() {
        let extractor = extractor(|_program: &Path, _args: &[&OsStr]| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        });

        let result = extractor.extract_text(Path::new("a.vert"), "", Backend::Source);

        assert!(matches!(result, Err(ExtractError::LaunchTool { .. })));
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = extractor(succeed_with(FRAGMENT_DUMP));

        let first = extractor
            .extract_text(
                Path::new("post.frag"),
                FRAGMENT_SOURCE,
                Backend::LinkerReflection,
            )
            .unwrap();
        let second = extractor
            .extract_text(
                Path::new("post.frag"),
                FRAGMENT_SOURCE,
                Backend::LinkerReflection,
            )
            .unwrap();

        assert_eq!(
            first.to_json_string().unwrap(),
            second.to_json_string().unwrap()
        );
    }

    #[test]
    fn backend_names() {
        assert_eq!("linker".parse::<Backend>().unwrap(), Backend::LinkerReflection);
        assert_eq!("SPIRV".parse::<Backend>().unwrap(), Backend::SpirvReflection);
        assert!("hlsl".parse::<Backend>().is_err());
        assert_eq!(Backend::Source.to_string(), "source");
    }
}
