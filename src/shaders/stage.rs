use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
    RayGen,
    RayMiss,
    RayClosestHit,
    RayIntersection,
    RayAnyHit,
    RayCallable,
    Unknown,
}

impl ShaderStage {
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "vert" => Self::Vertex,
            "frag" => Self::Fragment,
            "comp" => Self::Compute,
            "rgen" => Self::RayGen,
            "rmiss" => Self::RayMiss,
            "rchit" => Self::RayClosestHit,
            "rint" => Self::RayIntersection,
            "rahit" => Self::RayAnyHit,
            "rcall" => Self::RayCallable,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    pub fn is_raytracing(self) -> bool {
        matches!(
            self,
            Self::RayGen
                | Self::RayMiss
                | Self::RayClosestHit
                | Self::RayIntersection
                | Self::RayAnyHit
                | Self::RayCallable
        )
    }

    /// whether `in`/`out` interface variables exist for this stage
    pub fn has_attributes(self) -> bool {
        !(self == Self::Compute || self.is_raytracing())
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
            Self::RayGen => "ray generation",
            Self::RayMiss => "ray miss",
            Self::RayClosestHit => "ray closest-hit",
            Self::RayIntersection => "ray intersection",
            Self::RayAnyHit => "ray any-hit",
            Self::RayCallable => "ray callable",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
