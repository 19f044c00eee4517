use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A shader type, either captured literally from source or translated from a reflection type code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeName {
    Float,
    Int,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    IVec3,
    IVec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,
    Image2D,
    Void,
    /// a reflection type code with no table entry
    Undefined,
    /// any other captured type token, usually a struct name
    Custom(String),
}

impl TypeName {
    pub fn parse(token: &str) -> Self {
        match token {
            "float" => Self::Float,
            "int" => Self::Int,
            "bool" => Self::Bool,
            "vec2" => Self::Vec2,
            "vec3" => Self::Vec3,
            "vec4" => Self::Vec4,
            "ivec2" => Self::IVec2,
            "ivec3" => Self::IVec3,
            "ivec4" => Self::IVec4,
            "mat2" => Self::Mat2,
            "mat3" => Self::Mat3,
            "mat4" => Self::Mat4,
            "sampler2D" => Self::Sampler2D,
            "samplerCube" => Self::SamplerCube,
            "image2D" => Self::Image2D,
            "void" => Self::Void,
            "" | "undefined" => Self::Undefined,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::IVec2 => "ivec2",
            Self::IVec3 => "ivec3",
            Self::IVec4 => "ivec4",
            Self::Mat2 => "mat2",
            Self::Mat3 => "mat3",
            Self::Mat4 => "mat4",
            Self::Sampler2D => "sampler2D",
            Self::SamplerCube => "samplerCube",
            Self::Image2D => "image2D",
            Self::Void => "void",
            Self::Undefined => "undefined",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            Self::Custom(_) => Self::Custom(value),
            known => known,
        }
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        match value {
            TypeName::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `in` or `out` interface variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub type_name: TypeName,
    pub name: String,
    /// only set by an explicit `layout(location = N)`; absent is not location 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<u32>,
}

impl Attribute {
    pub fn new(type_name: TypeName, name: impl Into<String>) -> Self {
        Self {
            type_name,
            name: name.into(),
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uniform {
    pub type_name: TypeName,
    pub name: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<i32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub push_constant: bool,
}

impl Uniform {
    pub fn new(type_name: TypeName, name: impl Into<String>) -> Self {
        Self {
            type_name,
            name: name.into(),
            count: default_count(),
            binding: None,
            push_constant: false,
        }
    }
}

fn default_count() -> u32 {
    1
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructMember {
    pub type_name: TypeName,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    /// declaration order
    #[serde(rename = "attributes")]
    pub members: Vec<StructMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<u32>,
}

impl StructDef {
    pub fn new(name: impl Into<String>, members: Vec<StructMember>) -> Self {
        Self {
            name: name.into(),
            members,
            size: None,
            alignment: None,
        }
    }
}

/// Output streams and exit code of the external tool that gated extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub stdout: String,
    pub stderr: String,
    #[serde(rename = "returncode")]
    pub exit_code: i32,
}

impl Diagnostics {
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderInterface {
    pub uniforms: Vec<Uniform>,
    pub in_attributes: Vec<Attribute>,
    pub out_attributes: Vec<Attribute>,
    pub structs: Vec<StructDef>,
}

impl ShaderInterface {
    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
            && self.in_attributes.is_empty()
            && self.out_attributes.is_empty()
            && self.structs.is_empty()
    }

    /// names declared more than once within the same list, as (list, name)
    ///
    /// re-declarations are appended rather than merged, so these are reported but kept
    pub fn duplicate_names(&self) -> Vec<(&'static str, &str)> {
        let mut duplicates = vec![];
        let lists: [(&'static str, Vec<&str>); 3] = [
            (
                "uniforms",
                self.uniforms.iter().map(|u| u.name.as_str()).collect(),
            ),
            (
                "in_attributes",
                self.in_attributes.iter().map(|a| a.name.as_str()).collect(),
            ),
            (
                "out_attributes",
                self.out_attributes.iter().map(|a| a.name.as_str()).collect(),
            ),
        ];

        for (list_name, names) in lists {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            for name in names {
                if !seen.insert(name) && reported.insert(name) {
                    duplicates.push((list_name, name));
                }
            }
        }

        duplicates
    }
}

/// The metadata document for one shader file
///
/// When the gating tool failed, only the diagnostics are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderMetadata {
    #[serde(flatten)]
    diagnostics: Diagnostics,
    #[serde(flatten)]
    interface: Option<ShaderInterface>,
}

impl ShaderMetadata {
    pub fn extracted(diagnostics: Diagnostics, interface: ShaderInterface) -> Self {
        if diagnostics.exit_code != 0 {
            return Self::failed(diagnostics);
        }

        Self {
            diagnostics,
            interface: Some(interface),
        }
    }

    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            interface: None,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn interface(&self) -> Option<&ShaderInterface> {
        self.interface.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.diagnostics.exit_code == 0
    }

    pub fn uniforms(&self) -> &[Uniform] {
        match &self.interface {
            Some(interface) => &interface.uniforms,
            None => &[],
        }
    }

    pub fn in_attributes(&self) -> &[Attribute] {
        match &self.interface {
            Some(interface) => &interface.in_attributes,
            None => &[],
        }
    }

    pub fn out_attributes(&self) -> &[Attribute] {
        match &self.interface {
            Some(interface) => &interface.out_attributes,
            None => &[],
        }
    }

    pub fn structs(&self) -> &[StructDef] {
        match &self.interface {
            Some(interface) => &interface.structs,
            None => &[],
        }
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
