use std::fmt;
use std::path::{Path, PathBuf};

/// Every shader program the engine knows how to build.
///
/// Each kind names one fixed combination of stage sources, listed in the
/// [ShaderStandard](super::shader_standard::ShaderStandard) catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderKind {
    /// Camera/world/local transformation with texture coordinate passthrough
    TransformWithTextures,
    /// Camera/world/local transformation filled with a single color
    TransformWithSolidColor,
    /// Textured geometry lit with ambient and diffuse lighting
    TransformWithTexturesAmbientAndDiffuseLighting,
    /// Cube map sky, drawn without the camera translation
    Skybox,
    /// Screen-space text quads sampling a glyph atlas
    Text,
    /// Positions already in clip space, colored per vertex
    AbsolutePositionWithVertexColor,
    /// Solid color with a geometry stage that draws triangle edges
    TransformWithWireframe,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 7] = [
        ShaderKind::TransformWithTextures,
        ShaderKind::TransformWithSolidColor,
        ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting,
        ShaderKind::Skybox,
        ShaderKind::Text,
        ShaderKind::AbsolutePositionWithVertexColor,
        ShaderKind::TransformWithWireframe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShaderKind::TransformWithTextures => "TRANSFORM_WITH_TEXTURES",
            ShaderKind::TransformWithSolidColor => "TRANSFORM_WITH_SOLID_COLOR",
            ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting => {
                "TRANSFORM_WITH_TEXTURES_AMBIENT_AND_DIFFUSE_LIGHTING"
            }
            ShaderKind::Skybox => "SKYBOX",
            ShaderKind::Text => "TEXT",
            ShaderKind::AbsolutePositionWithVertexColor => "ABSOLUTE_POSITION_WITH_VERTEX_COLOR",
            ShaderKind::TransformWithWireframe => "TRANSFORM_WITH_WIREFRAME",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Programmable pipeline stages a catalog entry can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-vertex inputs, named the same way in every shader source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexAttributeVariable {
    Position,
    PassthroughTextureCoordinate,
    Normal,
    XyPosition,
    VertexColor,
}

impl VertexAttributeVariable {
    pub const ALL: [VertexAttributeVariable; 5] = [
        VertexAttributeVariable::Position,
        VertexAttributeVariable::PassthroughTextureCoordinate,
        VertexAttributeVariable::Normal,
        VertexAttributeVariable::XyPosition,
        VertexAttributeVariable::VertexColor,
    ];
}

/// Shader globals, named the same way in every shader source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UniformVariable {
    CameraToClip,
    WorldToCamera,
    LocalToWorld,
    RgbaColor,
    AmbientLightStrength,
    AmbientLightColor,
    DiffuseLightPosition,
    PointLightPositions,
    TextureSampler,
    SkyboxTextureUnit,
    TextColor,
    UseLighting,
    ScreenSize,
    TextureTransform,
    UvRotation,
}

impl UniformVariable {
    pub const ALL: [UniformVariable; 15] = [
        UniformVariable::CameraToClip,
        UniformVariable::WorldToCamera,
        UniformVariable::LocalToWorld,
        UniformVariable::RgbaColor,
        UniformVariable::AmbientLightStrength,
        UniformVariable::AmbientLightColor,
        UniformVariable::DiffuseLightPosition,
        UniformVariable::PointLightPositions,
        UniformVariable::TextureSampler,
        UniformVariable::SkyboxTextureUnit,
        UniformVariable::TextColor,
        UniformVariable::UseLighting,
        UniformVariable::ScreenSize,
        UniformVariable::TextureTransform,
        UniformVariable::UvRotation,
    ];
}

/// Where the stage sources of a shader kind live, relative to the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSourceSpec {
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
    /// No geometry stage when `None`
    pub geometry_path: Option<PathBuf>,
}

impl ShaderSourceSpec {
    pub fn new(vertex_path: impl Into<PathBuf>, fragment_path: impl Into<PathBuf>) -> Self {
        ShaderSourceSpec {
            vertex_path: vertex_path.into(),
            fragment_path: fragment_path.into(),
            geometry_path: None,
        }
    }

    pub fn with_geometry(mut self, geometry_path: impl Into<PathBuf>) -> Self {
        self.geometry_path = Some(geometry_path.into());
        self
    }

    /// Stages in the order they get compiled and attached
    pub fn stages(&self) -> Vec<(ShaderStage, &Path)> {
        let mut stages = vec![
            (ShaderStage::Vertex, self.vertex_path.as_path()),
            (ShaderStage::Fragment, self.fragment_path.as_path()),
        ];
        if let Some(geometry_path) = &self.geometry_path {
            stages.push((ShaderStage::Geometry, geometry_path.as_path()));
        }
        stages
    }
}

/// Scalar type of each component of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Float,
    Int,
    UnsignedInt,
    UnsignedByte,
}

impl ScalarType {
    /// Size in bytes of a single component
    pub fn get_size(&self) -> u32 {
        match self {
            ScalarType::Float | ScalarType::Int | ScalarType::UnsignedInt => 4,
            ScalarType::UnsignedByte => 1,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, ScalarType::Float)
    }
}

/// How a vertex buffer feeds one attribute slot.
///
/// A stride of 0 means tightly packed: the next vertex starts right after
/// the current one's components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeLayout {
    pub components: u32,
    pub scalar_type: ScalarType,
    pub normalize: bool,
    pub stride: u32,
    pub offset: u32,
}

impl VertexAttributeLayout {
    /// Tightly packed floats starting at the beginning of the buffer
    pub const fn packed_floats(components: u32) -> Self {
        VertexAttributeLayout {
            components,
            scalar_type: ScalarType::Float,
            normalize: false,
            stride: 0,
            offset: 0,
        }
    }

    /// Size in bytes of one attribute value
    pub fn get_size(&self) -> u32 {
        self.components * self.scalar_type.get_size()
    }
}
