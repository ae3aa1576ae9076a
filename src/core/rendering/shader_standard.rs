//! The shader standard: one immutable registry describing how every shader
//! kind is built and how its inputs are named in source files.
//!
//! Following the standard means a variable name in any `.vert`/`.frag`/`.geom`
//! file tells you exactly what it holds: `camera_to_clip` is always the
//! projection matrix, `position` always the object-space vertex position.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use shader_cache::core::rendering::error::{ShaderCacheError, ShaderCacheResult};
use shader_cache::core::rendering::shader::{
    ShaderKind, ShaderSourceSpec, UniformVariable, VertexAttributeLayout, VertexAttributeVariable,
};

lazy_static! {
    static ref BUILTIN_STANDARD: Arc<ShaderStandard> = Arc::new(ShaderStandard::default());
}

/// Name and memory layout of a vertex attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub layout: VertexAttributeLayout,
}

#[derive(Debug, Clone)]
pub struct ShaderStandard {
    catalog: HashMap<ShaderKind, ShaderSourceSpec>,
    used_attributes: HashMap<ShaderKind, Vec<VertexAttributeVariable>>,
    attributes: HashMap<VertexAttributeVariable, AttributeDescriptor>,
    uniform_names: HashMap<UniformVariable, String>,
}

impl ShaderStandard {
    /// Shared instance of the built-in standard
    pub fn builtin() -> Arc<ShaderStandard> {
        BUILTIN_STANDARD.clone()
    }

    pub fn builder() -> ShaderStandardBuilder {
        ShaderStandardBuilder::default()
    }

    #[inline(always)]
    pub fn get_source_spec(&self, kind: ShaderKind) -> Option<&ShaderSourceSpec> {
        self.catalog.get(&kind)
    }

    #[inline(always)]
    pub fn get_used_attributes(&self, kind: ShaderKind) -> Option<&[VertexAttributeVariable]> {
        self.used_attributes.get(&kind).map(Vec::as_slice)
    }

    #[inline(always)]
    pub fn get_attribute(&self, attribute: VertexAttributeVariable) -> Option<&AttributeDescriptor> {
        self.attributes.get(&attribute)
    }

    #[inline(always)]
    pub fn get_uniform_name(&self, uniform: UniformVariable) -> Option<&str> {
        self.uniform_names.get(&uniform).map(String::as_str)
    }

    pub fn catalog_kinds(&self) -> impl Iterator<Item = ShaderKind> + '_ {
        self.catalog.keys().copied()
    }

    /// Checks that the tables agree with each other: every cataloged kind
    /// lists its attributes, every listed attribute has a descriptor, every
    /// descriptor has a name and 2 to 4 components, every uniform a name.
    pub fn validate(&self) -> ShaderCacheResult<()> {
        for kind in self.catalog.keys() {
            let used = self
                .used_attributes
                .get(kind)
                .ok_or(ShaderCacheError::NoAttributeList(*kind))?;
            for attribute in used {
                if !self.attributes.contains_key(attribute) {
                    return Err(ShaderCacheError::InvalidStandard(format!(
                        "{} uses {:?}, which has no layout",
                        kind, attribute
                    )));
                }
            }
        }

        for (attribute, descriptor) in self.attributes.iter() {
            if descriptor.name.is_empty() {
                return Err(ShaderCacheError::InvalidStandard(format!(
                    "{:?} has an empty name",
                    attribute
                )));
            }
            if !(2..=4).contains(&descriptor.layout.components) {
                return Err(ShaderCacheError::InvalidStandard(format!(
                    "{:?} has {} components, expected 2 to 4",
                    attribute, descriptor.layout.components
                )));
            }
        }

        if let Some((uniform, _)) = self.uniform_names.iter().find(|(_, name)| name.is_empty()) {
            return Err(ShaderCacheError::InvalidStandard(format!(
                "{:?} has an empty name",
                uniform
            )));
        }

        Ok(())
    }
}

impl Default for ShaderStandard {
    /// The engine's built-in standard, covering every kind and variable
    fn default() -> Self {
        ShaderStandard {
            catalog: ShaderKind::ALL
                .iter()
                .map(|kind| (*kind, builtin_source_spec(*kind)))
                .collect(),
            used_attributes: ShaderKind::ALL
                .iter()
                .map(|kind| (*kind, builtin_used_attributes(*kind).to_vec()))
                .collect(),
            attributes: VertexAttributeVariable::ALL
                .iter()
                .map(|attribute| (*attribute, builtin_attribute(*attribute)))
                .collect(),
            uniform_names: UniformVariable::ALL
                .iter()
                .map(|uniform| (*uniform, builtin_uniform_name(*uniform).to_string()))
                .collect(),
        }
    }
}

/// Builds custom standards, for applications shipping their own shaders.
///
/// Registering the same kind, attribute or uniform twice is an error
/// reported by [ShaderStandardBuilder::build].
#[derive(Debug, Default)]
pub struct ShaderStandardBuilder {
    catalog: HashMap<ShaderKind, ShaderSourceSpec>,
    used_attributes: HashMap<ShaderKind, Vec<VertexAttributeVariable>>,
    attributes: HashMap<VertexAttributeVariable, AttributeDescriptor>,
    uniform_names: HashMap<UniformVariable, String>,
    errors: Vec<ShaderCacheError>,
}

impl ShaderStandardBuilder {
    /// Starts with every built-in attribute and uniform registered, and an
    /// empty catalog
    pub fn with_builtin_variables() -> Self {
        let builtin = ShaderStandard::default();
        ShaderStandardBuilder {
            attributes: builtin.attributes,
            uniform_names: builtin.uniform_names,
            ..Default::default()
        }
    }

    /// Registers a catalog entry along with the attributes its vertex stage declares
    pub fn program(
        mut self,
        kind: ShaderKind,
        source_spec: ShaderSourceSpec,
        used_attributes: &[VertexAttributeVariable],
    ) -> Self {
        if self.catalog.contains_key(&kind) {
            self.errors.push(ShaderCacheError::DuplicateCatalogEntry(kind));
            return self;
        }
        self.catalog.insert(kind, source_spec);
        self.used_attributes.insert(kind, used_attributes.to_vec());
        self
    }

    pub fn attribute(
        mut self,
        attribute: VertexAttributeVariable,
        name: &str,
        layout: VertexAttributeLayout,
    ) -> Self {
        let descriptor = AttributeDescriptor {
            name: name.to_string(),
            layout,
        };
        if self.attributes.insert(attribute, descriptor).is_some() {
            self.errors.push(ShaderCacheError::InvalidStandard(format!(
                "{:?} registered twice",
                attribute
            )));
        }
        self
    }

    pub fn uniform(mut self, uniform: UniformVariable, name: &str) -> Self {
        if self.uniform_names.insert(uniform, name.to_string()).is_some() {
            self.errors.push(ShaderCacheError::InvalidStandard(format!(
                "{:?} registered twice",
                uniform
            )));
        }
        self
    }

    pub fn build(self) -> ShaderCacheResult<ShaderStandard> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        let standard = ShaderStandard {
            catalog: self.catalog,
            used_attributes: self.used_attributes,
            attributes: self.attributes,
            uniform_names: self.uniform_names,
        };
        standard.validate()?;
        Ok(standard)
    }
}

// Built-in tables. Exhaustive matches: a new variant without an entry here
// does not compile.

fn builtin_source_spec(kind: ShaderKind) -> ShaderSourceSpec {
    match kind {
        ShaderKind::TransformWithTextures => {
            ShaderSourceSpec::new("transform_with_texture_passthrough.vert", "textured.frag")
        }
        ShaderKind::TransformWithSolidColor => {
            ShaderSourceSpec::new("transform.vert", "solid_color.frag")
        }
        ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting => ShaderSourceSpec::new(
            "transform_with_normals_and_texture_passthrough.vert",
            "textured_with_ambient_and_diffuse_lighting.frag",
        ),
        ShaderKind::Skybox => ShaderSourceSpec::new("skybox.vert", "skybox.frag"),
        ShaderKind::Text => ShaderSourceSpec::new("text.vert", "text.frag"),
        ShaderKind::AbsolutePositionWithVertexColor => ShaderSourceSpec::new(
            "absolute_position_with_vertex_color.vert",
            "vertex_color.frag",
        ),
        ShaderKind::TransformWithWireframe => {
            ShaderSourceSpec::new("transform.vert", "wireframe.frag").with_geometry("wireframe.geom")
        }
    }
}

// TODO: derive these by scanning the vertex sources for `in` declarations
fn builtin_used_attributes(kind: ShaderKind) -> &'static [VertexAttributeVariable] {
    use VertexAttributeVariable::*;
    match kind {
        ShaderKind::TransformWithTextures => &[Position, PassthroughTextureCoordinate],
        ShaderKind::TransformWithSolidColor => &[Position],
        ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting => {
            &[Position, PassthroughTextureCoordinate, Normal]
        }
        ShaderKind::Skybox => &[Position],
        ShaderKind::Text => &[XyPosition, PassthroughTextureCoordinate],
        ShaderKind::AbsolutePositionWithVertexColor => &[Position, VertexColor],
        ShaderKind::TransformWithWireframe => &[Position],
    }
}

fn builtin_attribute(attribute: VertexAttributeVariable) -> AttributeDescriptor {
    let (name, components) = match attribute {
        VertexAttributeVariable::Position => ("position", 3),
        VertexAttributeVariable::PassthroughTextureCoordinate => ("passthrough_texture_position", 2),
        VertexAttributeVariable::Normal => ("normal", 3),
        VertexAttributeVariable::XyPosition => ("xy_position", 2),
        VertexAttributeVariable::VertexColor => ("vertex_color", 4),
    };
    AttributeDescriptor {
        name: name.to_string(),
        layout: VertexAttributeLayout::packed_floats(components),
    }
}

fn builtin_uniform_name(uniform: UniformVariable) -> &'static str {
    match uniform {
        UniformVariable::CameraToClip => "camera_to_clip",
        UniformVariable::WorldToCamera => "world_to_camera",
        UniformVariable::LocalToWorld => "local_to_world",
        UniformVariable::RgbaColor => "rgba_color",
        UniformVariable::AmbientLightStrength => "ambient_light_strength",
        UniformVariable::AmbientLightColor => "ambient_light_color",
        UniformVariable::DiffuseLightPosition => "diffuse_light_position",
        UniformVariable::PointLightPositions => "point_light_positions",
        UniformVariable::TextureSampler => "texture_sampler",
        UniformVariable::SkyboxTextureUnit => "skybox_texture_unit",
        UniformVariable::TextColor => "text_color",
        UniformVariable::UseLighting => "use_lighting",
        UniformVariable::ScreenSize => "screen_size",
        UniformVariable::TextureTransform => "texture_transform",
        UniformVariable::UvRotation => "uv_rotation",
    }
}
