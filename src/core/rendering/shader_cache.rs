//! A shader cache is the single owner of every shader program the renderer
//! uses. The user picks which kinds to build up front; each one is compiled
//! and linked exactly once, and drawables select the program they need from
//! here instead of building their own.
//!
//! Variable names follow the [ShaderStandard], so attributes and uniforms are
//! addressed by enum and resolved to their source-code names internally.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::{cache_debug, cache_error, cache_info, cache_warn};
use shader_cache::core::log::{DefaultLogger, Logger};
use shader_cache::core::rendering::error::{ShaderCacheError, ShaderCacheResult};
use shader_cache::core::rendering::render_api::{GraphicsBackend, UNIFORM_NOT_PRESENT};
use shader_cache::core::rendering::shader::{
    ShaderKind, ShaderStage, UniformVariable, VertexAttributeLayout, VertexAttributeVariable,
};
use shader_cache::core::rendering::shader_standard::ShaderStandard;
use shader_cache::core::rendering::source::{FileSystemShaderSourceReader, ShaderSourceReader};

/// Owns the compiled programs for the requested shader kinds.
///
/// Not meant to be shared between threads: every method talks to the
/// graphics context, which must be current on the calling thread.
/// Dropping the cache deletes every program it created.
pub struct ShaderCache<B: GraphicsBackend> {
    backend: B,
    standard: Arc<ShaderStandard>,
    logger: Arc<dyn Logger>,
    created_programs: HashMap<ShaderKind, B::Program>,
}

impl<B: GraphicsBackend> ShaderCache<B> {
    /// Builds a program for every requested kind.
    ///
    /// Duplicate requests are built once. A kind missing from the catalog
    /// aborts construction; programs built so far are released. Unreadable
    /// sources, compile and link failures are only logged: the program is
    /// still cached, it just won't render correctly.
    pub fn new(
        backend: B,
        standard: Arc<ShaderStandard>,
        reader: &dyn ShaderSourceReader,
        logger: Arc<dyn Logger>,
        requested_shaders: &[ShaderKind],
    ) -> ShaderCacheResult<Self> {
        let mut cache = ShaderCache {
            backend,
            standard,
            logger,
            created_programs: HashMap::new(),
        };

        for kind in requested_shaders {
            cache.create_shader_program(*kind, reader)?;
        }
        cache.log_shader_program_info();

        Ok(cache)
    }

    pub fn builder(backend: B) -> ShaderCacheBuilder<B> {
        ShaderCacheBuilder::new(backend)
    }

    #[inline(always)]
    pub fn get_backend(&self) -> &B {
        &self.backend
    }

    #[inline(always)]
    pub fn get_standard(&self) -> &ShaderStandard {
        &self.standard
    }

    /// Program created for `kind`
    pub fn get_program(&self, kind: ShaderKind) -> ShaderCacheResult<B::Program> {
        self.created_programs
            .get(&kind)
            .copied()
            .ok_or(ShaderCacheError::ProgramNotFound(kind))
    }

    #[inline(always)]
    pub fn contains(&self, kind: ShaderKind) -> bool {
        self.created_programs.contains_key(&kind)
    }

    #[inline(always)]
    pub fn program_count(&self) -> usize {
        self.created_programs.len()
    }

    /// Kinds with a program, in declaration order
    pub fn created_kinds(&self) -> Vec<ShaderKind> {
        let mut kinds: Vec<ShaderKind> = self.created_programs.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Makes the program of `kind` the active one. Whatever program was
    /// active before is no longer.
    pub fn use_program(&self, kind: ShaderKind) -> ShaderCacheResult<()> {
        let program = self.get_program(kind)?;
        self.backend.use_program(Some(program));
        Ok(())
    }

    pub fn stop_using_program(&self) {
        self.backend.use_program(None);
    }

    /// Describes to `vertex_array` how `attribute` is read from `vertex_buffer`
    /// for the program of `kind`. Leaves no vertex array bound.
    ///
    /// The attribute is expected to be declared by the vertex stage of `kind`;
    /// that is not checked here.
    pub fn configure_attribute(
        &self,
        vertex_array: B::VertexArray,
        vertex_buffer: B::Buffer,
        kind: ShaderKind,
        attribute: VertexAttributeVariable,
    ) -> ShaderCacheResult<()> {
        let layout = *self.get_vertex_attribute_layout(attribute)?;
        let name = self.get_vertex_attribute_name(attribute)?;
        let program = self.get_program(kind)?;

        self.backend.bind_vertex_array(Some(vertex_array));
        self.backend.bind_array_buffer(Some(vertex_buffer));

        cache_info!(self.logger, "Binding vertex attribute {}", name);

        match self.backend.get_attribute_location(program, name) {
            Some(location) => {
                self.backend.enable_vertex_attribute(location);
                self.backend.vertex_attribute_pointer(location, &layout);
            }
            None => {
                // The driver drops inputs the shader never reads
                cache_warn!(
                    self.logger,
                    "Vertex attribute '{}' is not active in shader program {}",
                    name,
                    kind
                );
            }
        }

        self.backend.bind_vertex_array(None);
        Ok(())
    }

    /// Configures every attribute the vertex stage of `kind` declares
    pub fn configure_attributes_for_kind(
        &self,
        vertex_array: B::VertexArray,
        vertex_buffer: B::Buffer,
        kind: ShaderKind,
    ) -> ShaderCacheResult<()> {
        for attribute in self.get_used_vertex_attributes(kind)? {
            self.configure_attribute(vertex_array, vertex_buffer, kind, *attribute)?;
        }
        Ok(())
    }

    pub fn get_used_vertex_attributes(
        &self,
        kind: ShaderKind,
    ) -> ShaderCacheResult<&[VertexAttributeVariable]> {
        self.standard.get_used_attributes(kind).ok_or_else(|| {
            cache_error!(
                self.logger,
                "The shader type {} doesn't have a used vertex attribute list",
                kind
            );
            ShaderCacheError::NoAttributeList(kind)
        })
    }

    pub fn get_vertex_attribute_layout(
        &self,
        attribute: VertexAttributeVariable,
    ) -> ShaderCacheResult<&VertexAttributeLayout> {
        self.standard
            .get_attribute(attribute)
            .map(|descriptor| &descriptor.layout)
            .ok_or_else(|| self.unknown_attribute(attribute))
    }

    pub fn get_vertex_attribute_name(
        &self,
        attribute: VertexAttributeVariable,
    ) -> ShaderCacheResult<&str> {
        self.standard
            .get_attribute(attribute)
            .map(|descriptor| descriptor.name.as_str())
            .ok_or_else(|| self.unknown_attribute(attribute))
    }

    /// Source-code name of `uniform`, or an empty string when the standard
    /// doesn't register it
    pub fn get_uniform_name(&self, uniform: UniformVariable) -> &str {
        match self.standard.get_uniform_name(uniform) {
            Some(name) => name,
            None => {
                cache_warn!(
                    self.logger,
                    "Uniform variable {:?} not found in allowed names",
                    uniform
                );
                ""
            }
        }
    }

    /// Location of `uniform` in the program of `kind`, or [UNIFORM_NOT_PRESENT].
    ///
    /// Doesn't change the active program.
    pub fn get_uniform_location(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
    ) -> ShaderCacheResult<i32> {
        let program = self.get_program(kind)?;
        let name = self.get_uniform_name(uniform);

        // An unnamed uniform can't be active; don't ask the driver
        let location = if name.is_empty() {
            UNIFORM_NOT_PRESENT
        } else {
            self.backend.get_uniform_location(program, name)
        };

        if location == UNIFORM_NOT_PRESENT {
            cache_error!(
                self.logger,
                "Uniform '{}' not found in shader program {}",
                name,
                kind
            );
        }
        Ok(location)
    }

    pub fn set_uniform_bool(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: bool,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_i32(location, value as i32)
        })
    }

    pub fn set_uniform_i32(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: i32,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_i32(location, value)
        })
    }

    pub fn set_uniform_f32(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: f32,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_f32(location, value)
        })
    }

    pub fn set_uniform_vec2(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: &Vec2,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_fvec2(location, value)
        })
    }

    pub fn set_uniform_vec3(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: &Vec3,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_fvec3(location, value)
        })
    }

    pub fn set_uniform_vec4(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: &Vec4,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_fvec4(location, value)
        })
    }

    /// Uploads `values` to a `vec4` array uniform. An empty slice is
    /// rejected with a warning and nothing is written.
    pub fn set_uniform_vec4_array(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        values: &[Vec4],
    ) -> ShaderCacheResult<()> {
        if values.is_empty() {
            cache_warn!(
                self.logger,
                "Refusing to set uniform {:?} of shader program {} from an empty array",
                uniform,
                kind
            );
            return Ok(());
        }
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_fvec4_array(location, values)
        })
    }

    pub fn set_uniform_mat2(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: &Mat2,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_fmat2(location, value)
        })
    }

    pub fn set_uniform_mat3(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: &Mat3,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_fmat3(location, value)
        })
    }

    pub fn set_uniform_mat4(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        value: &Mat4,
    ) -> ShaderCacheResult<()> {
        self.with_active_location(kind, uniform, |location| {
            self.backend.set_uniform_fmat4(location, value)
        })
    }

    /// Logs how many programs exist and which handle belongs to each kind
    pub fn log_shader_program_info(&self) {
        cache_info!(self.logger, "Logging Created Shaders:");
        cache_info!(self.logger, "Total shaders: {}", self.created_programs.len());
        for kind in self.created_kinds() {
            cache_info!(
                self.logger,
                "Shader Type: {}, Program ID: {:?}",
                kind,
                self.created_programs[&kind]
            );
        }
    }

    /// Activates the program of `kind` and runs `write` with the uniform
    /// location, unless the uniform isn't present.
    fn with_active_location<F>(
        &self,
        kind: ShaderKind,
        uniform: UniformVariable,
        write: F,
    ) -> ShaderCacheResult<()>
    where
        F: FnOnce(i32),
    {
        self.use_program(kind)?;
        let location = self.get_uniform_location(kind, uniform)?;
        if location != UNIFORM_NOT_PRESENT {
            write(location);
        }
        Ok(())
    }

    fn unknown_attribute(&self, attribute: VertexAttributeVariable) -> ShaderCacheError {
        cache_error!(
            self.logger,
            "The vertex attribute variable {:?} doesn't have a layout and name in the shader standard",
            attribute
        );
        ShaderCacheError::UnknownAttribute(attribute)
    }

    fn create_shader_program(
        &mut self,
        kind: ShaderKind,
        reader: &dyn ShaderSourceReader,
    ) -> ShaderCacheResult<()> {
        if self.created_programs.contains_key(&kind) {
            cache_debug!(self.logger, "Shader program {} already created", kind);
            return Ok(());
        }

        let standard = self.standard.clone();
        let source_spec = standard.get_source_spec(kind).ok_or_else(|| {
            cache_error!(self.logger, "Shader type {} not found in the catalog", kind);
            ShaderCacheError::KindNotInCatalog(kind)
        })?;

        cache_info!(self.logger, "creating new shader program {}", kind);

        let program = self
            .backend
            .create_program()
            .map_err(ShaderCacheError::Backend)?;

        let mut stage_shaders = Vec::with_capacity(3);
        let mut attach_result = Ok(());
        for (stage, path) in source_spec.stages() {
            match self.attach_shader(program, kind, stage, path, reader) {
                Ok(shader) => stage_shaders.push(shader),
                Err(err) => {
                    attach_result = Err(err);
                    break;
                }
            }
        }

        if attach_result.is_ok() {
            if let Err(info_log) = self.backend.link_program(program) {
                cache_error!(
                    self.logger,
                    "Linking shader program {} failed: {}",
                    kind,
                    info_log
                );
            }
        }

        // Stage objects aren't needed once linking has been attempted
        for shader in stage_shaders {
            self.backend.delete_shader(shader);
        }

        if let Err(err) = attach_result {
            self.backend.delete_program(program);
            return Err(err);
        }

        self.created_programs.insert(kind, program);
        Ok(())
    }

    /// Reads, compiles and attaches one stage. Read and compile failures are
    /// logged and the (broken) shader is attached anyway.
    fn attach_shader(
        &self,
        program: B::Program,
        kind: ShaderKind,
        stage: ShaderStage,
        path: &Path,
        reader: &dyn ShaderSourceReader,
    ) -> ShaderCacheResult<B::Shader> {
        let source = reader.read_source(path).unwrap_or_else(|err| {
            cache_error!(
                self.logger,
                "Could not read {} shader source {} for {}: {}",
                stage,
                path.display(),
                kind,
                err
            );
            String::new()
        });

        let shader = self
            .backend
            .create_shader(stage)
            .map_err(ShaderCacheError::Backend)?;

        if let Err(info_log) = self.backend.compile_shader(shader, &source) {
            cache_error!(
                self.logger,
                "Compiling {} shader {} for {} failed: {}",
                stage,
                path.display(),
                kind,
                info_log
            );
        }

        self.backend.attach_shader(program, shader);
        Ok(shader)
    }
}

impl<B: GraphicsBackend> Drop for ShaderCache<B> {
    fn drop(&mut self) {
        for (_, program) in self.created_programs.drain() {
            self.backend.delete_program(program);
        }
    }
}

/// Assembles a [ShaderCache], defaulting to the built-in standard, sources
/// read from disk under the configured root and the [DefaultLogger].
pub struct ShaderCacheBuilder<B: GraphicsBackend> {
    backend: B,
    standard: Option<Arc<ShaderStandard>>,
    reader: Option<Box<dyn ShaderSourceReader>>,
    logger: Option<Arc<dyn Logger>>,
}

impl<B: GraphicsBackend> ShaderCacheBuilder<B> {
    pub fn new(backend: B) -> Self {
        ShaderCacheBuilder {
            backend,
            standard: None,
            reader: None,
            logger: None,
        }
    }

    pub fn with_standard(mut self, standard: Arc<ShaderStandard>) -> Self {
        self.standard = Some(standard);
        self
    }

    pub fn with_source_reader(mut self, reader: impl ShaderSourceReader + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self, requested_shaders: &[ShaderKind]) -> ShaderCacheResult<ShaderCache<B>> {
        let standard = self.standard.unwrap_or_else(ShaderStandard::builtin);
        let reader = self
            .reader
            .unwrap_or_else(|| Box::new(FileSystemShaderSourceReader::from_env()));
        let logger = self.logger.unwrap_or_else(|| Arc::new(DefaultLogger));

        ShaderCache::new(
            self.backend,
            standard,
            reader.as_ref(),
            logger,
            requested_shaders,
        )
    }
}
