pub use crate::core::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
pub use crate::core::platform::opengl::opengl_render_backend::OpenGLRenderBackend;
pub use crate::core::rendering::error::{ShaderCacheError, ShaderCacheResult};
pub use crate::core::rendering::render_api::{GraphicsBackend, UNIFORM_NOT_PRESENT};
pub use crate::core::rendering::shader::{
    ScalarType, ShaderKind, ShaderSourceSpec, ShaderStage, UniformVariable,
    VertexAttributeLayout, VertexAttributeVariable,
};
pub use crate::core::rendering::shader_cache::{ShaderCache, ShaderCacheBuilder};
pub use crate::core::rendering::shader_standard::{ShaderStandard, ShaderStandardBuilder};
pub use crate::core::rendering::source::{FileSystemShaderSourceReader, ShaderSourceReader};
