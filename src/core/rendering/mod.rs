pub mod error;
pub mod render_api;
pub mod shader;
pub mod shader_cache;
pub mod shader_standard;
pub mod source;
