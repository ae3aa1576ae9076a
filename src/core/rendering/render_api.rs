use std::fmt::Debug;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::core::rendering::shader::{ShaderStage, VertexAttributeLayout};

/// Location reported for uniforms that are not active in a program
pub const UNIFORM_NOT_PRESENT: i32 = -1;

/// This is the behaviour the shader cache needs from a graphics API,
/// translating the platform-specific details of the API to this trait.
///
/// Every call assumes the backend's context is current on the calling
/// thread. Implementations forward straight to the driver; they do not log.
pub trait GraphicsBackend {
    type Program: Copy + Eq + Debug;
    type Shader: Copy + Eq + Debug;
    type VertexArray: Copy + Eq + Debug;
    type Buffer: Copy + Eq + Debug;

    // Resource creation and destruction
    fn create_program(&self) -> Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn delete_shader(&self, shader: Self::Shader);

    // Program building
    /// Upload `source` and compile it. On failure returns the driver info log
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> Result<(), String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// On failure returns the driver info log
    fn link_program(&self, program: Self::Program) -> Result<(), String>;

    // Bindings
    fn use_program(&self, program: Option<Self::Program>);
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);

    // Operations: vertex attributes
    fn get_attribute_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn enable_vertex_attribute(&self, location: u32);
    fn vertex_attribute_pointer(&self, location: u32, layout: &VertexAttributeLayout);

    // Operations: uniforms
    /// Returns [UNIFORM_NOT_PRESENT] when the program has no such active uniform
    fn get_uniform_location(&self, program: Self::Program, name: &str) -> i32;
    fn set_uniform_i32(&self, location: i32, value: i32);
    fn set_uniform_f32(&self, location: i32, value: f32);
    fn set_uniform_fvec2(&self, location: i32, value: &Vec2);
    fn set_uniform_fvec3(&self, location: i32, value: &Vec3);
    fn set_uniform_fvec4(&self, location: i32, value: &Vec4);
    fn set_uniform_fvec4_array(&self, location: i32, values: &[Vec4]);
    fn set_uniform_fmat2(&self, location: i32, value: &Mat2);
    fn set_uniform_fmat3(&self, location: i32, value: &Mat3);
    fn set_uniform_fmat4(&self, location: i32, value: &Mat4);
}
