use std::rc::Rc;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use glow::{
    Context, HasContext, NativeBuffer, NativeProgram, NativeShader, NativeUniformLocation,
    NativeVertexArray,
};

use crate::core::rendering::render_api::{GraphicsBackend, UNIFORM_NOT_PRESENT};
use crate::core::rendering::shader::{ScalarType, ShaderStage, VertexAttributeLayout};

/// [GraphicsBackend] on top of a glow OpenGL context.
///
/// The context is shared with the rest of the renderer. Every call requires
/// that context to be current on the calling thread, otherwise behavior is
/// undefined.
pub struct OpenGLRenderBackend {
    gl: Rc<Context>,
}

impl OpenGLRenderBackend {
    pub fn new(gl: Rc<Context>) -> Self {
        OpenGLRenderBackend { gl }
    }

    #[inline(always)]
    pub fn get_context(&self) -> &Context {
        &self.gl
    }
}

#[inline(always)]
fn native_location(location: i32) -> NativeUniformLocation {
    NativeUniformLocation(location as u32)
}

fn gl_shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
    }
}

fn gl_scalar_type(scalar_type: ScalarType) -> u32 {
    match scalar_type {
        ScalarType::Float => glow::FLOAT,
        ScalarType::Int => glow::INT,
        ScalarType::UnsignedInt => glow::UNSIGNED_INT,
        ScalarType::UnsignedByte => glow::UNSIGNED_BYTE,
    }
}

impl GraphicsBackend for OpenGLRenderBackend {
    type Program = NativeProgram;
    type Shader = NativeShader;
    type VertexArray = NativeVertexArray;
    type Buffer = NativeBuffer;

    // Resource creation and destruction
    fn create_program(&self) -> Result<NativeProgram, String> {
        unsafe { self.gl.create_program() }
    }

    fn delete_program(&self, program: NativeProgram) {
        unsafe { self.gl.delete_program(program) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<NativeShader, String> {
        unsafe { self.gl.create_shader(gl_shader_type(stage)) }
    }

    fn delete_shader(&self, shader: NativeShader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    // Program building
    fn compile_shader(&self, shader: NativeShader, source: &str) -> Result<(), String> {
        let gl = &self.gl;
        unsafe {
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            // Check if compilation for this shader went ok
            if gl.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(gl.get_shader_info_log(shader))
            }
        }
    }

    fn attach_shader(&self, program: NativeProgram, shader: NativeShader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: NativeProgram) -> Result<(), String> {
        let gl = &self.gl;
        unsafe {
            gl.link_program(program);
            if gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(gl.get_program_info_log(program))
            }
        }
    }

    // Bindings
    fn use_program(&self, program: Option<NativeProgram>) {
        unsafe { self.gl.use_program(program) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<NativeVertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn bind_array_buffer(&self, buffer: Option<NativeBuffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    // Operations: vertex attributes
    fn get_attribute_location(&self, program: NativeProgram, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn enable_vertex_attribute(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn vertex_attribute_pointer(&self, location: u32, layout: &VertexAttributeLayout) {
        let data_type = gl_scalar_type(layout.scalar_type);
        unsafe {
            // Integer inputs have to go through the integer entry point unless
            // they are normalized into floats
            if layout.scalar_type.is_integer() && !layout.normalize {
                self.gl.vertex_attrib_pointer_i32(
                    location,
                    layout.components as i32,
                    data_type,
                    layout.stride as i32,
                    layout.offset as i32,
                );
            } else {
                self.gl.vertex_attrib_pointer_f32(
                    location,
                    layout.components as i32,
                    data_type,
                    layout.normalize,
                    layout.stride as i32,
                    layout.offset as i32,
                );
            }
        }
    }

    // Operations: uniforms
    fn get_uniform_location(&self, program: NativeProgram, name: &str) -> i32 {
        unsafe {
            self.gl
                .get_uniform_location(program, name)
                .map(|location| location.0 as i32)
                .unwrap_or(UNIFORM_NOT_PRESENT)
        }
    }

    fn set_uniform_i32(&self, location: i32, value: i32) {
        unsafe {
            self.gl.uniform_1_i32(Some(&native_location(location)), value);
        }
    }

    fn set_uniform_f32(&self, location: i32, value: f32) {
        unsafe {
            self.gl.uniform_1_f32(Some(&native_location(location)), value);
        }
    }

    fn set_uniform_fvec2(&self, location: i32, value: &Vec2) {
        unsafe {
            self.gl
                .uniform_2_f32(Some(&native_location(location)), value.x, value.y);
        }
    }

    fn set_uniform_fvec3(&self, location: i32, value: &Vec3) {
        unsafe {
            self.gl.uniform_3_f32(
                Some(&native_location(location)),
                value.x,
                value.y,
                value.z,
            );
        }
    }

    fn set_uniform_fvec4(&self, location: i32, value: &Vec4) {
        unsafe {
            self.gl.uniform_4_f32(
                Some(&native_location(location)),
                value.x,
                value.y,
                value.z,
                value.w,
            );
        }
    }

    fn set_uniform_fvec4_array(&self, location: i32, values: &[Vec4]) {
        let flat: Vec<f32> = values.iter().flat_map(|value| value.to_array()).collect();
        unsafe {
            self.gl
                .uniform_4_f32_slice(Some(&native_location(location)), &flat);
        }
    }

    fn set_uniform_fmat2(&self, location: i32, value: &Mat2) {
        unsafe {
            self.gl.uniform_matrix_2_f32_slice(
                Some(&native_location(location)),
                false,
                &value.to_cols_array(),
            );
        }
    }

    fn set_uniform_fmat3(&self, location: i32, value: &Mat3) {
        unsafe {
            self.gl.uniform_matrix_3_f32_slice(
                Some(&native_location(location)),
                false,
                &value.to_cols_array(),
            );
        }
    }

    fn set_uniform_fmat4(&self, location: i32, value: &Mat4) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(
                Some(&native_location(location)),
                false,
                &value.to_cols_array(),
            );
        }
    }
}
