use std::error::Error;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, SurfaceAttributesBuilder, WindowSurface};
use raw_window_handle::HasRawWindowHandle;
use shader_cache::prelude::*;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

#[rustfmt::skip]
const TRIANGLE: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let window_builder = WindowBuilder::new()
        .with_title("Shader cache sandbox")
        .with_inner_size(LogicalSize::new(WIDTH, HEIGHT));

    let (window, cfg) = glutin_winit::DisplayBuilder::new()
        .with_window_builder(Some(window_builder))
        .build(&event_loop, ConfigTemplateBuilder::new(), |mut configs| {
            configs.next().expect("No OpenGL config available")
        })?;
    let window = window.ok_or("Failed to create window")?;

    let context_attrs = ContextAttributesBuilder::new().build(Some(window.raw_window_handle()));
    let context = unsafe { cfg.display().create_context(&cfg, &context_attrs)? };

    let size = window.inner_size();
    let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        window.raw_window_handle(),
        NonZeroU32::new(size.width).ok_or("Window has zero width")?,
        NonZeroU32::new(size.height).ok_or("Window has zero height")?,
    );
    let surface = unsafe { cfg.display().create_window_surface(&cfg, &surface_attrs)? };
    let context = context.make_current(&surface)?;

    let gl = Rc::new(glow_context(&context));

    let cache = ShaderCache::builder(OpenGLRenderBackend::new(gl.clone()))
        .with_source_reader(FileSystemShaderSourceReader::from_env())
        .build(&[ShaderKind::TransformWithSolidColor])?;

    let (vertex_array, vertex_buffer) = unsafe {
        let vertex_array = gl.create_vertex_array()?;
        let vertex_buffer = gl.create_buffer()?;
        let bytes: Vec<u8> = TRIANGLE.iter().flat_map(|v| v.to_ne_bytes()).collect();
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &bytes, glow::STATIC_DRAW);
        (vertex_array, vertex_buffer)
    };
    cache.configure_attributes_for_kind(
        vertex_array,
        vertex_buffer,
        ShaderKind::TransformWithSolidColor,
    )?;

    let start = Instant::now();
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    surface.resize(&context, width, height);
                    unsafe { gl.viewport(0, 0, size.width as i32, size.height as i32) };
                }
            }
            WindowEvent::RedrawRequested => {
                let size = window.inner_size();
                let aspect = size.width as f32 / size.height.max(1) as f32;
                if let Err(err) = draw_frame(
                    &gl,
                    &cache,
                    vertex_array,
                    aspect,
                    start.elapsed().as_secs_f32(),
                ) {
                    log::error!("Could not draw frame: {}", err);
                    elwt.exit();
                }
                if let Err(err) = surface.swap_buffers(&context) {
                    log::error!("Error swapping buffers: {}", err);
                }
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}

fn draw_frame(
    gl: &glow::Context,
    cache: &ShaderCache<OpenGLRenderBackend>,
    vertex_array: glow::NativeVertexArray,
    aspect: f32,
    time: f32,
) -> ShaderCacheResult<()> {
    let kind = ShaderKind::TransformWithSolidColor;
    let camera_to_clip = Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, 100.0);
    let world_to_camera = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y);
    let local_to_world = Mat4::from_rotation_y(time);
    let color = Vec4::new(0.5 + 0.5 * time.sin(), 0.3, 0.8, 1.0);

    unsafe {
        gl.clear_color(0.1, 0.1, 0.1, 1.0);
        gl.clear(glow::COLOR_BUFFER_BIT);
    }

    cache.set_uniform_mat4(kind, UniformVariable::CameraToClip, &camera_to_clip)?;
    cache.set_uniform_mat4(kind, UniformVariable::WorldToCamera, &world_to_camera)?;
    cache.set_uniform_mat4(kind, UniformVariable::LocalToWorld, &local_to_world)?;
    cache.set_uniform_vec4(kind, UniformVariable::RgbaColor, &color)?;

    unsafe {
        gl.bind_vertex_array(Some(vertex_array));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }
    cache.stop_using_program();
    Ok(())
}

fn glow_context(context: &PossiblyCurrentContext) -> glow::Context {
    unsafe {
        glow::Context::from_loader_function_cstr(|s| context.display().get_proc_address(s).cast())
    }
}
