mod test_shader_cache;
mod test_uniforms;
