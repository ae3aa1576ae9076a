use std::sync::Arc;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::core::log::LogSeverity;
use crate::core::rendering::error::ShaderCacheError;
use crate::core::rendering::render_api::UNIFORM_NOT_PRESENT;
use crate::core::rendering::shader::{
    ShaderKind, ShaderSourceSpec, UniformVariable, VertexAttributeLayout, VertexAttributeVariable,
};
use crate::core::rendering::shader_cache::ShaderCache;
use crate::core::rendering::shader_standard::ShaderStandard;
use crate::tests::mock_backend::{BackendCall, MockBackend, UniformWrite};
use crate::tests::shared_shader_cache::*;

/// Standard that only names the transformation matrices and the color
fn partial_uniform_cache() -> TestCache {
    let standard = ShaderStandard::builder()
        .program(
            ShaderKind::TransformWithSolidColor,
            ShaderSourceSpec::new("solid.vert", "solid.frag"),
            &[VertexAttributeVariable::Position],
        )
        .attribute(
            VertexAttributeVariable::Position,
            "position",
            VertexAttributeLayout::packed_floats(3),
        )
        .uniform(UniformVariable::CameraToClip, "camera_to_clip")
        .uniform(UniformVariable::WorldToCamera, "world_to_camera")
        .uniform(UniformVariable::LocalToWorld, "local_to_world")
        .uniform(UniformVariable::RgbaColor, "rgba_color")
        .build()
        .unwrap();
    let reader = InMemorySourceReader::new()
        .with("solid.vert", SOLID_COLOR_VERT)
        .with("solid.frag", SOLID_COLOR_FRAG);
    let backend = MockBackend::new();
    let logger = RecordingLogger::new();
    let cache = ShaderCache::new(
        backend.clone(),
        Arc::new(standard),
        &reader,
        logger.clone(),
        &[ShaderKind::TransformWithSolidColor],
    )
    .unwrap();

    TestCache {
        cache,
        backend,
        logger,
    }
}

#[test]
fn test_builtin_uniform_names_are_stable() {
    let test = builtin_cache(&[]);

    for uniform in UniformVariable::ALL {
        let name = test.cache.get_uniform_name(uniform).to_string();
        assert!(!name.is_empty(), "{:?} has no name", uniform);
        assert_eq!(test.cache.get_uniform_name(uniform), name);
    }
    assert_eq!(
        test.cache.get_uniform_name(UniformVariable::CameraToClip),
        "camera_to_clip"
    );
    assert!(test.logger.with_severity(LogSeverity::Warn).is_empty());
}

#[test]
fn test_unregistered_uniform_name_is_empty() {
    let test = partial_uniform_cache();

    assert_eq!(test.cache.get_uniform_name(UniformVariable::TextColor), "");
    assert!(test
        .logger
        .has(LogSeverity::Warn, &["TextColor", "not found in allowed names"]));
}

#[test]
fn test_uniform_location_lookup() {
    let test = builtin_cache(&[ShaderKind::TransformWithSolidColor]);

    let location = test
        .cache
        .get_uniform_location(ShaderKind::TransformWithSolidColor, UniformVariable::RgbaColor)
        .unwrap();
    assert_ne!(location, UNIFORM_NOT_PRESENT);

    // Declared by no stage of this kind
    let missing = test
        .cache
        .get_uniform_location(ShaderKind::TransformWithSolidColor, UniformVariable::TextColor)
        .unwrap();
    assert_eq!(missing, UNIFORM_NOT_PRESENT);
    assert!(test.logger.has(
        LogSeverity::Error,
        &["Uniform 'text_color' not found in shader program TRANSFORM_WITH_SOLID_COLOR"]
    ));

    // Looking a location up doesn't activate anything
    assert_eq!(
        test.backend
            .count_calls(|call| matches!(call, BackendCall::UseProgram(_))),
        0
    );
}

#[test]
fn test_uniform_location_for_missing_program() {
    let test = builtin_cache(&[ShaderKind::Skybox]);

    assert_eq!(
        test.cache
            .get_uniform_location(ShaderKind::Text, UniformVariable::TextColor),
        Err(ShaderCacheError::ProgramNotFound(ShaderKind::Text))
    );
}

#[test]
fn test_setter_activates_program_before_writing() {
    let test = builtin_cache(&[ShaderKind::TransformWithSolidColor, ShaderKind::Skybox]);
    let program = test
        .cache
        .get_program(ShaderKind::TransformWithSolidColor)
        .unwrap();
    test.backend.clear_calls();

    let color = Vec4::new(1.0, 0.5, 0.25, 1.0);
    test.cache
        .set_uniform_vec4(ShaderKind::TransformWithSolidColor, UniformVariable::RgbaColor, &color)
        .unwrap();

    let calls = test.backend.calls();
    assert_eq!(calls.first(), Some(&BackendCall::UseProgram(Some(program))));
    assert!(matches!(
        calls.last(),
        Some(BackendCall::SetUniform { value: UniformWrite::Vec4(v), .. }) if *v == color
    ));
}

#[test]
fn test_every_setter_shape() {
    let test = builtin_cache(&[
        ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting,
        ShaderKind::Text,
    ]);
    let lit = ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting;
    let cache = &test.cache;
    test.backend.clear_calls();

    cache.set_uniform_bool(lit, UniformVariable::UseLighting, true).unwrap();
    cache.set_uniform_i32(lit, UniformVariable::TextureSampler, 3).unwrap();
    cache.set_uniform_f32(lit, UniformVariable::AmbientLightStrength, 0.2).unwrap();
    cache
        .set_uniform_vec2(ShaderKind::Text, UniformVariable::ScreenSize, &Vec2::new(800.0, 600.0))
        .unwrap();
    cache
        .set_uniform_vec3(lit, UniformVariable::AmbientLightColor, &Vec3::ONE)
        .unwrap();
    cache
        .set_uniform_vec4_array(lit, UniformVariable::PointLightPositions, &[Vec4::X, Vec4::Y])
        .unwrap();
    cache.set_uniform_mat2(lit, UniformVariable::UvRotation, &Mat2::IDENTITY).unwrap();
    cache
        .set_uniform_mat3(lit, UniformVariable::TextureTransform, &Mat3::IDENTITY)
        .unwrap();
    cache
        .set_uniform_mat4(lit, UniformVariable::LocalToWorld, &Mat4::IDENTITY)
        .unwrap();

    assert_eq!(
        test.backend.uniform_writes(),
        vec![
            UniformWrite::I32(1),
            UniformWrite::I32(3),
            UniformWrite::F32(0.2),
            UniformWrite::Vec2(Vec2::new(800.0, 600.0)),
            UniformWrite::Vec3(Vec3::ONE),
            UniformWrite::Vec4Array(vec![Vec4::X, Vec4::Y]),
            UniformWrite::Mat2(Mat2::IDENTITY),
            UniformWrite::Mat3(Mat3::IDENTITY),
            UniformWrite::Mat4(Mat4::IDENTITY),
        ]
    );
    assert!(test.logger.with_severity(LogSeverity::Error).is_empty());
}

#[test]
fn test_absent_uniform_skips_write() {
    let test = builtin_cache(&[ShaderKind::Skybox]);
    test.backend.clear_calls();

    test.cache
        .set_uniform_f32(ShaderKind::Skybox, UniformVariable::AmbientLightStrength, 1.0)
        .unwrap();
    test.cache
        .set_uniform_mat4(ShaderKind::Skybox, UniformVariable::LocalToWorld, &Mat4::IDENTITY)
        .unwrap();

    assert!(test.backend.uniform_writes().is_empty());
}

#[test]
fn test_unregistered_uniform_never_reaches_backend() {
    let test = partial_uniform_cache();
    test.backend.clear_calls();

    test.cache
        .set_uniform_vec3(ShaderKind::TransformWithSolidColor, UniformVariable::TextColor, &Vec3::ONE)
        .unwrap();

    assert!(test.logger.has(LogSeverity::Warn, &["TextColor"]));
    assert_eq!(
        test.cache
            .get_uniform_location(ShaderKind::TransformWithSolidColor, UniformVariable::TextColor),
        Ok(UNIFORM_NOT_PRESENT)
    );
    assert_eq!(
        test.backend
            .count_calls(|call| matches!(call, BackendCall::GetUniformLocation { .. })),
        0
    );
    assert!(test.backend.uniform_writes().is_empty());
}

#[test]
fn test_empty_vec4_array_is_rejected() {
    let test = builtin_cache(&[ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting]);
    test.backend.clear_calls();

    test.cache
        .set_uniform_vec4_array(
            ShaderKind::TransformWithTexturesAmbientAndDiffuseLighting,
            UniformVariable::PointLightPositions,
            &[],
        )
        .unwrap();

    assert!(test.backend.calls().is_empty());
    assert!(test
        .logger
        .has(LogSeverity::Warn, &["PointLightPositions", "empty array"]));
}

#[test]
fn test_setter_for_missing_program_fails() {
    let test = builtin_cache(&[ShaderKind::Skybox]);
    test.backend.clear_calls();

    assert_eq!(
        test.cache
            .set_uniform_i32(ShaderKind::Text, UniformVariable::TextureSampler, 0),
        Err(ShaderCacheError::ProgramNotFound(ShaderKind::Text))
    );
    assert!(test.backend.calls().is_empty());
}
