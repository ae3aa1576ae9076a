use std::sync::Arc;

use crate::core::log::LogSeverity;
use crate::core::rendering::error::ShaderCacheError;
use crate::core::rendering::shader::{ShaderKind, ShaderSourceSpec, ShaderStage, VertexAttributeVariable};
use crate::core::rendering::shader_cache::ShaderCache;
use crate::core::rendering::shader_standard::{ShaderStandard, ShaderStandardBuilder};
use crate::tests::mock_backend::{BackendCall, MockBackend};
use crate::tests::shared_shader_cache::*;

#[test]
fn test_every_builtin_kind_builds_one_linked_program() {
    for kind in ShaderKind::ALL {
        let test = builtin_cache(&[kind]);

        assert_eq!(test.cache.program_count(), 1);
        let program = test.cache.get_program(kind).unwrap();
        assert!(test.backend.is_linked(program), "{} failed to link", kind);
        assert!(test.logger.with_severity(LogSeverity::Error).is_empty());
    }
}

#[test]
fn test_get_program_is_idempotent() {
    let test = builtin_cache(&[ShaderKind::TransformWithTextures]);

    let first = test.cache.get_program(ShaderKind::TransformWithTextures);
    let second = test.cache.get_program(ShaderKind::TransformWithTextures);
    assert_eq!(first, second);
}

#[test]
fn test_get_program_not_created() {
    let test = builtin_cache(&[ShaderKind::Skybox]);

    assert_eq!(
        test.cache.get_program(ShaderKind::Text),
        Err(ShaderCacheError::ProgramNotFound(ShaderKind::Text))
    );
    assert!(!test.cache.contains(ShaderKind::Text));
}

#[test]
fn test_two_kinds_released_on_drop() {
    let test = builtin_cache(&[ShaderKind::TransformWithTextures, ShaderKind::Text]);
    let backend = test.backend.clone();

    let textured = test.cache.get_program(ShaderKind::TransformWithTextures).unwrap();
    let text = test.cache.get_program(ShaderKind::Text).unwrap();
    assert_ne!(textured, text);
    assert!(backend.deleted_programs().is_empty());

    drop(test);

    let mut deleted = backend.deleted_programs();
    deleted.sort();
    let mut expected = vec![textured, text];
    expected.sort();
    assert_eq!(deleted, expected);
}

#[test]
fn test_duplicate_requests_build_once() {
    let test = builtin_cache(&[
        ShaderKind::Skybox,
        ShaderKind::Skybox,
        ShaderKind::TransformWithSolidColor,
    ]);

    assert_eq!(test.cache.program_count(), 2);
    assert_eq!(
        test.backend
            .count_calls(|call| matches!(call, BackendCall::CreateProgram(_))),
        2
    );
}

#[test]
fn test_stage_shaders_deleted_after_linking() {
    let test = builtin_cache(&ShaderKind::ALL);

    assert_eq!(test.backend.live_shader_count(), 0);
    // 7 kinds, one of them with a geometry stage
    assert_eq!(
        test.backend
            .count_calls(|call| matches!(call, BackendCall::DeleteShader(_))),
        15
    );
}

#[test]
fn test_geometry_stage_only_when_cataloged() {
    let test = builtin_cache(&[ShaderKind::TransformWithSolidColor]);
    assert_eq!(
        test.backend.count_calls(|call| matches!(
            call,
            BackendCall::CreateShader(_, ShaderStage::Geometry)
        )),
        0
    );

    let test = builtin_cache(&[ShaderKind::TransformWithWireframe]);
    assert_eq!(
        test.backend.count_calls(|call| matches!(
            call,
            BackendCall::CreateShader(_, ShaderStage::Geometry)
        )),
        1
    );
}

#[test]
fn test_summary_logged_after_construction() {
    let test = builtin_cache(&[ShaderKind::Skybox, ShaderKind::Text]);
    let program = test.cache.get_program(ShaderKind::Skybox).unwrap();

    assert!(test.logger.has(LogSeverity::Info, &["Total shaders: 2"]));
    assert!(test.logger.has(
        LogSeverity::Info,
        &["Shader Type: SKYBOX", &format!("Program ID: {}", program)]
    ));
}

#[test]
fn test_kind_missing_from_catalog_fails() {
    let standard = ShaderStandardBuilder::with_builtin_variables()
        .program(
            ShaderKind::TransformWithSolidColor,
            ShaderSourceSpec::new("solid.vert", "solid.frag"),
            &[VertexAttributeVariable::Position],
        )
        .build()
        .unwrap();
    let reader = InMemorySourceReader::new()
        .with("solid.vert", SOLID_COLOR_VERT)
        .with("solid.frag", SOLID_COLOR_FRAG);
    let backend = MockBackend::new();
    let logger = RecordingLogger::new();

    let result = ShaderCache::new(
        backend.clone(),
        Arc::new(standard),
        &reader,
        logger.clone(),
        &[ShaderKind::TransformWithSolidColor, ShaderKind::Skybox],
    );

    assert_eq!(
        result.err(),
        Some(ShaderCacheError::KindNotInCatalog(ShaderKind::Skybox))
    );
    assert!(logger.has(LogSeverity::Error, &["SKYBOX", "not found in the catalog"]));
    // The program built before the failure doesn't leak
    assert_eq!(backend.deleted_programs().len(), 1);
}

#[test]
fn test_unreadable_source_keeps_broken_program() {
    let standard = ShaderStandardBuilder::with_builtin_variables()
        .program(
            ShaderKind::TransformWithSolidColor,
            ShaderSourceSpec::new("solid.vert", "does/not/exist.frag"),
            &[VertexAttributeVariable::Position],
        )
        .build()
        .unwrap();
    let reader = InMemorySourceReader::new().with("solid.vert", SOLID_COLOR_VERT);
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

    assert!(logger.has(LogSeverity::Error, &["Could not read", "does/not/exist.frag"]));
    assert!(logger.has(LogSeverity::Error, &["Compiling fragment shader", "empty source"]));
    assert!(logger.has(LogSeverity::Error, &["Linking shader program TRANSFORM_WITH_SOLID_COLOR failed"]));

    let program = cache.get_program(ShaderKind::TransformWithSolidColor).unwrap();
    assert!(!backend.is_linked(program));
    assert!(cache.use_program(ShaderKind::TransformWithSolidColor).is_ok());
    assert_eq!(backend.live_shader_count(), 0);
}

#[test]
fn test_compile_failure_still_links_and_caches() {
    let standard = ShaderStandardBuilder::with_builtin_variables()
        .program(
            ShaderKind::TransformWithSolidColor,
            ShaderSourceSpec::new("solid.vert", "solid.frag"),
            &[VertexAttributeVariable::Position],
        )
        .build()
        .unwrap();
    let reader = InMemorySourceReader::new()
        .with("solid.vert", "#version 330 core\n#error broken\n")
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

    assert!(logger.has(
        LogSeverity::Error,
        &["Compiling vertex shader", "TRANSFORM_WITH_SOLID_COLOR", "user error"]
    ));
    assert_eq!(
        backend.count_calls(|call| matches!(call, BackendCall::LinkProgram(_))),
        1
    );
    assert!(cache.contains(ShaderKind::TransformWithSolidColor));
}

#[test]
fn test_backend_refusing_programs_is_an_error() {
    let backend = MockBackend::new();
    backend.refuse_program_creation();

    let result = ShaderCache::new(
        backend,
        ShaderStandard::builtin(),
        &assets_reader(),
        RecordingLogger::new(),
        &[ShaderKind::Text],
    );

    assert!(matches!(result, Err(ShaderCacheError::Backend(_))));
}

#[test]
fn test_use_and_stop_using_program() {
    let test = builtin_cache(&[ShaderKind::Text]);
    let program = test.cache.get_program(ShaderKind::Text).unwrap();
    test.backend.clear_calls();

    test.cache.use_program(ShaderKind::Text).unwrap();
    test.cache.stop_using_program();

    assert_eq!(
        test.backend.calls(),
        vec![
            BackendCall::UseProgram(Some(program)),
            BackendCall::UseProgram(None)
        ]
    );
    assert_eq!(
        test.cache.use_program(ShaderKind::Skybox),
        Err(ShaderCacheError::ProgramNotFound(ShaderKind::Skybox))
    );
}

#[test]
fn test_builder_defaults() {
    let logger = RecordingLogger::new();
    let cache = ShaderCache::builder(MockBackend::new())
        .with_source_reader(assets_reader())
        .with_logger(logger.clone())
        .build(&[ShaderKind::Skybox, ShaderKind::TransformWithTextures])
        .unwrap();

    assert_eq!(
        cache.created_kinds(),
        vec![ShaderKind::TransformWithTextures, ShaderKind::Skybox]
    );
    assert!(logger.has(LogSeverity::Info, &["creating new shader program SKYBOX"]));
}
