use std::fmt;

use crate::core::rendering::shader::{ShaderKind, VertexAttributeVariable};

pub type ShaderCacheResult<T> = Result<T, ShaderCacheError>;

/// Configuration mistakes and backend refusals.
///
/// Missing source files, failed compilation and failed linking are not
/// errors here: they are logged and the cache keeps the broken program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderCacheError {
    /// Requested a kind that has no entry in the shader catalog
    KindNotInCatalog(ShaderKind),
    /// The program for this kind was never created by the cache
    ProgramNotFound(ShaderKind),
    /// No layout or name registered for this attribute
    UnknownAttribute(VertexAttributeVariable),
    /// No used-attribute list registered for this kind
    NoAttributeList(ShaderKind),
    /// The same kind was registered twice in a catalog
    DuplicateCatalogEntry(ShaderKind),
    /// A standard whose tables disagree with each other
    InvalidStandard(String),
    /// The graphics backend refused to create an object
    Backend(String),
}

impl fmt::Display for ShaderCacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderCacheError::KindNotInCatalog(kind) => {
                write!(f, "Shader type {} not found in the shader catalog", kind)
            }
            ShaderCacheError::ProgramNotFound(kind) => {
                write!(f, "Shader program {} not found", kind)
            }
            ShaderCacheError::UnknownAttribute(attribute) => write!(
                f,
                "Vertex attribute variable {:?} has no layout or name registered",
                attribute
            ),
            ShaderCacheError::NoAttributeList(kind) => {
                write!(f, "Shader type {} has no used vertex attribute list", kind)
            }
            ShaderCacheError::DuplicateCatalogEntry(kind) => {
                write!(f, "Shader type {} registered twice in the catalog", kind)
            }
            ShaderCacheError::InvalidStandard(msg) => write!(f, "Invalid shader standard: {}", msg),
            ShaderCacheError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for ShaderCacheError {}
