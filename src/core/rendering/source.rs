use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding where shader sources are read from
pub const SHADER_ROOT_ENV_VAR: &str = "SHADER_CACHE_ROOT";
/// Source root used when [SHADER_ROOT_ENV_VAR] is not set
pub const DEFAULT_SHADER_ROOT: &str = "assets/shaders";

/// Provides the text of shader stage sources named in the catalog
pub trait ShaderSourceReader {
    fn read_source(&self, path: &Path) -> io::Result<String>;
}

/// Reads sources from disk, resolving catalog paths against a root directory
#[derive(Debug, Clone)]
pub struct FileSystemShaderSourceReader {
    root: PathBuf,
}

impl FileSystemShaderSourceReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSystemShaderSourceReader { root: root.into() }
    }

    /// Root taken from `SHADER_CACHE_ROOT`, or `assets/shaders`
    pub fn from_env() -> Self {
        let root = std::env::var_os(SHADER_ROOT_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SHADER_ROOT));
        Self::new(root)
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for FileSystemShaderSourceReader {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ShaderSourceReader for FileSystemShaderSourceReader {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        let full_path = self.resolve(path);
        std::fs::read_to_string(&full_path)
            .map_err(|err| io::Error::new(err.kind(), format!("{}: {}", full_path.display(), err)))
    }
}
