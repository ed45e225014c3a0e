//! Build-system collaborator
//!
//! The build system is an external collaborator that knows how each file
//! is compiled. The server asks it for per-file compiler arguments before
//! every native request that benefits from build context.

/// Per-file build context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBuildSettings {
    /// Compiler arguments to attach to native requests for the file.
    pub compiler_arguments: Vec<String>,
}

/// Source of per-file build settings.
pub trait BuildSystem: Send + Sync {
    /// Settings for `uri`, or `None` when the file is unknown to the
    /// build system.
    fn settings(&self, uri: &str, language: &str) -> Option<FileBuildSettings>;
}

/// Build system of last resort: a fixed argument list from configuration,
/// handed out for any Swift file.
#[derive(Debug, Default)]
pub struct FallbackBuildSystem {
    arguments: Vec<String>,
}

impl FallbackBuildSystem {
    /// Fallback settings serving `arguments` for every file.
    pub fn new(arguments: Vec<String>) -> Self {
        Self { arguments }
    }
}

impl BuildSystem for FallbackBuildSystem {
    fn settings(&self, _uri: &str, _language: &str) -> Option<FileBuildSettings> {
        if self.arguments.is_empty() {
            return None;
        }
        Some(FileBuildSettings { compiler_arguments: self.arguments.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fallback_serves_configured_arguments_or_nothing() {
        let empty = FallbackBuildSystem::default();
        assert_eq!(empty.settings("file:///a.swift", "swift"), None);

        let configured = FallbackBuildSystem::new(vec!["-sdk".into(), "/sdk".into()]);
        assert_eq!(
            configured.settings("file:///a.swift", "swift"),
            Some(FileBuildSettings { compiler_arguments: vec!["-sdk".into(), "/sdk".into()] })
        );
    }
}
