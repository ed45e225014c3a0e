//! Server configuration
//!
//! Populated from CLI flags first, then merged with the client's
//! `initializationOptions` on `initialize`.

use serde_json::Value;

/// Runtime configuration for the server.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Verbose request/response tracing on stderr.
    pub verbose: bool,
    /// Compiler arguments used by the fallback build system when no build
    /// system knows the file.
    pub default_compiler_arguments: Vec<String>,
}

impl ServerConfig {
    /// Merge `initializationOptions` into the configuration.
    ///
    /// Recognized options:
    /// - `"verbose"`: bool
    /// - `"compilerArguments"`: array of strings
    pub fn merge_initialization_options(&mut self, options: &Value) {
        if let Some(verbose) = options.get("verbose").and_then(Value::as_bool) {
            self.verbose = verbose;
        }
        if let Some(args) = options.get("compilerArguments").and_then(Value::as_array) {
            self.default_compiler_arguments =
                args.iter().filter_map(|a| a.as_str().map(str::to_owned)).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn merges_recognized_options_and_ignores_noise() {
        let mut config = ServerConfig::default();
        config.merge_initialization_options(&json!({
            "verbose": true,
            "compilerArguments": ["-sdk", "/sdk", 42],
            "unknown": {"ignored": true},
        }));
        assert!(config.verbose);
        assert_eq!(config.default_compiler_arguments, vec!["-sdk".to_owned(), "/sdk".to_owned()]);
    }
}
