// RUNTIME PREFERENCES (User Experience)
//
// Every field defaults from a CBOT_* environment variable. A whole
// configuration can also be read from a TOML file; missing sections and
// fields fall back to those defaults.

use crate::logging::codes::{self, Code};
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePreferences {
    /// Whether to require a .txt or .cbot extension on script files
    pub require_script_extension: bool,

    /// Whether to log timing for each loaded script
    pub enable_performance_logging: bool,
}

impl Default for SourcePreferences {
    fn default() -> Self {
        Self {
            require_script_extension: env_flag(env_vars::REQUIRE_SCRIPT_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to count tokens per kind while tokenizing
    pub collect_detailed_metrics: bool,

    /// Whether to emit a debug event for every token
    pub trace_tokens: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            trace_tokens: env_flag(env_vars::LEXICAL_TRACE_TOKENS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of text
    pub use_structured_logging: bool,

    /// Write log events to stderr
    pub enable_console_logging: bool,

    /// Preferred minimum level, raised to the compile-time floor
    pub min_log_level: LogLevel,

    /// Print registry metadata with error events
    pub detailed_errors: bool,

    /// Tag events with the name of the script being processed
    pub include_source_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
            detailed_errors: env_flag(env_vars::LOGGING_DETAILED_ERRORS, true),
            include_source_context: env_flag(env_vars::LOGGING_INCLUDE_SOURCE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration '{path}': {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid configuration in '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        match self {
            ConfigError::Read { .. } => codes::config::CONFIG_READ_FAILURE,
            ConfigError::Parse { .. } => codes::config::CONFIG_PARSE_FAILURE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub source: SourcePreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content, path)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Source loading
    pub const REQUIRE_SCRIPT_EXTENSION: &str = "CBOT_REQUIRE_SCRIPT_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "CBOT_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "CBOT_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_TRACE_TOKENS: &str = "CBOT_LEXICAL_TRACE_TOKENS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CBOT_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "CBOT_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "CBOT_LOGGING_MIN_LEVEL";
    pub const LOGGING_DETAILED_ERRORS: &str = "CBOT_LOGGING_DETAILED_ERRORS";
    pub const LOGGING_INCLUDE_SOURCE_CONTEXT: &str = "CBOT_LOGGING_INCLUDE_SOURCE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("1"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("3"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [logging]
            min_log_level = "debug"
            use_structured_logging = true

            [source]
            require_script_extension = true
        "#;

        let config = RuntimeConfig::from_toml_str(toml, Path::new("cbot.toml")).unwrap();
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert!(config.logging.use_structured_logging);
        assert!(config.source.require_script_extension);
        assert_eq!(
            config.lexical.collect_detailed_metrics,
            LexicalPreferences::default().collect_detailed_metrics
        );
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let result = RuntimeConfig::from_toml_str("[logging\n", Path::new("bad.toml"));
        assert_matches!(result, Err(ConfigError::Parse { .. }));
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::config::CONFIG_PARSE_FAILURE
        );
    }

    #[test]
    fn test_missing_file_reports_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RuntimeConfig::load(&dir.path().join("absent.toml"));
        assert_matches!(result, Err(ConfigError::Read { .. }));
    }
}
