//! Consolidated error codes and classification system
//!
//! Single source of truth for every code the tokenizer logs, their metadata,
//! and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Source loading error codes
pub mod source {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Configuration error codes
pub mod config {
    use super::Code;

    pub const CONFIG_READ_FAILURE: Code = Code::new("E015");
    pub const CONFIG_PARSE_FAILURE: Code = Code::new("E016");
}

/// Lexical diagnostic codes; scanning is permissive, these are warnings only
pub mod lexical {
    use super::Code;

    pub const UNTERMINATED_STRING: Code = Code::new("E020");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E021");
}

/// Keyword table error codes
pub mod keywords {
    use super::Code;

    pub const KEYWORD_TABLE_FULL: Code = Code::new("E030");
    pub const KEYWORD_TABLE_PARSE_FAILURE: Code = Code::new("E031");
    pub const KEYWORD_ID_OUT_OF_RANGE: Code = Code::new("E032");
}

/// Numeric-constant table error codes
pub mod defines {
    use super::Code;

    pub const DUPLICATE_DEFINE: Code = Code::new("E035");
    pub const DEFINE_TABLE_FULL: Code = Code::new("E036");
    pub const EMPTY_DEFINE_NAME: Code = Code::new("E037");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    // Source loading
    pub const SOURCE_LOADED: Code = Code::new("I006");
    pub const SOURCE_VALIDATION_PASSED: Code = Code::new("I007");

    // Lexical
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");

    // Tables
    pub const KEYWORD_TABLE_LOADED: Code = Code::new("I030");
    pub const CONSTANT_DEFINED: Code = Code::new("I035");
    pub const DEFINE_TABLE_CLEARED: Code = Code::new("I036");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the failing script",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check logging and runtime configuration",
            ),
            // Source loading errors
            ErrorMetadata::new(
                "E005",
                "Source",
                Severity::Medium,
                false,
                true,
                "Script file not found at specified path",
                "Check file path and ensure file exists",
            ),
            ErrorMetadata::new(
                "E006",
                "Source",
                Severity::Low,
                true,
                false,
                "Script file does not have a .txt or .cbot extension",
                "Rename the file or disable the extension requirement",
            ),
            ErrorMetadata::new(
                "E007",
                "Source",
                Severity::High,
                false,
                true,
                "Script file exceeds the maximum source size",
                "Split the script or raise max_source_size in the build profile",
            ),
            ErrorMetadata::new(
                "E009",
                "Source",
                Severity::High,
                false,
                true,
                "Permission denied while reading script file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E010",
                "Source",
                Severity::Medium,
                false,
                true,
                "Script file is not valid UTF-8",
                "Re-save the script with UTF-8 encoding",
            ),
            ErrorMetadata::new(
                "E011",
                "Source",
                Severity::High,
                false,
                true,
                "I/O error while reading script file",
                "Check disk and file system health",
            ),
            ErrorMetadata::new(
                "E012",
                "Source",
                Severity::Medium,
                false,
                true,
                "Path does not refer to a regular file",
                "Pass a path to a script file, not a directory",
            ),
            // Configuration errors
            ErrorMetadata::new(
                "E015",
                "Configuration",
                Severity::Medium,
                true,
                false,
                "Runtime configuration file could not be read",
                "Check the configuration path; defaults are used otherwise",
            ),
            ErrorMetadata::new(
                "E016",
                "Configuration",
                Severity::Medium,
                true,
                false,
                "Runtime configuration file is not valid TOML",
                "Fix the TOML syntax in the configuration file",
            ),
            // Lexical diagnostics
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "String literal is missing its closing quote",
                "Close the string before the end of the line",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Block comment runs to the end of the script",
                "Close the comment with */",
            ),
            // Keyword table errors
            ErrorMetadata::new(
                "E030",
                "Keywords",
                Severity::Low,
                true,
                false,
                "Keyword table capacity reached, remaining keywords dropped",
                "Raise max_keyword_count in the build profile",
            ),
            ErrorMetadata::new(
                "E031",
                "Keywords",
                Severity::Medium,
                false,
                true,
                "Keyword table file could not be parsed",
                "Check the [keywords] tables in the keyword file",
            ),
            ErrorMetadata::new(
                "E032",
                "Keywords",
                Severity::Low,
                true,
                false,
                "Keyword category holds more entries than its id range",
                "Move extra keywords into another category",
            ),
            // Numeric-constant errors
            ErrorMetadata::new(
                "E035",
                "Defines",
                Severity::Low,
                true,
                false,
                "Constant name already defined",
                "Use a unique name or reset the table between compilation units",
            ),
            ErrorMetadata::new(
                "E036",
                "Defines",
                Severity::Medium,
                true,
                false,
                "Constant table is full",
                "Raise max_define_count in the build profile",
            ),
            ErrorMetadata::new(
                "E037",
                "Defines",
                Severity::Low,
                true,
                false,
                "Constant name is empty",
                "Provide a non-empty constant name",
            ),
            // Success codes
            ErrorMetadata::new(
                "I001",
                "Success",
                Severity::Low,
                true,
                false,
                "Operation completed successfully",
                "No action required",
            ),
            ErrorMetadata::new(
                "I004",
                "Success",
                Severity::Low,
                true,
                false,
                "System initialization completed",
                "No action required",
            ),
            ErrorMetadata::new(
                "I006",
                "Success",
                Severity::Low,
                true,
                false,
                "Script source loaded",
                "No action required",
            ),
            ErrorMetadata::new(
                "I007",
                "Success",
                Severity::Low,
                true,
                false,
                "Script source passed validation",
                "No action required",
            ),
            ErrorMetadata::new(
                "I020",
                "Success",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "Token stream ready for parsing",
            ),
            ErrorMetadata::new(
                "I030",
                "Success",
                Severity::Low,
                true,
                false,
                "Keyword table populated",
                "No action required",
            ),
            ErrorMetadata::new(
                "I035",
                "Success",
                Severity::Low,
                true,
                false,
                "Numeric constant defined",
                "No action required",
            ),
            ErrorMetadata::new(
                "I036",
                "Success",
                Severity::Low,
                true,
                false,
                "Numeric constant table cleared",
                "No action required",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_constant_is_registered() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            source::FILE_NOT_FOUND,
            source::INVALID_EXTENSION,
            source::FILE_TOO_LARGE,
            source::PERMISSION_DENIED,
            source::INVALID_ENCODING,
            source::IO_ERROR,
            source::INVALID_PATH,
            config::CONFIG_READ_FAILURE,
            config::CONFIG_PARSE_FAILURE,
            lexical::UNTERMINATED_STRING,
            lexical::UNTERMINATED_COMMENT,
            keywords::KEYWORD_TABLE_FULL,
            keywords::KEYWORD_TABLE_PARSE_FAILURE,
            keywords::KEYWORD_ID_OUT_OF_RANGE,
            defines::DUPLICATE_DEFINE,
            defines::DEFINE_TABLE_FULL,
            defines::EMPTY_DEFINE_NAME,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::SOURCE_LOADED,
            success::SOURCE_VALIDATION_PASSED,
            success::TOKENIZATION_COMPLETE,
            success::KEYWORD_TABLE_LOADED,
            success::CONSTANT_DEFINED,
            success::DEFINE_TABLE_CLEARED,
        ];

        for code in codes {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "missing metadata for {}", code);
            assert_eq!(metadata.map(|m| m.code), Some(code.as_str()));
        }
    }

    #[test]
    fn test_classification_defaults_for_unknown_code() {
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
        assert!(!requires_halt("X999"));
        assert_eq!(get_category("X999"), "Unknown");
    }

    #[test]
    fn test_define_errors_are_recoverable() {
        assert!(is_recoverable(defines::DUPLICATE_DEFINE.as_str()));
        assert!(!requires_halt(defines::DEFINE_TABLE_FULL.as_str()));
        assert_eq!(get_category(defines::EMPTY_DEFINE_NAME.as_str()), "Defines");
    }

    #[test]
    fn test_severity_round_trip_names() {
        for severity in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ] {
            assert_eq!(Severity::parse(severity.as_str()), Some(severity));
        }
    }
}
