//! Logging configuration: compile-time limits plus runtime preferences
//!
//! Buffer sizes and the enforced log-level floor come from the build profile
//! and cannot be changed at runtime.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences. Can only be done once per process.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized")?;

    Ok(())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    if preferences.use_structured_logging && !preferences.enable_console_logging {
        return Err("Structured logging requires console logging to be enabled".to_string());
    }
    Ok(())
}

/// The floor below which logging can never be made quieter
pub fn get_enforced_log_level() -> LogLevel {
    match SECURITY_MIN_LOG_LEVEL {
        0 => LogLevel::Error,
        1 => LogLevel::Warning,
        _ => LogLevel::Info,
    }
}

/// Minimum level to emit: the user preference, raised to the enforced floor
pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences()
        .min_log_level
        .max(get_enforced_log_level())
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn use_detailed_errors() -> bool {
    get_runtime_preferences().detailed_errors
}

pub fn include_source_context() -> bool {
    get_runtime_preferences().include_source_context
}

pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate compile-time limits and any installed preferences
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE == 0 {
        return Err("Log buffer size must be non-zero".to_string());
    }

    if MAX_LOG_MESSAGE_LENGTH < 64 {
        return Err(format!(
            "Max log message length too small: {}",
            MAX_LOG_MESSAGE_LENGTH
        ));
    }

    if let Some(preferences) = RUNTIME_PREFERENCES.get() {
        validate_preferences(preferences)?;
    }

    Ok(())
}

/// Human-readable configuration dump for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         === Compile-time ===\n\
         - Log buffer size: {}\n\
         - Max message length: {}\n\
         - Enforced level floor: {}\n\
         === Runtime ===\n\
         - Min log level: {}\n\
         - Structured logging: {}\n\
         - Console logging: {}\n\
         - Detailed errors: {}\n\
         - Include source context: {}",
        LOG_BUFFER_SIZE,
        MAX_LOG_MESSAGE_LENGTH,
        get_enforced_log_level().as_str(),
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.detailed_errors,
        preferences.include_source_context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_level_never_below_floor() {
        assert!(get_min_log_level() >= get_enforced_log_level());
    }

    #[test]
    fn test_structured_without_console_rejected() {
        let preferences = LoggingPreferences {
            use_structured_logging: true,
            enable_console_logging: false,
            ..LoggingPreferences::default()
        };
        assert!(validate_preferences(&preferences).is_err());
    }

    #[test]
    fn test_compile_time_limits_valid() {
        assert!(validate_config().is_ok());
        assert!(get_config_summary().contains("Log buffer size"));
    }
}
