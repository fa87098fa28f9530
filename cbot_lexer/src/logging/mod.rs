//! Structured, code-based logging for the tokenizer
//!
//! Events go to a process-wide [`LoggingService`] once
//! [`init_global_logging`] has run; before that, logging is a no-op. A
//! thread can temporarily route its events elsewhere with
//! [`with_scoped_logger`], and tag them with the script being processed
//! through [`with_source_context`].

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, EventSummary, Logger, LoggingService, MemoryLogger, MultiLogger,
    StructuredLogger,
};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SOURCE_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
    static SCOPED_LOGGER: RefCell<Option<Arc<LoggingService>>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the global logging service built from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logger: Arc<dyn Logger> = Arc::new(service::create_configured_multi_logger());
    let service = Arc::new(LoggingService::new(logger, config::get_min_log_level()));

    init_global_logging_with_service(service.clone())?;

    service.log_success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );

    Ok(())
}

/// Install a caller-built service as the global logger
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// THREAD-SCOPED ROUTING
// ============================================================================

struct ScopedLoggerGuard {
    previous: Option<Arc<LoggingService>>,
}

impl Drop for ScopedLoggerGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        SCOPED_LOGGER.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Run `f` with this thread's events routed to `service` instead of the
/// global logger
pub fn with_scoped_logger<F, R>(service: Arc<LoggingService>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = SCOPED_LOGGER.with(|slot| slot.borrow_mut().replace(service));
    let _guard = ScopedLoggerGuard { previous };
    f()
}

fn current_service() -> Option<Arc<LoggingService>> {
    SCOPED_LOGGER
        .with(|slot| slot.borrow().clone())
        .or_else(|| GLOBAL_LOGGER.get().cloned())
}

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

pub fn set_source_context(name: &str) {
    SOURCE_CONTEXT.with(|ctx| *ctx.borrow_mut() = Some(name.to_string()));
}

pub fn clear_source_context() {
    SOURCE_CONTEXT.with(|ctx| *ctx.borrow_mut() = None);
}

pub fn get_current_source_context() -> Option<String> {
    SOURCE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Tag every event logged by `f` on this thread with the script name
pub fn with_source_context<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_source_context();
    set_source_context(name);
    let result = f();
    match previous {
        Some(previous) => set_source_context(&previous),
        None => clear_source_context(),
    }
    result
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Whether debug events would be emitted on this thread
pub fn debug_enabled() -> bool {
    current_service()
        .map(|service| service.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

/// Attach ambient context and hand the event to the active service
pub fn dispatch(mut event: LogEvent) {
    let Some(service) = current_service() else {
        return;
    };

    let max_len = config::get_max_log_message_length();
    if event.message.len() > max_len {
        let mut cut = max_len;
        while !event.message.is_char_boundary(cut) {
            cut -= 1;
        }
        event.message.truncate(cut);
    }

    if config::include_source_context() {
        if let Some(name) = get_current_source_context() {
            event = event.with_source_name(&name);
        }
    }

    service.log_event(event);
}

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    dispatch(event);
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let event = context
        .into_iter()
        .fold(LogEvent::success(code, message), |event, (k, v)| {
            event.with_context(k, v)
        });
    dispatch(event);
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let event = context
        .into_iter()
        .fold(LogEvent::info(message), |event, (k, v)| {
            event.with_context(k, v)
        });
    dispatch(event);
}

/// Log an error, falling back to stderr when no logger is installed
pub fn safe_log_error(code: Code, message: &str) {
    if current_service().is_some() {
        dispatch(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}
