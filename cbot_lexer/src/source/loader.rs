//! Script file loading with compile-time size limits

use crate::config::compile_time::source::{LARGE_SOURCE_THRESHOLD, MAX_SOURCE_SIZE};
use crate::config::runtime::SourcePreferences;
use crate::logging::codes;
use crate::utils::SourceMap;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Extensions recognized as CBOT scripts
pub const SCRIPT_EXTENSIONS: &[&str] = &["txt", "cbot"];

#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("Script not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid script extension: expected .txt or .cbot, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("Script too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in script: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading script: {message}")]
    IoError { message: String },

    #[error("Invalid script path: {path}")]
    InvalidPath { path: String },
}

impl SourceError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SourceError::FileNotFound { .. } => codes::source::FILE_NOT_FOUND,
            SourceError::InvalidExtension { .. } => codes::source::INVALID_EXTENSION,
            SourceError::FileTooLarge { .. } => codes::source::FILE_TOO_LARGE,
            SourceError::PermissionDenied { .. } => codes::source::PERMISSION_DENIED,
            SourceError::InvalidEncoding { .. } => codes::source::INVALID_ENCODING,
            SourceError::IoError { .. } => codes::source::IO_ERROR,
            SourceError::InvalidPath { .. } => codes::source::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Canonical path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_script_file: bool,
    pub modified: Option<SystemTime>,
}

impl SourceMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    pub fn is_large(&self) -> bool {
        self.size > LARGE_SOURCE_THRESHOLD
    }
}

fn human_readable(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// A loaded script ready for tokenizing
#[derive(Debug, Clone)]
pub struct SourceText {
    /// File name used as the logging source context
    pub name: String,
    pub text: String,
    pub metadata: SourceMetadata,
    pub duration: Duration,
}

impl SourceText {
    pub fn source_map(&self) -> SourceMap {
        SourceMap::new(self.text.clone())
    }

    /// Only whitespace, or nothing at all
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Reads script files from disk
#[derive(Debug, Clone)]
pub struct SourceLoader {
    pub require_script_extension: bool,
    pub enable_performance_logging: bool,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self::from_preferences(&SourcePreferences::default())
    }

    pub fn from_preferences(prefs: &SourcePreferences) -> Self {
        Self {
            require_script_extension: prefs.require_script_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_script_extension_required(mut self, required: bool) -> Self {
        self.require_script_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn max_source_size() -> u64 {
        MAX_SOURCE_SIZE
    }

    pub fn load(&self, file_path: &str) -> Result<SourceText, SourceError> {
        let started = Instant::now();
        log_debug!("Loading script", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let mut metadata = self.read_metadata(&path)?;
        self.validate(&metadata, file_path)?;
        let text = self.read(&path, file_path)?;
        metadata.line_count = text.lines().count();

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.to_string());

        let source = SourceText {
            name,
            text,
            metadata,
            duration: started.elapsed(),
        };
        self.log_loaded(&source, file_path);
        Ok(source)
    }

    fn log_loaded(&self, source: &SourceText, file_path: &str) {
        let duration_ms = format!("{:.2}", source.duration.as_secs_f64() * 1000.0);

        if self.enable_performance_logging {
            log_success!(
                codes::success::SOURCE_LOADED,
                "Script loaded with performance metrics",
                "file" => file_path,
                "size_bytes" => source.metadata.size,
                "size_human" => source.metadata.human_readable_size(),
                "lines" => source.metadata.line_count,
                "duration_ms" => duration_ms,
                "is_large" => source.metadata.is_large()
            );
        } else {
            log_success!(
                codes::success::SOURCE_LOADED,
                "Script loaded",
                "file" => file_path,
                "lines" => source.metadata.line_count
            );
        }
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, SourceError> {
        if file_path.is_empty() {
            let error = SourceError::InvalidPath {
                path: String::new(),
            };
            log_error!(error.error_code(), "Empty script path provided");
            return Err(error);
        }

        let path = Path::new(file_path);

        if !path.exists() {
            let error = SourceError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Script not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = SourceError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        path.canonicalize().map_err(|e| {
            let error = SourceError::IoError {
                message: format!("Failed to resolve path '{}': {}", file_path, e),
            };
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => file_path,
                "io_error" => e);
            error
        })
    }

    fn read_metadata(&self, path: &Path) -> Result<SourceMetadata, SourceError> {
        let metadata = fs::metadata(path).map_err(|e| self.io_failure(path, e))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        let is_script_file = extension
            .as_deref()
            .map(|ext| SCRIPT_EXTENSIONS.contains(&ext))
            .unwrap_or(false);

        let source_metadata = SourceMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_script_file,
            modified: metadata.modified().ok(),
        };

        log_debug!("Script metadata collected",
            "size_bytes" => source_metadata.size,
            "extension" => source_metadata.extension.as_deref().unwrap_or("none"),
            "is_script" => is_script_file,
            "max_size_bytes" => MAX_SOURCE_SIZE);

        Ok(source_metadata)
    }

    fn validate(&self, metadata: &SourceMetadata, file_path: &str) -> Result<(), SourceError> {
        if metadata.size > MAX_SOURCE_SIZE {
            let error = SourceError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_SOURCE_SIZE,
            };
            log_error!(error.error_code(), "Script exceeds maximum source size",
                "file" => file_path,
                "size_human" => metadata.human_readable_size(),
                "limit_human" => human_readable(MAX_SOURCE_SIZE));
            return Err(error);
        }

        if self.require_script_extension && !metadata.is_script_file {
            let error = SourceError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "Script does not have a required extension",
                "file" => file_path,
                "extension" => metadata.extension.as_deref().unwrap_or("none"));
            return Err(error);
        }

        if metadata.size == 0 {
            log_debug!("Script is empty", "file" => file_path);
        }

        Ok(())
    }

    fn read(&self, path: &Path, file_path: &str) -> Result<String, SourceError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                log_debug!("Script content read",
                    "file" => file_path,
                    "bytes" => content.len());
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                let error = SourceError::InvalidEncoding {
                    path: path.display().to_string(),
                };
                log_error!(error.error_code(), "Invalid UTF-8 encoding in script",
                    "file" => file_path);
                Err(error)
            }
            Err(e) => Err(self.io_failure(path, e)),
        }
    }

    fn io_failure(&self, path: &Path, e: std::io::Error) -> SourceError {
        let error = match e.kind() {
            std::io::ErrorKind::PermissionDenied => SourceError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => SourceError::IoError {
                message: format!("Failed to read '{}': {}", path.display(), e),
            },
        };
        log_error!(error.error_code(), "Failed to access script",
            "path" => path.display(),
            "io_error" => e);
        error
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}
