//! Loading CBOT scripts from disk

mod loader;

pub use loader::{SourceError, SourceLoader, SourceMetadata, SourceText, SCRIPT_EXTENSIONS};

use crate::config::runtime::SourcePreferences;

/// Load a script with default settings
pub fn load_source(file_path: &str) -> Result<SourceText, SourceError> {
    SourceLoader::new().load(file_path)
}

/// Create a loader from runtime preferences
pub fn create_loader_from_preferences(prefs: &SourcePreferences) -> SourceLoader {
    SourceLoader::from_preferences(prefs)
}
