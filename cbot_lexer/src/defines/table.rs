//! Per-compilation-unit table of named integer constants

use super::error::{DefineError, DefineResult};
use crate::config::compile_time::lexical::MAX_DEFINE_COUNT;
use crate::logging::codes;
use crate::{log_error, log_success};
use std::collections::HashMap;

/// Symbolic names bound to integer values by the host before compiling.
///
/// Names scanned as plain words resolve to their value; keywords always
/// take priority. Callers reset the table between compilation units.
#[derive(Debug, Clone)]
pub struct DefineTable {
    values: HashMap<String, i64>,
    order: Vec<String>,
    limit: usize,
}

impl DefineTable {
    pub fn new() -> Self {
        Self::with_limit(MAX_DEFINE_COUNT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            values: HashMap::new(),
            order: Vec::new(),
            limit,
        }
    }

    /// Bind `name` to `value`. Fails for an empty name, a name already
    /// bound, or a full table.
    pub fn define(&mut self, name: &str, value: i64) -> DefineResult<()> {
        let result = self.try_insert(name, value);

        match &result {
            Ok(()) => {
                log_success!(
                    codes::success::CONSTANT_DEFINED,
                    "Constant defined",
                    "name" => name,
                    "value" => value
                );
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "name" => name,
                    "defined" => self.len()
                );
            }
        }

        result
    }

    fn try_insert(&mut self, name: &str, value: i64) -> DefineResult<()> {
        if name.is_empty() {
            return Err(DefineError::EmptyName);
        }
        if self.values.contains_key(name) {
            return Err(DefineError::duplicate(name));
        }
        if self.values.len() >= self.limit {
            return Err(DefineError::overflow(name, self.limit));
        }

        self.values.insert(name.to_string(), value);
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn resolve(&self, word: &str) -> Option<i64> {
        self.values.get(word).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove every definition
    pub fn reset(&mut self) {
        let cleared = self.values.len();
        self.values.clear();
        self.order.clear();

        log_success!(
            codes::success::DEFINE_TABLE_CLEARED,
            "Constant table cleared",
            "cleared" => cleared
        );
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.order
            .iter()
            .filter_map(|name| self.values.get(name).map(|value| (name.as_str(), *value)))
    }
}

impl Default for DefineTable {
    fn default() -> Self {
        Self::new()
    }
}
