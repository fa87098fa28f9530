//! Lazily populated keyword table

use super::{BuiltinStrings, KeywordCategory, StringProvider, CATEGORY_WIDTH};
use crate::config::compile_time::lexical::MAX_KEYWORD_COUNT;
use crate::logging::codes;
use crate::{log_debug, log_success, log_warning};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Default)]
struct KeywordEntries {
    by_spelling: HashMap<String, i64>,
    ordered: Vec<(String, i64)>,
}

/// Maps keyword spellings to stable ids.
///
/// The table is filled from its provider on the first lookup and stays
/// filled until [`KeywordTable::reset`].
pub struct KeywordTable {
    provider: Box<dyn StringProvider>,
    entries: OnceLock<KeywordEntries>,
}

impl KeywordTable {
    pub fn new(provider: impl StringProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            entries: OnceLock::new(),
        }
    }

    /// Table over the standard CBOT spellings
    pub fn builtin() -> Self {
        Self::new(BuiltinStrings)
    }

    /// Id for an exact spelling, or -1 if it is not a keyword
    pub fn lookup(&self, word: &str) -> i64 {
        self.entries()
            .by_spelling
            .get(word)
            .copied()
            .unwrap_or(-1)
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.lookup(word) > 0
    }

    /// Spelling registered for `id`
    pub fn spelling(&self, id: i64) -> Option<&str> {
        self.entries()
            .ordered
            .iter()
            .find(|(_, entry_id)| *entry_id == id)
            .map(|(spelling, _)| spelling.as_str())
    }

    /// Force population; returns the number of loaded keywords
    pub fn populate(&self) -> usize {
        self.entries().ordered.len()
    }

    pub fn is_populated(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Forget loaded entries; the next lookup queries the provider again
    pub fn reset(&mut self) {
        self.entries = OnceLock::new();
    }

    pub fn len(&self) -> usize {
        self.entries().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in population order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries()
            .ordered
            .iter()
            .map(|(spelling, id)| (spelling.as_str(), *id))
    }

    fn entries(&self) -> &KeywordEntries {
        self.entries.get_or_init(|| load_entries(self.provider.as_ref()))
    }
}

fn load_entries(provider: &dyn StringProvider) -> KeywordEntries {
    let mut entries = KeywordEntries::default();
    let mut per_category = [0usize; 4];
    let mut dropped = 0usize;

    for (slot, category) in KeywordCategory::ALL.iter().enumerate() {
        let base = category.base();
        let mut id = base;

        loop {
            if id >= base + CATEGORY_WIDTH {
                log_warning!(
                    code = codes::keywords::KEYWORD_ID_OUT_OF_RANGE,
                    "Keyword provider did not end category within its id range",
                    "category" => category,
                    "limit" => CATEGORY_WIDTH
                );
                break;
            }

            let spelling = provider.load_string(id);
            if spelling.is_empty() {
                break;
            }

            if entries.ordered.len() >= MAX_KEYWORD_COUNT {
                dropped += 1;
            } else if entries.by_spelling.contains_key(&spelling) {
                log_debug!("Duplicate keyword spelling ignored",
                    "spelling" => &spelling, "id" => id);
            } else {
                entries.by_spelling.insert(spelling.clone(), id);
                entries.ordered.push((spelling, id));
                per_category[slot] += 1;
            }

            id += 1;
        }
    }

    if dropped > 0 {
        log_warning!(
            code = codes::keywords::KEYWORD_TABLE_FULL,
            "Keyword table full, remaining keywords dropped",
            "limit" => MAX_KEYWORD_COUNT,
            "dropped" => dropped
        );
    }

    log_success!(
        codes::success::KEYWORD_TABLE_LOADED,
        "Keyword table populated",
        "language" => per_category[0],
        "declarations" => per_category[1],
        "values" => per_category[2],
        "operators" => per_category[3],
        "total" => entries.ordered.len()
    );

    entries
}

impl fmt::Debug for KeywordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordTable")
            .field("populated", &self.is_populated())
            .field(
                "len",
                &self.entries.get().map(|entries| entries.ordered.len()),
            )
            .finish()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{ids, TableStrings};
    use crate::logging::{with_scoped_logger, LogLevel, LoggingService, MemoryLogger};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts provider queries to observe lazy population
    struct CountingStrings {
        calls: Arc<AtomicUsize>,
    }

    impl StringProvider for CountingStrings {
        fn load_string(&self, id: i64) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BuiltinStrings.load_string(id)
        }
    }

    /// Never returns an empty string
    struct EndlessStrings;

    impl StringProvider for EndlessStrings {
        fn load_string(&self, id: i64) -> String {
            format!("kw{}", id)
        }
    }

    #[test]
    fn test_builtin_lookup() {
        let table = KeywordTable::builtin();
        assert_eq!(table.lookup("if"), ids::IF);
        assert_eq!(table.lookup("int"), ids::INT);
        assert_eq!(table.lookup("true"), ids::TRUE);
        assert_eq!(table.lookup("=="), ids::EQ);
        assert_eq!(table.lookup(">>>="), ids::ASSIGN_SHR);
        assert_eq!(table.lookup("goto"), -1);
        assert_eq!(table.lookup(""), -1);
        assert_eq!(table.lookup("IF"), -1);
    }

    #[test]
    fn test_every_loaded_spelling_has_positive_id() {
        let table = KeywordTable::builtin();
        assert_eq!(table.populate(), 88);
        for (spelling, id) in table.iter() {
            assert!(id > 0);
            assert_eq!(table.lookup(spelling), id);
            assert_eq!(table.spelling(id), Some(spelling));
        }
    }

    #[test]
    fn test_population_is_lazy_and_happens_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut table = KeywordTable::new(CountingStrings {
            calls: calls.clone(),
        });

        assert!(!table.is_populated());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        table.lookup("while");
        let after_first = calls.load(Ordering::SeqCst);
        assert!(after_first > 0);

        table.lookup("for");
        assert_eq!(calls.load(Ordering::SeqCst), after_first);

        table.reset();
        assert!(!table.is_populated());
        table.lookup("for");
        assert_eq!(calls.load(Ordering::SeqCst), after_first * 2);
    }

    #[test]
    fn test_first_spelling_wins() {
        let strings = TableStrings::new(
            vec!["dup".to_string()],
            vec!["dup".to_string(), "int".to_string()],
            vec![],
            vec![],
        )
        .unwrap();
        let table = KeywordTable::new(strings);

        assert_eq!(table.lookup("dup"), 2000);
        assert_eq!(table.lookup("int"), 2101);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_capacity_and_range_limits() {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));

        let table = KeywordTable::new(EndlessStrings);
        let loaded = with_scoped_logger(service, || table.populate());

        assert_eq!(loaded, MAX_KEYWORD_COUNT.min(4 * CATEGORY_WIDTH as usize));
        assert_eq!(
            memory
                .get_events_with_code(codes::keywords::KEYWORD_ID_OUT_OF_RANGE)
                .len(),
            4
        );
        assert!(memory.has_success_with_code(codes::success::KEYWORD_TABLE_LOADED));
    }

    #[test]
    fn test_debug_does_not_force_population() {
        let table = KeywordTable::builtin();
        let rendered = format!("{:?}", table);
        assert!(rendered.contains("populated: false"));
        assert!(!table.is_populated());
    }
}
