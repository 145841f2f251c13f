//! The ordered category table that defines the classification universe.
//!
//! Category order is semantically significant: prompts are fed to the model
//! in table order, logits map back to entries by index, and exact score ties
//! resolve to the earlier entry. The table is immutable after construction.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigError;

/// One classification target: a short human label and the natural-language
/// prompt scored against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Short human label, unique within the table. Doubles as the
    /// destination subfolder name.
    pub id: String,

    /// Free-text description fed to the text encoder.
    pub prompt: String,
}

impl CategoryEntry {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
        }
    }
}

/// Ordered, read-only sequence of category entries.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

impl CategoryTable {
    /// Build a table from a list of entries.
    ///
    /// Fails if the list is empty or contains duplicate ids.
    pub fn new(entries: Vec<CategoryEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyCategoryTable);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(ConfigError::DuplicateCategory {
                    id: entry.id.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// The built-in 8-category table, Arabic labels with English prompts.
    pub fn builtin() -> Self {
        let entries = vec![
            CategoryEntry::new("أشخاص", "a photo of a person"),
            CategoryEntry::new("طعام", "a photo of food"),
            CategoryEntry::new("حيوانات", "a photo of an animal"),
            CategoryEntry::new("نباتات", "a photo of a plant"),
            CategoryEntry::new("طبيعة", "a photo of a landscape"),
            CategoryEntry::new("مباني", "a photo of a building"),
            CategoryEntry::new("مركبات", "a photo of a vehicle"),
            CategoryEntry::new("أخرى", "a miscellaneous photo"),
        ];
        // The built-in list is statically well-formed.
        Self { entries }
    }

    /// Entries in configured order.
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Prompts in the same order as `entries()`.
    pub fn prompt_list(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.prompt.clone()).collect()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_eight_entries() {
        let table = CategoryTable::builtin();
        assert_eq!(table.len(), 8);
        assert_eq!(table.entries()[0].id, "أشخاص");
        assert_eq!(table.entries()[7].id, "أخرى");
    }

    #[test]
    fn test_prompt_list_preserves_order() {
        let table = CategoryTable::builtin();
        let prompts = table.prompt_list();
        assert_eq!(prompts[0], "a photo of a person");
        assert_eq!(prompts[4], "a photo of a landscape");
        assert_eq!(prompts[7], "a miscellaneous photo");
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = CategoryTable::new(vec![]);
        assert!(matches!(result, Err(ConfigError::EmptyCategoryTable)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let entries = vec![
            CategoryEntry::new("pets", "a photo of a pet"),
            CategoryEntry::new("pets", "a photo of a dog"),
        ];
        let result = CategoryTable::new(entries);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateCategory { id }) if id == "pets"
        ));
    }

    #[test]
    fn test_custom_table_order_preserved() {
        let entries = vec![
            CategoryEntry::new("b", "prompt b"),
            CategoryEntry::new("a", "prompt a"),
        ];
        let table = CategoryTable::new(entries).unwrap();
        assert_eq!(table.entries()[0].id, "b");
        assert_eq!(table.entries()[1].id, "a");
    }
}
