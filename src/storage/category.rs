use indexmap::IndexMap;

use super::serialization::WireCategory;
use super::{Entry, Member, admit, valid_sorted};
use crate::error::{KeychainError, Result};

/// Where an entry's declared category points relative to a category.
enum Placement {
    Unset,
    Home,
    Foreign,
}

/// Named collection of entries. Every held entry declares this category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    entries: IndexMap<String, Entry>,
    deleted: bool,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
            deleted: false,
        }
    }

    /// Bulk constructor. Entries declaring another category are skipped, or
    /// re-stamped with this category when `force` is set.
    pub fn with_entries(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = Entry>,
        force: bool,
    ) -> Self {
        let mut category = Self::new(name);
        for entry in entries {
            if force {
                category.insert_forced(entry);
            } else {
                // Mismatches are dropped here rather than reported.
                let _ = category.insert(entry);
            }
        }
        category
    }

    /// Detached rename; every member is re-stamped with the new name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        for entry in self.entries.values_mut() {
            entry.set_category(self.name.clone());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts following the priority rule. An entry without a category is
    /// stamped with this one; an entry declaring another category is rejected.
    pub fn insert(&mut self, mut entry: Entry) -> Result<bool> {
        match self.placement(&entry) {
            Placement::Unset => entry.set_category(self.name.clone()),
            Placement::Foreign => {
                return Err(KeychainError::CategoryMismatch {
                    entry: entry.name().to_string(),
                    declared: entry.category().unwrap_or_default().to_string(),
                    expected: self.name.clone(),
                });
            }
            Placement::Home => {}
        }
        Ok(admit(&mut self.entries, entry))
    }

    /// Inserts after overwriting the entry's declared category.
    pub fn insert_forced(&mut self, mut entry: Entry) -> bool {
        entry.set_category(self.name.clone());
        admit(&mut self.entries, entry)
    }

    /// Keyed insertion; the key must equal the entry's name.
    pub fn insert_as(&mut self, key: &str, entry: Entry) -> Result<bool> {
        if key != entry.name() {
            return Err(KeychainError::NameMismatch {
                key: key.to_string(),
                name: entry.name().to_string(),
            });
        }
        self.insert(entry)
    }

    /// Removes and returns every entry whose declared category is no longer
    /// this one. Entries with no category are silently stamped and kept.
    pub fn outcast(&mut self) -> Vec<Entry> {
        let mut outcasts = Vec::new();
        let mut kept = IndexMap::with_capacity(self.entries.len());
        let entries = std::mem::take(&mut self.entries);
        for (name, mut entry) in entries {
            match self.placement(&entry) {
                Placement::Unset => {
                    entry.set_category(self.name.clone());
                    kept.insert(name, entry);
                }
                Placement::Foreign => outcasts.push(entry),
                Placement::Home => {
                    kept.insert(name, entry);
                }
            }
        }
        self.entries = kept;
        outcasts
    }

    fn placement(&self, entry: &Entry) -> Placement {
        match entry.category() {
            None => Placement::Unset,
            Some(declared) if declared == self.name => Placement::Home,
            Some(_) => Placement::Foreign,
        }
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All entries, tombstones included, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub(crate) fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn valid_entries(&self) -> Vec<&Entry> {
        valid_sorted(&self.entries)
    }

    /// Hard removal, reserved for explicit duplicate merging.
    pub fn purge(&mut self, name: &str) -> Option<Entry> {
        self.entries.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn valid(&self) -> bool {
        !self.deleted
    }

    pub const fn delete(&mut self) -> &mut Self {
        self.deleted = true;
        self
    }

    pub const fn recover(&mut self) -> &mut Self {
        self.deleted = false;
        self
    }

    pub fn export(&self, valid_only: bool) -> Option<WireCategory> {
        if self.deleted && valid_only {
            return None;
        }
        Some(
            self.entries
                .iter()
                .filter_map(|(name, entry)| Some((name.clone(), entry.export(valid_only)?)))
                .collect(),
        )
    }

    pub(crate) fn from_wire(name: &str, wire: WireCategory) -> Self {
        let mut category = Self::new(name);
        for (entry_name, wire_entry) in wire {
            category.insert_forced(Entry::from_wire(&entry_name, name, wire_entry));
        }
        category
    }
}

impl Member for Category {
    fn member_name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self) -> bool {
        self.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_stamps_missing_category() {
        let mut category = Category::new("work");
        assert!(category.insert(Entry::new("mail")).unwrap());
        assert_eq!(category.entry("mail").unwrap().category(), Some("work"));
    }

    #[test]
    fn test_insert_rejects_foreign_entry() {
        let mut category = Category::new("work");
        let err = category
            .insert(Entry::new("mail").with_category("home"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(category.is_empty());

        assert!(category.insert_forced(Entry::new("mail").with_category("home")));
        assert_eq!(category.entry("mail").unwrap().category(), Some("work"));
    }

    #[test]
    fn test_with_entries_skips_mismatch_unless_forced() {
        let entries = || {
            vec![
                Entry::new("a"),
                Entry::new("b").with_category("other"),
                Entry::new("c").with_category("work"),
            ]
        };
        let lenient = Category::with_entries("work", entries(), false);
        assert_eq!(lenient.len(), 2);
        assert!(!lenient.contains("b"));

        let forced = Category::with_entries("work", entries(), true);
        assert_eq!(forced.len(), 3);
        assert_eq!(forced.entry("b").unwrap().category(), Some("work"));
    }

    #[test]
    fn test_outcast_returns_moved_entries() {
        let mut category = Category::new("work");
        category.insert(Entry::new("mail")).unwrap();
        category.insert(Entry::new("bank")).unwrap();
        category.entry_mut("bank").unwrap().set_category("finance");
        category.entry_mut("mail").unwrap().clear_category();

        let outcasts = category.outcast();
        assert_eq!(outcasts.len(), 1);
        assert_eq!(outcasts[0].name(), "bank");
        assert_eq!(category.len(), 1);
        assert_eq!(category.entry("mail").unwrap().category(), Some("work"));
    }

    #[test]
    fn test_renamed_restamps_members() {
        let mut category = Category::new("work");
        category.insert(Entry::new("mail")).unwrap();
        let category = category.renamed("office");
        assert_eq!(category.name(), "office");
        assert_eq!(category.entry("mail").unwrap().category(), Some("office"));
    }
}
