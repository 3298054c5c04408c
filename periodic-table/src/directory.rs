use crate::{BUILTIN_ELEMENTS, ElementRecord};
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("key '{key}' is claimed by both {existing} and {incoming}")]
    DuplicateKey { key: String, existing: String, incoming: String },
}

/// Immutable key → element mapping. Keys are element symbols and Chinese
/// names; matching is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct Directory {
    records: Vec<ElementRecord>,
    index: HashMap<&'static str, usize>,
}

static BUILTIN: OnceLock<Directory> = OnceLock::new();

impl Directory {
    pub fn from_records(
        records: impl IntoIterator<Item = ElementRecord>,
    ) -> Result<Self, DirectoryError> {
        let mut records: Vec<ElementRecord> = records.into_iter().collect();
        records.sort_by_key(|r| r.atomic_number);

        let mut index = HashMap::with_capacity(records.len() * 2);
        for (pos, record) in records.iter().enumerate() {
            for key in record.keys() {
                match index.get(key) {
                    Some(&existing) if existing != pos => {
                        let existing: &ElementRecord = &records[existing];
                        return Err(DirectoryError::DuplicateKey {
                            key: key.to_string(),
                            existing: existing.symbol.to_string(),
                            incoming: record.symbol.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        index.insert(key, pos);
                    }
                }
            }
        }

        Ok(Self { records, index })
    }

    /// Directory over [`BUILTIN_ELEMENTS`], built on first use.
    ///
    /// # Panics
    /// Panics if the built-in table assigns one key to two elements.
    pub fn builtin() -> &'static Directory {
        BUILTIN.get_or_init(|| match Self::from_records(BUILTIN_ELEMENTS.iter().cloned()) {
            Ok(directory) => directory,
            Err(e) => panic!("built-in element table is inconsistent: {e}"),
        })
    }

    pub fn lookup(&self, key: &str) -> Option<&ElementRecord> {
        self.index.get(key).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of elements (not keys).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All elements ordered by atomic number.
    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }
}
