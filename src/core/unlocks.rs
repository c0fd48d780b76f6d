use std::collections::BTreeSet;

use crate::model::{ID_DELIMITER, ItemCatalog, ItemId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockTracker {
    unlocked: BTreeSet<ItemId>,
}

impl UnlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: &ItemId) -> bool {
        if self.unlocked.contains(id) {
            return false;
        }
        self.unlocked.insert(id.clone())
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.unlocked.contains(id)
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.unlocked.iter()
    }

    pub fn completion_percent(&self, catalog: &ItemCatalog) -> u32 {
        if catalog.is_empty() {
            return 0;
        }
        let collected = self.unlocked.iter().filter(|id| catalog.contains(id)).count();
        (collected * 100 / catalog.len()) as u32
    }

    pub fn to_delimited(&self) -> String {
        let ids = self.unlocked.iter().map(ItemId::as_str).collect::<Vec<_>>();
        ids.join(&ID_DELIMITER.to_string())
    }

    pub fn from_delimited(raw: &str) -> Self {
        let unlocked = raw
            .split(ID_DELIMITER)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ItemId::new)
            .collect();
        Self { unlocked }
    }
}

impl FromIterator<ItemId> for UnlockTracker {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self {
            unlocked: iter.into_iter().collect(),
        }
    }
}
