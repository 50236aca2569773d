//! Shopping list store: the single list shared by the voice and chat channels.
//!
//! DESIGN
//! ======
//! One `Vec` behind a `std::sync::Mutex`. Every operation takes the lock,
//! finishes its read-modify-write, and releases it before returning, so no
//! caller can observe a half-applied append. Nothing awaits while the lock is
//! held; rendering and delivery work on the cloned snapshot.
//!
//! The list only grows by one entry at a time or empties completely.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ListError {
    #[error("product name is empty")]
    InvalidProduct,
}

/// One product on the list. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListEntry {
    pub product: String,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

/// Cheap to clone; all clones share the same list.
#[derive(Clone, Default)]
pub struct ShoppingListStore {
    entries: Arc<Mutex<Vec<ShoppingListEntry>>>,
}

impl ShoppingListStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a product stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidProduct`] for empty or whitespace-only text.
    pub fn append(&self, product: &str) -> Result<ShoppingListEntry, ListError> {
        self.append_at(product, OffsetDateTime::now_utc())
    }

    /// Append and copy the resulting list under the same lock, so the copy is
    /// exactly the state this append produced.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidProduct`] for empty or whitespace-only text.
    pub fn append_with_snapshot(
        &self,
        product: &str,
    ) -> Result<(ShoppingListEntry, Vec<ShoppingListEntry>), ListError> {
        let mut entries = self.lock();
        let entry = push_entry(&mut entries, product, OffsetDateTime::now_utc())?;
        Ok((entry, entries.clone()))
    }

    pub(crate) fn append_at(&self, product: &str, now: OffsetDateTime) -> Result<ShoppingListEntry, ListError> {
        push_entry(&mut self.lock(), product, now)
    }

    /// Copy of the full list, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ShoppingListEntry> {
        self.lock().clone()
    }

    /// Empty the list and return how many entries were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ShoppingListEntry>> {
        // A panic elsewhere never leaves a partial entry behind, so the data stays valid.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn push_entry(
    entries: &mut Vec<ShoppingListEntry>,
    product: &str,
    now: OffsetDateTime,
) -> Result<ShoppingListEntry, ListError> {
    let product = product.trim();
    if product.is_empty() {
        return Err(ListError::InvalidProduct);
    }

    // EDGE: wall clock can step backwards; keep list order and time order aligned.
    let added_at = entries
        .last()
        .map_or(now, |last| last.added_at.max(now));
    let entry = ShoppingListEntry { product: product.to_owned(), added_at };
    entries.push(entry.clone());
    Ok(entry)
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
