//! Document matcher
//!
//! Binds each slot to the first document, in store order, whose title
//! satisfies the slot's match rule. Store order is significant and is never
//! re-sorted here.

use crate::definition::Slot;
use crate::types::Document;
use indexmap::IndexMap;

/// Slot key → bound document (or absence), in slot declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings<'a> {
    inner: IndexMap<&'a str, Option<&'a Document>>,
}

impl<'a> Bindings<'a> {
    /// Document bound to a slot
    ///
    /// Returns `None` both for unknown keys and for slots with no match;
    /// use [`Bindings::contains_slot`] to tell them apart.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Document> {
        self.inner.get(key).copied().flatten()
    }

    /// Whether the slot key was part of the resolution
    #[must_use]
    pub fn contains_slot(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Iterate in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a Document>)> + '_ {
        self.inner.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of slots resolved
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no slots were resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of slots with a bound document
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.inner.values().filter(|d| d.is_some()).count()
    }
}

/// Resolve documents against slots
///
/// A document may bind to more than one slot if its title satisfies several
/// rules; validated definitions rule that out for canonical titles.
#[must_use]
pub fn resolve<'a>(documents: &'a [Document], slots: &'a [Slot]) -> Bindings<'a> {
    let inner = slots
        .iter()
        .map(|slot| {
            let bound = documents.iter().find(|doc| slot.matches(&doc.title));
            (slot.key.as_str(), bound)
        })
        .collect();

    Bindings { inner }
}
