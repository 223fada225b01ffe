//! Status resolver

use crate::matcher::Bindings;
use crate::types::{Document, DocumentStatus};
use indexmap::IndexMap;

/// Status of a slot given its bound document
///
/// Absent maps to `NoFile`; otherwise the store's status passes through.
#[inline]
#[must_use]
pub fn status_of(bound: Option<&Document>) -> DocumentStatus {
    bound.map_or(DocumentStatus::NoFile, |doc| doc.status.clone())
}

/// Statuses for every resolved slot, in slot order
#[must_use]
pub fn statuses(bindings: &Bindings<'_>) -> IndexMap<String, DocumentStatus> {
    bindings
        .iter()
        .map(|(key, bound)| (key.to_string(), status_of(bound)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_no_file() {
        assert_eq!(status_of(None), DocumentStatus::NoFile);
    }

    #[test]
    fn passes_store_status_through() {
        let doc = Document::new("1", "X.pdf", DocumentStatus::Other("ON HOLD".into()), "cv1");
        assert_eq!(status_of(Some(&doc)), DocumentStatus::Other("ON HOLD".into()));
    }
}
