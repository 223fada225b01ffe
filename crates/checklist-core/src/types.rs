//! Core types shared with the external document store
//!
//! Defines:
//! - Identifiers for records, documents and content versions
//! - The closed [`DocumentStatus`] vocabulary
//! - The [`Document`] row as reported by the store

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create from any string-like value
            #[inline]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Business record the documents are attached to
    RecordId
);
string_id!(
    /// Logical document identifier
    DocumentId
);
string_id!(
    /// Identifier of one stored version of a document's content
    ContentVersionId
);

/// Review status of a document
///
/// `NoFile` is synthetic: the engine assigns it to slots without a bound
/// document and never persists it. Every other value is owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    /// No document bound to the slot
    NoFile,
    /// Uploaded, awaiting review
    Pending,
    /// Accepted by a reviewer
    Approved,
    /// Refused by a reviewer
    Rejected,
    /// Any other status the store reports, passed through verbatim
    Other(String),
}

impl DocumentStatus {
    /// Wire representation used by the document store
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoFile => "NO FILE",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this status counts toward progress
    #[inline]
    #[must_use]
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "NO FILE" => Self::NoFile,
            "PENDING" => Self::Pending,
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for DocumentStatus {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<DocumentStatus> for String {
    fn from(value: DocumentStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Document row as reported by the store
///
/// The title is the only correlation key against checklist slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Logical document id
    pub id: DocumentId,
    /// Current title
    pub title: String,
    /// Review status
    pub status: DocumentStatus,
    /// Latest content version
    pub content_version_id: ContentVersionId,
}

impl Document {
    /// Create a document row
    #[must_use]
    pub fn new(
        id: impl Into<DocumentId>,
        title: impl Into<String>,
        status: DocumentStatus,
        content_version_id: impl Into<ContentVersionId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            content_version_id: content_version_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        assert_eq!(DocumentStatus::Approved.as_str(), "APPROVED");
        assert_eq!(DocumentStatus::NoFile.to_string(), "NO FILE");
        assert_eq!(
            "IN REVIEW".parse::<DocumentStatus>().unwrap(),
            DocumentStatus::Other("IN REVIEW".to_string())
        );
    }

    #[test]
    fn document_deserializes_from_store_json() {
        let raw = r#"{"id":"069A","title":"CRM License.pdf","status":"APPROVED","contentVersionId":"068A"}"#;
        let doc: Document = serde_json::from_str(raw).unwrap();

        assert_eq!(doc.id.as_str(), "069A");
        assert!(doc.status.is_approved());
        assert_eq!(doc.content_version_id, ContentVersionId::from("068A"));
    }
}
