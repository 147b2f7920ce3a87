//! Posting type stored under each indexed term.

use std::fmt;

use crate::document::DocumentKey;

/// A reference from a term to one field of one document.
///
/// Postings order by document key first, so a sorted posting set groups all
/// fields of a document together.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Posting {
    pub key: DocumentKey,
    pub field: String,
}

impl Posting {
    pub fn new<S: Into<String>>(key: DocumentKey, field: S) -> Self {
        Posting {
            key,
            field: field.into(),
        }
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.field)
    }
}
