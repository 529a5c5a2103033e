//! Subject kinds: the two things the front end can book.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of subject being listed or booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// A book from the catalogue.
    Catalogue,
    /// A movie for rent.
    Movie,
}

impl SubjectKind {
    /// The collection path on the external API.
    pub const fn collection_path(self) -> &'static str {
        match self {
            Self::Catalogue => "catalogue",
            Self::Movie => "movies",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalogue => f.write_str("catalogue"),
            Self::Movie => f.write_str("movie"),
        }
    }
}
