//! Post entity: the downloadable resource. Posts are owned by the content
//! subsystem; this crate only reads them to resolve attachments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ValidationError;

/// Kind of downloadable file attached to a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Zip,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Zip => "zip",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(FileKind::Pdf),
            "zip" => Ok(FileKind::Zip),
            other => Err(ValidationError::InvalidFileKind {
                value: other.to_string(),
            }),
        }
    }
}

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

/// A content post with optional file attachments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,

    /// Relative path of the attached PDF under the storage root, if any
    pub pdf_path: Option<String>,

    /// Relative path of the attached ZIP under the storage root, if any
    pub zip_path: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Returns the stored path of the attachment of the given kind.
    pub fn attachment_path(&self, kind: FileKind) -> Option<&str> {
        match kind {
            FileKind::Pdf => self.pdf_path.as_deref(),
            FileKind::Zip => self.zip_path.as_deref(),
        }
    }
}
