//! Knowledge source domain models.

use crate::session::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A knowledge-base document matched for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Document title
    pub title: String,

    /// Space key the document lives in (e.g. "ITKB", "MON")
    pub space: String,

    /// Absolute document URL
    pub url: String,

    /// In-page anchor, when the match points at a section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// Short excerpt around the match
    pub snippet: String,

    /// Last time the document was updated
    pub updated_at: DateTime<Utc>,

    /// Whether the current user is allowed to open the document
    pub accessible: bool,
}

/// Filters to refine source retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchFilters {
    /// Role of the requesting user; drives per-space access checks
    #[serde(default)]
    pub role: UserRole,

    /// Restrict results to these space keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces: Option<Vec<String>>,
}

impl SearchFilters {
    /// Filters for a plain retrieval on behalf of `role`.
    pub fn for_role(role: UserRole) -> Self {
        Self { role, spaces: None }
    }
}
