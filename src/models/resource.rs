use chrono::{DateTime, Utc};

use super::{Category, StoredCategory};

#[derive(Debug, Clone)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub category: StoredCategory,
    pub url: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub title: String,
    pub category: Category,
    pub url: Option<String>,
    pub description: String,
}

impl NewResource {
    pub fn new(
        title: impl Into<String>,
        category: Category,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            title: title.into(),
            category,
            url: (!url.trim().is_empty()).then(|| url.trim().to_string()),
            description: description.into(),
        }
    }
}

/// Listing filter. Absent fields do not constrain the result; when both are
/// set a record must match the category and the search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
}

impl ResourceFilter {
    pub fn new(category: Option<Category>, search: Option<&str>) -> Self {
        Self {
            category,
            search: search.map(str::to_string),
        }
    }

    /// Search term with empty input folded to `None`. Whitespace is a real
    /// term and only matches text containing it.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}
