use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    VideoLectures,
    PracticeProblems,
    ReferenceMaterials,
    PastPapers,
    StudyNotes,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::VideoLectures,
        Category::PracticeProblems,
        Category::ReferenceMaterials,
        Category::PastPapers,
        Category::StudyNotes,
        Category::Other,
    ];

    /// Label shown to users and stored in the `category` column.
    pub fn label(&self) -> &'static str {
        match self {
            Category::VideoLectures => "Video Lectures",
            Category::PracticeProblems => "Practice Problems",
            Category::ReferenceMaterials => "Reference Materials",
            Category::PastPapers => "Past Papers",
            Category::StudyNotes => "Study Notes",
            Category::Other => "Other",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::InvalidCategory(wanted.to_string()))
    }
}

/// Category column as read back from the database. Labels outside the fixed
/// set (written by hand or by another tool) are kept verbatim so the listing
/// shows what the `category = ?` filter actually compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCategory {
    Known(Category),
    Unrecognised(String),
}

impl StoredCategory {
    pub fn label(&self) -> &str {
        match self {
            StoredCategory::Known(category) => category.label(),
            StoredCategory::Unrecognised(label) => label,
        }
    }
}

impl From<String> for StoredCategory {
    fn from(label: String) -> Self {
        match label.parse() {
            Ok(category) => StoredCategory::Known(category),
            Err(_) => StoredCategory::Unrecognised(label),
        }
    }
}

impl From<Category> for StoredCategory {
    fn from(category: Category) -> Self {
        StoredCategory::Known(category)
    }
}

impl PartialEq<Category> for StoredCategory {
    fn eq(&self, other: &Category) -> bool {
        matches!(self, StoredCategory::Known(category) if category == other)
    }
}

impl fmt::Display for StoredCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Browse filter over categories. `All` never reaches the store: it maps to
/// `None` through [`CategoryFilter::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(*category),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::ALL[0]),
            CategoryFilter::Only(Category::Other) => CategoryFilter::All,
            CategoryFilter::Only(category) => CategoryFilter::Only(category.next()),
        }
    }

    pub fn cycle_back(&self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::Other),
            CategoryFilter::Only(Category::VideoLectures) => CategoryFilter::All,
            CategoryFilter::Only(category) => CategoryFilter::Only(category.prev()),
        }
    }
}
