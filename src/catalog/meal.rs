use serde::{Deserialize, Serialize};

/// Prefix for ids generated locally; remote ids are numeric strings.
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// A catalog record plus the user's local annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Remote URL, or a `data:` URI for uploaded images.
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub liked: bool,
    /// Soft-delete flag. Deleted meals stay in the set.
    #[serde(default)]
    pub deleted: bool,
    /// True only for meals created locally.
    #[serde(default)]
    pub is_custom: bool,
}

impl Meal {
    /// A freshly fetched meal with no annotations.
    pub fn remote(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            thumbnail_url: thumbnail_url.into(),
            liked: false,
            deleted: false,
            is_custom: false,
        }
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Applies a partial update. `id` and `is_custom` are never touched.
    pub fn apply(&mut self, patch: MealPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            self.thumbnail_url = thumbnail_url;
        }
    }
}

/// Fields supplied when creating a custom meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
}

impl NewMeal {
    pub fn into_meal(self, id: String) -> Meal {
        Meal {
            id,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            liked: false,
            deleted: false,
            is_custom: true,
        }
    }
}

/// Partial update for an existing meal. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl MealPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.thumbnail_url.is_none()
    }
}

/// Persisted envelope: only the item set, never UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCatalog {
    #[serde(default)]
    pub meals: Vec<Meal>,
}
