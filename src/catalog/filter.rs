use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::meal::Meal;

/// Which slice of the catalog the list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealFilter {
    /// Everything not soft-deleted.
    #[default]
    All,
    /// Liked and not soft-deleted.
    Liked,
    /// Soft-deleted only.
    Deleted,
}

impl MealFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Liked => "liked",
            Self::Deleted => "deleted",
        }
    }

    pub fn admits(&self, meal: &Meal) -> bool {
        match self {
            Self::All => !meal.deleted,
            Self::Liked => meal.liked && !meal.deleted,
            Self::Deleted => meal.deleted,
        }
    }
}

impl fmt::Display for MealFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "liked" => Ok(Self::Liked),
            "deleted" => Ok(Self::Deleted),
            other => Err(format!(
                "unknown filter '{}' (expected all, liked or deleted)",
                other
            )),
        }
    }
}
