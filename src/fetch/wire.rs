//! Response shapes of the remote search endpoint.

use serde::Deserialize;

use crate::catalog::Meal;

/// `GET search.php?f=<letter>` body. `meals` is `null` when the letter has
/// no results.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub meals: Option<Vec<RemoteMeal>>,
}

/// The fields we keep from a remote record; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RemoteMeal {
    #[serde(rename = "idMeal", default)]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default)]
    pub title: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

impl RemoteMeal {
    /// Absent or null fields become empty strings. Records without an id
    /// cannot be merged and yield `None`.
    pub fn into_meal(self) -> Option<Meal> {
        let id = self.id.map(|id| id.trim().to_string()).unwrap_or_default();
        if id.is_empty() {
            return None;
        }
        Some(Meal::remote(
            id,
            self.title.unwrap_or_default(),
            self.instructions.unwrap_or_default(),
            self.thumbnail.unwrap_or_default(),
        ))
    }
}

impl SearchResponse {
    pub fn into_meals(self) -> Vec<Meal> {
        self.meals
            .unwrap_or_default()
            .into_iter()
            .filter_map(RemoteMeal::into_meal)
            .collect()
    }
}
