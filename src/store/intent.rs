use crate::catalog::{Meal, MealFilter, MealPatch};
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum CatalogIntent {
    /// Replace the item set with what was read from storage at startup.
    Hydrate { meals: Vec<Meal> },
    FetchStarted,
    /// Merge fetched meals: unknown ids are added, known ids left untouched.
    FetchFinished { meals: Vec<Meal> },
    /// Fetch ended on any path (success, failure, cancellation).
    FetchSettled,
    ToggleLike { id: String },
    /// Soft delete or restore.
    ToggleDelete { id: String },
    /// Prepend a locally created meal. The id must already be unique.
    AddCustom { meal: Meal },
    Update { id: String, patch: MealPatch },
    SetFilter(MealFilter),
    SetSearchTerm(String),
    SetPage(usize),
}

impl Intent for CatalogIntent {}

impl CatalogIntent {
    /// Whether the intent can change the persisted item set.
    pub fn mutates_meals(&self) -> bool {
        matches!(
            self,
            Self::FetchFinished { .. }
                | Self::ToggleLike { .. }
                | Self::ToggleDelete { .. }
                | Self::AddCustom { .. }
                | Self::Update { .. }
        )
    }
}
