use crate::catalog::{Meal, MealFilter};
use crate::mvi::ViewState;

/// Everything the list and detail views render from.
///
/// Only `meals` is persisted; the rest is transient UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub meals: Vec<Meal>,
    /// True while a fetch is in flight.
    pub loading: bool,
    pub filter: MealFilter,
    pub search_term: String,
    /// 1-based.
    pub current_page: usize,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            meals: Vec::new(),
            loading: false,
            filter: MealFilter::All,
            search_term: String::new(),
            current_page: 1,
        }
    }
}

impl ViewState for CatalogState {}

impl CatalogState {
    pub fn find(&self, id: &str) -> Option<&Meal> {
        self.meals.iter().find(|meal| meal.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}
