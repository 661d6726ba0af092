use std::collections::HashSet;

use crate::catalog::Meal;
use crate::mvi::Reducer;
use crate::store::intent::CatalogIntent;
use crate::store::state::CatalogState;

pub struct CatalogReducer;

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Intent = CatalogIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CatalogIntent::Hydrate { meals } => CatalogState {
                meals: unique_by_id(meals),
                ..state
            },
            CatalogIntent::FetchStarted => CatalogState {
                loading: true,
                ..state
            },
            CatalogIntent::FetchFinished { meals } => CatalogState {
                meals: merge_fetched(state.meals, meals),
                loading: false,
                ..state
            },
            CatalogIntent::FetchSettled => CatalogState {
                loading: false,
                ..state
            },
            CatalogIntent::ToggleLike { id } => {
                let mut state = state;
                if let Some(meal) = state.meals.iter_mut().find(|m| m.id == id) {
                    meal.liked = !meal.liked;
                }
                state
            }
            CatalogIntent::ToggleDelete { id } => {
                let mut state = state;
                if let Some(meal) = state.meals.iter_mut().find(|m| m.id == id) {
                    meal.deleted = !meal.deleted;
                }
                state
            }
            CatalogIntent::AddCustom { meal } => {
                if state.contains(&meal.id) {
                    // Would break id uniqueness; the store never sends this.
                    return state;
                }
                let mut state = state;
                state.meals.insert(0, meal);
                state
            }
            CatalogIntent::Update { id, patch } => {
                let mut state = state;
                if let Some(meal) = state.meals.iter_mut().find(|m| m.id == id) {
                    meal.apply(patch);
                }
                state
            }
            CatalogIntent::SetFilter(filter) => CatalogState { filter, ..state },
            CatalogIntent::SetSearchTerm(search_term) => CatalogState {
                search_term,
                ..state
            },
            CatalogIntent::SetPage(current_page) => CatalogState {
                current_page,
                ..state
            },
        }
    }
}

/// Append meals whose id is not known yet, as fresh unannotated remote
/// meals. Existing meals (custom or annotated) are never replaced.
fn merge_fetched(mut existing: Vec<Meal>, fetched: Vec<Meal>) -> Vec<Meal> {
    let mut known: HashSet<String> = existing.iter().map(|m| m.id.clone()).collect();
    for meal in fetched {
        if known.insert(meal.id.clone()) {
            existing.push(Meal {
                liked: false,
                deleted: false,
                is_custom: false,
                ..meal
            });
        }
    }
    existing
}

/// Keep the first occurrence of each id.
fn unique_by_id(meals: Vec<Meal>) -> Vec<Meal> {
    let total = meals.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Meal> = meals
        .into_iter()
        .filter(|meal| seen.insert(meal.id.clone()))
        .collect();
    if unique.len() != total {
        tracing::warn!(
            dropped = total - unique.len(),
            "Persisted catalog had duplicate ids; kept first occurrences"
        );
    }
    unique
}
