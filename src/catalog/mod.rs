//! Catalog domain: the meal record, list filters and the derived view.

mod filter;
mod meal;
mod validate;
pub mod view;

pub use filter::MealFilter;
pub use meal::{Meal, MealPatch, NewMeal, PersistedCatalog, CUSTOM_ID_PREFIX};
pub use validate::{ValidationError, MIN_DESCRIPTION_CHARS, MIN_TITLE_CHARS};
pub use view::{Page, DEFAULT_PAGE_SIZE};
