//! Catalog state store: the merge-on-fetch container the views drive.

mod error;
mod intent;
mod meal_store;
mod reducer;
mod state;

pub use error::StoreError;
pub use intent::CatalogIntent;
pub use meal_store::{MealStore, MergeReport, StoreOptions, DEFAULT_NAMESPACE};
pub use reducer::CatalogReducer;
pub use state::CatalogState;
