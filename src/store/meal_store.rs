//! The catalog state container.
//!
//! One `MealStore` is built at startup and passed by reference to whatever
//! drives it. It is the only thing that mutates meals: every change is an
//! intent run through [`CatalogReducer`], and every change to the item set
//! is written through to the storage slot before it becomes visible.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{
    view, Meal, MealFilter, MealPatch, NewMeal, Page, CUSTOM_ID_PREFIX, DEFAULT_PAGE_SIZE,
};
use crate::config::Config;
use crate::fetch::MealSource;
use crate::mvi::Reducer;
use crate::storage::KeyValueStore;
use crate::store::error::StoreError;
use crate::store::intent::CatalogIntent;
use crate::store::reducer::CatalogReducer;
use crate::store::state::CatalogState;

/// Slot name used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "meal-storage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Storage key the item set is persisted under.
    pub namespace: String,
    pub page_size: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            namespace: config.storage.namespace.clone(),
            page_size: config.view.page_size,
        }
    }
}

/// Outcome of a successful `fetch_and_merge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Distinct meals the source returned.
    pub fetched: usize,
    /// Meals that were new to the store.
    pub inserted: usize,
}

#[derive(Serialize)]
struct PersistedRef<'a> {
    meals: &'a [Meal],
}

pub struct MealStore {
    state: RwLock<CatalogState>,
    source: Arc<dyn MealSource>,
    storage: Arc<dyn KeyValueStore>,
    options: StoreOptions,
    fetch_in_flight: AtomicBool,
}

impl MealStore {
    /// Build the store, hydrating the item set from the storage slot.
    ///
    /// A missing slot starts empty. Records that do not parse are skipped;
    /// when anything is skipped the raw slot is first copied to
    /// `<namespace>.corrupt-<millis>` so the next write loses nothing.
    pub fn open(
        source: Arc<dyn MealSource>,
        storage: Arc<dyn KeyValueStore>,
        options: StoreOptions,
    ) -> Result<Self, StoreError> {
        let meals = load_persisted(storage.as_ref(), &options.namespace)?;
        tracing::debug!(
            namespace = %options.namespace,
            source = source.name(),
            meals = meals.len(),
            "Catalog hydrated"
        );

        let state = CatalogReducer::reduce(CatalogState::default(), CatalogIntent::Hydrate { meals });

        Ok(Self {
            state: RwLock::new(state),
            source,
            storage,
            options,
            fetch_in_flight: AtomicBool::new(false),
        })
    }

    // ---- reads --------------------------------------------------------------

    /// Clone of the full state.
    pub fn snapshot(&self) -> CatalogState {
        self.state.read().clone()
    }

    pub fn meals(&self) -> Vec<Meal> {
        self.state.read().meals.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().meals.is_empty()
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn filter(&self) -> MealFilter {
        self.state.read().filter
    }

    pub fn search_term(&self) -> String {
        self.state.read().search_term.clone()
    }

    pub fn current_page(&self) -> usize {
        self.state.read().current_page
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    pub fn get(&self, id: &str) -> Option<Meal> {
        self.state.read().find(id).cloned()
    }

    /// Filtered and searched meals, unpaginated.
    pub fn visible(&self) -> Vec<Meal> {
        let state = self.state.read();
        view::visible(&state.meals, state.filter, &state.search_term)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The current page of the filtered and searched meals.
    pub fn page(&self) -> Page {
        let state = self.state.read();
        Page::build(
            &state.meals,
            state.filter,
            &state.search_term,
            state.current_page,
            self.options.page_size,
        )
    }

    // ---- item mutations -----------------------------------------------------

    /// Pull the remote catalog and add meals not known locally.
    ///
    /// Existing meals, custom or not, keep their local fields. A source
    /// failure merges nothing. A second call while one is running is
    /// rejected with [`StoreError::FetchInProgress`].
    pub async fn fetch_and_merge(&self) -> Result<MergeReport, StoreError> {
        if self
            .fetch_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Fetch rejected, another one is in flight");
            return Err(StoreError::FetchInProgress);
        }

        // Clears `loading` and the guard on every exit path, including the
        // future being dropped mid-await.
        let _settle = scopeguard::guard((), |_| {
            self.apply_ui(CatalogIntent::FetchSettled);
            self.fetch_in_flight.store(false, Ordering::SeqCst);
        });

        self.apply_ui(CatalogIntent::FetchStarted);

        let fetched = self.source.fetch_all().await;
        let fetched_count = fetched.len();

        let inserted = {
            let mut state = self.state.write();
            self.commit(&mut state, CatalogIntent::FetchFinished { meals: fetched })?
        };

        tracing::info!(
            source = self.source.name(),
            fetched = fetched_count,
            inserted,
            "Merged fetched meals"
        );

        Ok(MergeReport {
            fetched: fetched_count,
            inserted,
        })
    }

    pub fn toggle_like(&self, id: &str) -> Result<(), StoreError> {
        self.dispatch(CatalogIntent::ToggleLike { id: id.to_string() })
    }

    /// Soft delete, or restore an already deleted meal.
    pub fn toggle_delete(&self, id: &str) -> Result<(), StoreError> {
        self.dispatch(CatalogIntent::ToggleDelete { id: id.to_string() })
    }

    /// Create a custom meal with a fresh id and put it first.
    pub fn add_custom_meal(&self, new_meal: NewMeal) -> Result<Meal, StoreError> {
        let mut state = self.state.write();

        let id = loop {
            let candidate = format!("{}{}", CUSTOM_ID_PREFIX, Uuid::new_v4());
            if !state.contains(&candidate) {
                break candidate;
            }
        };
        let meal = new_meal.into_meal(id);

        self.commit(&mut state, CatalogIntent::AddCustom { meal: meal.clone() })?;
        tracing::info!(id = %meal.id, title = %meal.title, "Custom meal added");
        Ok(meal)
    }

    /// Change title, description or thumbnail of an existing meal.
    pub fn update_meal(&self, id: &str, patch: MealPatch) -> Result<(), StoreError> {
        self.dispatch(CatalogIntent::Update {
            id: id.to_string(),
            patch,
        })
    }

    // ---- UI state -----------------------------------------------------------

    pub fn set_filter(&self, filter: MealFilter) {
        self.apply_ui(CatalogIntent::SetFilter(filter));
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.apply_ui(CatalogIntent::SetSearchTerm(term.into()));
    }

    pub fn set_page(&self, page: usize) {
        self.apply_ui(CatalogIntent::SetPage(page));
    }

    // ---- internals ----------------------------------------------------------

    fn dispatch(&self, intent: CatalogIntent) -> Result<(), StoreError> {
        let mut state = self.state.write();
        self.commit(&mut state, intent).map(|_| ())
    }

    /// Reduce, persist if the item set changed, then publish.
    ///
    /// On a storage failure the in-memory state is left as it was, so memory
    /// and the slot never disagree. Returns how many meals were added.
    fn commit(&self, state: &mut CatalogState, intent: CatalogIntent) -> Result<usize, StoreError> {
        let persist = intent.mutates_meals();
        let next = CatalogReducer::reduce(state.clone(), intent);

        if persist && next.meals != state.meals {
            self.persist(&next.meals)?;
        }

        let added = next.meals.len().saturating_sub(state.meals.len());
        *state = next;
        Ok(added)
    }

    fn apply_ui(&self, intent: CatalogIntent) {
        debug_assert!(!intent.mutates_meals());
        let mut state = self.state.write();
        let next = CatalogReducer::reduce(std::mem::take(&mut *state), intent);
        *state = next;
    }

    fn persist(&self, meals: &[Meal]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&PersistedRef { meals })?;
        self.storage.set(&self.options.namespace, &bytes)?;
        tracing::trace!(meals = meals.len(), bytes = bytes.len(), "Catalog persisted");
        Ok(())
    }
}

/// Envelope read leniently so one bad record does not sink the rest.
#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    meals: Vec<serde_json::Value>,
}

/// Key the raw bytes of an unreadable slot are copied to before the
/// slot is next written.
fn backup_key(namespace: &str) -> String {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{}.corrupt-{}", namespace, timestamp)
}

fn load_persisted(storage: &dyn KeyValueStore, namespace: &str) -> Result<Vec<Meal>, StoreError> {
    let Some(bytes) = storage.get(namespace)? else {
        return Ok(Vec::new());
    };

    let raw = match serde_json::from_slice::<RawCatalog>(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(
                namespace = %namespace,
                error = %e,
                "Persisted catalog is unreadable, starting empty"
            );
            back_up(storage, namespace, &bytes)?;
            return Ok(Vec::new());
        }
    };

    let total = raw.meals.len();
    let meals: Vec<Meal> = raw
        .meals
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Meal>(record) {
            Ok(meal) => Some(meal),
            Err(e) => {
                tracing::warn!(namespace = %namespace, index, error = %e, "Skipping unreadable meal");
                None
            }
        })
        .collect();

    if meals.len() != total {
        back_up(storage, namespace, &bytes)?;
    }
    Ok(meals)
}

/// The next write replaces the slot, so keep what could not be read.
fn back_up(storage: &dyn KeyValueStore, namespace: &str, bytes: &[u8]) -> Result<(), StoreError> {
    let key = backup_key(namespace);
    storage.set(&key, bytes)?;
    tracing::warn!(namespace = %namespace, backup = %key, "Unreadable catalog copied aside");
    Ok(())
}
