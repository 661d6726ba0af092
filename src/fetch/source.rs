use std::collections::HashMap;

use async_trait::async_trait;

use crate::catalog::Meal;

/// Where the store gets remote meals from.
///
/// Implementations never fail: partial failures are logged and dropped,
/// total failure is an empty vector. Callers treat "no meals" as a valid
/// outcome.
#[async_trait]
pub trait MealSource: Send + Sync {
    /// Returns the name of this source for logging.
    fn name(&self) -> &'static str;

    /// Fetch every meal the source can list, deduplicated by id.
    async fn fetch_all(&self) -> Vec<Meal>;
}

/// Flatten per-partition batches, keeping one meal per id.
///
/// The last-seen record wins; it takes the position where the id first
/// appeared, so the output order follows the partition order.
pub fn dedupe_last_wins<I>(batches: I) -> Vec<Meal>
where
    I: IntoIterator<Item = Vec<Meal>>,
{
    let mut out: Vec<Meal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for meal in batches.into_iter().flatten() {
        match index.get(&meal.id) {
            Some(&pos) => out[pos] = meal,
            None => {
                index.insert(meal.id.clone(), out.len());
                out.push(meal);
            }
        }
    }
    out
}
