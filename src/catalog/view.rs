//! Derived list view: filter, search, then paginate.
//!
//! Nothing here is stored; every read recomputes from the full item set.

use serde::Serialize;

use super::filter::MealFilter;
use super::meal::Meal;

/// Default number of meals per page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Meals admitted by `filter` whose title or description contains
/// `search_term` (case-insensitive), in store order.
pub fn visible<'a>(meals: &'a [Meal], filter: MealFilter, search_term: &str) -> Vec<&'a Meal> {
    let needle = search_term.trim().to_lowercase();
    meals
        .iter()
        .filter(|meal| filter.admits(meal))
        .filter(|meal| meal.matches_lowercase(&needle))
        .collect()
}

/// Number of pages needed for `total` items. Zero items means zero pages.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// 1-based page slice. Out-of-range pages (including 0) are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// One rendered page of the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub items: Vec<Meal>,
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Page {
    pub fn build(
        meals: &[Meal],
        filter: MealFilter,
        search_term: &str,
        number: usize,
        page_size: usize,
    ) -> Self {
        let matching = visible(meals, filter, search_term);
        let items = paginate(&matching, number, page_size)
            .iter()
            .map(|meal| (*meal).clone())
            .collect();
        Self {
            items,
            number,
            total_pages: total_pages(matching.len(), page_size),
            total_items: matching.len(),
        }
    }
}
