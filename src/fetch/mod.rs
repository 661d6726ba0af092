//! Fetch adapter: pulls meals from the remote source and normalizes them.

mod error;
mod http;
mod source;
mod wire;

pub use error::FetchError;
pub use http::HttpMealSource;
pub use source::{dedupe_last_wins, MealSource};
pub use wire::{RemoteMeal, SearchResponse};
