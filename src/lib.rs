pub mod catalog;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod mvi;
pub mod storage;
pub mod store;
pub mod thumbnail;
