pub mod adapters;
pub mod configuration;
pub mod core;
pub mod error;
pub mod item_description;
pub mod items;
pub mod opensearch;
pub mod promotion;
pub mod recommendations;
pub mod search;
pub mod utils;

pub use reqwest::Client;
