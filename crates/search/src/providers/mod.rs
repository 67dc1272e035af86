//! Web search provider implementations.

pub mod serpapi;

pub use serpapi::SerpApiClient;
