//! Web search integration for Civic Help.
//!
//! Search providers return loosely-shaped payloads. This crate normalises them
//! into [`SearchResult`]: either structured question/answer groups or opaque
//! text, so callers can match exhaustively instead of sniffing JSON.
//!
//! # Providers
//! - **SerpApi**: `search.json` endpoint (requires `SERPAPI_KEY`)

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

pub use client::SearchClient;
pub use factory::create_search_client;
pub use providers::SerpApiClient;
pub use types::{QnaAnswer, QnaGroup, SearchResult, SourceLink};
