//! REST API access
//!
//! `ApiClient` wraps a blocking reqwest client with bearer auth and error
//! mapping; `endpoints` adds typed calls per resource.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod page;

pub use client::ApiClient;
pub use error::ApiError;
pub use page::Page;
