//! Minimal client for the [OMDb](https://www.omdbapi.com/) REST API.
//!
//! Only the two request shapes the tracker needs are covered:
//!
//! - single-title lookup, either by IMDb id (`tt…`) or by free-text title
//! - multi-title search constrained to series
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use omdb::OmdbClient;
//!
//! let http = reqwest::Client::builder().timeout(Duration::from_secs(15)).build()?;
//! let client = OmdbClient::with_client(http, "my-api-key");
//! let title = client.lookup("tt0944947").await?;
//! println!("{} ({})", title.title, title.year);
//! ```

mod client;
mod error;
mod lookup;
pub mod models;
mod search;

pub use client::{OmdbClient, DEFAULT_BASE_URL};
pub use error::OmdbError;
pub use lookup::LookupKey;
pub use models::{SearchHit, SearchResponse, Title};

pub type Result<T> = std::result::Result<T, OmdbError>;
