//! starr - Typed clients for the *arr media managers.
//!
//! This library talks to the REST APIs of Sonarr, Radarr, Lidarr and Readarr
//! through one shared [`StarrClient`]. Application modules only choose paths
//! and payload types; transport, authentication, status handling, retries and
//! cancellation live in [`client`].
//!
//! Paged collections (history) are read with [`fetch_all`], which walks a
//! [`PageSource`] until the requested number of records has arrived.
//!
//! # Features
//!
//! - `sonarr`, `radarr`, `lidarr`, `readarr` - One per application, all on by
//!   default.
//!
//! # Example
//!
//! ```ignore
//! use starr::{Config, StarrClient, readarr::Readarr};
//!
//! let client = StarrClient::new(&Config::new("http://localhost:8787", api_key))?;
//! let readarr = Readarr::new(client);
//!
//! // Last 50 history events, fetched 25 per page
//! let history = readarr.get_history(50, 25).await?;
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod pagination;
pub mod retry;
pub mod types;

#[cfg(any(feature = "sonarr", feature = "radarr"))]
pub mod custom_format;

#[cfg(feature = "sonarr")]
pub mod sonarr;

#[cfg(feature = "radarr")]
pub mod radarr;

#[cfg(feature = "lidarr")]
pub mod lidarr;

#[cfg(feature = "readarr")]
pub mod readarr;

pub use client::{API, Config, Request, StarrClient};
pub use error::{Result, StarrError, short_error_message};
pub use http::{HttpTransport, ReqwestTransport};
pub use pagination::{
    DEFAULT_PAGE_SIZE, Endpoint, Page, PageRequest, PageSource, SortDirection, fetch_all,
};
pub use types::{BaseQuality, CALENDAR_TIME_FILTER_FORMAT, Quality, QualityRevision};
