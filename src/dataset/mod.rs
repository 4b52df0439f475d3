//! Retrieval and local caching of datasets referenced by result rows.

pub mod fetch;
pub mod naming;

pub use fetch::{DatasetFetcher, FetchParams, HttpFetcher, DEFAULT_FETCH_TIMEOUT};
pub use naming::{extension_for, DefaultNaming, FilenamePolicy, ImageNaming};
