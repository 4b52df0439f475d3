//! Opening byte streams for dataset access URLs.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for dataset requests.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Opens a readable stream for a dataset URL.
pub trait DatasetFetcher {
    fn open(&self, url: &Url) -> Result<Box<dyn Read + Send>>;
}

/// Parameters for dataset retrieval.
#[derive(Debug, Clone)]
pub struct FetchParams {
    /// Overall request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with HTTP requests.
    pub user_agent: String,
}

impl FetchParams {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: format!("dal-dbapi/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for FetchParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches `http`/`https` URLs over the network and `file` URLs from disk.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    params: FetchParams,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_params(FetchParams::default())
    }

    pub fn with_params(params: FetchParams) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(params.timeout)
            .user_agent(&params.user_agent)
            .build();
        Self { agent, params }
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }

    fn open_http(&self, url: &Url) -> Result<Box<dyn Read + Send>> {
        match self.agent.get(url.as_str()).call() {
            Ok(resp) => {
                debug!(
                    %url,
                    status = resp.status(),
                    content_type = resp.content_type(),
                    "dataset response"
                );
                Ok(Box::new(resp.into_reader()))
            }
            Err(ureq::Error::Status(code, resp)) => Err(Error::DatasetRetrieval {
                url: url.to_string(),
                message: format!("HTTP {} {}", code, resp.status_text()),
            }),
            Err(ureq::Error::Transport(err)) => Err(Error::DatasetRetrieval {
                url: url.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn open_file(&self, url: &Url) -> Result<Box<dyn Read + Send>> {
        let path = url.to_file_path().map_err(|_| Error::InvalidAccessUrl {
            url: url.to_string(),
            message: "not a local file path".to_string(),
        })?;
        let file = File::open(&path).map_err(|e| Error::DatasetRetrieval {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Box::new(file))
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetFetcher for HttpFetcher {
    fn open(&self, url: &Url) -> Result<Box<dyn Read + Send>> {
        match url.scheme() {
            "http" | "https" => self.open_http(url),
            "file" => self.open_file(url),
            other => Err(Error::not_supported(format!("{} URLs", other))),
        }
    }
}
