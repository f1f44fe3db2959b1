//! Loading catalog and solution data from local files or HTTP(S) URLs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::catalog::store::CardCatalog;
use crate::catalog::table::SolutionTable;
use crate::parsing::solutions::{parse_flat_solutions, parse_nested_solutions};
use crate::parsing::ParseError;

/// Published card catalog
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/a1sareru/shoot300k/refs/heads/main/public/data/character_card.csv";

/// Published support-set document of the nested solution table
pub const DEFAULT_SUPPORT_URL: &str =
    "https://raw.githubusercontent.com/a1sareru/shoot300k/refs/heads/artifacts/solutions/card0.json";

/// Published quad document of the nested solution table
pub const DEFAULT_QUADS_URL: &str =
    "https://raw.githubusercontent.com/a1sareru/shoot300k/refs/heads/artifacts/solutions/quad.json";

/// Default bound on a single data load
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Loading {location} timed out after {timeout:?}")]
    Timeout { location: String, timeout: Duration },

    #[error("Failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Where a data file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    /// Strings starting with `http://` or `https://` are URLs, anything else a path
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Location of the solution table in either supported shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionSource {
    /// Canonical flat list/map of solution objects
    Flat(DataSource),
    /// Legacy colour-pair/tag-pair nested documents
    Nested {
        support: DataSource,
        quads: DataSource,
    },
}

impl fmt::Display for SolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(source) => write!(f, "{source}"),
            Self::Nested { support, quads } => write!(f, "{support} + {quads}"),
        }
    }
}

/// Data locations and load limits
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub catalog: DataSource,
    pub solutions: SolutionSource,
    /// Bound on each individual load
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            catalog: DataSource::url(DEFAULT_CATALOG_URL),
            solutions: SolutionSource::Nested {
                support: DataSource::url(DEFAULT_SUPPORT_URL),
                quads: DataSource::url(DEFAULT_QUADS_URL),
            },
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetches and parses the data a calculation needs.
///
/// Nothing is cached: each call loads fresh data so that upstream updates are
/// picked up by the next calculation.
#[derive(Debug, Clone)]
pub struct DataLoader {
    config: SourceConfig,
    client: reqwest::Client,
}

impl DataLoader {
    /// # Errors
    ///
    /// Returns `SourceError::Client` if the HTTP client cannot be created.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("deck-solver/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Read a data source as text within the configured timeout
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Timeout` if the load exceeds the timeout, or the
    /// I/O / HTTP error that ended it.
    pub async fn fetch_text(&self, source: &DataSource) -> Result<String, SourceError> {
        debug!("Loading {source}");
        let load = async {
            match source {
                DataSource::Path(path) => {
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|source| SourceError::Io {
                            path: path.clone(),
                            source,
                        })
                }
                DataSource::Url(url) => self.fetch_url(url).await,
            }
        };

        tokio::time::timeout(self.config.timeout, load)
            .await
            .map_err(|_| SourceError::Timeout {
                location: source.to_string(),
                timeout: self.config.timeout,
            })?
    }

    async fn fetch_url(&self, url: &str) -> Result<String, SourceError> {
        let http_error = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(http_error)
    }

    /// Load and index the card catalog
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the catalog cannot be loaded or parsed.
    pub async fn load_catalog(&self) -> Result<CardCatalog, SourceError> {
        let source = &self.config.catalog;
        let text = self.fetch_text(source).await?;
        let catalog = CardCatalog::from_csv(&text).map_err(|e| SourceError::Parse {
            location: source.to_string(),
            source: e,
        })?;
        debug!("Loaded {} cards from {source}", catalog.len());
        Ok(catalog)
    }

    /// Load the solution table in whichever shape is configured
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if any document cannot be loaded or parsed.
    pub async fn load_solutions(&self) -> Result<SolutionTable, SourceError> {
        let solutions = &self.config.solutions;
        let table = match solutions {
            SolutionSource::Flat(source) => {
                let text = self.fetch_text(source).await?;
                parse_flat_solutions(&text)
            }
            SolutionSource::Nested { support, quads } => {
                let (support_text, quads_text) =
                    tokio::try_join!(self.fetch_text(support), self.fetch_text(quads))?;
                parse_nested_solutions(&support_text, &quads_text)
            }
        }
        .map_err(|e| SourceError::Parse {
            location: solutions.to_string(),
            source: e,
        })?;

        debug!("Loaded {} solutions from {solutions}", table.len());
        Ok(table)
    }

    /// Load catalog and solution table concurrently
    ///
    /// # Errors
    ///
    /// Returns the first `SourceError` encountered.
    pub async fn load_all(&self) -> Result<(CardCatalog, SolutionTable), SourceError> {
        tokio::try_join!(self.load_catalog(), self.load_solutions())
    }
}
