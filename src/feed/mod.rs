//! Market data feed
//!
//! Loads market observations from the external feed and keeps the
//! last-known-good snapshot so the engine is never run on missing data.

mod sample;

pub use sample::{sample_observations, SampleSource};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::MarketObservation;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON feed {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML feed {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Feed {0} contains no markets")]
    Empty(String),

    #[error("Feed {path}: market {title:?} has non-finite {field}")]
    NonFinite {
        path: PathBuf,
        title: String,
        field: &'static str,
    },
}

/// Anything that can hand the engine a fresh list of markets.
#[cfg_attr(test, mockall::automock)]
pub trait ObservationSource {
    /// Short label for logs
    fn name(&self) -> String;

    fn fetch(&self) -> Result<Vec<MarketObservation>, FeedError>;
}

/// Feed document: either a bare list or an object wrapping it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Markets(Vec<MarketObservation>),
    /// `{ "timestamp": ..., "markets": [...] }`; other keys are ignored
    Wrapped { markets: Vec<MarketObservation> },
}

impl FeedDocument {
    fn into_markets(self) -> Vec<MarketObservation> {
        match self {
            FeedDocument::Markets(markets) | FeedDocument::Wrapped { markets } => markets,
        }
    }
}

/// Feed file on disk; `.yaml`/`.yml` is read as YAML, anything else as JSON.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }

    /// Parse feed text with the format implied by this source's extension
    pub fn parse(&self, text: &str) -> Result<Vec<MarketObservation>, FeedError> {
        let document: FeedDocument = if self.is_yaml() {
            serde_yaml::from_str(text).map_err(|source| FeedError::Yaml {
                path: self.path.clone(),
                source,
            })?
        } else {
            serde_json::from_str(text).map_err(|source| FeedError::Json {
                path: self.path.clone(),
                source,
            })?
        };

        let markets = document.into_markets();
        if markets.is_empty() {
            return Err(FeedError::Empty(self.path.display().to_string()));
        }
        // YAML accepts .nan and .inf; the engine only takes finite percents.
        for market in &markets {
            let field = if !market.yes_odds.is_finite() {
                "yesOdds"
            } else if !market.historical_win_rate.is_finite() {
                "historicalWinRate"
            } else {
                continue;
            };
            return Err(FeedError::NonFinite {
                path: self.path.clone(),
                title: market.title.clone(),
                field,
            });
        }
        Ok(markets)
    }
}

impl ObservationSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<MarketObservation>, FeedError> {
        let text = fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        let markets = self.parse(&text)?;
        debug!(path = %self.path.display(), markets = markets.len(), "Feed file loaded");
        Ok(markets)
    }
}

/// Where the current snapshot came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOrigin {
    Live(String),
    /// Previous snapshot kept after a failed refresh
    LastKnownGood(String),
    Sample,
}

impl fmt::Display for SnapshotOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotOrigin::Live(name) => write!(f, "live:{}", name),
            SnapshotOrigin::LastKnownGood(name) => write!(f, "last-known-good:{}", name),
            SnapshotOrigin::Sample => write!(f, "sample"),
        }
    }
}

/// Current set of observations owned by the caller of the engine.
///
/// Each successful refresh replaces the whole batch.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    observations: Vec<MarketObservation>,
    fetched_at: Option<DateTime<Utc>>,
    origin: Option<SnapshotOrigin>,
    fallback_to_sample: bool,
}

impl FeedSnapshot {
    pub fn new(fallback_to_sample: bool) -> Self {
        Self {
            observations: Vec::new(),
            fetched_at: None,
            origin: None,
            fallback_to_sample,
        }
    }

    pub fn observations(&self) -> &[MarketObservation] {
        &self.observations
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn origin(&self) -> Option<&SnapshotOrigin> {
        self.origin.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.origin.is_some()
    }

    /// Fetch from `source`, keeping the previous data when the fetch fails.
    ///
    /// With no previous data, the sample batch is substituted if allowed;
    /// otherwise the fetch error is returned and the snapshot stays empty.
    pub fn refresh<S: ObservationSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<SnapshotOrigin, FeedError> {
        let name = source.name();
        let origin = match source.fetch() {
            Ok(observations) => {
                info!(source = %name, markets = observations.len(), "Feed refreshed");
                let origin = SnapshotOrigin::Live(name);
                self.replace(observations, origin.clone());
                origin
            }
            Err(e) => match self.origin.clone() {
                Some(SnapshotOrigin::Live(prev)) | Some(SnapshotOrigin::LastKnownGood(prev)) => {
                    warn!(source = %name, error = %e, "Feed refresh failed, keeping last known good");
                    let origin = SnapshotOrigin::LastKnownGood(prev);
                    self.origin = Some(origin.clone());
                    origin
                }
                Some(SnapshotOrigin::Sample) => {
                    warn!(source = %name, error = %e, "Feed refresh failed, keeping sample data");
                    SnapshotOrigin::Sample
                }
                None if self.fallback_to_sample => {
                    warn!(source = %name, error = %e, "Feed unavailable, using sample data");
                    self.replace(sample_observations(), SnapshotOrigin::Sample);
                    SnapshotOrigin::Sample
                }
                None => return Err(e),
            },
        };

        Ok(origin)
    }

    fn replace(&mut self, observations: Vec<MarketObservation>, origin: SnapshotOrigin) {
        self.observations = observations;
        self.fetched_at = Some(Utc::now());
        self.origin = Some(origin);
    }
}
