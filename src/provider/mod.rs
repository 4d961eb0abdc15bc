//! Genome-data provider interface.
//!
//! The browser core never reads files or indexes genomes itself; it asks a
//! [`GenomeProvider`] for features in a window, a feature by name, the full
//! feature list, or a slice of raw sequence.
//!
//! Queries travel as [`Request`] values tagged with a [`RequestToken`], and
//! answers come back as [`Response`] values carrying the same token, so that
//! a session can recognise and drop answers to superseded requests.
//!
//! - `memory`: the in-memory reference provider built from FASTA + GFF3
//! - `worker`: serves requests on a background thread

pub mod memory;
pub mod worker;

use thiserror::Error;

use crate::model::Feature;
use crate::projection::FeatureRecord;

pub use memory::MemoryProvider;
pub use worker::ProviderWorker;

/// Errors a provider can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No active genome")]
    NoActiveGenome,

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider disconnected")]
    Disconnected,
}

/// Result type for provider queries.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Summary of the active genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeInfo {
    pub id: String,
    pub length: u64,
    pub has_annotations: bool,
}

/// Source of genome features and sequence.
pub trait GenomeProvider: Send + Sync {
    /// Describes the active genome.
    fn genome_info(&self) -> ProviderResult<GenomeInfo>;

    /// Features overlapping `[start, end]`, in provider order. The canvas width
    /// is a hint for providers that pre-scale; records say which space they use.
    fn query_features_in_window(
        &self,
        start: u64,
        end: u64,
        canvas_width_px: u32,
    ) -> ProviderResult<Vec<FeatureRecord>>;

    /// Looks a feature up by name.
    fn query_feature_by_name(&self, name: &str) -> ProviderResult<Option<Feature>>;

    /// Every feature of the active genome.
    fn query_full_feature_list(&self) -> ProviderResult<Vec<Feature>>;

    /// Raw bases of `[start, end)`.
    fn query_sequence_slice(&self, start: u64, end: u64) -> ProviderResult<String>;
}

/// Identifies one request; later requests get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

/// A query addressed to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Features {
        token: RequestToken,
        start: u64,
        end: u64,
        canvas_width_px: u32,
    },
    FeatureByName {
        token: RequestToken,
        name: String,
    },
    FeatureList {
        token: RequestToken,
    },
    Sequence {
        token: RequestToken,
        start: u64,
        end: u64,
    },
}

impl Request {
    pub fn token(&self) -> RequestToken {
        match self {
            Request::Features { token, .. }
            | Request::FeatureByName { token, .. }
            | Request::FeatureList { token }
            | Request::Sequence { token, .. } => *token,
        }
    }
}

/// A provider's answer to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Features {
        token: RequestToken,
        result: ProviderResult<Vec<FeatureRecord>>,
    },
    FeatureByName {
        token: RequestToken,
        name: String,
        result: ProviderResult<Option<Feature>>,
    },
    FeatureList {
        token: RequestToken,
        result: ProviderResult<Vec<Feature>>,
    },
    Sequence {
        token: RequestToken,
        result: ProviderResult<String>,
    },
}

impl Response {
    pub fn token(&self) -> RequestToken {
        match self {
            Response::Features { token, .. }
            | Response::FeatureByName { token, .. }
            | Response::FeatureList { token, .. }
            | Response::Sequence { token, .. } => *token,
        }
    }

    /// The failed answer to `request`, carrying its token.
    pub fn failed(request: Request, err: ProviderError) -> Self {
        match request {
            Request::Features { token, .. } => Response::Features {
                token,
                result: Err(err),
            },
            Request::FeatureByName { token, name } => Response::FeatureByName {
                token,
                name,
                result: Err(err),
            },
            Request::FeatureList { token } => Response::FeatureList {
                token,
                result: Err(err),
            },
            Request::Sequence { token, .. } => Response::Sequence {
                token,
                result: Err(err),
            },
        }
    }
}

/// Answers one request synchronously.
pub fn serve(provider: &dyn GenomeProvider, request: Request) -> Response {
    log::trace!("Serving {:?}", request);
    match request {
        Request::Features {
            token,
            start,
            end,
            canvas_width_px,
        } => Response::Features {
            token,
            result: provider.query_features_in_window(start, end, canvas_width_px),
        },
        Request::FeatureByName { token, name } => {
            let result = provider.query_feature_by_name(&name);
            Response::FeatureByName { token, name, result }
        }
        Request::FeatureList { token } => Response::FeatureList {
            token,
            result: provider.query_full_feature_list(),
        },
        Request::Sequence { token, start, end } => Response::Sequence {
            token,
            result: provider.query_sequence_slice(start, end),
        },
    }
}
