//! Configuration, element, and error types shared by the partition client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Public hosted endpoint used when no partition URL is configured.
pub const DEFAULT_PARTITION_URL: &str = "https://api.unstructuredapp.io/general/v0/general";

/// Errors returned while partitioning a document through the remote service.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// The service answered with a non-success status code.
    #[error("Failed to partition file {file_name} with error {status} and message {body}")]
    Request {
        /// Logical file name submitted with the request.
        file_name: String,
        /// HTTP status returned by the service.
        status: u16,
        /// Full response body text.
        body: String,
    },
    /// The service answered successfully but the body was not a JSON array.
    #[error("Unexpected partition response for {file_name}: expected an array of elements, received {received}")]
    ResponseShape {
        /// Logical file name submitted with the request.
        file_name: String,
        /// Short description of what the body actually contained.
        received: String,
    },
    /// HTTP layer failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Partitioning strategy understood by the service.
///
/// Unknown values are carried verbatim in [`Strategy::Other`] so that strategies added on the
/// service side keep working without a client release.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Model-based layout detection.
    #[default]
    HiRes,
    /// Rule-based text extraction.
    Fast,
    /// OCR only.
    OcrOnly,
    /// Let the service pick per document.
    Auto,
    /// Any other strategy name, sent as-is.
    Other(String),
}

impl Strategy {
    /// Wire value sent in the `strategy` form field.
    pub fn as_str(&self) -> &str {
        match self {
            Self::HiRes => "hi_res",
            Self::Fast => "fast",
            Self::OcrOnly => "ocr_only",
            Self::Auto => "auto",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for Strategy {
    fn from(value: &str) -> Self {
        match value {
            "hi_res" => Self::HiRes,
            "fast" => Self::Fast,
            "ocr_only" => Self::OcrOnly,
            "auto" => Self::Auto,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for Strategy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

/// Caller-supplied options controlling a partition request.
///
/// Every field is optional. Unset fields are left out of the outgoing form entirely, with the
/// exception of `strategy`, which falls back to [`Strategy::HiRes`]. Boolean flags are only sent
/// when `true`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Partition endpoint; defaults to [`DEFAULT_PARTITION_URL`].
    pub api_url: Option<String>,
    /// Credential sent in the `unstructured-api-key` header (empty when unset).
    pub api_key: Option<String>,
    /// Partitioning strategy.
    pub strategy: Option<Strategy>,
    /// Character-encoding hint for text inputs.
    pub encoding: Option<String>,
    /// OCR language codes, each sent as its own `ocr_languages` field.
    #[serde(default)]
    pub ocr_languages: Vec<String>,
    /// Request element coordinates.
    #[serde(default)]
    pub coordinates: bool,
    /// Infer table structure in PDFs.
    #[serde(default)]
    pub pdf_infer_table_structure: bool,
    /// Retain XML tags in the extracted text.
    #[serde(default)]
    pub xml_keep_tags: bool,
    /// Emit page-break elements.
    #[serde(default)]
    pub include_page_breaks: bool,
    /// Layout model used by the `hi_res` strategy.
    pub hi_res_model_name: Option<String>,
    /// Chunking strategy applied by the service after partitioning.
    pub chunking_strategy: Option<String>,
    /// Let chunks span page boundaries.
    #[serde(default)]
    pub multipage_sections: bool,
    /// Hard upper bound on chunk length.
    pub max_characters: Option<usize>,
    /// Soft upper bound on chunk length.
    pub new_after_n_chars: Option<usize>,
    /// Combine small sections below this length.
    pub combine_under_n_chars: Option<usize>,
    /// Document types for which table inference is skipped.
    #[serde(default)]
    pub skip_infer_table_types: Vec<String>,
}

impl PartitionConfig {
    /// Strategy sent with the request once defaults are applied.
    pub fn effective_strategy(&self) -> Strategy {
        self.strategy.clone().unwrap_or_default()
    }

    /// Endpoint the request is sent to once defaults are applied.
    pub fn effective_url(&self) -> &str {
        self.api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_PARTITION_URL)
    }
}

/// Normalized record produced for each text-bearing element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Element text.
    pub content: String,
    /// Element metadata plus the synthesized `category` key.
    pub attributes: Map<String, Value>,
}
