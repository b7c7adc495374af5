use crate::loader::ObjectStoreRef;
use crate::partition::{PartitionConfig, PartitionError, Strategy, UnstructuredClient};
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Options applied to every partition request.
    pub partition: PartitionConfig,
    /// Optional transport timeout for partition requests.
    pub request_timeout: Option<Duration>,
    /// Default S3 bucket to load objects from.
    pub s3_bucket: Option<String>,
    /// Optional S3-compatible endpoint override.
    pub s3_endpoint: Option<String>,
    /// Permit plain HTTP when talking to the S3 endpoint.
    pub s3_allow_http: bool,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let flag = |key: &str| {
            optional(key)
                .map(|value| {
                    parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue(key.into()))
                })
                .transpose()
                .map(Option::unwrap_or_default)
        };
        let number = |key: &str| {
            optional(key)
                .map(|value| {
                    value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue(key.into()))
                })
                .transpose()
        };

        let partition = PartitionConfig {
            api_url: optional("UNSTRUCTURED_API_URL"),
            api_key: optional("UNSTRUCTURED_API_KEY"),
            strategy: optional("UNSTRUCTURED_STRATEGY").map(|value| Strategy::from(value.trim())),
            encoding: optional("UNSTRUCTURED_ENCODING"),
            ocr_languages: optional("UNSTRUCTURED_OCR_LANGUAGES")
                .map(|value| split_list(&value))
                .unwrap_or_default(),
            coordinates: flag("UNSTRUCTURED_COORDINATES")?,
            pdf_infer_table_structure: flag("UNSTRUCTURED_PDF_INFER_TABLE_STRUCTURE")?,
            xml_keep_tags: flag("UNSTRUCTURED_XML_KEEP_TAGS")?,
            include_page_breaks: flag("UNSTRUCTURED_INCLUDE_PAGE_BREAKS")?,
            hi_res_model_name: optional("UNSTRUCTURED_HI_RES_MODEL_NAME"),
            chunking_strategy: optional("UNSTRUCTURED_CHUNKING_STRATEGY"),
            ..Default::default()
        };

        Ok(Self {
            partition,
            request_timeout: number("UNSTRUCTURED_TIMEOUT_SECS")?.map(Duration::from_secs),
            s3_bucket: optional("S3_BUCKET"),
            s3_endpoint: optional("S3_ENDPOINT"),
            s3_allow_http: flag("S3_ALLOW_HTTP")?,
        })
    }

    /// Build a partition client honoring the configured timeout.
    pub fn partition_client(&self) -> Result<UnstructuredClient, PartitionError> {
        match self.request_timeout {
            Some(timeout) => UnstructuredClient::with_timeout(timeout),
            None => UnstructuredClient::new(),
        }
    }

    /// Build a reference to the configured S3 bucket.
    pub fn object_store(&self) -> Result<ObjectStoreRef, ConfigError> {
        let bucket = self
            .s3_bucket
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVariable("S3_BUCKET".into()))?;
        ObjectStoreRef::s3(bucket, self.s3_endpoint.as_deref(), self.s3_allow_http).map_err(
            |err| {
                tracing::error!(bucket, error = %err, "Failed to build S3 object store");
                ConfigError::InvalidValue(format!("S3_BUCKET ({err})"))
            },
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, if [`init_config`] has run.
pub fn get_config() -> Option<&'static Config> {
    CONFIG.get()
}

/// Load configuration from `.env` and the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        api_url = %config.partition.effective_url(),
        strategy = %config.partition.effective_strategy(),
        s3_bucket = ?config.s3_bucket,
        timeout = ?config.request_timeout,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = Config::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.partition.effective_strategy(), Strategy::HiRes);
        assert!(config.partition.api_key.is_none());
        assert!(config.partition.ocr_languages.is_empty());
        assert!(!config.partition.coordinates);
        assert!(config.request_timeout.is_none());
        assert!(config.s3_bucket.is_none());
    }

    #[test]
    fn parses_partition_options() {
        let config = Config::from_lookup(lookup(&[
            ("UNSTRUCTURED_API_URL", "http://localhost:8000/general/v0/general"),
            ("UNSTRUCTURED_API_KEY", "secret"),
            ("UNSTRUCTURED_STRATEGY", "ocr_only"),
            ("UNSTRUCTURED_OCR_LANGUAGES", "eng, fra,,deu"),
            ("UNSTRUCTURED_COORDINATES", "yes"),
            ("UNSTRUCTURED_XML_KEEP_TAGS", "false"),
            ("UNSTRUCTURED_TIMEOUT_SECS", "30"),
            ("S3_BUCKET", "documents"),
            ("S3_ALLOW_HTTP", "1"),
        ]))
        .expect("config");

        let partition = &config.partition;
        assert_eq!(
            partition.effective_url(),
            "http://localhost:8000/general/v0/general"
        );
        assert_eq!(partition.api_key.as_deref(), Some("secret"));
        assert_eq!(partition.strategy, Some(Strategy::OcrOnly));
        assert_eq!(partition.ocr_languages, vec!["eng", "fra", "deu"]);
        assert!(partition.coordinates);
        assert!(!partition.xml_keep_tags);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.s3_bucket.as_deref(), Some("documents"));
        assert!(config.s3_allow_http);
    }

    #[test]
    fn unknown_strategy_is_kept_verbatim() {
        let config =
            Config::from_lookup(lookup(&[("UNSTRUCTURED_STRATEGY", "vlm")])).expect("config");
        assert_eq!(
            config.partition.strategy,
            Some(Strategy::Other("vlm".into()))
        );
    }

    #[test]
    fn rejects_malformed_values() {
        let error = Config::from_lookup(lookup(&[("UNSTRUCTURED_COORDINATES", "maybe")]))
            .expect_err("invalid flag");
        assert!(
            matches!(error, ConfigError::InvalidValue(key) if key == "UNSTRUCTURED_COORDINATES")
        );

        let error = Config::from_lookup(lookup(&[("UNSTRUCTURED_TIMEOUT_SECS", "soon")]))
            .expect_err("invalid timeout");
        assert!(
            matches!(error, ConfigError::InvalidValue(key) if key == "UNSTRUCTURED_TIMEOUT_SECS")
        );
    }

    #[test]
    fn object_store_requires_bucket() {
        let config = Config::default();
        assert!(matches!(
            config.object_store(),
            Err(ConfigError::MissingVariable(key)) if key == "S3_BUCKET"
        ));
    }
}
