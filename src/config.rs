//! Explicit client configuration, optionally loaded from the environment.

use std::str::FromStr;

use reqwest::Url;

use crate::{ClientOptions, DocQaError, Result};

/// Base URL used when `DOCQA_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "DOCQA_API_URL";
pub const ENV_TIMEOUT_MS: &str = "DOCQA_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "DOCQA_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "DOCQA_RETRY_DELAY_MS";

/// Where the backend lives and how requests to it behave.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Normalized base URL: has a scheme, no trailing slash.
    pub base_url: String,
    pub options: ClientOptions,
}

impl ClientConfig {
    /// Creates a configuration with default options.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            options: ClientOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Creates a configuration from environment variables.
    ///
    /// Reads:
    /// - `DOCQA_API_URL` — backend base URL; `https://` is prepended when the
    ///   value has no scheme. Defaults to `http://localhost:8000`.
    /// - `DOCQA_TIMEOUT_MS`, `DOCQA_MAX_RETRIES`, `DOCQA_RETRY_DELAY_MS` —
    ///   optional overrides of [`ClientOptions`].
    ///
    /// **Not available on `wasm32` targets** — environment variables do not
    /// exist in browser runtimes. Use [`ClientConfig::new`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base_url = match non_empty(lookup(ENV_API_URL)) {
            Some(url) => url,
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "{ENV_API_URL} is not set, using {DEFAULT_BASE_URL}; this may cause issues in production"
                );
                DEFAULT_BASE_URL.to_owned()
            }
        };

        let mut options = ClientOptions::default();
        if let Some(timeout_ms) = parse_var(&mut lookup, ENV_TIMEOUT_MS)? {
            options.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = parse_var(&mut lookup, ENV_MAX_RETRIES)? {
            options.max_retries = max_retries;
        }
        if let Some(delay_ms) = parse_var(&mut lookup, ENV_RETRY_DELAY_MS)? {
            options.initial_delay_ms = delay_ms;
        }

        Ok(Self::new(base_url)?.with_options(options))
    }
}

/// Trims `raw`, prepends `https://` when no scheme is present and strips
/// trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DocQaError::InvalidConfig("base URL is empty".to_owned()));
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };
    let normalized = with_scheme.trim_end_matches('/').to_owned();

    let url = Url::parse(&normalized).map_err(|err| {
        DocQaError::InvalidConfig(format!("invalid base URL '{normalized}': {err}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DocQaError::InvalidConfig(format!(
            "base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(normalized)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_var<F, T>(lookup: &mut F, key: &str) -> Result<Option<T>>
where
    F: FnMut(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = non_empty(lookup(key)) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|err| DocQaError::InvalidConfig(format!("{key}='{raw}' is invalid: {err}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{normalize_base_url, ClientConfig, DEFAULT_BASE_URL};

    fn lookup(vars: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_url_falls_back_to_local_default() {
        let config = ClientConfig::from_lookup(lookup(&[])).expect("defaults are valid");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.options.timeout_ms, 30_000);
        assert_eq!(config.options.max_retries, 3);
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let config =
            ClientConfig::from_lookup(lookup(&[("DOCQA_API_URL", "  ")])).expect("valid");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn scheme_less_url_gets_https() {
        let config = ClientConfig::from_lookup(lookup(&[("DOCQA_API_URL", "qa.example.com/")]))
            .expect("valid");
        assert_eq!(config.base_url, "https://qa.example.com");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        assert_eq!(
            normalize_base_url("http://10.0.0.5:8000//").expect("valid"),
            "http://10.0.0.5:8000"
        );
    }

    #[test]
    fn numeric_overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DOCQA_TIMEOUT_MS", "5000"),
            ("DOCQA_MAX_RETRIES", "0"),
            ("DOCQA_RETRY_DELAY_MS", "250"),
        ]))
        .expect("valid");
        assert_eq!(config.options.timeout_ms, 5_000);
        assert_eq!(config.options.max_retries, 0);
        assert_eq!(config.options.initial_delay_ms, 250);
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("DOCQA_MAX_RETRIES", "lots")]))
            .expect_err("must reject");
        assert!(err.to_string().contains("DOCQA_MAX_RETRIES"));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(normalize_base_url("ftp://files.example.com").is_err());
    }
}
