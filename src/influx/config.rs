//! InfluxDB write endpoint configuration.

use crate::error::{ForwardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of the v2 write API, appended to [`InfluxConfig::url`].
pub const WRITE_PATH: &str = "/api/v2/write";

/// Environment variable holding the InfluxDB base URL.
pub const ENV_URL: &str = "URL";
/// Environment variable holding the organization.
pub const ENV_ORG: &str = "ORG";
/// Environment variable holding the bucket.
pub const ENV_BUCKET: &str = "BUCKET";
/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "TOKEN";

/// Where and as whom points are written.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluxConfig {
    /// Base URL (e.g. "https://us-west-2-1.aws.cloud2.influxdata.com")
    pub url: String,
    /// Organization name or ID
    pub org: String,
    /// Destination bucket
    pub bucket: String,
    /// API token with write access to the bucket
    pub token: String,
}

impl fmt::Debug for InfluxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxConfig")
            .field("url", &self.url)
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl InfluxConfig {
    /// Create a new configuration from its four parts.
    pub fn new(
        url: impl Into<String>,
        org: impl Into<String>,
        bucket: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            org: org.into(),
            bucket: bucket.into(),
            token: token.into(),
        }
    }

    /// Read `URL`, `ORG`, `BUCKET` and `TOKEN` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup and validate the result.
    ///
    /// Every key is required; a missing or blank value is a
    /// [`ForwardError::Config`] naming the variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    ForwardError::config_error(format!("missing required variable {}", key))
                })
        };

        let config = Self::new(
            required(ENV_URL)?,
            required(ENV_ORG)?,
            required(ENV_BUCKET)?,
            required(ENV_TOKEN)?,
        );
        config.validate()?;
        Ok(config)
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the organization.
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    /// Set the bucket.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Check that every part is present and the URL is HTTP(S).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("url", &self.url),
            ("org", &self.org),
            ("bucket", &self.bucket),
            ("token", &self.token),
        ] {
            if value.trim().is_empty() {
                return Err(ForwardError::config_error(format!("{} must not be empty", name)));
            }
        }

        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ForwardError::config_error(format!(
                "url must start with http:// or https://, got {}",
                self.url
            )));
        }

        Ok(())
    }

    /// Full write endpoint, without query parameters.
    pub fn write_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), WRITE_PATH)
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }
}
