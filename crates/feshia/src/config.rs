use std::time::Duration;

use crate::prelude::*;

pub const DEFAULT_API_URL: &str = "https://services.feshia.com/api";
pub const DEFAULT_SITE_URL: &str = "https://feshia.com";
pub const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Endpoints and client settings resolved from the global flags / environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_base: String,
    pub site_base: String,
    pub enquiry_url: String,
    pub timeout: Duration,
}

fn normalize_base(name: &str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::Config(format!(
            "{name} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(trimmed.to_string())
}

impl ApiConfig {
    pub fn new(
        api_url: &str,
        site_url: &str,
        enquiry_url: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, Error> {
        if timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }

        let api_base = normalize_base("FESHIA_API_URL", api_url)?;
        let site_base = normalize_base("FESHIA_SITE_URL", site_url)?;
        let enquiry_url = match enquiry_url {
            Some(url) => normalize_base("FESHIA_ENQUIRY_URL", url)?,
            None => format!("{site_base}/enquiry"),
        };

        Ok(Self {
            api_base,
            site_base,
            enquiry_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn from_global(global: &crate::Global) -> Result<Self> {
        Self::new(
            &global.api_url,
            &global.site_url,
            global.enquiry_url.as_deref(),
            global.timeout_secs,
        )
        .context("Failed to load configuration")
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.api_base)
        } else {
            format!("{}/{path}", self.api_base)
        }
    }
}
