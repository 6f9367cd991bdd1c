use reqwest::Url;

use crate::error::ClientError;

/// Where the Web API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute `http(s)` base address without a trailing slash.
    pub base_address: String,
}

impl ClientConfig {
    /// Validate and normalise `base_address`.
    pub fn new(base_address: impl Into<String>) -> Result<Self, ClientError> {
        let raw = base_address.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| ClientError::Config(format!("API base address '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "API base address '{raw}' must use http or https"
            )));
        }
        Ok(Self {
            base_address: trimmed.to_string(),
        })
    }

    /// Load from `API_BASE_ADDRESS`.
    pub fn from_env() -> Result<Self, ClientError> {
        let base = std::env::var("API_BASE_ADDRESS")
            .map_err(|_| ClientError::Config("API_BASE_ADDRESS must be set".into()))?;
        Self::new(base)
    }

    /// Absolute URL for `path`, which must start with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_address)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn trailing_slashes_are_removed() {
        let config = ClientConfig::new("https://api.example.test/").unwrap();
        assert_eq!(config.base_address, "https://api.example.test");
        assert_eq!(
            config.url("/api/Species"),
            "https://api.example.test/api/Species"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let config = ClientConfig::new(" http://localhost:3000/stain ").unwrap();
        assert_eq!(config.url("/api/Texture"), "http://localhost:3000/stain/api/Texture");
    }

    #[test]
    fn non_http_addresses_are_rejected() {
        assert_matches!(ClientConfig::new("ftp://files.test"), Err(ClientError::Config(_)));
        assert_matches!(ClientConfig::new("not a url"), Err(ClientError::Config(_)));
    }
}
