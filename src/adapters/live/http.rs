//! Content locator over a remote repository reached by HTTP.

use reqwest::blocking::Client;

use crate::error::PortError;
use crate::ports::ContentLocator;

/// Serves artifacts from `<base url>/<relative path>`.
pub struct HttpContentLocator {
    base: String,
    client: Client,
}

impl HttpContentLocator {
    /// Creates a locator for the repository at `base`.
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

impl ContentLocator for HttpContentLocator {
    fn location(&self) -> String {
        self.base.clone()
    }

    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, PortError> {
        let url = format!("{}/{relative_path}", self.base);
        tracing::debug!(%url, "fetching");
        let response = self.client.get(&url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let locator = HttpContentLocator::new("https://repo.example.org/maven/");
        assert_eq!(locator.location(), "https://repo.example.org/maven");
    }
}
