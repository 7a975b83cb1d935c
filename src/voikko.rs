use std::time::Duration;

use anyhow::{Context, Result};

use crate::analyze::{Analysis, Analyzer, AnalyzerError, Attrs};

const ANALYZE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a Voikko-style morphological analysis service:
/// `GET <base>?q=<token>` returns a JSON array with one attribute map per
/// reading, uppercase keys, `BASEFORM` carrying the lemma.
pub struct VoikkoClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl VoikkoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(ANALYZE_TIMEOUT)
            .build()
            .context("failed to build analyzer HTTP client")?;
        Ok(VoikkoClient {
            client,
            base_url: base_url.into(),
        })
    }
}

impl Analyzer for VoikkoClient {
    fn analyze(&self, token: &str) -> Result<Vec<Analysis>, AnalyzerError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", token)])
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| AnalyzerError::Request {
                token: token.to_string(),
                reason: err.to_string(),
            })?;
        let readings: Vec<Attrs> = response.json().map_err(|err| AnalyzerError::Decode {
            token: token.to_string(),
            reason: err.to_string(),
        })?;
        Ok(readings
            .into_iter()
            .map(|attrs| Analysis { attrs })
            .collect())
    }
}
