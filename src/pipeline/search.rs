//! Client for the remote search service
//!
//! Queries are sent as a JSON POST carrying the query text, country and
//! language; the response's `organic` array is reduced to its `link` fields.

use crate::config::SearchConfig;
use crate::HarvestError;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// JSON payload sent to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub q: String,
    pub gl: String,
    pub hl: String,
    pub autocorrect: bool,
}

/// Search service client
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(client: Client, config: SearchConfig) -> Self {
        Self { client, config }
    }

    /// Builds the query text for a postal code: `"<phrase>" "<postal_code>"`
    ///
    /// # Example
    ///
    /// ```
    /// use contact_harvest::config::SearchConfig;
    /// use contact_harvest::pipeline::SearchClient;
    ///
    /// let client = SearchClient::new(reqwest::Client::new(), SearchConfig::default());
    /// assert_eq!(client.build_query("75001"), r#""réalisé par solocal" "75001""#);
    /// ```
    pub fn build_query(&self, postal_code: &str) -> String {
        format!("\"{}\" \"{}\"", self.config.phrase, postal_code)
    }

    /// Builds the full request payload for a postal code
    pub fn build_request(&self, postal_code: &str) -> SearchRequest {
        SearchRequest {
            q: self.build_query(postal_code),
            gl: self.config.country.clone(),
            hl: self.config.language.clone(),
            autocorrect: self.config.autocorrect,
        }
    }

    /// Sends one search request and returns the raw response body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The service answered with a success status
    /// * `Err(HarvestError::SearchStatus)` - The service answered with another status
    /// * `Err(HarvestError::Http)` - The request could not be completed
    pub async fn send(&self, request: &SearchRequest) -> Result<String, HarvestError> {
        let http_error = |source: reqwest::Error| HarvestError::Http {
            url: self.config.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-API-KEY", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::SearchStatus {
                query: request.q.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(http_error)
    }
}

/// Extracts result links from a search response body
///
/// Results without a usable `link` string are skipped; a body without an
/// `organic` array has no links. Only a body that is not JSON at all is an
/// error.
pub fn parse_result_links(body: &str) -> Result<Vec<String>, HarvestError> {
    let document: Value =
        serde_json::from_str(body).map_err(|e| HarvestError::MalformedResponse {
            origin: "search service".to_string(),
            message: e.to_string(),
        })?;

    let links = document
        .get("organic")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|result| result.get("link").and_then(Value::as_str))
                .filter(|link| !link.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(links)
}
