//! Loading of the postal code reference document
//!
//! The document is a JSON array of objects carrying at least `codePostal` and
//! `nomCommune`. It is read from a local file or fetched over HTTP(S). Any
//! failure is fatal to the run.

use crate::postal::PostalCodeDirectory;
use crate::HarvestError;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;

/// One entry of the reference document; other fields are ignored
#[derive(Debug, Deserialize)]
struct RawPostalCode {
    #[serde(rename = "codePostal")]
    code_postal: String,
    #[serde(rename = "nomCommune")]
    nom_commune: String,
}

/// Parses the reference document
///
/// # Arguments
///
/// * `source_name` - Where the document came from, used in error messages
/// * `json` - The document text
///
/// # Returns
///
/// * `Ok(PostalCodeDirectory)` - One entry per distinct postal code
/// * `Err(HarvestError::PostalCodes)` - The document is not the expected shape
pub fn parse_postal_codes(source_name: &str, json: &str) -> Result<PostalCodeDirectory, HarvestError> {
    let raw: Vec<RawPostalCode> =
        serde_json::from_str(json).map_err(|e| HarvestError::PostalCodes {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    Ok(raw
        .into_iter()
        .map(|entry| (entry.code_postal, entry.nom_commune))
        .collect())
}

/// Loads the postal code directory from a URL or a local path
///
/// Sources starting with `http://` or `https://` are fetched with `client`;
/// anything else is read from disk.
pub async fn load_postal_codes(
    client: &Client,
    source: &str,
) -> Result<PostalCodeDirectory, HarvestError> {
    let load_error = |message: String| HarvestError::PostalCodes {
        source_name: source.to_string(),
        message,
    };

    let body = if source.starts_with("http://") || source.starts_with("https://") {
        tracing::info!("Fetching postal codes from {}", source);
        let response = client
            .get(source)
            .send()
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_error(format!("HTTP {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| load_error(e.to_string()))?
    } else {
        tracing::info!("Reading postal codes from {}", source);
        std::fs::read_to_string(Path::new(source)).map_err(|e| load_error(e.to_string()))?
    };

    let directory = parse_postal_codes(source, &body)?;
    tracing::info!("Loaded {} postal codes", directory.len());

    Ok(directory)
}
