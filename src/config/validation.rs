use crate::config::types::{
    Config, FetcherConfig, OutputConfig, PipelineConfig, PostalCodesConfig, RetryConfig,
    SearchConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_retry_config(&config.retry)?;
    validate_pipeline_config(&config.pipeline)?;
    validate_output_config(&config.output)?;
    validate_postal_codes_config(&config.postal_codes)?;
    Ok(())
}

/// Validates search service configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search endpoint: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Search endpoint must use HTTP(S), got '{}'",
            config.endpoint
        )));
    }

    if config.phrase.trim().is_empty() {
        return Err(ConfigError::Validation(
            "search phrase cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetcher timeout must be >= 1s".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry budgets
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    for (name, attempts) in [
        ("fetch_attempts", config.fetch_attempts),
        ("link_attempts", config.link_attempts),
        ("search_attempts", config.search_attempts),
    ] {
        if attempts < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, attempts
            )));
        }
    }

    Ok(())
}

/// Validates worker pool widths and excluded extensions
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.postal_code_workers < 1 || config.postal_code_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "postal_code_workers must be between 1 and 64, got {}",
            config.postal_code_workers
        )));
    }

    if config.link_workers < 1 || config.link_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "link_workers must be between 1 and 100, got {}",
            config.link_workers
        )));
    }

    for extension in &config.excluded_extensions {
        if !extension.starts_with('.') || extension.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "excluded extension must look like '.pdf', got '{}'",
                extension
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the postal code source
fn validate_postal_codes_config(config: &PostalCodesConfig) -> Result<(), ConfigError> {
    if config.source.is_empty() {
        return Err(ConfigError::Validation(
            "postal code source cannot be empty".to_string(),
        ));
    }

    Ok(())
}
