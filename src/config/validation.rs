use crate::config::types::{BoardConfig, Config, HttpConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_board_config(&config.board)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates board configuration
fn validate_board_config(config: &BoardConfig) -> Result<(), ConfigError> {
    validate_token("board name", &config.name)?;
    validate_token("section", &config.section)?;

    if config.base_url.cannot_be_a_base() {
        return Err(ConfigError::Validation(format!(
            "base_url must be a hierarchical URL, got '{}'",
            config.base_url
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request_timeout cannot be zero".to_string(),
        ));
    }

    Ok(())
}

/// Section and board names end up in URL paths and file names
fn validate_token(what: &str, token: &str) -> Result<(), ConfigError> {
    if token.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", what)));
    }

    if !token.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "{} must contain only ASCII letters and digits, got '{}'",
            what, token
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::config_for_section;
    use std::path::Path;
    use std::time::Duration;

    fn valid_config() -> Config {
        config_for_section(Some("wg"), Path::new("/home/test")).unwrap()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_section_with_slash_rejected() {
        let mut config = valid_config();
        config.board.section = "s/../etc".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_board_name_rejected() {
        let mut config = valid_config();
        config.board.name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_pages_rejected() {
        let mut config = valid_config();
        config.board.max_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = valid_config();
        config.http.max_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.http.request_timeout = Duration::ZERO;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_hierarchical_base_url_rejected() {
        let mut config = valid_config();
        config.board.base_url = url::Url::parse("mailto:someone@example.com").unwrap();
        assert!(validate(&config).is_err());
    }
}
