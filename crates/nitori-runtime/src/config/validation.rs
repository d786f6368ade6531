//! Configuration validation utilities.

use std::collections::HashSet;

use nitori_core::SNOWFLAKE_LENGTH;

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, NitoriConfig, RouterConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &NitoriConfig) -> ConfigResult<()> {
    validate_router_config(&config.router)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates router settings.
fn validate_router_config(router: &RouterConfig) -> ConfigResult<()> {
    if router.prefix.trim().is_empty() {
        return Err(ConfigError::validation("Prefix must not be empty"));
    }
    if router.prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation("Prefix must not contain whitespace"));
    }

    if let Some(id) = router.administrator {
        validate_user_id("router.administrator", id)?;
    }

    let mut seen = HashSet::new();
    for &id in &router.operators {
        validate_user_id("router.operators", id)?;
        if !seen.insert(id) {
            return Err(ConfigError::DuplicateOperator(id));
        }
    }

    if router.max_concurrent_tasks == Some(0) {
        return Err(ConfigError::validation(
            "max_concurrent_tasks must be greater than 0",
        ));
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required for file output",
        ));
    }
    if logging.filters.keys().any(|module| module.trim().is_empty()) {
        return Err(ConfigError::validation("Empty module name in logging.filters"));
    }
    Ok(())
}

fn validate_user_id(field: &str, id: u64) -> ConfigResult<()> {
    if id.to_string().len() != SNOWFLAKE_LENGTH {
        return Err(ConfigError::invalid_user_id(field, id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: u64 = 100000000000000001;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&NitoriConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_prefix() {
        let mut config = NitoriConfig::default();
        config.router.prefix = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));

        config.router.prefix = "n !".to_string();
        assert!(validate_config(&config).is_err());

        config.router.prefix = "n!".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_duplicate_operator() {
        let mut config = NitoriConfig::default();
        config.router.administrator = Some(ADMIN);
        config.router.operators = vec![ADMIN + 1, ADMIN + 2, ADMIN + 1];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::DuplicateOperator(id)) if id == ADMIN + 1
        ));
    }

    #[test]
    fn test_validate_user_id_length() {
        let mut config = NitoriConfig::default();
        config.router.administrator = Some(42);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidUserId { id: 42, .. })
        ));
    }

    #[test]
    fn test_validate_task_bound() {
        let mut config = NitoriConfig::default();
        config.router.max_concurrent_tasks = Some(0);
        assert!(validate_config(&config).is_err());

        config.router.max_concurrent_tasks = Some(8);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_file_output_needs_path() {
        let mut config = NitoriConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("logs/nitori.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
