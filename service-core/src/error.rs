use thiserror::Error;

/// Errors raised while assembling or running a service, before any request
/// is being served.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_internal() {
        let err = AppError::from(std::io::Error::other("address in use"));
        assert!(matches!(err, AppError::InternalError(_)));
        assert!(err.to_string().contains("address in use"));
    }

    #[test]
    fn config_errors_keep_their_message() {
        let err = AppError::from(config::ConfigError::Message("bad port".to_string()));
        assert!(matches!(err, AppError::ConfigError(_)));
        assert_eq!(err.to_string(), "Configuration error: bad port");
    }
}
