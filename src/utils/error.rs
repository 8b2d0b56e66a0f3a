use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("No parser registered for store: {store}")]
    MissingParser { store: String },

    #[error("Unknown store: {0}")]
    UnknownStore(String),
}

impl AppError {
    pub fn not_found(selector: impl Into<String>) -> Self {
        AppError::ElementNotFound {
            selector: selector.into(),
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
