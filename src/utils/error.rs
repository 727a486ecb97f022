// Common error types for reqlint

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReqlintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Include error for {path}: {message}")]
    Include { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, ReqlintError>;

/// User-facing wrapper around a `ReqlintError` for the binary:
/// message, optional hint, and the process exit code
#[derive(Debug)]
pub struct UserError {
    pub message: String,
    pub hint: Option<String>,
    pub exit_code: i32,
}

impl UserError {
    pub fn from_error(err: &ReqlintError) -> Self {
        match err {
            ReqlintError::Validation(message) => Self {
                message: message.clone(),
                hint: None,
                exit_code: 1,
            },
            ReqlintError::Parse { .. } => Self {
                message: err.to_string(),
                hint: Some("run 'reqlint check' for a full report".to_string()),
                exit_code: 2,
            },
            ReqlintError::Config(_) => Self {
                message: err.to_string(),
                hint: Some("check your reqlint.toml".to_string()),
                exit_code: 2,
            },
            ReqlintError::Io(_) | ReqlintError::Include { .. } => Self {
                message: err.to_string(),
                hint: None,
                exit_code: 2,
            },
        }
    }

    pub fn print(&self) {
        eprintln!("error: {}", self.message);
        if let Some(hint) = &self.hint {
            eprintln!("  hint: {}", hint);
        }
    }
}
