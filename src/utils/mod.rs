// Utilities module for configuration and errors
pub mod config;
pub mod error;

pub use config::{LintConfig, RuleLevel, CONFIG_FILE_NAME};
pub use error::{ReqlintError, Result, UserError};
