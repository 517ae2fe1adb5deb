//! # Error Types
//!
//! Flag parsing errors reported by [`FlagSet::parse`](crate::FlagSet::parse).

use thiserror::Error;

/// Result type alias for flag operations
pub type Result<T> = std::result::Result<T, FlagError>;

/// Errors produced while binding command-line arguments to a flag set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// A flag was given that the set does not define
    #[error("flag provided but not defined: {0}")]
    Undefined(String),

    /// A flag value could not be converted to the flag's type
    #[error("invalid value {value:?} for flag -{flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    /// A value-taking flag appeared without a value
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    /// `-h` or `--help` was given and the set does not define it
    #[error("help requested")]
    HelpRequested,

    /// Anything else the argument parser rejected
    #[error("{0}")]
    Syntax(String),
}

impl FlagError {
    /// Whether the user explicitly asked for help rather than making a mistake
    pub fn is_help(&self) -> bool {
        matches!(self, FlagError::HelpRequested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FlagError::Undefined("--bogus".to_string()).to_string(),
            "flag provided but not defined: --bogus"
        );
        assert_eq!(
            FlagError::MissingValue("name".to_string()).to_string(),
            "flag needs an argument: -name"
        );

        let err = FlagError::InvalidValue {
            flag: "count".to_string(),
            value: "abc".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert!(err.to_string().contains("\"abc\""));
        assert!(err.to_string().contains("-count"));
    }

    #[test]
    fn test_is_help() {
        assert!(FlagError::HelpRequested.is_help());
        assert!(!FlagError::Syntax("x".to_string()).is_help());
    }
}
