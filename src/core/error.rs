//! Error handling for the resolver
//!
//! The resolution algorithm itself has almost no fatal failures: unparseable
//! front-matter, unresolvable references, and unreadable candidate files are
//! all accumulated on the [`ResolutionResult`](crate::report::ResolutionResult)
//! instead of being raised. The errors in this module cover what is left:
//!
//! - **Invalid input**: [`ResolverError::ContentRootNotFound`],
//!   [`ResolverError::ContentRootNotDirectory`]
//! - **Configuration**: [`ResolverError::ConfigError`], [`ResolverError::ConfigParseError`]
//! - **Patterns and types**: [`ResolverError::InvalidPattern`],
//!   [`ResolverError::InvalidContentType`]
//! - **I/O**: [`ResolverError::IoError`] from [`std::io::Error`]
//!
//! Use [`user_friendly_error`] to turn any [`anyhow::Error`] into an
//! [`ErrorContext`] with a suggestion for CLI display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bmad_resolver::core::{ResolverError, ErrorContext};
//!
//! let context = ErrorContext::new(ResolverError::ContentRootNotFound {
//!     path: "./src".to_string(),
//! })
//! .with_suggestion("Pass the directory that contains the 'core' module");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for resolver operations
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The content root passed to a resolution call does not exist
    #[error("Content root not found: {path}")]
    ContentRootNotFound {
        /// The path that was given as content root
        path: String,
    },

    /// The content root exists but is a file
    #[error("Content root is not a directory: {path}")]
    ContentRootNotDirectory {
        /// The path that was given as content root
        path: String,
    },

    /// A glob pattern could not be compiled
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why compilation failed
        reason: String,
    },

    /// An unknown content type name was given
    #[error("Invalid content type: {content_type}")]
    InvalidContentType {
        /// The name that did not match any content type
        content_type: String,
    },

    /// Configuration is semantically invalid
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path to the configuration file
        file: String,
        /// Parser message
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for ResolverError {
    fn clone(&self) -> Self {
        match self {
            Self::ContentRootNotFound {
                path,
            } => Self::ContentRootNotFound {
                path: path.clone(),
            },
            Self::ContentRootNotDirectory {
                path,
            } => Self::ContentRootNotDirectory {
                path: path.clone(),
            },
            Self::InvalidPattern {
                pattern,
                reason,
            } => Self::InvalidPattern {
                pattern: pattern.clone(),
                reason: reason.clone(),
            },
            Self::InvalidContentType {
                content_type,
            } => Self::InvalidContentType {
                content_type: content_type.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Wraps a [`ResolverError`] with an optional suggestion (shown in green) and
/// optional details (shown in yellow).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying resolver error
    pub error: ResolverError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details
    #[must_use]
    pub const fn new(error: ResolverError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`ResolverError`], [`std::io::Error`], and [`toml::de::Error`];
/// anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(resolver_error) = error.downcast_ref::<ResolverError>() {
        return create_error_context(resolver_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ResolverError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check read permissions on the content root and its files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ResolverError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(ResolverError::ConfigParseError {
            file: crate::constants::CONFIG_FILE_NAME.to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the configuration file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ResolverError::Other {
        message,
    })
}

fn create_error_context(error: ResolverError) -> ErrorContext {
    match &error {
        ResolverError::ContentRootNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the directory that contains the 'core' module (for example './src' or './bmad')")
            .with_details("The content root must be an existing directory holding one subtree per module"),

        ResolverError::ContentRootNotDirectory { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the parent directory of the module folders, not a file inside it"),

        ResolverError::InvalidPattern { .. } => ErrorContext::new(error)
            .with_suggestion("Glob patterns support '*', '**', '?' and '[...]' character classes"),

        ResolverError::InvalidContentType { .. } => ErrorContext::new(error)
            .with_suggestion("Valid content types are: agent, task, template, tool, data, other"),

        ResolverError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Review the [resolver] section of bmad-resolver.toml"),

        ResolverError::ConfigParseError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax: quotes, brackets and key names")
                .with_details(details)
        }

        ResolverError::IoError(_) | ResolverError::Other { .. } => ErrorContext::new(error),
    }
}
