#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the profile generator."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Source adapters report failures through [`masterror::AppError`]; those
//! failures are absorbed per field by the aggregator. The [`Error`] type
//! below covers what must reach the top-level invocation: startup-fatal
//! configuration problems, the domain-fatal empty spotlight, and rendering
//! I/O.

use std::path::{Path, PathBuf};

/// Unified error type returned by configuration loading, aggregation and
/// rendering.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Startup-fatal configuration problem such as a missing credential.
    #[error("invalid configuration: {message}")]
    Config {
        /// Human readable message describing the problem.
        message: String
    },
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps serialization errors when emitting the snapshot.
    #[error("failed to serialize snapshot: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors raised while reading templates or writing output.
    #[error("failed to access template artifact at {path:?}: {source}")]
    TemplateIo {
        /// Location of the template or output document.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Template refers to a placeholder the renderer does not provide.
    #[error("invalid template: {message}")]
    Template {
        /// Human readable message describing the template problem.
        message: String
    },
    /// Domain-fatal condition with no sensible default to substitute.
    #[error("not found: {message}")]
    NotFound {
        /// Human readable message describing what is missing.
        message: String
    },
    /// Service errors when interacting with external APIs.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs a configuration error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the configuration failure.
    pub fn config<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Config {
            message: message.into()
        }
    }

    /// Constructs a template error from the provided displayable value.
    pub fn template<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Template {
            message: message.into()
        }
    }

    /// Constructs a not-found error from the provided displayable value.
    pub fn not_found<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::NotFound {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Service {
            message: crate::fallback::describe(&error)
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::TemplateIo`] variant capturing the failing path and
/// source.
pub fn template_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::TemplateIo {
        path: path.to_path_buf(),
        source
    }
}
