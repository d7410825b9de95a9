// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Error Handling for BlogFlow
//!
//! This module defines the error type shared by every BlogFlow component.
//! The `thiserror` crate is used to derive `Display` and `Error` so that
//! failures carry their context (paths, slugs, language codes) up to the
//! caller unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the BlogFlow library.
///
/// This type alias simplifies function signatures by defining a result type that always uses `BlogFlowError` as the error variant.
pub type Result<T> = std::result::Result<T, BlogFlowError>;

/// The main error type for BlogFlow, encompassing all potential error cases.
#[derive(Error, Debug)]
pub enum BlogFlowError {
    /// Error related to configuration loading or validation.
    #[error("Configuration error: {message}.")]
    ConfigError {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file that caused the error.
        path: Option<PathBuf>,
    },

    /// Error encountered while reading a post: missing or malformed
    /// frontmatter, an unparsable date, and similar authoring mistakes.
    #[error("Content processing error: {message}.")]
    ContentProcessingError {
        /// Detailed description of the content processing error.
        message: String,
        /// Optional path of the post file that caused the error.
        path: Option<PathBuf>,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A post body has no line an excerpt can be taken from.
    ///
    /// Bodies made only of headings, quotes or markup-only lines end up here.
    /// This is a content bug and aborts the affected language view.
    #[error("No excerpt can be extracted from post `{slug}`.")]
    ExcerptUnavailable {
        /// Slug of the offending post, language prefix included.
        slug: String,
    },

    /// Two posts in the collection share the same slug.
    #[error("Duplicate post slug `{slug}`.")]
    DuplicateSlug {
        /// The slug found more than once.
        slug: String,
    },

    /// A language code that the blog does not publish in.
    #[error("Unsupported language code `{code}`.")]
    UnsupportedLanguage {
        /// The rejected code, as given.
        code: String,
    },

    /// The RSS channel could not be built or failed validation.
    #[error("Feed generation error for `{language}`: {message}.")]
    FeedGenerationError {
        /// Description of the feed error.
        message: String,
        /// Code of the language whose feed failed.
        language: String,
    },

    /// IO error encountered during file operations.
    #[error("File IO error at `{path:?}`: {source}")]
    IOError {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for BlogFlowError {
    /// Converts a standard IO error into a `BlogFlowError::IOError` with an
    /// empty path.
    fn from(source: std::io::Error) -> Self {
        BlogFlowError::IOError {
            path: PathBuf::new(),
            source,
        }
    }
}

impl BlogFlowError {
    /// Creates a `ConfigError` with a specific message.
    ///
    /// # Parameters
    /// - `message`: A description of the configuration error.
    /// - `path`: Optional path of the configuration file causing the error.
    pub fn config_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        BlogFlowError::ConfigError {
            message: message.into(),
            path,
        }
    }

    /// Creates a `ContentProcessingError` with a message, the offending
    /// file and an optional source.
    pub fn content_processing_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        BlogFlowError::ContentProcessingError {
            message: message.into(),
            path,
            source,
        }
    }

    /// Creates an `ExcerptUnavailable` error for the given post slug.
    pub fn excerpt_unavailable<S: Into<String>>(slug: S) -> Self {
        BlogFlowError::ExcerptUnavailable { slug: slug.into() }
    }

    /// Creates a `FeedGenerationError` for a language.
    pub fn feed_generation_error<S: Into<String>>(
        message: S,
        language: &str,
    ) -> Self {
        BlogFlowError::FeedGenerationError {
            message: message.into(),
            language: language.to_string(),
        }
    }

    /// Wraps an IO error as an `IOError` variant with the specified path.
    ///
    /// # Parameters
    /// - `path`: The file path associated with the IO error.
    /// - `source`: The original IO error.
    pub fn io_error(path: PathBuf, source: std::io::Error) -> Self {
        BlogFlowError::IOError { path, source }
    }
}
