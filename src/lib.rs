// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # BlogFlow Library
//!
//! BlogFlow orders a multilingual markdown blog and derives the per-language
//! views a static front end renders: neighbour links, reading time and
//! excerpts, plus tag indexes and RSS feeds.
//!
//! For more information, visit the [BlogFlow documentation](https://docs.rs/blogflow).

#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/blogflow")]
#![crate_name = "blogflow"]

/// Module containing core utilities, such as configuration, error handling
/// and the post source and output traits.
pub mod core;

/// Provides command-line interface utilities.
pub mod cli;

/// Loads post records from markdown files with YAML frontmatter.
pub mod content;

/// Renders per-language RSS feeds.
pub mod feed;

/// Supported languages and the UI string table.
pub mod i18n;

/// Listing pagination and tag grouping.
pub mod listing;

/// Sorting and per-language translation of the post collection.
pub mod posts;

/// Writes the generated data files of a site.
pub mod site;

pub use crate::core::error::{BlogFlowError, Result};
