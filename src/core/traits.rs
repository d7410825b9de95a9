// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Core Traits Module
//!
//! The seams between BlogFlow and the outside world.
//!
//! - [`PostSource`]: where the post collection comes from
//! - [`OutputGenerator`]: where generated artifacts go

use std::path::Path;

use crate::content::Post;
use crate::core::error::Result;

/// A content collection that yields every post record.
///
/// `load` is the only I/O boundary of the post pipeline. It is called once
/// per invocation and must return fresh records each time; callers never
/// keep the result across invocations.
pub trait PostSource: Send + Sync + std::fmt::Debug {
    /// Loads every post, in no particular order.
    ///
    /// A source with no posts returns an empty collection rather than an
    /// error.
    fn load(&self) -> Result<Vec<Post>>;
}

impl PostSource for Vec<Post> {
    fn load(&self) -> Result<Vec<Post>> {
        Ok(self.clone())
    }
}

/// Trait for writing generated output.
pub trait OutputGenerator: Send + Sync + std::fmt::Debug {
    /// Writes `content` to `path`, creating parent directories as needed.
    ///
    /// # Arguments
    ///
    /// * `content` - The content to write
    /// * `path` - The destination file
    fn generate(&self, content: &str, path: &Path) -> Result<()>;
}
