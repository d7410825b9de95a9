// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Content Module
//!
//! The post record and the markdown collection it is loaded from.
//!
//! ## Key Features
//!
//! - **Post model** shared by every other module
//! - **YAML frontmatter** parsing with a fixed schema (`title`, `pubDate`,
//!   `tags`, `image`)
//! - **Slug derivation** from the file's path inside the collection, e.g.
//!   `posts/en/My Post.md` becomes `en/my-post`

use crate::core::traits::PostSource;
use crate::i18n::Language;
use crate::{BlogFlowError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the content collection holding blog posts.
pub const POSTS_COLLECTION: &str = "posts";

/// File extensions recognised as posts.
pub const POST_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Cover image of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
    /// Image URL, relative to the site root or absolute.
    pub url: String,
    /// Alternative text.
    pub alt: String,
}

/// A blog post as supplied by the content collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Language-prefixed identifier, e.g. `en/my-post`.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Publication instant. Only its UTC calendar day matters for ordering.
    pub pub_date: DateTime<Utc>,
    /// Tag labels.
    pub tags: Vec<String>,
    /// Cover image.
    pub image: PostImage,
    /// Raw markdown body, frontmatter excluded.
    pub body: String,
}

impl Post {
    /// The publication day as the integer `YYYYMMDD`, in UTC.
    ///
    /// Posts published on the same day share a key whatever their time of
    /// day.
    pub fn day_key(&self) -> i64 {
        let day = self.pub_date.date_naive();
        i64::from(day.year()) * 10_000
            + i64::from(day.month()) * 100
            + i64::from(day.day())
    }

    /// The slug without its `lang` segment, or `None` when the post is not
    /// written in `lang`.
    pub fn stripped_slug(&self, lang: Language) -> Option<&str> {
        self.slug.strip_prefix(&lang.segment())
    }
}

/// Frontmatter schema of a post file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    title: String,
    pub_date: String,
    tags: Vec<String>,
    image: PostImage,
}

/// Parses a publication date.
///
/// Accepts RFC 3339 (`2024-01-10T08:30:00+01:00`), a naive date-time taken as
/// UTC (`2024-01-10T08:30:00` or `2024-01-10 08:30:00`) and a bare date taken
/// as UTC midnight (`2024-01-10`).
pub fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Splits a post file into its YAML frontmatter and markdown body.
///
/// Returns `None` when the file does not open with a `---` fence or the
/// fence is never closed.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Turns a file or directory name into a URL-safe slug segment.
///
/// Lowercases, turns whitespace into `-` and drops punctuation other than
/// `-` and `_`.
pub fn slugify(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        })
        .collect()
}

/// Post source reading markdown files from `<content_dir>/posts`.
///
/// Files may be nested; the language is the first directory level, so
/// `posts/es/mi-post.md` yields the slug `es/mi-post`.
#[derive(Debug, Clone)]
pub struct MarkdownPostSource {
    posts_dir: PathBuf,
}

impl MarkdownPostSource {
    /// Creates a source for the collection under `content_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blogflow::content::MarkdownPostSource;
    /// let source = MarkdownPostSource::new("content");
    /// assert!(source.posts_dir().ends_with("posts"));
    /// ```
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            posts_dir: content_dir.as_ref().join(POSTS_COLLECTION),
        }
    }

    /// Directory the posts are read from.
    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Reads and parses a single post file.
    pub fn read_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)
            .map_err(|e| BlogFlowError::io_error(path.to_path_buf(), e))?;
        let slug = self.slug_for(path)?;

        let (yaml, body) = split_frontmatter(&content).ok_or_else(|| {
            BlogFlowError::content_processing_error(
                "Missing frontmatter block",
                Some(path.to_path_buf()),
                None,
            )
        })?;

        let frontmatter: Frontmatter =
            serde_yml::from_str(yaml).map_err(|e| {
                BlogFlowError::content_processing_error(
                    format!("Invalid frontmatter: {}", e),
                    Some(path.to_path_buf()),
                    Some(Box::new(e)),
                )
            })?;

        let pub_date =
            parse_pub_date(&frontmatter.pub_date).ok_or_else(|| {
                BlogFlowError::content_processing_error(
                    format!("Invalid pubDate `{}`", frontmatter.pub_date),
                    Some(path.to_path_buf()),
                    None,
                )
            })?;

        Ok(Post {
            slug,
            title: frontmatter.title,
            pub_date,
            tags: frontmatter.tags,
            image: frontmatter.image,
            body: body.to_string(),
        })
    }

    /// Derives the slug of a post file from its path inside the collection.
    fn slug_for(&self, path: &Path) -> Result<String> {
        let relative =
            path.strip_prefix(&self.posts_dir).map_err(|e| {
                BlogFlowError::content_processing_error(
                    format!("Post outside the collection: {}", e),
                    Some(path.to_path_buf()),
                    None,
                )
            })?;

        let without_extension = relative.with_extension("");
        let segments: Vec<String> = without_extension
            .iter()
            .map(|segment| slugify(&segment.to_string_lossy()))
            .collect();
        Ok(segments.join("/"))
    }

    /// Every post file below the collection directory, in file name order
    /// per directory.
    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.posts_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map_or_else(|| self.posts_dir.clone(), Path::to_path_buf);
                BlogFlowError::io_error(path, e.into())
            })?;
            if entry.file_type().is_file() && is_post_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| POST_EXTENSIONS.contains(&ext))
}

impl PostSource for MarkdownPostSource {
    fn load(&self) -> Result<Vec<Post>> {
        if !self.posts_dir.is_dir() {
            warn!(
                "Post collection not found at {:?}; continuing with no posts",
                self.posts_dir
            );
            return Ok(Vec::new());
        }

        let files = self.collect_files()?;

        let mut posts = Vec::with_capacity(files.len());
        for path in files {
            let post = self.read_post(&path)?;
            debug!("Loaded post `{}` from {:?}", post.slug, path);
            posts.push(post);
        }
        Ok(posts)
    }
}
