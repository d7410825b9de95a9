// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Site Build
//!
//! Turns a post collection into the data files a static front end needs:
//! the global post order, and for every configured language the translated
//! view, its tag index, its UI strings and its RSS feed.
//!
//! ```text
//! <output_dir>/
//! ├── posts.json
//! ├── en/
//! │   ├── posts.json
//! │   ├── tags.json
//! │   ├── ui.json
//! │   └── rss.xml
//! └── es/
//!     └── ...
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::content::Post;
use crate::core::config::Config;
use crate::core::traits::{OutputGenerator, PostSource};
use crate::feed::build_feed;
use crate::i18n::Language;
use crate::listing::tag_index;
use crate::posts::{sort_all_posts, translate_posts, Blog};
use crate::{BlogFlowError, Result};

/// Name of the JSON file holding a post list.
pub const POSTS_FILE: &str = "posts.json";

/// Name of the JSON file holding a tag index.
pub const TAGS_FILE: &str = "tags.json";

/// Name of the JSON file holding UI strings.
pub const UI_FILE: &str = "ui.json";

/// Writes generated artifacts to the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOutputGenerator;

impl OutputGenerator for FileOutputGenerator {
    fn generate(&self, content: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BlogFlowError::io_error(parent.to_path_buf(), e)
            })?;
        }
        let mut file = fs::File::create(path)
            .map_err(|e| BlogFlowError::io_error(path.to_path_buf(), e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| BlogFlowError::io_error(path.to_path_buf(), e))?;
        Ok(())
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of posts in the collection.
    pub posts: usize,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
}

/// Drives a full build from a post source to an output generator.
#[derive(Debug)]
pub struct SiteBuilder<S: PostSource> {
    config: Config,
    blog: Blog<S>,
    output_generator: Box<dyn OutputGenerator>,
}

impl<S: PostSource> SiteBuilder<S> {
    /// Creates a builder over `source`, writing through `output_generator`.
    pub fn new(
        config: Config,
        source: S,
        output_generator: Box<dyn OutputGenerator>,
    ) -> Self {
        Self {
            config,
            blog: Blog::new(source),
            output_generator,
        }
    }

    /// Loads the collection once and writes every artifact.
    ///
    /// # Errors
    ///
    /// Fails on the first load, excerpt, feed or write error. Files written
    /// before the failure are left in place.
    pub fn build(&self) -> Result<BuildReport> {
        let posts = self.blog.load()?;
        let mut report = BuildReport {
            posts: posts.len(),
            files: Vec::new(),
        };

        let sorted = sort_all_posts(posts);
        let summaries: Vec<serde_json::Value> = sorted
            .iter()
            .map(|post| {
                serde_json::json!({
                    "slug": post.slug,
                    "title": post.title,
                    "pubDate": post.pub_date,
                })
            })
            .collect();
        self.write_json(
            &mut report,
            &self.config.output_dir,
            POSTS_FILE,
            &summaries,
        )?;

        for &lang in &self.config.languages {
            self.build_language(&mut report, &sorted, lang)?;
        }

        info!(
            "Built {} posts into {} files",
            report.posts,
            report.files.len()
        );
        Ok(report)
    }

    fn build_language(
        &self,
        report: &mut BuildReport,
        sorted: &[Post],
        lang: Language,
    ) -> Result<()> {
        let view = translate_posts(sorted, lang)?;
        let dir = self.config.output_dir.join(lang.code());

        self.write_json(report, &dir, POSTS_FILE, &view)?;
        self.write_json(report, &dir, TAGS_FILE, &tag_index(&view))?;
        self.write_json(report, &dir, UI_FILE, &lang.ui_strings())?;

        if self.config.feed.enabled {
            let xml = build_feed(&self.config.site, lang, &view)?;
            self.write(report, dir.join(&self.config.feed.file_name), &xml)?;
        }
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        report: &mut BuildReport,
        dir: &Path,
        file_name: &str,
        value: &T,
    ) -> Result<()> {
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(value).map_err(|e| {
            BlogFlowError::content_processing_error(
                "Failed to serialise output",
                Some(path.clone()),
                Some(Box::new(e)),
            )
        })?;
        self.write(report, path, &json)
    }

    fn write(
        &self,
        report: &mut BuildReport,
        path: PathBuf,
        content: &str,
    ) -> Result<()> {
        self.output_generator.generate(content, &path)?;
        info!("Wrote {}", path.display());
        report.files.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostImage;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn post(slug: &str, day: u32, tags: &[&str]) -> Post {
        Post {
            slug: slug.to_string(),
            title: format!("Title {}", slug),
            pub_date: Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image: PostImage::default(),
            body: format!("First paragraph of {}.", slug),
        }
    }

    fn config(output_dir: &Path) -> Config {
        Config {
            output_dir: output_dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_file_output_generator_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b/c.txt");
        FileOutputGenerator.generate("hello", &path).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_build_writes_every_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("public");
        let posts = vec![
            post("en/old", 1, &["rust"]),
            post("es/nuevo", 3, &["rust", "web"]),
            post("en/new", 2, &["web"]),
        ];

        let builder = SiteBuilder::new(
            config(&out),
            posts,
            Box::new(FileOutputGenerator),
        );
        let report = builder.build().unwrap();

        assert_eq!(report.posts, 3);
        assert_eq!(report.files.len(), 9);
        for lang in ["en", "es"] {
            for file in ["posts.json", "tags.json", "ui.json", "rss.xml"] {
                assert!(out.join(lang).join(file).exists(), "{lang}/{file}");
            }
        }

        let global: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.join("posts.json")).unwrap(),
        )
        .unwrap();
        let slugs: Vec<&str> = global
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["es/nuevo", "en/new", "en/old"]);

        let view: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.join("en/posts.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(view[0]["slug"], "new");
        assert_eq!(view[0]["previous"], "old");
        assert_eq!(view[0]["minRead"], 1);
        assert_eq!(view[1]["next"], "new");

        let tags: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.join("en/tags.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(tags["web"], serde_json::json!(["new"]));
    }

    #[test]
    fn test_build_respects_feed_and_language_settings() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("public");
        let mut config = config(&out);
        config.feed.enabled = false;
        config.languages = vec![Language::Spanish];

        let builder = SiteBuilder::new(
            config,
            vec![post("es/hola", 1, &[])],
            Box::new(FileOutputGenerator),
        );
        let report = builder.build().unwrap();

        assert_eq!(report.files.len(), 4);
        assert!(!out.join("es/rss.xml").exists());
        assert!(!out.join("en").exists());
    }

    #[test]
    fn test_build_fails_on_duplicate_slugs() {
        let temp_dir = TempDir::new().unwrap();
        let builder = SiteBuilder::new(
            config(temp_dir.path()),
            vec![post("en/same", 1, &[]), post("en/same", 2, &[])],
            Box::new(FileOutputGenerator),
        );
        assert!(matches!(
            builder.build(),
            Err(BlogFlowError::DuplicateSlug { .. })
        ));
    }
}
