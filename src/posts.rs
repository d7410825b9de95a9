// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Post Ordering and Language Views
//!
//! Turns the raw post collection into what listings, single-post navigation
//! and feeds consume:
//!
//! - [`sort_all_posts`] orders the whole collection, newest day first.
//! - [`translate_posts`] narrows it to one language and annotates every post
//!   with its neighbours, a reading time and an excerpt.
//!
//! Every call builds new [`TranslatedPost`] values; the input posts are only
//! borrowed, so two views of the same collection never see each other's
//! derived fields.
//!
//! ```
//! use blogflow::content::{Post, PostImage};
//! use blogflow::i18n::Language;
//! use blogflow::posts::translate_posts;
//! use chrono::{TimeZone, Utc};
//!
//! let post = |slug: &str, day: u32| Post {
//!     slug: slug.to_string(),
//!     title: slug.to_string(),
//!     pub_date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
//!     tags: vec![],
//!     image: PostImage::default(),
//!     body: "Some words.".to_string(),
//! };
//! let posts = vec![post("en/a", 10), post("en/b", 20), post("es/c", 15)];
//!
//! let view = translate_posts(&posts, Language::English).unwrap();
//! assert_eq!(view[0].slug, "b");
//! assert_eq!(view[0].previous.as_deref(), Some("a"));
//! assert_eq!(view[1].next.as_deref(), Some("b"));
//! ```

use crate::content::{Post, PostImage};
use crate::core::traits::PostSource;
use crate::i18n::Language;
use crate::{BlogFlowError, Result};
use chrono::{DateTime, Utc};
use log::debug;
use pulldown_cmark::{Event, Options, Parser, Tag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Words read per minute when estimating reading time.
pub const WORDS_PER_MINUTE: usize = 200;

/// Maximum number of characters kept in an excerpt, ellipsis excluded.
pub const EXCERPT_LENGTH: usize = 96;

/// Appended to every excerpt.
pub const ELLIPSIS: &str = "...";

/// A post as seen from one language's listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedPost {
    /// Slug without the language segment, e.g. `my-post`.
    pub slug: String,
    /// Language of the view the post belongs to.
    pub lang: Language,
    /// Display title.
    pub title: String,
    /// Publication instant.
    pub pub_date: DateTime<Utc>,
    /// Tag labels.
    pub tags: Vec<String>,
    /// Cover image.
    pub image: PostImage,
    /// Raw markdown body.
    pub body: String,
    /// Stripped slug of the next more recent post, if any.
    pub next: Option<String>,
    /// Stripped slug of the next older post, if any.
    pub previous: Option<String>,
    /// Estimated reading time in whole minutes.
    pub min_read: usize,
    /// Plain-text preview of the body.
    pub extract: String,
}

/// Orders posts by publication day, newest first.
///
/// Only the UTC calendar day is compared, so posts from the same day keep
/// their relative order from `posts`.
pub fn sort_all_posts(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.day_key().cmp(&a.day_key()));
    posts
}

/// Builds the annotated, newest-first view of the posts written in `lang`.
///
/// `posts` may be in any order; it is sorted with [`sort_all_posts`]
/// semantics before filtering.
///
/// # Errors
///
/// Returns [`BlogFlowError::ExcerptUnavailable`] as soon as one post of the
/// view has no line an excerpt can be taken from.
pub fn translate_posts(
    posts: &[Post],
    lang: Language,
) -> Result<Vec<TranslatedPost>> {
    let mut ordered: Vec<&Post> = posts.iter().collect();
    ordered.sort_by(|a, b| b.day_key().cmp(&a.day_key()));

    let view: Vec<(&Post, &str)> = ordered
        .into_iter()
        .filter_map(|post| post.stripped_slug(lang).map(|slug| (post, slug)))
        .collect();

    let mut translated = Vec::with_capacity(view.len());
    for (index, (post, slug)) in view.iter().enumerate() {
        let next = index
            .checked_sub(1)
            .and_then(|i| view.get(i))
            .map(|(_, slug)| slug.to_string());
        let previous = view.get(index + 1).map(|(_, slug)| slug.to_string());

        translated.push(TranslatedPost {
            slug: slug.to_string(),
            lang,
            title: post.title.clone(),
            pub_date: post.pub_date,
            tags: post.tags.clone(),
            image: post.image.clone(),
            body: post.body.clone(),
            next,
            previous,
            min_read: reading_time(&post.body),
            extract: extract(&post.body)
                .ok_or_else(|| BlogFlowError::excerpt_unavailable(&post.slug))?,
        });
    }

    debug!("Translated {} posts for `{}`", translated.len(), lang);
    Ok(translated)
}

/// Estimated reading time of a markdown body in whole minutes, rounded up.
///
/// Tables are not read word by word, so markdown and HTML tables are left
/// out of the count. An empty body takes zero minutes.
pub fn reading_time(body: &str) -> usize {
    word_count(&remove_tables(body)).div_ceil(WORDS_PER_MINUTE)
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Returns `body` with every markdown table and HTML `<table>` block cut out.
pub fn remove_tables(body: &str) -> String {
    let mut kept = String::with_capacity(body.len());
    let mut cursor = 0;

    for (event, range) in
        Parser::new_ext(body, Options::ENABLE_TABLES).into_offset_iter()
    {
        let is_table = match event {
            Event::Start(Tag::Table(_)) => true,
            Event::Start(Tag::HtmlBlock) => body[range.clone()]
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("<table"),
            _ => false,
        };

        if is_table && range.start >= cursor {
            kept.push_str(&body[cursor..range.start]);
            cursor = range.end;
        }
    }

    kept.push_str(&body[cursor..]);
    kept
}

/// Plain-text preview of a markdown body.
///
/// Takes the first line that is neither blank, a heading (`#`) nor a
/// blockquote (`>`), and still has text once inline markup is stripped. The
/// text is cut to [`EXCERPT_LENGTH`] characters and [`ELLIPSIS`] appended.
/// Returns `None` when no line qualifies.
pub fn extract(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(&['#', '>'][..]))
        .map(strip_inline_markup)
        .find(|text| !text.is_empty())
        .map(|text| {
            let mut excerpt: String =
                text.chars().take(EXCERPT_LENGTH).collect();
            excerpt.push_str(ELLIPSIS);
            excerpt
        })
}

/// Renders a line of markdown to its plain text: emphasis, links, code
/// spans and inline HTML are dropped, their text kept.
pub fn strip_inline_markup(line: &str) -> String {
    let mut text = String::with_capacity(line.len());
    for event in Parser::new(line) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Request-scoped access to the post collection.
///
/// Every method loads the collection afresh from the wrapped source, so
/// nothing computed for one render leaks into the next.
#[derive(Debug)]
pub struct Blog<S: PostSource> {
    source: S,
}

impl<S: PostSource> Blog<S> {
    /// Wraps a post source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Loads the collection and checks that slugs are unique.
    ///
    /// # Errors
    ///
    /// Propagates source errors and returns
    /// [`BlogFlowError::DuplicateSlug`] on the first repeated slug.
    pub fn load(&self) -> Result<Vec<Post>> {
        let posts = self.source.load()?;
        let mut seen = HashSet::with_capacity(posts.len());
        for post in &posts {
            if !seen.insert(post.slug.as_str()) {
                return Err(BlogFlowError::DuplicateSlug {
                    slug: post.slug.clone(),
                });
            }
        }
        Ok(posts)
    }

    /// The whole collection, newest first, slugs untouched.
    pub fn sorted_posts(&self) -> Result<Vec<Post>> {
        Ok(sort_all_posts(self.load()?))
    }

    /// The annotated view of the posts written in `lang`.
    pub fn translated_posts(
        &self,
        lang: Language,
    ) -> Result<Vec<TranslatedPost>> {
        translate_posts(&self.load()?, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(slug: &str, year: i32, month: u32, day: u32) -> Post {
        Post {
            slug: slug.to_string(),
            title: format!("Title of {}", slug),
            pub_date: Utc
                .with_ymd_and_hms(year, month, day, 12, 0, 0)
                .unwrap(),
            tags: vec!["rust".to_string()],
            image: PostImage {
                url: format!("/images/{}.png", slug),
                alt: "cover".to_string(),
            },
            body: format!("Intro of {}.\n\nMore text.", slug),
        }
    }

    fn scenario() -> Vec<Post> {
        vec![
            post("en/a", 2024, 1, 10),
            post("en/b", 2024, 2, 1),
            post("es/c", 2024, 1, 20),
        ]
    }

    fn slugs(view: &[TranslatedPost]) -> Vec<&str> {
        view.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_sort_all_posts_newest_first() {
        let sorted = sort_all_posts(scenario());
        let order: Vec<&str> = sorted.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["en/b", "es/c", "en/a"]);
        assert!(sorted.windows(2).all(|w| w[0].day_key() >= w[1].day_key()));
    }

    #[test]
    fn test_sort_is_stable_within_a_day() {
        let mut early = post("en/early", 2024, 5, 5);
        early.pub_date = Utc.with_ymd_and_hms(2024, 5, 5, 1, 0, 0).unwrap();
        let mut late = post("en/late", 2024, 5, 5);
        late.pub_date = Utc.with_ymd_and_hms(2024, 5, 5, 23, 0, 0).unwrap();

        let sorted = sort_all_posts(vec![early, late]);
        assert_eq!(sorted[0].slug, "en/early");
        assert_eq!(sorted[1].slug, "en/late");
    }

    #[test]
    fn test_translate_scenario() {
        let posts = scenario();

        let en = translate_posts(&posts, Language::English).unwrap();
        assert_eq!(slugs(&en), vec!["b", "a"]);
        assert_eq!(en[0].next, None);
        assert_eq!(en[0].previous.as_deref(), Some("a"));
        assert_eq!(en[1].next.as_deref(), Some("b"));
        assert_eq!(en[1].previous, None);
        assert!(en.iter().all(|p| p.lang == Language::English));

        let es = translate_posts(&posts, Language::Spanish).unwrap();
        assert_eq!(slugs(&es), vec!["c"]);
        assert_eq!(es[0].next, None);
        assert_eq!(es[0].previous, None);
    }

    #[test]
    fn test_translate_links_are_consistent() {
        let posts = vec![
            post("en/one", 2023, 3, 1),
            post("es/uno", 2023, 3, 1),
            post("en/two", 2023, 6, 1),
            post("en/three", 2023, 9, 1),
            post("en/four", 2023, 12, 1),
        ];
        let view = translate_posts(&posts, Language::English).unwrap();
        assert_eq!(view.len(), 4);

        for (i, item) in view.iter().enumerate() {
            let expected_next = i.checked_sub(1).map(|j| view[j].slug.clone());
            let expected_previous = view.get(i + 1).map(|p| p.slug.clone());
            assert_eq!(item.next, expected_next);
            assert_eq!(item.previous, expected_previous);
        }
    }

    #[test]
    fn test_same_day_posts_get_distinct_links() {
        let posts = vec![
            post("en/first", 2024, 4, 4),
            post("en/second", 2024, 4, 4),
        ];
        let view = translate_posts(&posts, Language::English).unwrap();
        assert_eq!(slugs(&view), vec!["first", "second"]);
        assert_eq!(view[0].previous.as_deref(), Some("second"));
        assert_eq!(view[1].next.as_deref(), Some("first"));
        assert_ne!(view[0].previous, view[1].next);
    }

    #[test]
    fn test_translate_does_not_touch_input() {
        let posts = scenario();
        let before = posts.clone();
        let first = translate_posts(&posts, Language::English).unwrap();
        let second = translate_posts(&posts, Language::English).unwrap();
        assert_eq!(posts, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_translate_requires_leading_segment() {
        let posts = vec![post("es/men/x", 2024, 1, 1)];
        assert!(translate_posts(&posts, Language::English)
            .unwrap()
            .is_empty());
        assert_eq!(
            slugs(&translate_posts(&posts, Language::Spanish).unwrap()),
            vec!["men/x"]
        );
    }

    #[test]
    fn test_translate_empty_collection() {
        assert!(translate_posts(&[], Language::Spanish).unwrap().is_empty());
    }

    #[test]
    fn test_translate_fails_without_excerpt() {
        let mut broken = post("en/broken", 2024, 1, 1);
        broken.body = "# Only a heading\n\n> and a quote\n".to_string();
        let posts = vec![post("en/fine", 2024, 2, 1), broken];

        let err = translate_posts(&posts, Language::English).unwrap_err();
        assert!(matches!(
            err,
            BlogFlowError::ExcerptUnavailable { ref slug } if slug == "en/broken"
        ));

        // The other language is unaffected.
        assert!(translate_posts(&posts, Language::Spanish).is_ok());
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(""), 0);
        assert_eq!(reading_time(&"word ".repeat(400)), 2);
        assert_eq!(reading_time(&"word ".repeat(401)), 3);
        assert_eq!(reading_time("just a few words"), 1);
    }

    #[test]
    fn test_reading_time_skips_tables() {
        let table = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let rows = "| word word | word word |\n".repeat(100);
        let body = format!(
            "{}\n\n{}{}\nAfter the table.\n",
            "word ".repeat(200),
            table,
            rows
        );
        assert_eq!(reading_time(&body), 2);
        assert_eq!(word_count(&remove_tables(&body)), 203);
    }

    #[test]
    fn test_remove_html_tables() {
        let body = "Before.\n\n<table>\n<tr><td>many cells here</td></tr>\n</table>\n\nAfter.\n";
        let stripped = remove_tables(body);
        assert!(!stripped.contains("cells"));
        assert!(stripped.contains("Before."));
        assert!(stripped.contains("After."));
    }

    #[test]
    fn test_extract_skips_headings_and_quotes() {
        let body = "\n# Title\n> A quote\n\nThe **first** real [line](https://x.y) with `code`.\nSecond line.";
        assert_eq!(
            extract(body).unwrap(),
            "The first real line with code...."
        );
    }

    #[test]
    fn test_extract_truncates_to_limit() {
        let body = "x".repeat(200);
        let excerpt = extract(&body).unwrap();
        assert_eq!(excerpt.chars().count(), EXCERPT_LENGTH + ELLIPSIS.len());
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_extract_counts_characters_not_bytes() {
        let body = "ñ".repeat(100);
        let excerpt = extract(&body).unwrap();
        assert_eq!(excerpt, format!("{}...", "ñ".repeat(96)));
    }

    #[test]
    fn test_extract_unavailable() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("## Heading\n>quote\n\n   \n"), None);
        assert_eq!(extract("<img src=\"a.png\">\n---\n"), None);
    }

    #[test]
    fn test_blog_loads_fresh_and_sorts() {
        let blog = Blog::new(scenario());
        let sorted = blog.sorted_posts().unwrap();
        assert_eq!(sorted[0].slug, "en/b");

        let first = blog.translated_posts(Language::English).unwrap();
        let second = blog.translated_posts(Language::English).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_blog_rejects_duplicate_slugs() {
        let blog = Blog::new(vec![
            post("en/same", 2024, 1, 1),
            post("en/same", 2024, 2, 1),
        ]);
        let err = blog.sorted_posts().unwrap_err();
        assert!(matches!(
            err,
            BlogFlowError::DuplicateSlug { ref slug } if slug == "en/same"
        ));
    }
}
