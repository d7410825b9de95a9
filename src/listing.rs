// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Listings
//!
//! Pagination and tag grouping over a language view.

use crate::posts::TranslatedPost;
use serde::Serialize;
use std::collections::BTreeMap;

/// One page of a post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    /// 1-based page number.
    pub number: usize,
    /// Number of pages in the listing.
    pub total_pages: usize,
    /// Number of the newer page, if any.
    pub previous_page: Option<usize>,
    /// Number of the older page, if any.
    pub next_page: Option<usize>,
    /// Posts on this page, newest first.
    pub posts: Vec<TranslatedPost>,
}

/// Splits a view into pages of `page_size` posts.
///
/// An empty view still yields a single empty page so the listing renders.
/// A `page_size` of zero is treated as one.
pub fn paginate(
    posts: &[TranslatedPost],
    page_size: usize,
) -> Vec<ListingPage> {
    let chunks: Vec<&[TranslatedPost]> = if posts.is_empty() {
        vec![posts]
    } else {
        posts.chunks(page_size.max(1)).collect()
    };
    let total_pages = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let number = index + 1;
            ListingPage {
                number,
                total_pages,
                previous_page: (number > 1).then(|| number - 1),
                next_page: (number < total_pages).then(|| number + 1),
                posts: chunk.to_vec(),
            }
        })
        .collect()
}

/// Groups a view by tag: each tag maps to the stripped slugs of its posts,
/// in view order.
pub fn tag_index(posts: &[TranslatedPost]) -> BTreeMap<String, Vec<String>> {
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            let slugs = index.entry(tag.clone()).or_default();
            if !slugs.contains(&post.slug) {
                slugs.push(post.slug.clone());
            }
        }
    }
    index
}
