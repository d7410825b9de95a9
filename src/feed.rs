// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # RSS Feeds
//!
//! Renders one RSS 2.0 channel per language from a translated view. Items
//! keep the view order, so the newest post comes first.

use rss::{validation::Validate, ChannelBuilder, GuidBuilder, ItemBuilder};

use crate::core::config::SiteConfig;
use crate::i18n::{Language, UiKey};
use crate::posts::TranslatedPost;
use crate::{BlogFlowError, Result};

/// Value of the channel `<generator>` element.
pub const FEED_GENERATOR: &str = "blogflow";

/// Absolute URL of a post page: `<site>/<lang>/blog/<slug>`.
pub fn blog_url(site_url: &str, lang: Language, slug: &str) -> String {
    format!(
        "{}/{}/blog/{}",
        site_url.trim_end_matches('/'),
        lang.code(),
        slug
    )
}

/// Builds and validates the feed of `lang`, returning the XML document.
pub fn build_feed(
    site: &SiteConfig,
    lang: Language,
    posts: &[TranslatedPost],
) -> Result<String> {
    let items: Vec<rss::Item> = posts
        .iter()
        .map(|post| post_to_item(site, lang, post))
        .collect();

    let channel = ChannelBuilder::default()
        .title(format!("{} - {}", site.title, lang.translate(UiKey::NavBlog)))
        .link(site.base_url())
        .description(lang.translate(UiKey::FeedDescription))
        .language(Some(lang.code().to_string()))
        .generator(Some(FEED_GENERATOR.to_string()))
        .items(items)
        .build();

    channel.validate().map_err(|e| {
        BlogFlowError::feed_generation_error(
            format!("RSS validation failed: {}", e),
            lang.code(),
        )
    })?;

    log::debug!(
        "Built {} feed with {} items",
        lang.code(),
        channel.items().len()
    );
    Ok(channel.to_string())
}

fn post_to_item(
    site: &SiteConfig,
    lang: Language,
    post: &TranslatedPost,
) -> rss::Item {
    let link = blog_url(site.base_url(), lang, &post.slug);
    ItemBuilder::default()
        .title(Some(post.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(post.extract.clone()))
        .pub_date(Some(post.pub_date.to_rfc2822()))
        .categories(
            post.tags
                .iter()
                .map(|tag| rss::CategoryBuilder::default().name(tag.clone()).build())
                .collect::<Vec<_>>(),
        )
        .build()
}
