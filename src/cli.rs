// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for BlogFlow
//!
//! This module builds the `clap` command tree and dispatches the parsed
//! subcommands to the library.
//!
//! # Examples
//!
//! Parsing a `list` command:
//!
//! ```
//! use blogflow::cli;
//! use blogflow::i18n::Language;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "blogflow",
//!     "list",
//!     "--lang",
//!     "es",
//!     "--page",
//!     "2",
//! ]);
//!
//! let list_cmd = matches.subcommand_matches("list").unwrap();
//! assert_eq!(list_cmd.get_one::<Language>("lang"), Some(&Language::Spanish));
//! assert_eq!(list_cmd.get_one::<usize>("page"), Some(&2));
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};

use crate::content::MarkdownPostSource;
use crate::core::config::{Config, ConfigBuilder};
use crate::feed::build_feed;
use crate::i18n::{Language, UiKey};
use crate::listing::paginate;
use crate::posts::Blog;
use crate::site::{FileOutputGenerator, SiteBuilder};
use crate::{BlogFlowError, Result};

/// The current version of BlogFlow, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration file picked up from the working directory when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "blogflow.toml";

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "BLOGFLOW_";

/// Builds and configures the BlogFlow command-line interface.
pub fn build() -> Command {
    debug!("Building CLI command structure");

    Command::new("blogflow")
        .author("BlogFlow Contributors")
        .about("Sorts, translates and publishes a multilingual markdown blog.")
        .version(VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v, -vv)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Write the post data, tag indexes and feeds")
                .arg(config_arg())
                .arg(content_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output directory")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("Print one page of a language's post listing")
                .arg(lang_arg())
                .arg(
                    Arg::new("page")
                        .short('p')
                        .long("page")
                        .help("Page number, starting at 1")
                        .value_parser(value_parser!(usize))
                        .default_value("1"),
                )
                .arg(config_arg())
                .arg(content_arg()),
        )
        .subcommand(
            Command::new("feed")
                .about("Print the RSS feed of a language")
                .arg(lang_arg())
                .arg(config_arg())
                .arg(content_arg()),
        )
        .after_help(
            "\x1b[1;4mConfiguration:\x1b[0m\n\n  Reads blogflow.toml when present; \
             BLOGFLOW_* variables override it (BLOGFLOW_SITE__TITLE sets site.title).",
        )
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .help("Configuration file (defaults to ./blogflow.toml when present)")
        .value_parser(value_parser!(PathBuf))
}

fn content_arg() -> Arg {
    Arg::new("content")
        .short('c')
        .long("content")
        .help("Content directory")
        .value_parser(value_parser!(PathBuf))
}

fn lang_arg() -> Arg {
    Arg::new("lang")
        .short('l')
        .long("lang")
        .help("Language code (en, es)")
        .required(true)
        .value_parser(value_parser!(Language))
}

/// Executes the parsed subcommand, writing any report to `out`.
pub fn execute<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<()> {
    match matches.subcommand() {
        Some(("build", sub_matches)) => {
            let config = load_config(sub_matches)?;
            build_site(config)
        }
        Some(("list", sub_matches)) => {
            let config = load_config(sub_matches)?;
            let lang = required_lang(sub_matches)?;
            let page = sub_matches.get_one::<usize>("page").copied().unwrap_or(1);
            list_posts(&config, lang, page, out)
        }
        Some(("feed", sub_matches)) => {
            let config = load_config(sub_matches)?;
            let lang = required_lang(sub_matches)?;
            print_feed(&config, lang, out)
        }
        _ => Err(BlogFlowError::config_error("Unknown command", None)),
    }
}

/// Resolves the configuration for a subcommand: file, environment, then
/// directory flags.
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let mut builder = ConfigBuilder::new().with_env_prefix(ENV_PREFIX);
    if let Some(path) = config_path(matches.get_one::<PathBuf>("config")) {
        debug!("Using configuration file {}", path.display());
        builder = builder.with_file(path);
    }
    let mut config = builder.build()?;

    if let Some(dir) = optional_path(matches, "content") {
        config.content_dir = dir;
    }
    if let Some(dir) = optional_path(matches, "output") {
        config.output_dir = dir;
    }
    Ok(config)
}

fn config_path(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.clone()),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            default.is_file().then(|| default.to_path_buf())
        }
    }
}

fn optional_path(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.try_get_one::<PathBuf>(id).ok().flatten().cloned()
}

fn required_lang(matches: &ArgMatches) -> Result<Language> {
    matches
        .get_one::<Language>("lang")
        .copied()
        .ok_or_else(|| BlogFlowError::config_error("Missing --lang", None))
}

/// Builds the site into the configured output directory.
fn build_site(config: Config) -> Result<()> {
    info!(
        "Building site from '{}' into '{}'",
        config.content_dir.display(),
        config.output_dir.display()
    );

    let source = MarkdownPostSource::new(&config.content_dir);
    let report =
        SiteBuilder::new(config, source, Box::new(FileOutputGenerator)).build()?;

    info!("Wrote {} files for {} posts", report.files.len(), report.posts);
    Ok(())
}

/// Prints one listing page as `date  slug  title (N min read)` lines.
fn list_posts<W: Write>(
    config: &Config,
    lang: Language,
    page: usize,
    out: &mut W,
) -> Result<()> {
    let blog = Blog::new(MarkdownPostSource::new(&config.content_dir));
    let view = blog.translated_posts(lang)?;
    let pages = paginate(&view, config.listing.page_size);
    let total_pages = pages.len();

    let listing = page
        .checked_sub(1)
        .and_then(|index| pages.into_iter().nth(index))
        .ok_or_else(|| {
            BlogFlowError::config_error(
                format!("Page {} is out of range (1-{})", page, total_pages),
                None,
            )
        })?;

    writeln!(
        out,
        "{} {}/{}",
        lang.translate(UiKey::NavBlog),
        listing.number,
        listing.total_pages
    )?;
    for post in &listing.posts {
        writeln!(
            out,
            "{}  {}  {} ({} {})",
            post.pub_date.format("%Y-%m-%d"),
            post.slug,
            post.title,
            post.min_read,
            lang.translate(UiKey::MinRead)
        )?;
    }
    Ok(())
}

/// Prints the RSS feed of `lang`.
fn print_feed<W: Write>(config: &Config, lang: Language, out: &mut W) -> Result<()> {
    let blog = Blog::new(MarkdownPostSource::new(&config.content_dir));
    let view = blog.translated_posts(lang)?;
    let xml = build_feed(&config.site, lang, &view)?;
    writeln!(out, "{}", xml)?;
    Ok(())
}
