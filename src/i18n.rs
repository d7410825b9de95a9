// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Internationalisation
//!
//! The blog is published in a fixed set of languages. [`Language`] is the
//! only way the rest of the crate refers to one, so an unsupported code is
//! rejected once, when it is parsed, instead of silently producing an empty
//! post listing further down.
//!
//! The UI string table mirrors the labels the page templates use. Every
//! language defines every [`UiKey`], so lookups never fall through.

use crate::{BlogFlowError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A language the blog is published in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum Language {
    /// English, the default language.
    #[serde(rename = "en")]
    English,
    /// Spanish.
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    /// Every supported language, default first.
    pub const ALL: [Language; 2] = [Language::English, Language::Spanish];

    /// Whether URLs for the default language carry the language segment.
    pub const SHOW_DEFAULT_LANG: bool = true;

    /// ISO 639-1 code, e.g. `"en"`.
    pub const fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    /// Name of the language written in that language.
    pub const fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
        }
    }

    /// The slug prefix of posts written in this language, e.g. `"en/"`.
    pub fn segment(self) -> String {
        format!("{}/", self.code())
    }

    /// Parses a language code.
    ///
    /// # Errors
    ///
    /// Returns [`BlogFlowError::UnsupportedLanguage`] for any code outside
    /// [`Language::ALL`].
    pub fn from_code(code: &str) -> Result<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| BlogFlowError::UnsupportedLanguage {
                code: code.to_string(),
            })
    }

    /// Detects the language from the first segment of a URL path such as
    /// `/es/blog/mi-post`.
    pub fn from_path(path: &str) -> Option<Language> {
        let first = path.trim_start_matches('/').split('/').next()?;
        Language::from_code(first).ok()
    }

    /// Prefixes an absolute site path with this language's segment.
    ///
    /// The default language is left unprefixed unless
    /// [`Language::SHOW_DEFAULT_LANG`] is set.
    pub fn localize_path(self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self == Language::default() && !Language::SHOW_DEFAULT_LANG {
            format!("/{}", path)
        } else {
            format!("/{}/{}", self.code(), path)
        }
    }

    /// Looks up a UI string.
    pub fn translate(self, key: UiKey) -> &'static str {
        ui_string(self, key)
    }

    /// Looks up a UI string by its dotted key. Returns `None` for unknown
    /// keys.
    pub fn translate_key(self, key: &str) -> Option<&'static str> {
        UiKey::from_key(key).map(|key| self.translate(key))
    }

    /// The whole string table for this language, keyed by dotted key.
    pub fn ui_strings(self) -> BTreeMap<&'static str, &'static str> {
        UiKey::ALL
            .iter()
            .map(|key| (key.key(), self.translate(*key)))
            .collect()
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = BlogFlowError;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}

/// Keys of the UI string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiKey {
    /// `continue_reading`
    ContinueReading,
    /// `feed.description`
    FeedDescription,
    /// `footer.findme`
    FooterFindMe,
    /// `latest_posts`
    LatestPosts,
    /// `min_read`
    MinRead,
    /// `nav.about`
    NavAbout,
    /// `nav.close`
    NavClose,
    /// `nav.blog`
    NavBlog,
    /// `nav.home`
    NavHome,
    /// `nav.menu`
    NavMenu,
    /// `nav.tags`
    NavTags,
    /// `next_page`
    NextPage,
    /// `next_post`
    NextPost,
    /// `previous_page`
    PreviousPage,
    /// `previous_post`
    PreviousPost,
    /// `site_description`
    SiteDescription,
    /// `software_developer`
    SoftwareDeveloper,
    /// `spain`
    Spain,
    /// `tags.description`
    TagsDescription,
    /// `theme.dark`
    ThemeDark,
    /// `theme.light`
    ThemeLight,
    /// `view_all`
    ViewAll,
    /// `written_by`
    WrittenBy,
}

impl UiKey {
    /// Every key, in table order.
    pub const ALL: [UiKey; 23] = [
        UiKey::ContinueReading,
        UiKey::FeedDescription,
        UiKey::FooterFindMe,
        UiKey::LatestPosts,
        UiKey::MinRead,
        UiKey::NavAbout,
        UiKey::NavClose,
        UiKey::NavBlog,
        UiKey::NavHome,
        UiKey::NavMenu,
        UiKey::NavTags,
        UiKey::NextPage,
        UiKey::NextPost,
        UiKey::PreviousPage,
        UiKey::PreviousPost,
        UiKey::SiteDescription,
        UiKey::SoftwareDeveloper,
        UiKey::Spain,
        UiKey::TagsDescription,
        UiKey::ThemeDark,
        UiKey::ThemeLight,
        UiKey::ViewAll,
        UiKey::WrittenBy,
    ];

    /// The dotted key templates refer to this string by.
    pub const fn key(self) -> &'static str {
        match self {
            UiKey::ContinueReading => "continue_reading",
            UiKey::FeedDescription => "feed.description",
            UiKey::FooterFindMe => "footer.findme",
            UiKey::LatestPosts => "latest_posts",
            UiKey::MinRead => "min_read",
            UiKey::NavAbout => "nav.about",
            UiKey::NavClose => "nav.close",
            UiKey::NavBlog => "nav.blog",
            UiKey::NavHome => "nav.home",
            UiKey::NavMenu => "nav.menu",
            UiKey::NavTags => "nav.tags",
            UiKey::NextPage => "next_page",
            UiKey::NextPost => "next_post",
            UiKey::PreviousPage => "previous_page",
            UiKey::PreviousPost => "previous_post",
            UiKey::SiteDescription => "site_description",
            UiKey::SoftwareDeveloper => "software_developer",
            UiKey::Spain => "spain",
            UiKey::TagsDescription => "tags.description",
            UiKey::ThemeDark => "theme.dark",
            UiKey::ThemeLight => "theme.light",
            UiKey::ViewAll => "view_all",
            UiKey::WrittenBy => "written_by",
        }
    }

    /// Resolves a dotted key.
    pub fn from_key(key: &str) -> Option<UiKey> {
        UiKey::ALL.into_iter().find(|k| k.key() == key)
    }
}

fn ui_string(lang: Language, key: UiKey) -> &'static str {
    match lang {
        Language::English => match key {
            UiKey::ContinueReading => "Continue reading",
            UiKey::FeedDescription => "My posts",
            UiKey::FooterFindMe => "Find me on",
            UiKey::LatestPosts => "Latest posts",
            UiKey::MinRead => "min read",
            UiKey::NavAbout => "About",
            UiKey::NavClose => "Close",
            UiKey::NavBlog => "Blog",
            UiKey::NavHome => "Home",
            UiKey::NavMenu => "Menu",
            UiKey::NavTags => "Tags",
            UiKey::NextPage => "Next page",
            UiKey::NextPost => "Next post",
            UiKey::PreviousPage => "Previous page",
            UiKey::PreviousPost => "Previous post",
            UiKey::SiteDescription => {
                "Personal blog about software development topics."
            }
            UiKey::SoftwareDeveloper => "Software Developer",
            UiKey::Spain => "Spain",
            UiKey::TagsDescription => "Find posts by tag.",
            UiKey::ThemeDark => "Dark Theme",
            UiKey::ThemeLight => "Light Theme",
            UiKey::ViewAll => "View all",
            UiKey::WrittenBy => "Written by",
        },
        Language::Spanish => match key {
            UiKey::ContinueReading => "Continuar leyendo",
            UiKey::FeedDescription => "Mis publicaciones",
            UiKey::FooterFindMe => "Encuéntrame en",
            UiKey::LatestPosts => "Últimas publicaciones",
            UiKey::MinRead => "minutos de lectura",
            UiKey::NavAbout => "Acerca",
            UiKey::NavClose => "Cerrar",
            UiKey::NavBlog => "Blog",
            UiKey::NavHome => "Inicio",
            UiKey::NavMenu => "Menú",
            UiKey::NavTags => "Etiquetas",
            UiKey::NextPage => "Siguiente página",
            UiKey::NextPost => "Siguiente publicación",
            UiKey::PreviousPage => "Anterior página",
            UiKey::PreviousPost => "Anterior publicación",
            UiKey::SiteDescription => {
                "Blog personal sobre temas de desarrollo de software."
            }
            UiKey::SoftwareDeveloper => "Desarrollador de software",
            UiKey::Spain => "España",
            UiKey::TagsDescription => {
                "Encontrar publicaciones por etiqueta."
            }
            UiKey::ThemeDark => "Tema oscuro",
            UiKey::ThemeLight => "Tema claro",
            UiKey::ViewAll => "Ver todas",
            UiKey::WrittenBy => "Escrito por",
        },
    }
}
