//! Language selection for translated record fields.
//!
//! Records carry per-language copies (`translations`) tagged with a
//! `languages_code`. Which copy is shown is decided by an ordered list of
//! [`FallbackStrategy`] values evaluated in sequence.

pub mod countries;

pub use countries::country_display_name;

use serde::Serialize;

use crate::config::DEFAULT_LANGUAGE;
use crate::models::{BrandTranslation, LocationTranslation, ProductTranslation};

/// A language offered by the passport pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub abbreviation: &'static str,
}

pub const AVAILABLE_LANGUAGES: &[Language] = &[
    Language {
        code: "en-US",
        name: "English",
        abbreviation: "EN",
    },
    Language {
        code: "es-MX",
        name: "Español",
        abbreviation: "ES",
    },
    Language {
        code: "fr-FR",
        name: "Français",
        abbreviation: "FR",
    },
];

/// Anything carrying a language tag.
pub trait Translated {
    fn languages_code(&self) -> Option<&str>;
}

impl Translated for ProductTranslation {
    fn languages_code(&self) -> Option<&str> {
        self.languages_code.as_deref()
    }
}

impl Translated for LocationTranslation {
    fn languages_code(&self) -> Option<&str> {
        self.languages_code.as_deref()
    }
}

impl Translated for BrandTranslation {
    fn languages_code(&self) -> Option<&str> {
        self.languages_code.as_deref()
    }
}

/// One step of the translation fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackStrategy {
    /// Exact match on a language code.
    Language(String),
    /// Whatever translation is listed first.
    FirstAvailable,
}

/// Picks a translation by walking an ordered strategy list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSelector {
    strategies: Vec<FallbackStrategy>,
}

impl TranslationSelector {
    pub fn new(strategies: Vec<FallbackStrategy>) -> Self {
        Self { strategies }
    }

    /// The standard chain: current language, then the fixed default
    /// language, then the first available translation.
    pub fn for_language(current: &str) -> Self {
        Self::new(vec![
            FallbackStrategy::Language(current.to_string()),
            FallbackStrategy::Language(DEFAULT_LANGUAGE.to_string()),
            FallbackStrategy::FirstAvailable,
        ])
    }

    pub fn strategies(&self) -> &[FallbackStrategy] {
        &self.strategies
    }

    /// Returns the first translation matched by the strategy chain, or the
    /// caller-supplied `fallback` when nothing matches.
    pub fn select<'a, T: Translated>(
        &self,
        translations: &'a [T],
        fallback: Option<&'a T>,
    ) -> Option<&'a T> {
        self.strategies
            .iter()
            .find_map(|strategy| match strategy {
                FallbackStrategy::Language(code) => translations
                    .iter()
                    .find(|t| t.languages_code() == Some(code.as_str())),
                FallbackStrategy::FirstAvailable => translations.first(),
            })
            .or(fallback)
    }
}

impl Default for TranslationSelector {
    fn default() -> Self {
        Self::for_language(DEFAULT_LANGUAGE)
    }
}

fn language_family(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Chooses a page language from the client's ordered preferences: exact
/// match first, then a language-family match (`es` ↔ `es-MX`), then
/// `default`.
pub fn negotiate_language<S: AsRef<str>>(
    preferred: &[S],
    available: &[Language],
    default: &str,
) -> String {
    if let Some(exact) = preferred
        .iter()
        .map(|lang| lang.as_ref())
        .find(|lang| available.iter().any(|a| a.code == *lang))
    {
        return exact.to_string();
    }

    preferred
        .iter()
        .map(|lang| language_family(lang.as_ref()))
        .find_map(|family| {
            available
                .iter()
                .find(|a| language_family(a.code) == family)
        })
        .map(|a| a.code.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Accepts a stored/requested language only if it is one the pages offer.
pub fn resolve_language(requested: Option<&str>, default: &str) -> String {
    requested
        .filter(|code| AVAILABLE_LANGUAGES.iter().any(|a| a.code == *code))
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Page language for a visit: a supported stored choice wins, otherwise the
/// browser preferences are negotiated against the offered languages.
pub fn page_language<S: AsRef<str>>(
    stored: Option<&str>,
    browser_languages: &[S],
    default: &str,
) -> String {
    match stored.filter(|code| AVAILABLE_LANGUAGES.iter().any(|a| a.code == *code)) {
        Some(code) => code.to_string(),
        None => negotiate_language(browser_languages, AVAILABLE_LANGUAGES, default),
    }
}

/// Language tags of an `Accept-Language` header, best first. Quality
/// values are honoured, `*` and `q=0` entries are dropped.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut tags: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())?;
            (!tag.is_empty() && tag != "*" && quality > 0.0).then(|| (tag.to_string(), quality))
        })
        .collect();

    // stable, so equal weights keep header order
    tags.sort_by(|a, b| b.1.total_cmp(&a.1));
    tags.into_iter().map(|(tag, _)| tag).collect()
}
