//! Declarative element matchers.
//!
//! Storefront markup rarely exposes stable ids, so most lookups are phrased
//! as "an element whose class attribute mentions these keywords". A
//! [`Matcher`] is one such rule; an ordered slice of them is a cascade that
//! is tried top to bottom until one rule finds something.

use scraper::{ElementRef, Selector};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use crate::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// A plain CSS selector.
    Css(&'static str),
    /// A class-attribute keyword rule.
    Class(ClassRule),
}

/// Substring tests against an element's whole `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRule {
    /// Restrict to one tag name; `None` accepts any element.
    pub tag: Option<&'static str>,
    /// Every keyword must appear.
    pub all_of: &'static [&'static str],
    /// At least one keyword must appear (ignored when empty).
    pub any_of: &'static [&'static str],
    /// No keyword may appear.
    pub none_of: &'static [&'static str],
    pub case_sensitive: bool,
}

impl Matcher {
    /// Elements whose class contains every keyword, ignoring case.
    pub const fn class_contains(tag: Option<&'static str>, keywords: &'static [&'static str]) -> Self {
        Matcher::Class(ClassRule {
            tag,
            all_of: keywords,
            any_of: &[],
            none_of: &[],
            case_sensitive: false,
        })
    }

    /// Elements whose class contains at least one keyword, ignoring case.
    pub const fn class_contains_any(
        tag: Option<&'static str>,
        keywords: &'static [&'static str],
    ) -> Self {
        Matcher::Class(ClassRule {
            tag,
            all_of: &[],
            any_of: keywords,
            none_of: &[],
            case_sensitive: false,
        })
    }

    pub const fn exact_case(self) -> Self {
        match self {
            Matcher::Class(rule) => Matcher::Class(ClassRule {
                case_sensitive: true,
                ..rule
            }),
            css => css,
        }
    }

    pub const fn excluding(self, keywords: &'static [&'static str]) -> Self {
        match self {
            Matcher::Class(rule) => Matcher::Class(ClassRule {
                none_of: keywords,
                ..rule
            }),
            css => css,
        }
    }

    /// All matching descendants of `root` (not `root` itself), in document order.
    pub fn find_all<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match self {
            Matcher::Css(css) => match compile(*css) {
                Ok(selector) => root.select(&selector).collect(),
                Err(e) => {
                    tracing::error!("{}", e);
                    Vec::new()
                }
            },
            Matcher::Class(rule) => descendants(root)
                .filter(|element| rule.matches(*element))
                .collect(),
        }
    }

    /// First matching descendant of `root` in document order.
    pub fn find_first<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match self {
            Matcher::Css(css) => match compile(*css) {
                Ok(selector) => root.select(&selector).next(),
                Err(e) => {
                    tracing::error!("{}", e);
                    None
                }
            },
            Matcher::Class(rule) => descendants(root).find(|element| rule.matches(*element)),
        }
    }
}

type Compiled = std::result::Result<Arc<Selector>, String>;

/// Parsed CSS selectors, keyed by their source text. Each distinct selector
/// is parsed once per process.
static COMPILED: LazyLock<RwLock<HashMap<&'static str, Compiled>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// The parsed form of `css`, or [`AppError::InvalidSelector`].
pub fn compile(css: &'static str) -> Result<Arc<Selector>> {
    let cached = COMPILED
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(css)
        .cloned();

    let compiled = match cached {
        Some(compiled) => compiled,
        None => COMPILED
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(css)
            .or_insert_with(|| {
                Selector::parse(css)
                    .map(Arc::new)
                    .map_err(|e| format!("{:?}", e))
            })
            .clone(),
    };

    compiled.map_err(|message| AppError::InvalidSelector {
        selector: css.to_string(),
        message,
    })
}

impl ClassRule {
    fn matches(&self, element: ElementRef<'_>) -> bool {
        if let Some(tag) = self.tag {
            if element.value().name() != tag {
                return false;
            }
        }

        let Some(class) = element.value().attr("class") else {
            return false;
        };

        let contains = |keyword: &&str| {
            if self.case_sensitive {
                class.contains(*keyword)
            } else {
                class.to_lowercase().contains(&keyword.to_lowercase())
            }
        };

        self.all_of.iter().all(contains)
            && (self.any_of.is_empty() || self.any_of.iter().any(contains))
            && !self.none_of.iter().any(contains)
    }
}

fn descendants<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Runs `cascade` in order and returns the index and matches of the first
/// matcher that finds anything.
pub fn first_non_empty<'a>(
    root: ElementRef<'a>,
    cascade: &[Matcher],
) -> Option<(usize, Vec<ElementRef<'a>>)> {
    cascade.iter().enumerate().find_map(|(index, matcher)| {
        let found = matcher.find_all(root);
        (!found.is_empty()).then_some((index, found))
    })
}

/// First element found by any matcher, trying matchers in order.
pub fn first_of<'a>(root: ElementRef<'a>, matchers: &[Matcher]) -> Option<ElementRef<'a>> {
    matchers.iter().find_map(|matcher| matcher.find_first(root))
}
