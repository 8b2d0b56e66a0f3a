use scraper::ElementRef;

use crate::parsers::matcher::Matcher;
use crate::price;
use crate::utils::text::element_text;

const LINK: Matcher = Matcher::Css("a[href]");

/// Closest ancestor of `element` with the given tag name.
pub fn nearest_ancestor<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == tag)
}

/// First `<a href>` inside `container` together with its raw `href`.
pub fn first_link<'a>(container: ElementRef<'a>) -> Option<(ElementRef<'a>, &'a str)> {
    let link = LINK.find_first(container)?;
    let href = link.value().attr("href")?;
    Some((link, href))
}

/// Name fallback when a container has no dedicated title element: the
/// link's `title` attribute, then its text.
pub fn link_title(link: ElementRef<'_>) -> String {
    link.value()
        .attr("title")
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| element_text(link))
}

/// Text of the first element found by `matcher` inside `root`.
pub fn text_of(root: ElementRef<'_>, matcher: &Matcher) -> Option<String> {
    matcher.find_first(root).map(element_text)
}

/// Prices recovered by scanning raw text rather than keyworded elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedPrices {
    pub current: String,
    pub original: Option<String>,
}

/// Scans every text node under `root` for dollar amounts.
///
/// With two or more amounts the first is taken as the original price and
/// the last as the current one; a single amount is the current price with
/// no original. Containers listing more than two amounts can be
/// misattributed by this rule.
pub fn scan_prices(root: ElementRef<'_>) -> Option<ScannedPrices> {
    let amounts: Vec<&str> = root
        .text()
        .map(str::trim)
        .filter(|text| price::looks_like_price(text))
        .collect();

    match amounts.as_slice() {
        [] => None,
        [only] => Some(ScannedPrices {
            current: only.to_string(),
            original: None,
        }),
        [first, .., last] => Some(ScannedPrices {
            current: last.to_string(),
            original: Some(first.to_string()),
        }),
    }
}
