//! Per-field extraction over parsed listing markup.
//!
//! Every function follows the same contract: given a listing card or a
//! detail-page document, return the typed value or `None`. Missing nodes
//! and failed text parses collapse to `None` locally; nothing in here can
//! abort the crawl.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

pub(crate) const BASE_URL: &str = "https://www.airbnb.com";

const TITLE: &str = "span._bzh5lkq";
const SUMMARY: &str = "div._b14dlit";
const RATING: &str = "span._10fy1f8";
const REVIEWS: &str = "span._a7a5sx";
const PRICE: &str = "span._olc9rf0";
const CAPACITY_LIST: &str = "div._kqh46o";
const CAPACITY_ENTRY: &str = "span._3hmsj";
const MAP_LINK: &str = r#"a[title="Open this area in Google Maps (opens a new window)"]"#;
const AMENITIES_SECTION: &str = ".b6xigss";
const AMENITIES_TEXT: &str = "._1cnse2m";

/// Positions of the capacity entries under the summary container.
const GUESTS_ENTRY: usize = 0;
const BEDROOMS_ENTRY: usize = 1;
const BEDS_ENTRY: usize = 2;
const BATHS_ENTRY: usize = 3;

pub fn title(item: &ElementRef<'_>) -> Option<String> {
    first_text(item, TITLE)
}

/// First anchor's href, absolute-qualified against the site origin.
pub fn listing_url(item: &ElementRef<'_>) -> Option<String> {
    let anchor = Selector::parse("a").unwrap();
    item.select(&anchor)
        .next()?
        .value()
        .attr("href")
        .map(absolute_url)
}

pub fn property_type(item: &ElementRef<'_>) -> Option<String> {
    summary_parts(item).map(|(kind, _)| kind)
}

pub fn location(item: &ElementRef<'_>) -> Option<String> {
    summary_parts(item).map(|(_, place)| place)
}

pub fn rating(item: &ElementRef<'_>) -> Option<String> {
    first_text(item, RATING)
}

pub fn reviews(item: &ElementRef<'_>) -> Option<u32> {
    first_integer(&first_text(item, REVIEWS)?)
}

pub fn price(item: &ElementRef<'_>) -> Option<f64> {
    first_decimal(&first_text(item, PRICE)?)
}

pub fn guests(item: &ElementRef<'_>) -> Option<u32> {
    first_integer(&capacity_entry(item, GUESTS_ENTRY)?)
}

/// Bedroom count plus the studio flag.
///
/// An entry without a digit is a "Studio" unit: recorded as one bedroom
/// with the flag set. A missing entry leaves both unknown.
pub fn bedrooms(item: &ElementRef<'_>) -> (Option<u32>, Option<bool>) {
    match capacity_entry(item, BEDROOMS_ENTRY) {
        Some(entry) => match first_integer(&entry) {
            Some(count) => (Some(count), Some(false)),
            None => (Some(1), Some(true)),
        },
        None => (None, None),
    }
}

pub fn beds(item: &ElementRef<'_>) -> Option<u32> {
    first_integer(&capacity_entry(item, BEDS_ENTRY)?)
}

/// Bath count plus the shared-bath flag.
///
/// The count is the first decimal in the entry, falling back to 0.5 when
/// the text literally mentions a half-bath. The shared flag only looks at
/// whether the second word is "shared", regardless of the count parse.
pub fn baths(item: &ElementRef<'_>) -> (Option<f64>, Option<bool>) {
    let entry = match capacity_entry(item, BATHS_ENTRY) {
        Some(entry) => entry,
        None => return (None, None),
    };

    let count = first_decimal(&entry).or_else(|| {
        if entry.contains("Half-bath") || entry.contains("half-bath") {
            Some(0.5)
        } else {
            None
        }
    });
    let shared = entry.split_whitespace().nth(1) == Some("shared");

    (count, Some(shared))
}

/// Latitude/longitude from the detail page's map link.
///
/// The pair sits in the href between the first `=` and the next `&`,
/// comma-separated. Anything unparseable yields the null pair.
pub fn coordinates(doc: &Html) -> (Option<f64>, Option<f64>) {
    match map_link_pair(doc) {
        Some((latitude, longitude)) => (Some(latitude), Some(longitude)),
        None => (None, None),
    }
}

fn map_link_pair(doc: &Html) -> Option<(f64, f64)> {
    let link = Selector::parse(MAP_LINK).unwrap();
    let href = doc.select(&link).next()?.value().attr("href")?;

    let start = href.find('=')? + 1;
    let end = href.find('&')?;
    let raw = href.get(start..end)?;

    let mut parts = raw.split(',');
    let latitude = parts.next()?.trim().parse().ok()?;
    let longitude = parts.next()?.trim().parse().ok()?;
    Some((latitude, longitude))
}

/// Link to the listing's amenities sub-page, if the detail page carries one.
pub fn amenities_url(doc: &Html) -> Option<String> {
    let section = Selector::parse(AMENITIES_SECTION).unwrap();
    let anchor = Selector::parse("a").unwrap();
    doc.select(&section)
        .next()?
        .select(&anchor)
        .next()?
        .value()
        .attr("href")
        .map(absolute_url)
}

/// Free-text amenity blob from the amenities page; empty when absent.
///
/// The first matching node is the modal chrome, the second holds the list.
pub fn amenities_text(doc: &Html) -> String {
    let sel = Selector::parse(AMENITIES_TEXT).unwrap();
    doc.select(&sel).nth(1).map(element_text).unwrap_or_default()
}

pub(crate) fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", BASE_URL, href)
    }
}

/// Shared "<type> in <location>" blob, split on the "in" token.
fn summary_parts(item: &ElementRef<'_>) -> Option<(String, String)> {
    let blob = first_text(item, SUMMARY)?;
    let words: Vec<&str> = blob.split_whitespace().collect();
    let split = words.iter().position(|word| *word == "in")?;
    Some((words[..split].join(" "), words[split + 1..].join(" ")))
}

fn capacity_entry(item: &ElementRef<'_>, index: usize) -> Option<String> {
    let list = Selector::parse(CAPACITY_LIST).unwrap();
    let entry = Selector::parse(CAPACITY_ENTRY).unwrap();
    item.select(&list)
        .next()?
        .select(&entry)
        .nth(index)
        .map(element_text)
}

fn first_text(scope: &ElementRef<'_>, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).unwrap();
    scope.select(&sel).next().map(element_text)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_integer(text: &str) -> Option<u32> {
    let digits = Regex::new(r"[0-9]+").ok()?;
    digits.find(text)?.as_str().parse().ok()
}

fn first_decimal(text: &str) -> Option<f64> {
    let decimal = Regex::new(r"\d+(?:\.\d+)?").ok()?;
    decimal.find(text)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"
        <div class="_fhph4u">
            <a href="/rooms/12345"></a>
            <span class="_bzh5lkq">Cozy loft near the beach</span>
            <div class="_b14dlit">Entire apartment in Barcelona</div>
            <span class="_10fy1f8">4.92</span>
            <span class="_a7a5sx">(312 reviews)</span>
            <span class="_olc9rf0">$85 per night</span>
            <div class="_kqh46o">
                <span class="_3hmsj">4 guests</span>
                <span class="_3hmsj">2 bedrooms</span>
                <span class="_3hmsj">3 beds</span>
                <span class="_3hmsj">1.5 baths</span>
            </div>
        </div>
    "#;

    fn card(doc: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("div._fhph4u").unwrap();
        doc.select(&sel).next().expect("card fragment")
    }

    #[test]
    fn extracts_all_card_fields() {
        let doc = Html::parse_fragment(CARD);
        let item = card(&doc);

        assert_eq!(title(&item).as_deref(), Some("Cozy loft near the beach"));
        assert_eq!(
            listing_url(&item).as_deref(),
            Some("https://www.airbnb.com/rooms/12345")
        );
        assert_eq!(property_type(&item).as_deref(), Some("Entire apartment"));
        assert_eq!(location(&item).as_deref(), Some("Barcelona"));
        assert_eq!(rating(&item).as_deref(), Some("4.92"));
        assert_eq!(reviews(&item), Some(312));
        assert_eq!(price(&item), Some(85.0));
        assert_eq!(guests(&item), Some(4));
        assert_eq!(bedrooms(&item), (Some(2), Some(false)));
        assert_eq!(beds(&item), Some(3));
        assert_eq!(baths(&item), (Some(1.5), Some(false)));
    }

    #[test]
    fn empty_card_yields_all_nulls() {
        let doc = Html::parse_fragment(r#"<div class="_fhph4u"></div>"#);
        let item = card(&doc);

        assert_eq!(title(&item), None);
        assert_eq!(listing_url(&item), None);
        assert_eq!(property_type(&item), None);
        assert_eq!(location(&item), None);
        assert_eq!(rating(&item), None);
        assert_eq!(reviews(&item), None);
        assert_eq!(price(&item), None);
        assert_eq!(guests(&item), None);
        assert_eq!(bedrooms(&item), (None, None));
        assert_eq!(beds(&item), None);
        assert_eq!(baths(&item), (None, None));
    }

    #[test]
    fn summary_without_in_token_yields_neither_part() {
        let doc = Html::parse_fragment(
            r#"<div class="_fhph4u"><div class="_b14dlit">Lovely studio</div></div>"#,
        );
        let item = card(&doc);

        assert_eq!(property_type(&item), None);
        assert_eq!(location(&item), None);
    }

    #[test]
    fn studio_entry_records_one_bedroom_with_flag() {
        let doc = Html::parse_fragment(
            r#"<div class="_fhph4u"><div class="_kqh46o">
                <span class="_3hmsj">2 guests</span>
                <span class="_3hmsj">Studio</span>
            </div></div>"#,
        );
        let item = card(&doc);

        assert_eq!(bedrooms(&item), (Some(1), Some(true)));
    }

    #[test]
    fn shared_bath_is_flagged_from_second_word() {
        let doc = Html::parse_fragment(
            r#"<div class="_fhph4u"><div class="_kqh46o">
                <span class="_3hmsj">2 guests</span>
                <span class="_3hmsj">1 bedroom</span>
                <span class="_3hmsj">1 bed</span>
                <span class="_3hmsj">1 shared bath</span>
            </div></div>"#,
        );
        let item = card(&doc);

        assert_eq!(baths(&item), (Some(1.0), Some(true)));
    }

    #[test]
    fn half_bath_mention_records_half() {
        let doc = Html::parse_fragment(
            r#"<div class="_fhph4u"><div class="_kqh46o">
                <span class="_3hmsj">2 guests</span>
                <span class="_3hmsj">1 bedroom</span>
                <span class="_3hmsj">1 bed</span>
                <span class="_3hmsj">Half-bath</span>
            </div></div>"#,
        );
        let item = card(&doc);

        assert_eq!(baths(&item), (Some(0.5), Some(false)));
    }

    #[test]
    fn bath_entry_without_count_or_half_mention_stays_unknown() {
        let doc = Html::parse_fragment(
            r#"<div class="_fhph4u"><div class="_kqh46o">
                <span class="_3hmsj">2 guests</span>
                <span class="_3hmsj">1 bedroom</span>
                <span class="_3hmsj">1 bed</span>
                <span class="_3hmsj">private bath</span>
            </div></div>"#,
        );
        let item = card(&doc);

        // The flag still answers; only the count is unknown.
        assert_eq!(baths(&item), (None, Some(false)));
    }

    #[test]
    fn coordinates_come_from_the_map_link() {
        let doc = Html::parse_document(
            r#"<html><body>
                <a title="Open this area in Google Maps (opens a new window)"
                   href="https://maps.google.com/maps?ll=41.40338,2.17403&z=15"></a>
            </body></html>"#,
        );

        assert_eq!(coordinates(&doc), (Some(41.40338), Some(2.17403)));
    }

    #[test]
    fn missing_map_link_yields_null_pair() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert_eq!(coordinates(&doc), (None, None));
    }

    #[test]
    fn unparseable_map_link_yields_null_pair() {
        let doc = Html::parse_document(
            r#"<html><body>
                <a title="Open this area in Google Maps (opens a new window)"
                   href="https://maps.google.com/maps?ll=here,there&z=15"></a>
            </body></html>"#,
        );

        assert_eq!(coordinates(&doc), (None, None));
    }

    #[test]
    fn amenities_url_is_absolute_qualified() {
        let doc = Html::parse_document(
            r#"<html><body>
                <div class="b6xigss dir dir-ltr"><a href="/rooms/12345/amenities"></a></div>
            </body></html>"#,
        );

        assert_eq!(
            amenities_url(&doc).as_deref(),
            Some("https://www.airbnb.com/rooms/12345/amenities")
        );
    }

    #[test]
    fn amenities_text_reads_the_second_match() {
        let doc = Html::parse_document(
            r#"<html><body>
                <div class="_1cnse2m">What this place offers</div>
                <div class="_1cnse2m">Kitchen Wifi Unavailable: TV</div>
            </body></html>"#,
        );

        assert_eq!(amenities_text(&doc), "Kitchen Wifi Unavailable: TV");
    }

    #[test]
    fn amenities_text_is_empty_without_a_second_match() {
        let doc = Html::parse_document(
            r#"<html><body><div class="_1cnse2m">What this place offers</div></body></html>"#,
        );

        assert_eq!(amenities_text(&doc), "");
    }

    #[test]
    fn absolute_hrefs_pass_through_unchanged() {
        assert_eq!(
            absolute_url("https://www.airbnb.com/rooms/1"),
            "https://www.airbnb.com/rooms/1"
        );
        assert_eq!(absolute_url("/rooms/1"), "https://www.airbnb.com/rooms/1");
    }

    #[test]
    fn numeric_substring_helpers() {
        assert_eq!(first_integer("(312 reviews)"), Some(312));
        assert_eq!(first_integer("no numbers here"), None);
        assert_eq!(first_decimal("$85.50 total"), Some(85.5));
        assert_eq!(first_decimal("1.5 baths"), Some(1.5));
        assert_eq!(first_decimal("soon"), None);
    }
}
