use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{Slide, SlideType};

/// Delimiter rules tried in priority order; the first one found anywhere in
/// the text is used for the whole deck.
static DELIMITERS: LazyLock<Vec<(Delimiter, Regex)>> = LazyLock::new(|| {
    vec![
        (Delimiter::Rule, Regex::new(r"---+").unwrap()),
        (Delimiter::SlideMarker, Regex::new(r"(?i)slide\s+\d+").unwrap()),
        (Delimiter::NumberedLine, Regex::new(r"(?m)^\d+\.\s+").unwrap()),
    ]
});

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+[ \t]+(.+?)[ \t]*$").unwrap());

/// Keyword sets in classification priority order
static CLASSIFIERS: LazyLock<Vec<(SlideType, Regex)>> = LazyLock::new(|| {
    [
        (SlideType::Problem, r"(?i)problem|challenge|pain"),
        (SlideType::Solution, r"(?i)solution|offer|provide"),
        (SlideType::Market, r"(?i)market|opportunity|tam|sam|som"),
        (SlideType::Team, r"(?i)team|founders|experience"),
        (SlideType::Traction, r"(?i)traction|metrics|growth|progress"),
        (SlideType::Competition, r"(?i)competition|competitors|landscape"),
        (SlideType::BusinessModel, r"(?i)business model|revenue|monetization"),
        (SlideType::Ask, r"(?i)ask|seeking|investment|funding"),
    ]
    .into_iter()
    .map(|(slide_type, pattern)| (slide_type, Regex::new(pattern).unwrap()))
    .collect()
});

/// Which delimiter rule split the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `---` horizontal rules
    Rule,
    /// "Slide 3" style markers
    SlideMarker,
    /// Lines starting with "1. ", "2. ", ...
    NumberedLine,
}

/// Split raw deck text into slides
///
/// Chunks that are empty after trimming are dropped, so the result can be
/// empty for whitespace-only or delimiter-only input.
pub fn segment_deck(raw: &str) -> Vec<Slide> {
    let chunks: Vec<&str> = match detect_delimiter(raw) {
        Some((delimiter, regex)) => {
            debug!("Splitting deck on {:?} delimiter", delimiter);
            regex.split(raw).collect()
        }
        None => {
            debug!("No delimiter found, treating deck as a single slide");
            vec![raw]
        }
    };

    let slides: Vec<Slide> = chunks
        .into_iter()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .enumerate()
        .map(|(index, content)| {
            let id = index as u32 + 1;
            Slide {
                id,
                title: extract_title(content).unwrap_or_else(|| format!("Slide {}", id)),
                slide_type: classify_slide(content),
                content: content.to_string(),
            }
        })
        .collect();

    debug!("Segmented deck into {} slides", slides.len());
    slides
}

/// Find the highest-priority delimiter present in the text
pub fn detect_delimiter(raw: &str) -> Option<(Delimiter, &'static Regex)> {
    DELIMITERS
        .iter()
        .find(|(_, regex)| regex.is_match(raw))
        .map(|(delimiter, regex)| (*delimiter, regex))
}

/// Title from the first markdown heading, else the first non-empty line
fn extract_title(content: &str) -> Option<String> {
    if let Some(caps) = HEADING_REGEX.captures(content) {
        return Some(caps[1].trim().to_string());
    }

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Classify a slide by the first keyword set that matches its content
pub fn classify_slide(content: &str) -> SlideType {
    CLASSIFIERS
        .iter()
        .find(|(_, regex)| regex.is_match(content))
        .map(|(slide_type, _)| *slide_type)
        .unwrap_or(SlideType::General)
}
