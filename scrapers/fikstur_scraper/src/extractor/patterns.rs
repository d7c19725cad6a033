use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}:\d{2}").expect("clock pattern"));
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").expect("date pattern"));
static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*[-–]\s*\d+").expect("score pattern"));

/// Lines mentioning the venue are labels, never team names.
const VENUE_KEYWORDS: &[&str] = &["stadyum", "deplasman", "ev sahibi"];

const IGNORED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Elements whose text flows into the surrounding line.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "em", "font", "i", "label", "mark", "q", "s",
    "small", "span", "strong", "sub", "sup", "time", "u",
];

pub fn find_clock(text: &str) -> Option<&str> {
    CLOCK.find(text).map(|m| m.as_str())
}

pub fn find_date(text: &str) -> Option<&str> {
    DATE.find(text).map(|m| m.as_str())
}

pub fn has_clock(text: &str) -> bool {
    CLOCK.is_match(text)
}

pub fn has_date(text: &str) -> bool {
    DATE.is_match(text)
}

pub fn has_score(text: &str) -> bool {
    SCORE.is_match(text)
}

pub fn strip_clock(text: &str) -> String {
    CLOCK.replace(text, "").trim().to_string()
}

pub fn mentions_venue(line: &str) -> bool {
    let lower = line.to_lowercase();
    VENUE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Lines of two characters or fewer carry nothing useful.
pub fn is_substantial(line: &str) -> bool {
    line.chars().count() > 2
}

/// Could this line be a team name?
pub fn is_team_candidate(line: &str) -> bool {
    is_substantial(line)
        && !has_clock(line)
        && !has_date(line)
        && !has_score(line)
        && !mentions_venue(line)
}

/// Collapses runs of whitespace so nested markup reads as one phrase.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Visible text below `element` with a line break wherever its block changes.
///
/// Inline markup (`<span>`, `<b>`, ...) stays on the line of the block that
/// holds it, so `<div>Karaman <b>FK</b></div>` reads as one phrase while
/// `<div>Team A</div><div>Team B</div>` stays two lines.
pub fn visible_text(element: ElementRef) -> String {
    let mut text = String::new();
    let mut current_block = None;

    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let mut block = None;
        let mut hidden = false;
        for ancestor in node.ancestors() {
            let Some(el) = ancestor.value().as_element() else {
                continue;
            };
            if IGNORED_ELEMENTS.contains(&el.name()) {
                hidden = true;
                break;
            }
            if block.is_none() && !INLINE_ELEMENTS.contains(&el.name()) {
                block = Some(ancestor.id());
            }
        }
        if hidden {
            continue;
        }

        if block != current_block {
            text.push('\n');
            current_block = block;
        }
        text.push_str(fragment);
    }

    text
}

/// Trimmed lines of [`visible_text`] longer than two characters, in document order.
pub fn text_lines(element: ElementRef) -> Vec<String> {
    visible_text(element)
        .split('\n')
        .map(str::trim)
        .filter(|line| is_substantial(line))
        .map(str::to_string)
        .collect()
}

/// Like [`text_lines`], keeping only the first spelling of each line
/// (compared case-insensitively).
pub fn unique_lines(element: ElementRef) -> Vec<String> {
    let mut seen = Vec::new();
    let mut lines = Vec::new();
    for line in text_lines(element) {
        let key = line.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            lines.push(line);
        }
    }
    lines
}
