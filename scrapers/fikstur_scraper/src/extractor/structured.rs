use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use super::{
    patterns::{
        element_text, find_clock, find_date, has_clock, has_score, is_team_candidate,
        normalize_whitespace, strip_clock, text_lines, unique_lines,
    },
    ExtractionStrategy,
};
use crate::{
    config::TeamConfig,
    types::{teams_are_distinct, MatchRecord},
};

const TIME_MARKER: &str = "event__time";
const SCORE_MARKER: &str = "event__score";
const HEADER_MARKER: &str = "event__header";

const HOME_MARKERS: &[&str] = &["event__participant--home", "homeParticipant", "participant--home"];
const AWAY_MARKERS: &[&str] = &["event__participant--away", "awayParticipant", "participant--away"];

fn class_selector(marker: &str) -> Selector {
    Selector::parse(&format!(r#"[class*="{}"]"#, marker)).expect("valid class selector")
}

static MATCH_BLOCK: LazyLock<Selector> = LazyLock::new(|| class_selector("event__match"));
static TIME: LazyLock<Selector> = LazyLock::new(|| class_selector(TIME_MARKER));
static SCORE: LazyLock<Selector> = LazyLock::new(|| class_selector(SCORE_MARKER));
static PARTICIPANT: LazyLock<Selector> = LazyLock::new(|| class_selector("participant"));
static HOME: LazyLock<Vec<Selector>> =
    LazyLock::new(|| HOME_MARKERS.iter().map(|m| class_selector(m)).collect());
static AWAY: LazyLock<Vec<Selector>> =
    LazyLock::new(|| AWAY_MARKERS.iter().map(|m| class_selector(m)).collect());

fn has_class_marker(element: &ElementRef, marker: &str) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| class.contains(marker))
        .unwrap_or(false)
}

/// Reads fixtures from flashscore's `event__match` rows.
pub struct StructuredStrategy {
    team: TeamConfig,
}

impl StructuredStrategy {
    pub fn new(team: TeamConfig) -> Self {
        Self { team }
    }

    fn parse_block(&self, block: ElementRef) -> Option<MatchRecord> {
        if is_scored(block) {
            debug!("Skipping played match: {}", element_text(block));
            return None;
        }

        let (mut date, mut time) = extract_schedule(block);
        let (mut home, mut away) = extract_marked_teams(block);

        if !teams_are_distinct(&home, &away) {
            home.clear();
            away.clear();

            let lines = unique_lines(block);
            if time.is_empty() {
                if let Some(clock) = lines.iter().find_map(|line| find_clock(line)) {
                    time = clock.to_string();
                }
            }
            if date.is_empty() {
                if let Some(found) = lines.iter().find_map(|line| find_date(line)) {
                    date = found.to_string();
                }
            }

            let teams: Vec<&String> = lines.iter().filter(|line| is_team_candidate(line)).take(2).collect();
            if let [first, second] = teams[..] {
                if teams_are_distinct(first, second) {
                    home = first.clone();
                    away = second.clone();
                }
            }
        }

        if time.is_empty() || !teams_are_distinct(&home, &away) {
            debug!(
                "Skipping candidate with incomplete data: time={:?} home={:?} away={:?}",
                time, home, away
            );
            return None;
        }

        Some(MatchRecord::new(&date, &time, &home, &away, &self.team))
    }
}

impl ExtractionStrategy for StructuredStrategy {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, html: &str) -> Vec<MatchRecord> {
        let document = Html::parse_document(html);
        let mut records: Vec<MatchRecord> = Vec::new();

        for block in document.select(&MATCH_BLOCK) {
            if let Some(record) = self.parse_block(block) {
                if records.iter().any(|existing| existing.same_fixture(&record)) {
                    debug!("Duplicate fixture skipped: {} - {}", record.home_team, record.away_team);
                    continue;
                }
                records.push(record);
            }
        }

        records
    }
}

/// A block showing a result has already been played.
///
/// Home and away goals usually sit in separate score elements, so the
/// fragments are also read as `home - away`.
fn is_scored(block: ElementRef) -> bool {
    let fragments: Vec<String> = block
        .select(&SCORE)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    has_score(&fragments.join(" "))
        || has_score(&fragments.join(" - "))
        || text_lines(block).iter().any(|line| has_score(line))
}

/// Returns `(date, time)` from the block's time elements.
fn extract_schedule(block: ElementRef) -> (String, String) {
    let fragments: Vec<String> = block
        .select(&TIME)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    let mut date = fragments.first().cloned().unwrap_or_default();
    let mut time = fragments.last().cloned().unwrap_or_default();

    if has_clock(&date) {
        let parts: Vec<&str> = date.split_whitespace().collect();
        if let Some((last, rest)) = parts.split_last().filter(|(_, rest)| !rest.is_empty()) {
            time = last.to_string();
            date = rest.join(" ");
        } else {
            time = find_clock(&date).unwrap_or_default().to_string();
            date = strip_clock(&date);
        }
    }

    if date.chars().count() < 3 {
        if let Some(header_date) = header_date(block) {
            date = header_date;
        }
    }

    let time = find_clock(&time).unwrap_or_default().to_string();
    (normalize_whitespace(&date), time)
}

/// Date from an enclosing round header, when the row carries none.
fn header_date(block: ElementRef) -> Option<String> {
    let header = block
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| has_class_marker(ancestor, HEADER_MARKER))?;

    header
        .select(&TIME)
        .map(element_text)
        .find_map(|text| find_date(&text).map(str::to_string))
}

fn first_marked(block: ElementRef, selectors: &[Selector]) -> String {
    selectors
        .iter()
        .find_map(|selector| {
            block
                .select(selector)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default()
}

/// Returns `(home, away)` from participant markers, generic ones last.
fn extract_marked_teams(block: ElementRef) -> (String, String) {
    let mut home = first_marked(block, &HOME);
    let mut away = first_marked(block, &AWAY);

    if home.is_empty() || away.is_empty() {
        let participants: Vec<String> = block
            .select(&PARTICIPANT)
            .filter(|el| !has_class_marker(el, TIME_MARKER) && !has_class_marker(el, SCORE_MARKER))
            .map(element_text)
            .take(2)
            .collect();

        if let [first, second] = &participants[..] {
            if teams_are_distinct(first, second) {
                home = first.clone();
                away = second.clone();
            }
        }
    }

    (home, away)
}
