use pretty_assertions::assert_eq;

extern crate fikstur_scraper;
use fikstur_scraper::{
    config::TeamConfig,
    extractor::{ExtractionStrategy, FixtureExtractor, LineScanStrategy, StructuredStrategy},
    types::MatchRecord,
};

const SCHEDULED_PAGE: &str = include_str!("fixtures/fikstur/flashscore_scheduled.html");
const TEXT_ONLY_PAGE: &str = include_str!("fixtures/fikstur/text_only.html");
const EMPTY_PAGE: &str = include_str!("fixtures/fikstur/empty.html");

fn record(date: &str, time: &str, home: &str, away: &str, venue: &str) -> MatchRecord {
    MatchRecord {
        date: date.to_string(),
        time: time.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        venue: venue.to_string(),
    }
}

fn extractor() -> FixtureExtractor {
    FixtureExtractor::new(TeamConfig::default())
}

fn assert_invariants(records: &[MatchRecord]) {
    let team = TeamConfig::default();
    for (i, r) in records.iter().enumerate() {
        assert_ne!(
            r.home_team.trim().to_lowercase(),
            r.away_team.trim().to_lowercase(),
            "Same team on both sides at index {}", i
        );
        assert!(!r.time.is_empty(), "Missing time at index {}", i);

        let expected_venue = if r.home_team.to_lowercase().contains("karaman") {
            &team.home_venue
        } else {
            &team.away_venue
        };
        assert_eq!(&r.venue, expected_venue, "Wrong venue at index {}", i);

        for other in &records[i + 1..] {
            assert!(
                !(r.home_team == other.home_team && r.away_team == other.away_team && r.time == other.time),
                "Duplicate fixture at index {}", i
            );
        }
    }
}

#[test_log::test]
fn test_scheduled_page() {
    let records = extractor().extract(SCHEDULED_PAGE);

    assert_eq!(
        records,
        vec![
            record("08.03.", "13:30", "Karaman FK", "Altınordu", "Yeni Karaman Stadyumu"),
            record("15.03.", "16:00", "Ankara Demirspor", "Karaman FK", "Deplasman"),
            record("29.03.", "19:00", "Menemen FK", "Karaman FK", "Deplasman"),
        ]
    );
    assert_invariants(&records);
}

#[test_log::test]
fn test_played_matches_never_returned() {
    let records = extractor().extract(SCHEDULED_PAGE);
    assert!(records.iter().all(|r| r.away_team != "Bucaspor 1928"));
}

#[test_log::test]
fn test_text_only_page_falls_back_to_line_scan() {
    assert!(StructuredStrategy::new(TeamConfig::default())
        .extract(TEXT_ONLY_PAGE)
        .is_empty());

    let records = extractor().extract(TEXT_ONLY_PAGE);
    assert_eq!(
        records,
        vec![record("01.03.2025", "10:00", "Team A", "Team B", "Deplasman")]
    );
}

#[test_log::test]
fn test_line_scan_not_used_when_structured_succeeds() {
    // The line scan alone would read the page differently.
    let line_scan = LineScanStrategy::new(TeamConfig::default()).extract(SCHEDULED_PAGE);
    let cascade = extractor().extract(SCHEDULED_PAGE);

    assert_ne!(line_scan, cascade);
    assert_eq!(cascade.len(), 3);
}

#[test_log::test]
fn test_empty_page_yields_nothing() {
    assert!(extractor().extract(EMPTY_PAGE).is_empty());
    assert!(extractor().extract("").is_empty());
}
